use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;

/// Every failure an operation can report to its caller.
///
/// The collaborator classifies remote failures; the client only synthesizes
/// `UserNotAuthenticated`, `Validation` and `ObjectNotFound` locally and
/// downgrades unspecific failures to `Generic`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ApiError {
    #[serde(rename = "GENERIC_ERROR")]
    #[error("{message}")]
    Generic { message: String },

    #[serde(rename = "NETWORK_ERROR")]
    #[error("Network error: {message}")]
    Network { message: String },

    /// Server-side validation rejection. `extra` carries a machine-readable
    /// reason such as `EMAIL_IN_USE`.
    #[serde(rename = "BAD_USER_INPUT_ERROR")]
    #[error("{message}")]
    BadUserInput {
        message: String,
        extra: Option<String>,
    },

    #[serde(rename = "OBJECT_NOT_FOUND_ERROR")]
    #[error("{}", .message.as_deref().unwrap_or("Object not found"))]
    ObjectNotFound { message: Option<String> },

    #[serde(rename = "PENDING_ACCOUNT_ERROR")]
    #[error("{message}")]
    PendingAccount { message: String },

    #[serde(rename = "USER_NOT_AUTHENTICATED_ERROR")]
    #[error("{message}")]
    UserNotAuthenticated { message: String },

    /// Local pre-call validation failure, one entry per offending field.
    #[serde(rename = "VALIDATION_ERROR")]
    #[error("Validation failed on {} field(s)", .errors.len())]
    Validation { errors: Vec<FieldError> },
}

impl ApiError {
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn bad_user_input(message: impl Into<String>, extra: Option<&str>) -> Self {
        Self::BadUserInput {
            message: message.into(),
            extra: extra.map(str::to_string),
        }
    }

    pub fn object_not_found(message: impl Into<String>) -> Self {
        Self::ObjectNotFound {
            message: Some(message.into()),
        }
    }

    pub fn not_authenticated() -> Self {
        Self::UserNotAuthenticated {
            message: constants::MSG_NOT_AUTHENTICATED.to_string(),
        }
    }

    /// Wire code of this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Generic { .. } => "GENERIC_ERROR",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::BadUserInput { .. } => "BAD_USER_INPUT_ERROR",
            Self::ObjectNotFound { .. } => "OBJECT_NOT_FOUND_ERROR",
            Self::PendingAccount { .. } => "PENDING_ACCOUNT_ERROR",
            Self::UserNotAuthenticated { .. } => "USER_NOT_AUTHENTICATED_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
        }
    }

    /// Replace an unspecific failure with the operation's fixed message and
    /// forward every other kind untouched.
    pub fn classify(self, fallback: &str) -> Self {
        match self {
            Self::Generic { .. } => Self::generic(fallback),
            other => other,
        }
    }
}

/// Form field named by a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Email,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
