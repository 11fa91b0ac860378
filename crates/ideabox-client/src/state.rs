//! State guarded by the [`DataStore`](crate::DataStore) lock.

use ideabox_shared::{ApiError, UserId};
use ideabox_store::Cache;

use crate::status::Statuses;

/// Tokens of the signed-in viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub auth_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Session {
    /// The auth token, or the error every guarded operation reports.
    pub fn require_token(&self) -> Result<String, ApiError> {
        self.auth_token.clone().ok_or_else(ApiError::not_authenticated)
    }
}

/// Everything one lock acquisition sees at once.
#[derive(Debug, Default)]
pub struct StoreState {
    pub session: Session,
    pub cache: Cache,
    pub statuses: Statuses,

    /// Bumped on sign-out.  Responses of operations started under an older
    /// generation are not reconciled.
    pub generation: u64,
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token plus the signed-in user's id.
    pub fn require_viewer(&self) -> Result<(String, UserId), ApiError> {
        let token = self.session.require_token()?;
        let viewer = self
            .cache
            .current_user()
            .cloned()
            .ok_or_else(ApiError::not_authenticated)?;
        Ok((token, viewer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_without_token() {
        let state = StoreState::new();
        let err = state.session.require_token().unwrap_err();
        assert_eq!(err.code(), "USER_NOT_AUTHENTICATED_ERROR");
    }

    #[test]
    fn test_viewer_needs_current_user() {
        let mut state = StoreState::new();
        state.session.auth_token = Some("t".into());
        assert!(state.require_viewer().is_err());
        state.cache.set_current_user(Some(UserId::from("me")));
        assert_eq!(state.require_viewer().unwrap().1, UserId::from("me"));
    }
}
