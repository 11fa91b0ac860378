use ideabox_shared::constants::{MSG_CHALLENGE_NOT_FOUND, MSG_NO_REACTION};
use ideabox_shared::{ApiError, ChallengeId, IdeaId, UserId};
use thiserror::Error;

/// Errors produced by cache lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Challenge not cached: {0}")]
    ChallengeNotFound(ChallengeId),

    #[error("Idea not cached: {0}")]
    IdeaNotFound(IdeaId),

    #[error("User not cached: {0}")]
    UserNotFound(UserId),

    /// The viewer has no reaction on this idea.
    #[error("No reaction of the current user on idea {0}")]
    NoReaction(IdeaId),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NoReaction(_) => ApiError::object_not_found(MSG_NO_REACTION),
            StoreError::ChallengeNotFound(_) => ApiError::object_not_found(MSG_CHALLENGE_NOT_FOUND),
            other => ApiError::object_not_found(other.to_string()),
        }
    }
}
