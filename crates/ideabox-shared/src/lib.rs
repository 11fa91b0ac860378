//! # ideabox-shared
//!
//! Types shared by the cache and client crates: entity identifiers, the error
//! taxonomy surfaced to callers, the JSON wire payloads returned by the API
//! and the entity models decoded from them.

pub mod constants;
pub mod error;
pub mod models;
pub mod types;
pub mod wire;

pub use error::{ApiError, Field, FieldError};
pub use models::{Challenge, Idea, Materialized, Reaction, User};
pub use types::{ChallengeId, IdeaId, PrivacyMode, ReactionId, UserId, UserStatus};
