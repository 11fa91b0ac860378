//! # ideabox-store
//!
//! Normalized in-memory cache for challenges, ideas, reactions and users.
//!
//! Every entity lives exactly once in a table keyed by its id.  The views the
//! UI renders ("challenge list", "my ideas", a challenge's ideas, a user's
//! reacted ideas, ...) are ordered id vectors resolved against those tables,
//! so one reconciliation step is visible from every view at once.  Each
//! mutation records a [`ChangeKey`] that the owner drains and publishes.

pub mod cache;
pub mod challenges;
pub mod changes;
pub mod ideas;
pub mod reactions;
pub mod records;
pub mod users;

mod error;

pub use cache::Cache;
pub use changes::ChangeKey;
pub use error::StoreError;
pub use records::*;
