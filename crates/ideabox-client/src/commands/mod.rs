//! Logical operations exposed by the [`DataStore`](crate::DataStore).
//!
//! Each sub-module adds an `impl DataStore` block for one domain.  Every
//! operation resolves with its terminal [`Status`](crate::Status); none of
//! them returns `Err` or panics on a failed call.

pub mod challenges;
pub mod ideas;
pub mod reactions;
pub mod users;

use ideabox_shared::{User, UserId};

/// A user given either by id or as an already fetched record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    Id(UserId),
    User(User),
}

impl UserRef {
    pub fn id(&self) -> &UserId {
        match self {
            Self::Id(id) => id,
            Self::User(user) => &user.id,
        }
    }

    /// The id plus the record to ingest, if one was given.
    pub(crate) fn into_parts(self) -> (UserId, Option<User>) {
        match self {
            Self::Id(id) => (id, None),
            Self::User(user) => (user.id.clone(), Some(user)),
        }
    }
}

impl From<UserId> for UserRef {
    fn from(id: UserId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for UserRef {
    fn from(id: &str) -> Self {
        Self::Id(UserId::from(id))
    }
}

impl From<User> for UserRef {
    fn from(user: User) -> Self {
        Self::User(user)
    }
}
