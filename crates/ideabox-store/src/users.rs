use std::collections::hash_map::Entry;

use ideabox_shared::{ChallengeId, IdeaId, User, UserId};

use crate::cache::Cache;
use crate::changes::ChangeKey;
use crate::error::{Result, StoreError};
use crate::records::{merge, UserRecord};

impl UserRecord {
    fn from_model(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            image_url: user.image_url,
            email: user.email,
            status: user.status,
            created_date: user.created_date,
            deleted_date: user.deleted_date,
            challenges: None,
            ideas: None,
            reacted_ideas: None,
        }
    }

    fn absorb(&mut self, user: User) {
        merge(&mut self.name, user.name);
        merge(&mut self.image_url, user.image_url);
        merge(&mut self.email, user.email);
        merge(&mut self.status, user.status);
        merge(&mut self.created_date, user.created_date);
        merge(&mut self.deleted_date, user.deleted_date);
    }
}

impl Cache {
    pub fn user(&self, id: &UserId) -> Option<&UserRecord> {
        self.users.get(id)
    }

    /// Insert the user or merge the fields this payload carried into the
    /// cached record.
    pub fn ingest_user(&mut self, user: User) -> UserId {
        let id = user.id.clone();
        match self.users.entry(id.clone()) {
            Entry::Occupied(mut entry) => entry.get_mut().absorb(user),
            Entry::Vacant(entry) => {
                entry.insert(UserRecord::from_model(user));
            }
        }
        self.touch(ChangeKey::User(id.clone()));
        id
    }

    pub(crate) fn user_mut(&mut self, id: &UserId) -> Result<&mut UserRecord> {
        let record = self
            .users
            .get_mut(id)
            .ok_or_else(|| StoreError::UserNotFound(id.clone()))?;
        Ok(record)
    }

    /// Materialize `user.challenges` and point every listed challenge's
    /// creator at that user.
    pub fn set_user_challenges(&mut self, user: &UserId, ids: Vec<ChallengeId>) -> Result<()> {
        self.user_mut(user)?.challenges = Some(ids.clone());
        self.touch(ChangeKey::User(user.clone()));
        for id in ids {
            if let Some(challenge) = self.challenges.get_mut(&id) {
                challenge.created_by = Some(user.clone());
                self.touch(ChangeKey::Challenge(id));
            }
        }
        Ok(())
    }

    /// Materialize `user.ideas` and point every listed idea's creator at
    /// that user.
    pub fn set_user_ideas(&mut self, user: &UserId, ids: Vec<IdeaId>) -> Result<()> {
        self.user_mut(user)?.ideas = Some(ids.clone());
        self.touch(ChangeKey::User(user.clone()));
        for id in ids {
            if let Some(idea) = self.ideas.get_mut(&id) {
                idea.created_by = Some(user.clone());
                self.touch(ChangeKey::Idea(id));
            }
        }
        Ok(())
    }

    /// Materialize `user.reacted_ideas`.
    pub fn set_user_reacted_ideas(&mut self, user: &UserId, ids: Vec<IdeaId>) -> Result<()> {
        self.user_mut(user)?.reacted_ideas = Some(ids);
        self.touch(ChangeKey::User(user.clone()));
        Ok(())
    }
}
