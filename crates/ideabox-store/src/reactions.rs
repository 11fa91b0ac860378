use ideabox_shared::{IdeaId, Reaction, ReactionId, UserId};
use tracing::debug;

use crate::cache::Cache;
use crate::changes::ChangeKey;
use crate::error::{Result, StoreError};
use crate::records::{merge, remove_id, unshift_id, ReactionRecord};

impl Cache {
    pub fn reaction(&self, id: &ReactionId) -> Option<&ReactionRecord> {
        self.reactions.get(id)
    }

    pub fn ingest_reaction(&mut self, reaction: Reaction) -> ReactionId {
        let Reaction {
            id,
            object_id,
            value,
            created_date,
            created_by,
            modified_date,
            modified_by,
            deleted_date,
            deleted_by,
        } = reaction;

        let created_by = created_by.map(|user| self.ingest_user(user));
        let modified_by = modified_by.map(|user| self.ingest_user(user));
        let deleted_by = deleted_by.map(|user| self.ingest_user(user));

        let record = self
            .reactions
            .entry(id.clone())
            .or_insert_with(|| ReactionRecord {
                id: id.clone(),
                object_id: None,
                value: None,
                created_date: None,
                created_by: None,
                modified_date: None,
                modified_by: None,
                deleted_date: None,
                deleted_by: None,
            });
        merge(&mut record.object_id, object_id);
        merge(&mut record.value, value);
        merge(&mut record.created_date, created_date);
        merge(&mut record.created_by, created_by);
        merge(&mut record.modified_date, modified_date);
        merge(&mut record.modified_by, modified_by);
        merge(&mut record.deleted_date, deleted_date);
        merge(&mut record.deleted_by, deleted_by);
        self.touch(ChangeKey::Reaction(id.clone()));
        id
    }

    /// The viewer's reaction on `idea`.
    pub fn my_reaction(&self, idea: &IdeaId) -> Result<ReactionId> {
        let record = self
            .ideas
            .get(idea)
            .ok_or_else(|| StoreError::IdeaNotFound(idea.clone()))?;
        record
            .my_reaction
            .clone()
            .ok_or_else(|| StoreError::NoReaction(idea.clone()))
    }

    pub fn has_my_reaction(&self, idea: &IdeaId) -> bool {
        self.my_reaction(idea).is_ok()
    }

    /// Record the viewer's new reaction on `idea`.
    ///
    /// The count only moves on the not-reacted to reacted transition, so a
    /// duplicate response cannot count twice.
    pub fn apply_reaction_created(
        &mut self,
        idea: &IdeaId,
        reaction: Reaction,
        viewer: Option<&UserId>,
    ) {
        let reaction_id = self.ingest_reaction(reaction);

        if let Some(record) = self.ideas.get_mut(idea) {
            if record.my_reaction.is_none() {
                record.reaction_quantity += 1;
            }
            record.my_reaction = Some(reaction_id.clone());
            if !record.reactions.contains(&reaction_id) {
                record.reactions.push(reaction_id.clone());
            }
            debug!(
                idea_id = %idea,
                reaction_id = %reaction_id,
                quantity = record.reaction_quantity,
                "Reaction applied"
            );
            self.touch(ChangeKey::Idea(idea.clone()));
        }

        if let Some(viewer) = viewer {
            let added = self
                .users
                .get_mut(viewer)
                .and_then(|user| user.reacted_ideas.as_mut())
                .map_or(false, |list| unshift_id(list, idea.clone()));
            if added {
                self.touch(ChangeKey::User(viewer.clone()));
            }
        }

        if self
            .ideas_with_my_reaction
            .as_mut()
            .map_or(false, |page| page.unshift(idea.clone()))
        {
            self.touch(ChangeKey::IdeasWithMyReaction);
        }
    }

    /// Forget the viewer's reaction on `idea`.
    ///
    /// The count only drops when the idea still carried a reaction, and the
    /// reacted lists only lose a total when the idea was listed.
    pub fn apply_reaction_deleted(
        &mut self,
        idea: &IdeaId,
        reaction_id: &ReactionId,
        viewer: Option<&UserId>,
    ) {
        if let Some(record) = self.ideas.get_mut(idea) {
            if record.my_reaction.take().is_some() {
                record.reaction_quantity = record.reaction_quantity.saturating_sub(1);
            }
            remove_id(&mut record.reactions, reaction_id);
            debug!(
                idea_id = %idea,
                reaction_id = %reaction_id,
                quantity = record.reaction_quantity,
                "Reaction removed"
            );
            self.touch(ChangeKey::Idea(idea.clone()));
        }

        if self.reactions.remove(reaction_id).is_some() {
            self.touch(ChangeKey::Reaction(reaction_id.clone()));
        }

        if let Some(viewer) = viewer {
            let removed = self
                .users
                .get_mut(viewer)
                .and_then(|user| user.reacted_ideas.as_mut())
                .map_or(false, |list| remove_id(list, idea));
            if removed {
                self.touch(ChangeKey::User(viewer.clone()));
            }
        }

        if self
            .ideas_with_my_reaction
            .as_mut()
            .map_or(false, |page| page.remove(idea))
        {
            self.touch(ChangeKey::IdeasWithMyReaction);
        }
    }
}
