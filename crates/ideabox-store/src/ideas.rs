use ideabox_shared::{ChallengeId, Idea, IdeaId, UserId};
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::changes::ChangeKey;
use crate::error::{Result, StoreError};
use crate::records::{merge, remove_id, unshift_id, IdeaRecord};

impl IdeaRecord {
    fn empty(id: IdeaId) -> Self {
        Self {
            id,
            title: None,
            description: None,
            image_url: None,
            created_date: None,
            created_by: None,
            modified_date: None,
            modified_by: None,
            deleted_date: None,
            deleted_by: None,
            reactions: Vec::new(),
            reaction_quantity: 0,
            my_reaction: None,
            challenge: None,
        }
    }
}

/// Where a deleted idea was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaRemoval {
    pub my_ideas: bool,
    pub ideas_with_my_reaction: bool,
    /// Challenges whose `ideas` listed it.
    pub challenges: usize,
    /// User `ideas` / `reacted_ideas` lists that listed it.
    pub user_lists: usize,
    pub record: bool,
}

impl Cache {
    pub fn idea(&self, id: &IdeaId) -> Option<&IdeaRecord> {
        self.ideas.get(id)
    }

    pub(crate) fn idea_mut(&mut self, id: &IdeaId) -> Result<&mut IdeaRecord> {
        self.ideas
            .get_mut(id)
            .ok_or_else(|| StoreError::IdeaNotFound(id.clone()))
    }

    /// Insert or merge an idea together with its authors, reactions and
    /// parent challenge.
    pub fn ingest_idea(&mut self, idea: Idea) -> IdeaId {
        let Idea {
            id,
            title,
            description,
            image_url,
            created_date,
            created_by,
            modified_date,
            modified_by,
            deleted_date,
            deleted_by,
            reactions,
            reaction_quantity,
            my_reaction,
            challenge,
            materialized,
        } = idea;

        let created_by = created_by.map(|user| self.ingest_user(user));
        let modified_by = modified_by.map(|user| self.ingest_user(user));
        let deleted_by = deleted_by.map(|user| self.ingest_user(user));
        let reactions = materialized.reactions.then(|| {
            reactions
                .into_iter()
                .map(|reaction| self.ingest_reaction(reaction))
                .collect::<Vec<_>>()
        });
        let my_reaction = my_reaction.map(|reaction| self.ingest_reaction(reaction));
        let challenge = challenge.map(|challenge| self.ingest_challenge(*challenge));

        let record = self
            .ideas
            .entry(id.clone())
            .or_insert_with(|| IdeaRecord::empty(id.clone()));
        merge(&mut record.title, title);
        merge(&mut record.description, description);
        merge(&mut record.image_url, image_url);
        merge(&mut record.created_date, created_date);
        merge(&mut record.created_by, created_by);
        merge(&mut record.modified_date, modified_date);
        merge(&mut record.modified_by, modified_by);
        merge(&mut record.deleted_date, deleted_date);
        merge(&mut record.deleted_by, deleted_by);
        if let Some(reactions) = reactions {
            record.reactions = reactions;
        }
        if materialized.reaction_quantity {
            record.reaction_quantity = reaction_quantity;
        }
        // A selected `myReaction: null` means the viewer has not reacted.
        if materialized.my_reaction {
            record.my_reaction = my_reaction;
        }
        merge(&mut record.challenge, challenge);
        self.touch(ChangeKey::Idea(id.clone()));
        id
    }

    pub fn ingest_ideas(&mut self, ideas: Vec<Idea>) -> Vec<IdeaId> {
        ideas.into_iter().map(|idea| self.ingest_idea(idea)).collect()
    }

    // ------------------------------------------------------------------
    // Reconciliation
    // ------------------------------------------------------------------

    /// Splice a freshly created idea into its parent's list, "my ideas"
    /// (counting it) and its creator's list, wherever those are cached.
    pub fn insert_created_idea(&mut self, id: &IdeaId, challenge: Option<&ChallengeId>) {
        if let Some(challenge_id) = challenge {
            let added = self
                .challenges
                .get_mut(challenge_id)
                .map_or(false, |parent| unshift_id(&mut parent.ideas, id.clone()));
            if added {
                self.touch(ChangeKey::Challenge(challenge_id.clone()));
            }
            self.attach_idea(id, challenge_id);
        }

        if self
            .my_ideas
            .as_mut()
            .map_or(false, |page| page.unshift(id.clone()))
        {
            self.touch(ChangeKey::MyIdeas);
        }

        let creator: Option<UserId> = self.ideas.get(id).and_then(|idea| idea.created_by.clone());
        if let Some(creator) = creator {
            let added = self
                .users
                .get_mut(&creator)
                .and_then(|user| user.ideas.as_mut())
                .map_or(false, |list| unshift_id(list, id.clone()));
            if added {
                self.touch(ChangeKey::User(creator));
            }
        }
    }

    /// Copy the editable fields of an update response onto the cached idea.
    pub fn apply_idea_update(&mut self, target: &IdeaId, update: &Idea) -> Result<()> {
        if &update.id != target {
            warn!(
                requested = %target,
                returned = %update.id,
                "Update response names a different idea, keeping cached id"
            );
        }

        let record = self.idea_mut(target)?;
        record.title = update.title.clone();
        record.description = update.description.clone();
        record.image_url = update.image_url.clone();
        self.touch(ChangeKey::Idea(target.clone()));
        Ok(())
    }

    /// Remove an idea from every view that lists it and drop its record.
    pub fn remove_idea(&mut self, id: &IdeaId) -> IdeaRemoval {
        let mut removal = IdeaRemoval::default();

        if self.my_ideas.as_mut().map_or(false, |page| page.remove(id)) {
            removal.my_ideas = true;
            self.touch(ChangeKey::MyIdeas);
        }
        if self
            .ideas_with_my_reaction
            .as_mut()
            .map_or(false, |page| page.remove(id))
        {
            removal.ideas_with_my_reaction = true;
            self.touch(ChangeKey::IdeasWithMyReaction);
        }

        let parents: Vec<ChallengeId> = self
            .challenges
            .values_mut()
            .filter_map(|challenge| {
                let listed = remove_id(&mut challenge.ideas, id);
                let was_top = challenge.top_idea.as_ref() == Some(id);
                if was_top {
                    challenge.top_idea = None;
                }
                if listed {
                    removal.challenges += 1;
                }
                (listed || was_top).then(|| challenge.id.clone())
            })
            .collect();
        for parent in parents {
            self.touch(ChangeKey::Challenge(parent));
        }

        let owners: Vec<UserId> = self
            .users
            .values_mut()
            .filter_map(|user| {
                let mut hits = 0;
                for list in [user.ideas.as_mut(), user.reacted_ideas.as_mut()]
                    .into_iter()
                    .flatten()
                {
                    if remove_id(list, id) {
                        hits += 1;
                    }
                }
                removal.user_lists += hits;
                (hits > 0).then(|| user.id.clone())
            })
            .collect();
        for owner in owners {
            self.touch(ChangeKey::User(owner));
        }

        if self.ideas.remove(id).is_some() {
            removal.record = true;
            self.touch(ChangeKey::Idea(id.clone()));
        }

        debug!(idea_id = %id, ?removal, "Idea removed from cache");
        removal
    }
}
