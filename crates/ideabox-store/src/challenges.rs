use ideabox_shared::{Challenge, ChallengeId, IdeaId, UserId};
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::changes::ChangeKey;
use crate::error::{Result, StoreError};
use crate::records::{merge, remove_id, unshift_id, ChallengeRecord};

impl ChallengeRecord {
    fn empty(id: ChallengeId) -> Self {
        Self {
            id,
            title: None,
            description: None,
            image_url: None,
            close_date: None,
            end_date: None,
            privacy_mode: None,
            privacy_data: None,
            created_date: None,
            created_by: None,
            modified_date: None,
            modified_by: None,
            deleted_date: None,
            deleted_by: None,
            reactions: Vec::new(),
            reaction_quantity: 0,
            top_idea: None,
            ideas: Vec::new(),
        }
    }
}

/// Where a deleted challenge was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChallengeRemoval {
    pub my_challenges: bool,
    pub challenge_list: bool,
    /// Number of users whose `challenges` listed it.
    pub user_lists: usize,
    pub record: bool,
}

impl Cache {
    pub fn challenge(&self, id: &ChallengeId) -> Option<&ChallengeRecord> {
        self.challenges.get(id)
    }

    /// Ideas of a cached challenge, in list order.
    pub fn challenge_ideas(&self, id: &ChallengeId) -> Vec<&crate::IdeaRecord> {
        self.challenges
            .get(id)
            .map(|challenge| self.resolve_ideas(&challenge.ideas))
            .unwrap_or_default()
    }

    /// Insert or merge a challenge and everything nested in it.
    ///
    /// Relations the payload did not carry keep their cached value.  Every
    /// idea listed under the challenge gets its back-reference pointed at it.
    pub fn ingest_challenge(&mut self, challenge: Challenge) -> ChallengeId {
        let Challenge {
            id,
            title,
            description,
            image_url,
            close_date,
            end_date,
            privacy_mode,
            privacy_data,
            created_date,
            created_by,
            modified_date,
            modified_by,
            deleted_date,
            deleted_by,
            reactions,
            reaction_quantity,
            top_idea,
            ideas,
            materialized,
        } = challenge;

        let created_by = created_by.map(|user| self.ingest_user(user));
        let modified_by = modified_by.map(|user| self.ingest_user(user));
        let deleted_by = deleted_by.map(|user| self.ingest_user(user));
        let reactions = materialized.reactions.then(|| {
            reactions
                .into_iter()
                .map(|reaction| self.ingest_reaction(reaction))
                .collect::<Vec<_>>()
        });
        let top_idea = top_idea.map(|idea| self.ingest_idea(*idea));
        let ideas = materialized.ideas.then(|| {
            ideas
                .into_iter()
                .map(|idea| self.ingest_idea(idea))
                .collect::<Vec<_>>()
        });

        let record = self
            .challenges
            .entry(id.clone())
            .or_insert_with(|| ChallengeRecord::empty(id.clone()));
        merge(&mut record.title, title);
        merge(&mut record.description, description);
        merge(&mut record.image_url, image_url);
        merge(&mut record.close_date, close_date);
        merge(&mut record.end_date, end_date);
        merge(&mut record.privacy_mode, privacy_mode);
        merge(&mut record.privacy_data, privacy_data);
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
        merge(&mut record.top_idea, top_idea.clone());
        if let Some(ideas) = &ideas {
            record.ideas = ideas.clone();
        }
        self.touch(ChangeKey::Challenge(id.clone()));

        let children = ideas.into_iter().flatten().chain(top_idea);
        for idea_id in children {
            self.attach_idea(&idea_id, &id);
        }

        id
    }

    pub fn ingest_challenges(&mut self, challenges: Vec<Challenge>) -> Vec<ChallengeId> {
        challenges
            .into_iter()
            .map(|challenge| self.ingest_challenge(challenge))
            .collect()
    }

    /// Point an idea's back-reference at `challenge`.
    pub(crate) fn attach_idea(&mut self, idea_id: &IdeaId, challenge: &ChallengeId) {
        if let Some(idea) = self.ideas.get_mut(idea_id) {
            if idea.challenge.as_ref() != Some(challenge) {
                idea.challenge = Some(challenge.clone());
                self.touch(ChangeKey::Idea(idea_id.clone()));
            }
        }
    }

    /// Replace a challenge's idea list and back-fill every idea's parent.
    pub fn set_challenge_ideas(&mut self, id: &ChallengeId, ideas: Vec<IdeaId>) -> Result<()> {
        let record = self
            .challenges
            .get_mut(id)
            .ok_or_else(|| StoreError::ChallengeNotFound(id.clone()))?;
        record.ideas = ideas.clone();
        self.touch(ChangeKey::Challenge(id.clone()));
        self.attach_ideas(id, &ideas);
        Ok(())
    }

    /// Point every listed idea at `challenge`, whether or not the challenge
    /// itself is cached.
    pub fn attach_ideas(&mut self, challenge: &ChallengeId, ideas: &[IdeaId]) {
        for idea_id in ideas {
            self.attach_idea(idea_id, challenge);
        }
    }

    // ------------------------------------------------------------------
    // Reconciliation
    // ------------------------------------------------------------------

    /// Splice a freshly created challenge into the front of every view that
    /// is materialized: the global list, "my challenges" (counting it) and
    /// its creator's own list.
    pub fn insert_created_challenge(&mut self, id: &ChallengeId) {
        if self
            .challenge_list
            .as_mut()
            .map_or(false, |list| unshift_id(list, id.clone()))
        {
            self.touch(ChangeKey::ChallengeList);
        }

        if self
            .my_challenges
            .as_mut()
            .map_or(false, |page| page.unshift(id.clone()))
        {
            self.touch(ChangeKey::MyChallenges);
        }

        let creator: Option<UserId> = self.challenges.get(id).and_then(|c| c.created_by.clone());
        if let Some(creator) = creator {
            let added = self
                .users
                .get_mut(&creator)
                .and_then(|user| user.challenges.as_mut())
                .map_or(false, |list| unshift_id(list, id.clone()));
            if added {
                self.touch(ChangeKey::User(creator));
            }
        }
    }

    /// Copy the editable fields of an update response onto the cached
    /// record.  Values are assigned as returned, including cleared ones.
    pub fn apply_challenge_update(&mut self, target: &ChallengeId, update: &Challenge) -> Result<()> {
        if &update.id != target {
            warn!(
                requested = %target,
                returned = %update.id,
                "Update response names a different challenge, keeping cached id"
            );
        }

        let record = self
            .challenges
            .get_mut(target)
            .ok_or_else(|| StoreError::ChallengeNotFound(target.clone()))?;
        record.title = update.title.clone();
        record.description = update.description.clone();
        record.image_url = update.image_url.clone();
        record.end_date = update.end_date;
        record.close_date = update.close_date;
        record.privacy_mode = update.privacy_mode;
        self.touch(ChangeKey::Challenge(target.clone()));
        Ok(())
    }

    /// Remove a challenge from every view and drop its record.
    ///
    /// "My challenges" only loses one from its total when the id was
    /// actually listed there.
    pub fn remove_challenge(&mut self, id: &ChallengeId) -> ChallengeRemoval {
        let mut removal = ChallengeRemoval::default();

        if self
            .my_challenges
            .as_mut()
            .map_or(false, |page| page.remove(id))
        {
            removal.my_challenges = true;
            self.touch(ChangeKey::MyChallenges);
        }

        if self
            .challenge_list
            .as_mut()
            .map_or(false, |list| remove_id(list, id))
        {
            removal.challenge_list = true;
            self.touch(ChangeKey::ChallengeList);
        }

        let owners: Vec<UserId> = self
            .users
            .values_mut()
            .filter_map(|user| {
                let list = user.challenges.as_mut()?;
                remove_id(list, id).then(|| user.id.clone())
            })
            .collect();
        removal.user_lists = owners.len();
        for owner in owners {
            self.touch(ChangeKey::User(owner));
        }

        if self.current_challenge.as_ref() == Some(id) {
            self.set_current_challenge(None);
        }

        if let Some(record) = self.challenges.remove(id) {
            removal.record = true;
            for idea_id in record.ideas.iter().chain(record.top_idea.iter()) {
                if let Some(idea) = self.ideas.get_mut(idea_id) {
                    if idea.challenge.as_ref() == Some(id) {
                        idea.challenge = None;
                        self.touch(ChangeKey::Idea(idea_id.clone()));
                    }
                }
            }
            self.touch(ChangeKey::Challenge(id.clone()));
        }

        debug!(challenge_id = %id, ?removal, "Challenge removed from cache");
        removal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Page;
    use serde_json::json;

    fn challenge(value: serde_json::Value) -> Challenge {
        Challenge::from_json(value).unwrap()
    }

    #[test]
    fn test_ingest_backfills_idea_parent() {
        let mut cache = Cache::new();
        let id = cache.ingest_challenge(challenge(json!({
            "id": "c1",
            "ideas": {"edges": [{"node": {"id": "i1"}}, {"node": {"id": "i2"}}]}
        })));

        let record = cache.challenge(&id).unwrap();
        assert_eq!(record.ideas, vec![IdeaId::from("i1"), IdeaId::from("i2")]);
        for idea in cache.challenge_ideas(&id) {
            assert_eq!(idea.challenge.as_ref(), Some(&id));
        }
    }

    #[test]
    fn test_partial_payload_keeps_ideas_and_count() {
        let mut cache = Cache::new();
        cache.ingest_challenge(challenge(json!({
            "id": "c1",
            "title": "Greener office",
            "reactions": {"totalCount": 4, "edges": []},
            "ideas": {"edges": [{"node": {"id": "i1"}}]}
        })));
        cache.ingest_challenge(challenge(json!({"id": "c1", "description": "Less paper"})));

        let record = cache.challenge(&ChallengeId::from("c1")).unwrap();
        assert_eq!(record.title.as_deref(), Some("Greener office"));
        assert_eq!(record.description.as_deref(), Some("Less paper"));
        assert_eq!(record.reaction_quantity, 4);
        assert_eq!(record.ideas, vec![IdeaId::from("i1")]);
    }

    #[test]
    fn test_created_challenge_goes_first_in_materialized_views() {
        let mut cache = Cache::new();
        let old = cache.ingest_challenge(challenge(json!({"id": "old"})));
        cache.set_challenge_list(Some(vec![old.clone()]));
        cache.set_my_challenges(Some(Page::new(vec![old.clone()], 7)));

        let new = cache.ingest_challenge(challenge(json!({"id": "new"})));
        cache.insert_created_challenge(&new);

        assert_eq!(cache.challenge_list().unwrap()[0], new);
        let mine = cache.my_challenges().unwrap();
        assert_eq!(mine.items[0], new);
        assert_eq!(mine.total_count, 8);
    }

    #[test]
    fn test_created_challenge_leaves_unmaterialized_views_alone() {
        let mut cache = Cache::new();
        let new = cache.ingest_challenge(challenge(json!({"id": "new"})));
        cache.insert_created_challenge(&new);
        assert!(cache.challenge_list().is_none());
        assert!(cache.my_challenges().is_none());
    }

    #[test]
    fn test_update_touches_only_target() {
        let mut cache = Cache::new();
        let a = cache.ingest_challenge(challenge(json!({"id": "a", "title": "A", "description": "keep"})));
        let b = cache.ingest_challenge(challenge(json!({"id": "b", "title": "B", "description": "other"})));

        let update = challenge(json!({"id": "a", "title": "A2", "description": "keep"}));
        cache.apply_challenge_update(&a, &update).unwrap();

        assert_eq!(cache.challenge(&a).unwrap().title.as_deref(), Some("A2"));
        let other = cache.challenge(&b).unwrap();
        assert_eq!(other.title.as_deref(), Some("B"));
        assert_eq!(other.description.as_deref(), Some("other"));
    }

    #[test]
    fn test_update_unknown_challenge() {
        let mut cache = Cache::new();
        let update = challenge(json!({"id": "zz"}));
        assert_eq!(
            cache.apply_challenge_update(&ChallengeId::from("zz"), &update),
            Err(StoreError::ChallengeNotFound(ChallengeId::from("zz")))
        );
    }

    #[test]
    fn test_remove_decrements_only_where_found() {
        let mut cache = Cache::new();
        let a = cache.ingest_challenge(challenge(json!({
            "id": "a",
            "ideas": {"edges": [{"node": {"id": "i1"}}]}
        })));
        let b = cache.ingest_challenge(challenge(json!({"id": "b"})));
        cache.set_challenge_list(Some(vec![a.clone(), b.clone()]));
        cache.set_my_challenges(Some(Page::new(vec![b.clone()], 3)));
        cache.set_current_challenge(Some(a.clone()));

        let removal = cache.remove_challenge(&a);
        assert!(removal.challenge_list);
        assert!(!removal.my_challenges);
        assert!(removal.record);
        assert_eq!(cache.my_challenges().unwrap().total_count, 3);
        assert_eq!(cache.challenge_list().unwrap(), &[b.clone()]);
        assert!(cache.current_challenge().is_none());
        assert!(cache.idea(&IdeaId::from("i1")).unwrap().challenge.is_none());
    }

    #[test]
    fn test_attach_ideas_without_cached_challenge() {
        let mut cache = Cache::new();
        let ideas = cache.ingest_ideas(vec![
            ideabox_shared::Idea::from_json(json!({"id": "i1"})).unwrap(),
            ideabox_shared::Idea::from_json(json!({"id": "i2"})).unwrap(),
        ]);
        let parent = ChallengeId::from("c9");

        assert!(cache.set_challenge_ideas(&parent, ideas.clone()).is_err());
        cache.attach_ideas(&parent, &ideas);

        assert!(cache.challenge(&parent).is_none());
        for id in &ideas {
            assert_eq!(cache.idea(id).unwrap().challenge.as_ref(), Some(&parent));
        }
    }
}
