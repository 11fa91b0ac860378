//! The [`Cache`] tables and the top-level views.
//!
//! Entity-specific ingestion and reconciliation live in `users.rs`,
//! `challenges.rs`, `ideas.rs` and `reactions.rs` as further `impl Cache`
//! blocks.

use std::collections::HashMap;

use ideabox_shared::{ChallengeId, IdeaId, ReactionId, UserId};

use crate::changes::ChangeKey;
use crate::records::{ChallengeRecord, IdeaRecord, Page, ReactionRecord, UserRecord};

/// Normalized entity tables plus the list views built on top of them.
#[derive(Debug, Default)]
pub struct Cache {
    pub(crate) users: HashMap<UserId, UserRecord>,
    pub(crate) challenges: HashMap<ChallengeId, ChallengeRecord>,
    pub(crate) ideas: HashMap<IdeaId, IdeaRecord>,
    pub(crate) reactions: HashMap<ReactionId, ReactionRecord>,

    /// Unfiltered challenge list, once fetched.
    pub(crate) challenge_list: Option<Vec<ChallengeId>>,
    pub(crate) current_challenge: Option<ChallengeId>,
    /// The signed-in viewer.
    pub(crate) current_user: Option<UserId>,

    pub(crate) my_challenges: Option<Page<ChallengeId>>,
    pub(crate) my_ideas: Option<Page<IdeaId>>,
    pub(crate) ideas_with_my_reaction: Option<Page<IdeaId>>,

    changes: Vec<ChangeKey>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record and view.
    pub fn clear(&mut self) {
        let changes = std::mem::take(&mut self.changes);
        *self = Self {
            changes,
            ..Self::default()
        };
        for key in [
            ChangeKey::ChallengeList,
            ChangeKey::CurrentChallenge,
            ChangeKey::CurrentUser,
            ChangeKey::MyChallenges,
            ChangeKey::MyIdeas,
            ChangeKey::IdeasWithMyReaction,
        ] {
            self.touch(key);
        }
    }

    pub(crate) fn touch(&mut self, key: ChangeKey) {
        if !self.changes.contains(&key) {
            self.changes.push(key);
        }
    }

    /// Drain the change keys recorded since the last call, in first-touch order.
    pub fn take_changes(&mut self) -> Vec<ChangeKey> {
        std::mem::take(&mut self.changes)
    }

    // ------------------------------------------------------------------
    // Top-level views
    // ------------------------------------------------------------------

    pub fn challenge_list(&self) -> Option<&[ChallengeId]> {
        self.challenge_list.as_deref()
    }

    pub fn set_challenge_list(&mut self, ids: Option<Vec<ChallengeId>>) {
        self.challenge_list = ids;
        self.touch(ChangeKey::ChallengeList);
    }

    pub fn current_challenge(&self) -> Option<&ChallengeId> {
        self.current_challenge.as_ref()
    }

    pub fn set_current_challenge(&mut self, id: Option<ChallengeId>) {
        self.current_challenge = id;
        self.touch(ChangeKey::CurrentChallenge);
    }

    pub fn current_user(&self) -> Option<&UserId> {
        self.current_user.as_ref()
    }

    pub fn set_current_user(&mut self, id: Option<UserId>) {
        self.current_user = id;
        self.touch(ChangeKey::CurrentUser);
    }

    pub fn my_challenges(&self) -> Option<&Page<ChallengeId>> {
        self.my_challenges.as_ref()
    }

    pub fn set_my_challenges(&mut self, page: Option<Page<ChallengeId>>) {
        self.my_challenges = page;
        self.touch(ChangeKey::MyChallenges);
    }

    pub fn my_ideas(&self) -> Option<&Page<IdeaId>> {
        self.my_ideas.as_ref()
    }

    pub fn set_my_ideas(&mut self, page: Option<Page<IdeaId>>) {
        self.my_ideas = page;
        self.touch(ChangeKey::MyIdeas);
    }

    pub fn ideas_with_my_reaction(&self) -> Option<&Page<IdeaId>> {
        self.ideas_with_my_reaction.as_ref()
    }

    pub fn set_ideas_with_my_reaction(&mut self, page: Option<Page<IdeaId>>) {
        self.ideas_with_my_reaction = page;
        self.touch(ChangeKey::IdeasWithMyReaction);
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    /// Resolve ids against the challenge table, skipping unknown ids.
    pub fn resolve_challenges(&self, ids: &[ChallengeId]) -> Vec<&ChallengeRecord> {
        ids.iter().filter_map(|id| self.challenges.get(id)).collect()
    }

    /// Resolve ids against the idea table, skipping unknown ids.
    pub fn resolve_ideas(&self, ids: &[IdeaId]) -> Vec<&IdeaRecord> {
        ids.iter().filter_map(|id| self.ideas.get(id)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.challenges.is_empty()
            && self.ideas.is_empty()
            && self.reactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changes_deduplicated_in_order() {
        let mut cache = Cache::new();
        cache.set_challenge_list(Some(vec![]));
        cache.set_current_user(None);
        cache.set_challenge_list(None);
        assert_eq!(
            cache.take_changes(),
            vec![ChangeKey::ChallengeList, ChangeKey::CurrentUser]
        );
        assert!(cache.take_changes().is_empty());
    }

    #[test]
    fn test_clear_resets_views() {
        let mut cache = Cache::new();
        cache.set_challenge_list(Some(vec![ChallengeId::from("c1")]));
        cache.set_current_challenge(Some(ChallengeId::from("c1")));
        cache.set_my_ideas(Some(Page::new(vec![], 0)));
        cache.take_changes();

        cache.clear();
        assert!(cache.challenge_list().is_none());
        assert!(cache.current_challenge().is_none());
        assert!(cache.my_ideas().is_none());
        assert!(cache.take_changes().contains(&ChangeKey::ChallengeList));
    }
}
