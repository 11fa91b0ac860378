//! Normalized entity records held by the [`Cache`](crate::Cache).
//!
//! Records reference each other by id only.  Relation vectors that are
//! `Option` stay `None` until a fetch materializes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ideabox_shared::{ChallengeId, IdeaId, PrivacyMode, ReactionId, UserId, UserStatus};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub email: Option<String>,
    pub status: Option<UserStatus>,
    pub created_date: Option<DateTime<Utc>>,
    pub deleted_date: Option<DateTime<Utc>>,
    /// Challenges created by this user, once fetched.
    pub challenges: Option<Vec<ChallengeId>>,
    /// Ideas created by this user, once fetched.
    pub ideas: Option<Vec<IdeaId>>,
    /// Ideas this user reacted to, once fetched.
    pub reacted_ideas: Option<Vec<IdeaId>>,
}

// ---------------------------------------------------------------------------
// Challenge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub id: ChallengeId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub close_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub privacy_mode: Option<PrivacyMode>,
    pub privacy_data: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    pub created_by: Option<UserId>,
    pub modified_date: Option<DateTime<Utc>>,
    pub modified_by: Option<UserId>,
    pub deleted_date: Option<DateTime<Utc>>,
    pub deleted_by: Option<UserId>,
    pub reactions: Vec<ReactionId>,
    pub reaction_quantity: u64,
    pub top_idea: Option<IdeaId>,
    pub ideas: Vec<IdeaId>,
}

// ---------------------------------------------------------------------------
// Idea
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaRecord {
    pub id: IdeaId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    pub created_by: Option<UserId>,
    pub modified_date: Option<DateTime<Utc>>,
    pub modified_by: Option<UserId>,
    pub deleted_date: Option<DateTime<Utc>>,
    pub deleted_by: Option<UserId>,
    pub reactions: Vec<ReactionId>,
    /// Number of `LIKE` reactions.
    pub reaction_quantity: u64,
    /// The viewer's own reaction; `Some` exactly when the viewer reacted.
    pub my_reaction: Option<ReactionId>,
    /// Parent challenge.
    pub challenge: Option<ChallengeId>,
}

// ---------------------------------------------------------------------------
// Reaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRecord {
    pub id: ReactionId,
    pub object_id: Option<String>,
    pub value: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    pub created_by: Option<UserId>,
    pub modified_date: Option<DateTime<Utc>>,
    pub modified_by: Option<UserId>,
    pub deleted_date: Option<DateTime<Utc>>,
    pub deleted_by: Option<UserId>,
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// An ordered id list plus the server-side total it was cut from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<Id> {
    pub items: Vec<Id>,
    pub total_count: u64,
}

impl<Id: PartialEq> Page<Id> {
    pub fn new(items: Vec<Id>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.items.contains(id)
    }

    /// Insert at the front and count it.  Returns `false` (and changes
    /// nothing) when the id is already listed.
    pub fn unshift(&mut self, id: Id) -> bool {
        if !unshift_id(&mut self.items, id) {
            return false;
        }
        self.total_count += 1;
        true
    }

    /// Remove the id; the total only drops when something was removed.
    pub fn remove(&mut self, id: &Id) -> bool {
        if !remove_id(&mut self.items, id) {
            return false;
        }
        self.total_count = self.total_count.saturating_sub(1);
        true
    }
}

/// Insert `id` at index 0 unless already present.
pub fn unshift_id<Id: PartialEq>(list: &mut Vec<Id>, id: Id) -> bool {
    if list.contains(&id) {
        return false;
    }
    list.insert(0, id);
    true
}

/// Remove the first occurrence of `id`.  Returns whether it was found.
pub fn remove_id<Id: PartialEq>(list: &mut Vec<Id>, id: &Id) -> bool {
    match list.iter().position(|item| item == id) {
        Some(index) => {
            list.remove(index);
            true
        }
        None => false,
    }
}

/// Overwrite `slot` only when the payload carried a value.
pub(crate) fn merge<T>(slot: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *slot = incoming;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_remove_only_counts_hits() {
        let mut page = Page::new(vec![IdeaId::from("a"), IdeaId::from("b")], 10);
        assert!(page.remove(&IdeaId::from("a")));
        assert_eq!(page.total_count, 9);
        assert!(!page.remove(&IdeaId::from("zzz")));
        assert_eq!(page.total_count, 9);
        assert_eq!(page.items, vec![IdeaId::from("b")]);
    }

    #[test]
    fn test_page_unshift_front_and_idempotent() {
        let mut page = Page::new(vec![IdeaId::from("a")], 1);
        assert!(page.unshift(IdeaId::from("b")));
        assert!(!page.unshift(IdeaId::from("b")));
        assert_eq!(page.items[0], IdeaId::from("b"));
        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn test_merge_keeps_existing_on_none() {
        let mut slot = Some("kept".to_string());
        merge(&mut slot, None);
        assert_eq!(slot.as_deref(), Some("kept"));
        merge(&mut slot, Some("new".to_string()));
        assert_eq!(slot.as_deref(), Some("new"));
    }
}
