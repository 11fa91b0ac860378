//! Entity models decoded from API payloads.
//!
//! Models are plain trees, exactly as one response describes them. Derived
//! fields (`reaction_quantity`, `privacy_data`, flattened connections) are
//! normalized here, and [`Materialized`] records which relations the payload
//! actually carried so that a partial payload never wipes cached data.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::LIKE;
use crate::types::{ChallengeId, IdeaId, PrivacyMode, ReactionId, UserId, UserStatus};
use crate::wire::{Connection, ReactionSummary, WireChallenge, WireIdea, WireReaction, WireUser};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub email: Option<String>,
    pub status: Option<UserStatus>,
    pub created_date: Option<DateTime<Utc>>,
    pub deleted_date: Option<DateTime<Utc>>,
}

impl User {
    pub fn from_wire(w: WireUser) -> Self {
        Self {
            id: UserId(w.id),
            name: w.name,
            image_url: w.image_url,
            email: w.email,
            status: w.status,
            created_date: w.created_date,
            deleted_date: w.deleted_date,
        }
    }

    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value).map(Self::from_wire)
    }
}

// ---------------------------------------------------------------------------
// Reaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: ReactionId,
    /// Id of the reacted-to entity.
    pub object_id: Option<String>,
    /// Reaction tag, e.g. `LIKE`.
    pub value: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    pub created_by: Option<User>,
    pub modified_date: Option<DateTime<Utc>>,
    pub modified_by: Option<User>,
    pub deleted_date: Option<DateTime<Utc>>,
    pub deleted_by: Option<User>,
}

impl Reaction {
    pub fn from_wire(w: WireReaction) -> Self {
        Self {
            id: ReactionId(w.id),
            object_id: w.object_id,
            value: w.value,
            created_date: w.created_date,
            created_by: w.created_by.map(User::from_wire),
            modified_date: w.modified_date,
            modified_by: w.modified_by.map(User::from_wire),
            deleted_date: w.deleted_date,
            deleted_by: w.deleted_by.map(User::from_wire),
        }
    }

    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value).map(Self::from_wire)
    }
}

// ---------------------------------------------------------------------------
// Relation bookkeeping
// ---------------------------------------------------------------------------

/// Which relations a payload carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Materialized {
    /// `reactions.edges` was present.
    pub reactions: bool,
    /// A reaction count was present, either as a total or as a `LIKE` bucket.
    pub reaction_quantity: bool,
    /// `myReaction` was selected (possibly `null`).
    pub my_reaction: bool,
    /// `ideas.edges` was present.
    pub ideas: bool,
}

/// Number of `LIKE` reactions: the direct total when present, else the
/// `LIKE` bucket of the summary.
fn like_count(
    reactions: Option<&Connection<WireReaction>>,
    summary: Option<&[ReactionSummary]>,
) -> Option<u64> {
    reactions.and_then(|c| c.total_count).or_else(|| {
        summary?
            .iter()
            .find(|bucket| bucket.value == LIKE)?
            .total_count
    })
}

fn reactions_from(conn: Option<Connection<WireReaction>>) -> Option<Vec<Reaction>> {
    conn.and_then(Connection::into_nodes)
        .map(|nodes| nodes.into_iter().map(Reaction::from_wire).collect())
}

// ---------------------------------------------------------------------------
// Idea
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    pub id: IdeaId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    pub created_by: Option<User>,
    pub modified_date: Option<DateTime<Utc>>,
    pub modified_by: Option<User>,
    pub deleted_date: Option<DateTime<Utc>>,
    pub deleted_by: Option<User>,
    pub reactions: Vec<Reaction>,
    pub reaction_quantity: u64,
    /// The viewer's own reaction, if any.
    pub my_reaction: Option<Reaction>,
    pub challenge: Option<Box<Challenge>>,
    pub materialized: Materialized,
}

impl Idea {
    pub fn from_wire(w: WireIdea) -> Self {
        let quantity = like_count(w.reactions.as_ref(), w.reactions_summary.as_deref());
        let reactions = reactions_from(w.reactions);

        Self {
            id: IdeaId(w.id),
            title: w.title,
            description: w.description,
            image_url: w.image_url,
            created_date: w.created_date,
            created_by: w.created_by.map(User::from_wire),
            modified_date: w.modified_date,
            modified_by: w.modified_by.map(User::from_wire),
            deleted_date: w.deleted_date,
            deleted_by: w.deleted_by.map(User::from_wire),
            materialized: Materialized {
                reactions: reactions.is_some(),
                reaction_quantity: quantity.is_some(),
                my_reaction: w.my_reaction.is_some(),
                ideas: false,
            },
            reactions: reactions.unwrap_or_default(),
            reaction_quantity: quantity.unwrap_or(0),
            my_reaction: w.my_reaction.flatten().map(Reaction::from_wire),
            challenge: w.challenge.map(|c| Box::new(Challenge::from_wire(*c))),
        }
    }

    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value).map(Self::from_wire)
    }
}

// ---------------------------------------------------------------------------
// Challenge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Deadline for submitting ideas.
    pub close_date: Option<DateTime<Utc>>,
    /// Deadline of the challenge itself.
    pub end_date: Option<DateTime<Utc>>,
    pub privacy_mode: Option<PrivacyMode>,
    /// Email domain for [`PrivacyMode::ByDomain`].
    pub privacy_data: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    pub created_by: Option<User>,
    pub modified_date: Option<DateTime<Utc>>,
    pub modified_by: Option<User>,
    pub deleted_date: Option<DateTime<Utc>>,
    pub deleted_by: Option<User>,
    pub reactions: Vec<Reaction>,
    pub reaction_quantity: u64,
    /// Best-voted idea.
    pub top_idea: Option<Box<Idea>>,
    pub ideas: Vec<Idea>,
    pub materialized: Materialized,
}

impl Challenge {
    pub fn from_wire(w: WireChallenge) -> Self {
        let quantity = like_count(w.reactions.as_ref(), w.reactions_summary.as_deref());
        let reactions = reactions_from(w.reactions);
        let ideas: Option<Vec<Idea>> = w
            .ideas
            .and_then(Connection::into_nodes)
            .map(|nodes| nodes.into_iter().map(Idea::from_wire).collect());

        Self {
            id: ChallengeId(w.id),
            title: w.title,
            description: w.description,
            image_url: w.image_url,
            close_date: w.close_date,
            end_date: w.end_date,
            privacy_mode: w.privacy_mode,
            privacy_data: w.privacy_data.as_deref().map(parse_privacy_data),
            created_date: w.created_date,
            created_by: w.created_by.map(User::from_wire),
            modified_date: w.modified_date,
            modified_by: w.modified_by.map(User::from_wire),
            deleted_date: w.deleted_date,
            deleted_by: w.deleted_by.map(User::from_wire),
            materialized: Materialized {
                reactions: reactions.is_some(),
                reaction_quantity: quantity.is_some(),
                my_reaction: false,
                ideas: ideas.is_some(),
            },
            reactions: reactions.unwrap_or_default(),
            reaction_quantity: quantity.unwrap_or(0),
            top_idea: w.top_idea.map(|idea| Box::new(Idea::from_wire(*idea))),
            ideas: ideas.unwrap_or_default(),
        }
    }

    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value).map(Self::from_wire)
    }
}

/// Strip the `["..."]` wrapping the API puts around a privacy domain.
///
/// Only the first match is replaced; anything else passes through unchanged.
pub fn parse_privacy_data(raw: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern =
        PATTERN.get_or_init(|| Regex::new(r#"\["(.+)"]"#).expect("privacy data pattern is valid"));
    pattern.replace(raw, "$1").into_owned()
}

/// Move a deadline to the last millisecond of its calendar day.
pub fn end_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive()
        .and_hms_milli_opt(23, 59, 59, 999)
        .map(|naive| naive.and_utc())
        .unwrap_or(at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_quantity_from_summary_bucket() {
        let idea = Idea::from_json(json!({
            "id": "i1",
            "reactionsSummary": [{"value": "LIKE", "totalCount": 5}]
        }))
        .unwrap();
        assert_eq!(idea.reaction_quantity, 5);
        assert!(idea.materialized.reaction_quantity);
        assert!(!idea.materialized.reactions);
    }

    #[test]
    fn test_quantity_prefers_direct_total() {
        let idea = Idea::from_json(json!({
            "id": "i1",
            "reactions": {"totalCount": 2, "edges": []},
            "reactionsSummary": [{"value": "LIKE", "totalCount": 9}]
        }))
        .unwrap();
        assert_eq!(idea.reaction_quantity, 2);
    }

    #[test]
    fn test_quantity_ignores_other_buckets() {
        let idea = Idea::from_json(json!({
            "id": "i1",
            "reactionsSummary": [{"value": "DISLIKE", "totalCount": 3}]
        }))
        .unwrap();
        assert_eq!(idea.reaction_quantity, 0);
        assert!(!idea.materialized.reaction_quantity);
    }

    #[test]
    fn test_privacy_data_unwrapped() {
        assert_eq!(parse_privacy_data(r#"["example.com"]"#), "example.com");
        assert_eq!(parse_privacy_data("example.com"), "example.com");
        assert_eq!(parse_privacy_data(r#"[""]"#), r#"[""]"#);
    }

    #[test]
    fn test_challenge_privacy_and_ideas() {
        let challenge = Challenge::from_json(json!({
            "id": "c1",
            "privacyMode": "BYDOMAIN",
            "privacyData": "[\"example.com\"]",
            "ideas": {"totalCount": 1, "edges": [{"node": {"id": "i1"}}]}
        }))
        .unwrap();
        assert_eq!(challenge.privacy_data.as_deref(), Some("example.com"));
        assert_eq!(challenge.privacy_mode, Some(PrivacyMode::ByDomain));
        assert_eq!(challenge.ideas.len(), 1);
        assert!(challenge.materialized.ideas);
    }

    #[test]
    fn test_my_reaction_decoded() {
        let idea = Idea::from_json(json!({
            "id": "i1",
            "myReaction": {"id": "r1", "objectId": "i1", "value": "LIKE"}
        }))
        .unwrap();
        assert_eq!(idea.my_reaction.unwrap().id, ReactionId::from("r1"));
        assert!(idea.materialized.my_reaction);
    }

    #[test]
    fn test_end_of_day() {
        let at = Utc.with_ymd_and_hms(2024, 3, 10, 8, 30, 0).unwrap();
        let end = end_of_day(at);
        assert_eq!(
            end,
            Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap()
                + chrono::Duration::milliseconds(999)
        );
    }
}
