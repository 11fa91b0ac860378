//! JSON payloads exactly as the API returns them.
//!
//! Relations come back as GraphQL connections (`{totalCount, edges: [{node}]}`)
//! and every field may be missing because each query selects its own subset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::types::{PrivacyMode, UserStatus};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub total_count: Option<u64>,
    pub edges: Option<Vec<Edge<T>>>,
}

impl<T> Connection<T> {
    /// Nodes of the connection, `None` when the payload carried no edges.
    pub fn into_nodes(self) -> Option<Vec<T>> {
        self.edges
            .map(|edges| edges.into_iter().map(|edge| edge.node).collect())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

/// One bucket of `reactionsSummary`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionSummary {
    pub value: String,
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUser {
    pub id: String,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub email: Option<String>,
    pub status: Option<UserStatus>,
    pub created_date: Option<DateTime<Utc>>,
    pub deleted_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireReaction {
    pub id: String,
    pub object_id: Option<String>,
    pub value: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    pub created_by: Option<WireUser>,
    pub modified_date: Option<DateTime<Utc>>,
    pub modified_by: Option<WireUser>,
    pub deleted_date: Option<DateTime<Utc>>,
    pub deleted_by: Option<WireUser>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireIdea {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    pub created_by: Option<WireUser>,
    pub modified_date: Option<DateTime<Utc>>,
    pub modified_by: Option<WireUser>,
    pub deleted_date: Option<DateTime<Utc>>,
    pub deleted_by: Option<WireUser>,
    pub reactions: Option<Connection<WireReaction>>,
    pub reactions_summary: Option<Vec<ReactionSummary>>,
    /// Outer `Some` when the query selected the field, even if it was `null`.
    #[serde(default, deserialize_with = "selected")]
    pub my_reaction: Option<Option<WireReaction>>,
    pub challenge: Option<Box<WireChallenge>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireChallenge {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub close_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub privacy_mode: Option<PrivacyMode>,
    pub privacy_data: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    pub created_by: Option<WireUser>,
    pub modified_date: Option<DateTime<Utc>>,
    pub modified_by: Option<WireUser>,
    pub deleted_date: Option<DateTime<Utc>>,
    pub deleted_by: Option<WireUser>,
    pub reactions: Option<Connection<WireReaction>>,
    pub reactions_summary: Option<Vec<ReactionSummary>>,
    pub top_idea: Option<Box<WireIdea>>,
    pub ideas: Option<Connection<WireIdea>>,
}

fn selected<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
