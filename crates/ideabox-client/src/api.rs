//! The remote API collaborator.
//!
//! [`ApiClient`] is the seam between the store and whatever transport talks
//! to the backend.  Implementations classify their own failures into
//! [`ApiError`] kinds; the store only downgrades `Generic` failures to a
//! fixed per-operation message.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ideabox_shared::{
    ApiError, Challenge, ChallengeId, Idea, IdeaId, PrivacyMode, Reaction, ReactionId, User,
    UserId,
};

/// Outcome of one collaborator call.
pub type ApiResult<T> = Result<T, ApiError>;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Request that only carries the caller's session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthRequest {
    pub auth_token: Option<String>,
}

/// Request addressing one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ByIdRequest<Id> {
    pub auth_token: Option<String>,
    pub id: Id,
}

/// Editable challenge fields sent on create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeFields {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub close_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub privacy_mode: Option<PrivacyMode>,
    pub privacy_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateChallengeRequest {
    pub auth_token: Option<String>,
    pub fields: ChallengeFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateChallengeRequest {
    pub auth_token: Option<String>,
    pub id: ChallengeId,
    pub fields: ChallengeFields,
}

/// Editable idea fields sent on create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaFields {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateIdeaRequest {
    pub auth_token: Option<String>,
    pub challenge_id: ChallengeId,
    pub fields: IdeaFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateIdeaRequest {
    pub auth_token: Option<String>,
    pub id: IdeaId,
    pub fields: IdeaFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateReactionRequest {
    pub auth_token: Option<String>,
    pub idea_id: IdeaId,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateUserRequest {
    pub auth_token: Option<String>,
    pub id: UserId,
    pub name: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// One page of challenges plus the server-side total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChallengePage {
    pub challenges: Vec<Challenge>,
    pub total_count: u64,
}

/// One page of ideas plus the server-side total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaPage {
    pub ideas: Vec<Idea>,
    pub total_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub auth_token: String,
    pub refresh_token: Option<String>,
}

/// Sign-up eligibility of an email address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailCheck {
    pub is_available: bool,
    pub is_blacklisted: bool,
    pub is_corporate: bool,
}

// ---------------------------------------------------------------------------
// Collaborator
// ---------------------------------------------------------------------------

/// Async API client consumed by [`DataStore`](crate::DataStore).
#[async_trait]
pub trait ApiClient: Send + Sync {
    // -- Challenges --

    async fn fetch_challenge_list(&self, req: AuthRequest) -> ApiResult<Vec<Challenge>>;
    async fn fetch_my_challenges(&self, req: AuthRequest) -> ApiResult<ChallengePage>;
    async fn fetch_user_challenges(&self, req: ByIdRequest<UserId>) -> ApiResult<ChallengePage>;
    /// `Ok(None)` when the challenge does not exist.
    async fn fetch_challenge(&self, req: ByIdRequest<ChallengeId>) -> ApiResult<Option<Challenge>>;
    async fn create_challenge(&self, req: CreateChallengeRequest) -> ApiResult<Challenge>;
    async fn update_challenge(&self, req: UpdateChallengeRequest) -> ApiResult<Challenge>;
    async fn delete_challenge(&self, req: ByIdRequest<ChallengeId>) -> ApiResult<()>;

    // -- Ideas --

    async fn fetch_challenge_ideas(&self, req: ByIdRequest<ChallengeId>) -> ApiResult<IdeaPage>;
    async fn fetch_my_ideas(&self, req: AuthRequest) -> ApiResult<IdeaPage>;
    async fn fetch_user_ideas(&self, req: ByIdRequest<UserId>) -> ApiResult<IdeaPage>;
    async fn fetch_ideas_with_user_reaction(&self, req: ByIdRequest<UserId>) -> ApiResult<IdeaPage>;
    async fn fetch_idea(&self, req: ByIdRequest<IdeaId>) -> ApiResult<Idea>;
    async fn create_idea(&self, req: CreateIdeaRequest) -> ApiResult<Idea>;
    async fn update_idea(&self, req: UpdateIdeaRequest) -> ApiResult<Idea>;
    async fn delete_idea(&self, req: ByIdRequest<IdeaId>) -> ApiResult<()>;

    // -- Reactions --

    async fn create_idea_reaction(&self, req: CreateReactionRequest) -> ApiResult<Reaction>;
    /// Keyed by the reaction's own id.
    async fn delete_idea_reaction(&self, req: ByIdRequest<ReactionId>) -> ApiResult<()>;

    // -- Users & session --

    async fn fetch_me(&self, req: AuthRequest) -> ApiResult<User>;
    async fn fetch_user(&self, req: ByIdRequest<UserId>) -> ApiResult<User>;
    async fn update_user(&self, req: UpdateUserRequest) -> ApiResult<User>;
    async fn sign_in(&self, req: SignInRequest) -> ApiResult<Tokens>;
    async fn sign_up(&self, req: SignUpRequest) -> ApiResult<()>;
    async fn refresh_tokens(&self, refresh_token: String) -> ApiResult<Tokens>;
    async fn resend_email_confirmation(&self, email: String) -> ApiResult<()>;
    async fn request_reset_password(&self, email: String) -> ApiResult<()>;
    async fn reset_password(&self, req: ResetPasswordRequest) -> ApiResult<()>;
    async fn confirm_email(&self, token: String) -> ApiResult<()>;
    async fn check_email(&self, email: String) -> ApiResult<EmailCheck>;
}
