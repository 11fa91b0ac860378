//! In-memory [`ApiClient`] for tests.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use ideabox_shared::{ApiError, Challenge, ChallengeId, Idea, IdeaId, Reaction, ReactionId, User, UserId};

use crate::api::*;
use crate::config::ClientConfig;
use crate::store::DataStore;

/// Answers every call with a canned result and counts calls per method.
///
/// Methods without a canned result fail with `Generic`.
#[derive(Default)]
pub struct MockApi {
    canned: Mutex<HashMap<&'static str, Box<dyn Any + Send>>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    held: Mutex<HashMap<&'static str, Arc<Notify>>>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond<T: Clone + Send + 'static>(&self, method: &'static str, result: ApiResult<T>) {
        self.canned.lock().unwrap().insert(method, Box::new(result));
    }

    /// Make `method` wait until the returned handle is notified.
    pub fn hold(&self, method: &'static str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.held.lock().unwrap().insert(method, Arc::clone(&notify));
        notify
    }

    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    async fn answer<T: Clone + Send + 'static>(&self, method: &'static str) -> ApiResult<T> {
        *self.calls.lock().unwrap().entry(method).or_default() += 1;

        let held = self.held.lock().unwrap().get(method).cloned();
        if let Some(notify) = held {
            notify.notified().await;
        }

        self.canned
            .lock()
            .unwrap()
            .get(method)
            .and_then(|canned| canned.downcast_ref::<ApiResult<T>>())
            .cloned()
            .unwrap_or_else(|| Err(ApiError::generic(format!("no canned response for {method}"))))
    }
}

#[async_trait]
impl ApiClient for MockApi {
    async fn fetch_challenge_list(&self, _: AuthRequest) -> ApiResult<Vec<Challenge>> {
        self.answer("fetch_challenge_list").await
    }
    async fn fetch_my_challenges(&self, _: AuthRequest) -> ApiResult<ChallengePage> {
        self.answer("fetch_my_challenges").await
    }
    async fn fetch_user_challenges(&self, _: ByIdRequest<UserId>) -> ApiResult<ChallengePage> {
        self.answer("fetch_user_challenges").await
    }
    async fn fetch_challenge(&self, _: ByIdRequest<ChallengeId>) -> ApiResult<Option<Challenge>> {
        self.answer("fetch_challenge").await
    }
    async fn create_challenge(&self, _: CreateChallengeRequest) -> ApiResult<Challenge> {
        self.answer("create_challenge").await
    }
    async fn update_challenge(&self, _: UpdateChallengeRequest) -> ApiResult<Challenge> {
        self.answer("update_challenge").await
    }
    async fn delete_challenge(&self, _: ByIdRequest<ChallengeId>) -> ApiResult<()> {
        self.answer("delete_challenge").await
    }
    async fn fetch_challenge_ideas(&self, _: ByIdRequest<ChallengeId>) -> ApiResult<IdeaPage> {
        self.answer("fetch_challenge_ideas").await
    }
    async fn fetch_my_ideas(&self, _: AuthRequest) -> ApiResult<IdeaPage> {
        self.answer("fetch_my_ideas").await
    }
    async fn fetch_user_ideas(&self, _: ByIdRequest<UserId>) -> ApiResult<IdeaPage> {
        self.answer("fetch_user_ideas").await
    }
    async fn fetch_ideas_with_user_reaction(&self, _: ByIdRequest<UserId>) -> ApiResult<IdeaPage> {
        self.answer("fetch_ideas_with_user_reaction").await
    }
    async fn fetch_idea(&self, _: ByIdRequest<IdeaId>) -> ApiResult<Idea> {
        self.answer("fetch_idea").await
    }
    async fn create_idea(&self, _: CreateIdeaRequest) -> ApiResult<Idea> {
        self.answer("create_idea").await
    }
    async fn update_idea(&self, _: UpdateIdeaRequest) -> ApiResult<Idea> {
        self.answer("update_idea").await
    }
    async fn delete_idea(&self, _: ByIdRequest<IdeaId>) -> ApiResult<()> {
        self.answer("delete_idea").await
    }
    async fn create_idea_reaction(&self, _: CreateReactionRequest) -> ApiResult<Reaction> {
        self.answer("create_idea_reaction").await
    }
    async fn delete_idea_reaction(&self, _: ByIdRequest<ReactionId>) -> ApiResult<()> {
        self.answer("delete_idea_reaction").await
    }
    async fn fetch_me(&self, _: AuthRequest) -> ApiResult<User> {
        self.answer("fetch_me").await
    }
    async fn fetch_user(&self, _: ByIdRequest<UserId>) -> ApiResult<User> {
        self.answer("fetch_user").await
    }
    async fn update_user(&self, _: UpdateUserRequest) -> ApiResult<User> {
        self.answer("update_user").await
    }
    async fn sign_in(&self, _: SignInRequest) -> ApiResult<Tokens> {
        self.answer("sign_in").await
    }
    async fn sign_up(&self, _: SignUpRequest) -> ApiResult<()> {
        self.answer("sign_up").await
    }
    async fn refresh_tokens(&self, _: String) -> ApiResult<Tokens> {
        self.answer("refresh_tokens").await
    }
    async fn resend_email_confirmation(&self, _: String) -> ApiResult<()> {
        self.answer("resend_email_confirmation").await
    }
    async fn request_reset_password(&self, _: String) -> ApiResult<()> {
        self.answer("request_reset_password").await
    }
    async fn reset_password(&self, _: ResetPasswordRequest) -> ApiResult<()> {
        self.answer("reset_password").await
    }
    async fn confirm_email(&self, _: String) -> ApiResult<()> {
        self.answer("confirm_email").await
    }
    async fn check_email(&self, _: String) -> ApiResult<EmailCheck> {
        self.answer("check_email").await
    }
}

/// A store over `api`, optionally signed in with a dummy token.
pub fn store_with(api: &Arc<MockApi>, signed_in: bool) -> DataStore {
    let store = DataStore::new(Arc::clone(api) as Arc<dyn ApiClient>, ClientConfig::default());
    if signed_in {
        store.set_auth_token(Some("token".to_string()));
    }
    store
}

pub fn challenge(value: serde_json::Value) -> Challenge {
    Challenge::from_json(value).unwrap()
}

pub fn idea(value: serde_json::Value) -> Idea {
    Idea::from_json(value).unwrap()
}

pub fn user(value: serde_json::Value) -> User {
    User::from_json(value).unwrap()
}

pub fn reaction(value: serde_json::Value) -> Reaction {
    Reaction::from_json(value).unwrap()
}
