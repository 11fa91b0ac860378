use ideabox_shared::constants::MSG_CHALLENGE_NOT_FOUND;
use ideabox_shared::models::end_of_day;
use ideabox_shared::{ApiError, Challenge, ChallengeId};
use ideabox_store::Page;

use crate::api::{
    AuthRequest, ByIdRequest, ChallengeFields, CreateChallengeRequest, UpdateChallengeRequest,
};
use crate::commands::UserRef;
use crate::status::{
    CreateChallengeStatus, DeleteChallengeStatus, FetchChallengeListStatus, FetchChallengeStatus,
    FetchMyChallengesStatus, FetchUserChallengesStatus, Operation, UpdateChallengeStatus,
};
use crate::store::DataStore;

/// Deadlines are sent as the last instant of their day.
fn normalize(mut fields: ChallengeFields) -> ChallengeFields {
    fields.close_date = fields.close_date.map(end_of_day);
    fields.end_date = fields.end_date.map(end_of_day);
    fields
}

impl DataStore {
    /// Load the unfiltered challenge list.  Every idea listed under a
    /// challenge points back at it afterwards.
    pub async fn fetch_challenge_list(&self) -> FetchChallengeListStatus {
        self.execute(
            Operation::FetchChallengeList,
            |s| &mut s.fetch_challenge_list,
            |state| {
                Ok(AuthRequest {
                    auth_token: state.session.auth_token.clone(),
                })
            },
            |api, req| async move { api.fetch_challenge_list(req).await },
            |state, challenges| {
                let ids = state.cache.ingest_challenges(challenges);
                state.cache.set_challenge_list(Some(ids.clone()));
                Ok(Some(ids))
            },
        )
        .await
    }

    /// Load the viewer's own challenges.
    pub async fn fetch_my_challenges(&self) -> FetchMyChallengesStatus {
        self.execute(
            Operation::FetchMyChallenges,
            |s| &mut s.fetch_my_challenges,
            |state| {
                Ok(AuthRequest {
                    auth_token: Some(state.session.require_token()?),
                })
            },
            |api, req| async move { api.fetch_my_challenges(req).await },
            |state, page| {
                let ids = state.cache.ingest_challenges(page.challenges);
                if let Some(viewer) = state.cache.current_user().cloned() {
                    state.cache.set_user_challenges(&viewer, ids.clone())?;
                }
                let page = Page::new(ids, page.total_count);
                state.cache.set_my_challenges(Some(page.clone()));
                Ok(Some(page))
            },
        )
        .await
    }

    /// Load the challenges created by `user`.  When that user is cached its
    /// `challenges` list is materialized and every challenge's creator
    /// points at it.
    pub async fn fetch_user_challenges(&self, user: impl Into<UserRef>) -> FetchUserChallengesStatus {
        let (user_id, user) = user.into().into_parts();
        let target = user_id.clone();

        self.execute(
            Operation::FetchUserChallenges,
            |s| &mut s.fetch_user_challenges,
            |state| {
                Ok(ByIdRequest {
                    auth_token: state.session.auth_token.clone(),
                    id: user_id,
                })
            },
            |api, req| async move { api.fetch_user_challenges(req).await },
            move |state, page| {
                if let Some(user) = user {
                    state.cache.ingest_user(user);
                }
                let ids = state.cache.ingest_challenges(page.challenges);
                if state.cache.user(&target).is_some() {
                    state.cache.set_user_challenges(&target, ids.clone())?;
                }
                Ok(Some(Page::new(ids, page.total_count)))
            },
        )
        .await
    }

    /// Load one challenge and make it the current one.
    pub async fn fetch_challenge(&self, id: ChallengeId) -> FetchChallengeStatus {
        self.execute(
            Operation::FetchChallenge,
            |s| &mut s.fetch_challenge,
            |state| {
                Ok(ByIdRequest {
                    auth_token: state.session.auth_token.clone(),
                    id,
                })
            },
            |api, req| async move { api.fetch_challenge(req).await },
            |state, challenge| {
                let challenge =
                    challenge.ok_or_else(|| ApiError::object_not_found(MSG_CHALLENGE_NOT_FOUND))?;
                let id = state.cache.ingest_challenge(challenge);
                state.cache.set_current_challenge(Some(id.clone()));
                Ok(Some(id))
            },
        )
        .await
    }

    pub fn set_current_challenge(&self, id: Option<ChallengeId>) {
        self.mutate(|state| state.cache.set_current_challenge(id));
    }

    /// Create a challenge and put it first in every materialized list that
    /// should hold it.
    pub async fn create_challenge(&self, fields: ChallengeFields) -> CreateChallengeStatus {
        let fields = normalize(fields);

        self.execute(
            Operation::CreateChallenge,
            |s| &mut s.create_challenge,
            |state| {
                Ok(CreateChallengeRequest {
                    auth_token: Some(state.session.require_token()?),
                    fields,
                })
            },
            |api, req| async move { api.create_challenge(req).await },
            |state, challenge: Challenge| {
                let id = state.cache.ingest_challenge(challenge);
                state.cache.insert_created_challenge(&id);
                Ok(Some(id))
            },
        )
        .await
    }

    /// Update a challenge.  Only the editable fields of the response are
    /// copied onto the cached record.
    pub async fn update_challenge(
        &self,
        id: ChallengeId,
        fields: ChallengeFields,
    ) -> UpdateChallengeStatus {
        let fields = normalize(fields);
        let target = id.clone();

        self.execute(
            Operation::UpdateChallenge,
            |s| &mut s.update_challenge,
            |state| {
                Ok(UpdateChallengeRequest {
                    auth_token: Some(state.session.require_token()?),
                    id,
                    fields,
                })
            },
            |api, req| async move { api.update_challenge(req).await },
            move |state, challenge| {
                if state.cache.challenge(&target).is_some() {
                    state.cache.apply_challenge_update(&target, &challenge)?;
                } else {
                    state.cache.ingest_challenge(challenge);
                }
                Ok(Some(target))
            },
        )
        .await
    }

    /// Delete a challenge and drop it from every list.
    pub async fn delete_challenge(&self, id: ChallengeId) -> DeleteChallengeStatus {
        let target = id.clone();

        self.execute(
            Operation::DeleteChallenge,
            |s| &mut s.delete_challenge,
            |state| {
                Ok(ByIdRequest {
                    auth_token: Some(state.session.require_token()?),
                    id,
                })
            },
            |api, req| async move { api.delete_challenge(req).await },
            move |state, ()| {
                state.cache.remove_challenge(&target);
                Ok(Some(target))
            },
        )
        .await
    }
}
