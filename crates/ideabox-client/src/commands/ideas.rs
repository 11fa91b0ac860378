use ideabox_shared::constants::MSG_NO_CURRENT_CHALLENGE;
use ideabox_shared::{ApiError, ChallengeId, IdeaId};
use ideabox_store::Page;

use crate::api::{AuthRequest, ByIdRequest, CreateIdeaRequest, IdeaFields, UpdateIdeaRequest};
use crate::commands::UserRef;
use crate::status::{
    CreateIdeaStatus, DeleteIdeaStatus, FetchIdeaStatus, FetchIdeasStatus, Operation,
    UpdateIdeaStatus,
};
use crate::store::DataStore;

impl DataStore {
    /// Load the ideas of `challenge`, or of the current challenge when
    /// `None`.  The challenge's idea list is replaced and every idea points
    /// back at it.
    pub async fn fetch_challenge_ideas(&self, challenge: Option<ChallengeId>) -> FetchIdeasStatus {
        let target = challenge.or_else(|| self.read(|cache| cache.current_challenge().cloned()));
        let Some(target) = target else {
            return self.reject(
                Operation::FetchChallengeIdeas,
                |s| &mut s.fetch_challenge_ideas,
                ApiError::object_not_found(MSG_NO_CURRENT_CHALLENGE),
            );
        };
        let id = target.clone();

        self.execute(
            Operation::FetchChallengeIdeas,
            |s| &mut s.fetch_challenge_ideas,
            |state| {
                Ok(ByIdRequest {
                    auth_token: state.session.auth_token.clone(),
                    id,
                })
            },
            |api, req| async move { api.fetch_challenge_ideas(req).await },
            move |state, page| {
                let ids = state.cache.ingest_ideas(page.ideas);
                if state.cache.challenge(&target).is_some() {
                    state.cache.set_challenge_ideas(&target, ids.clone())?;
                } else {
                    state.cache.attach_ideas(&target, &ids);
                }
                Ok(Some(Page::new(ids, page.total_count)))
            },
        )
        .await
    }

    /// Load the viewer's own ideas into "my ideas" and the viewer's
    /// `ideas` list.
    pub async fn fetch_my_ideas(&self) -> FetchIdeasStatus {
        self.execute(
            Operation::FetchMyIdeas,
            |s| &mut s.fetch_my_ideas,
            |state| {
                Ok(AuthRequest {
                    auth_token: Some(state.session.require_token()?),
                })
            },
            |api, req| async move { api.fetch_my_ideas(req).await },
            |state, page| {
                let ids = state.cache.ingest_ideas(page.ideas);
                if let Some(viewer) = state.cache.current_user().cloned() {
                    state.cache.set_user_ideas(&viewer, ids.clone())?;
                }
                let page = Page::new(ids, page.total_count);
                state.cache.set_my_ideas(Some(page.clone()));
                Ok(Some(page))
            },
        )
        .await
    }

    /// Load the ideas created by `user`.
    pub async fn fetch_user_ideas(&self, user: impl Into<UserRef>) -> FetchIdeasStatus {
        let (user_id, user) = user.into().into_parts();
        let target = user_id.clone();

        self.execute(
            Operation::FetchUserIdeas,
            |s| &mut s.fetch_user_ideas,
            |state| {
                Ok(ByIdRequest {
                    auth_token: state.session.auth_token.clone(),
                    id: user_id,
                })
            },
            |api, req| async move { api.fetch_user_ideas(req).await },
            move |state, page| {
                if let Some(user) = user {
                    state.cache.ingest_user(user);
                }
                let ids = state.cache.ingest_ideas(page.ideas);
                if state.cache.user(&target).is_some() {
                    state.cache.set_user_ideas(&target, ids.clone())?;
                }
                Ok(Some(Page::new(ids, page.total_count)))
            },
        )
        .await
    }

    /// Load the ideas `user` reacted to.
    pub async fn fetch_ideas_with_user_reaction(&self, user: impl Into<UserRef>) -> FetchIdeasStatus {
        let (user_id, user) = user.into().into_parts();
        let target = user_id.clone();

        self.execute(
            Operation::FetchIdeasWithUserReaction,
            |s| &mut s.fetch_ideas_with_user_reaction,
            |state| {
                Ok(ByIdRequest {
                    auth_token: state.session.auth_token.clone(),
                    id: user_id,
                })
            },
            |api, req| async move { api.fetch_ideas_with_user_reaction(req).await },
            move |state, page| {
                if let Some(user) = user {
                    state.cache.ingest_user(user);
                }
                let ids = state.cache.ingest_ideas(page.ideas);
                if state.cache.user(&target).is_some() {
                    state.cache.set_user_reacted_ideas(&target, ids.clone())?;
                }
                Ok(Some(Page::new(ids, page.total_count)))
            },
        )
        .await
    }

    /// Load the ideas the viewer reacted to.  Needs both a token and a
    /// fetched current user.
    pub async fn fetch_ideas_with_my_reaction(&self) -> FetchIdeasStatus {
        self.execute(
            Operation::FetchIdeasWithMyReaction,
            |s| &mut s.fetch_ideas_with_my_reaction,
            |state| {
                let (token, viewer) = state.require_viewer()?;
                Ok(ByIdRequest {
                    auth_token: Some(token),
                    id: viewer,
                })
            },
            |api, req| async move { api.fetch_ideas_with_user_reaction(req).await },
            |state, page| {
                let ids = state.cache.ingest_ideas(page.ideas);
                if let Some(viewer) = state.cache.current_user().cloned() {
                    state.cache.set_user_reacted_ideas(&viewer, ids.clone())?;
                }
                let page = Page::new(ids, page.total_count);
                state.cache.set_ideas_with_my_reaction(Some(page.clone()));
                Ok(Some(page))
            },
        )
        .await
    }

    /// Load one idea and merge it into the cached record.
    pub async fn fetch_idea(&self, id: IdeaId) -> FetchIdeaStatus {
        self.execute(
            Operation::FetchIdea,
            |s| &mut s.fetch_idea,
            |state| {
                Ok(ByIdRequest {
                    auth_token: state.session.auth_token.clone(),
                    id,
                })
            },
            |api, req| async move { api.fetch_idea(req).await },
            |state, idea| Ok(Some(state.cache.ingest_idea(idea))),
        )
        .await
    }

    /// Submit an idea to `challenge`.
    pub async fn create_idea(&self, challenge: ChallengeId, fields: IdeaFields) -> CreateIdeaStatus {
        let parent = challenge.clone();

        self.execute(
            Operation::CreateIdea,
            |s| &mut s.create_idea,
            |state| {
                Ok(CreateIdeaRequest {
                    auth_token: Some(state.session.require_token()?),
                    challenge_id: challenge,
                    fields,
                })
            },
            |api, req| async move { api.create_idea(req).await },
            move |state, idea| {
                let id = state.cache.ingest_idea(idea);
                state.cache.insert_created_idea(&id, Some(&parent));
                Ok(Some(id))
            },
        )
        .await
    }

    pub async fn update_idea(&self, id: IdeaId, fields: IdeaFields) -> UpdateIdeaStatus {
        let target = id.clone();

        self.execute(
            Operation::UpdateIdea,
            |s| &mut s.update_idea,
            |state| {
                Ok(UpdateIdeaRequest {
                    auth_token: Some(state.session.require_token()?),
                    id,
                    fields,
                })
            },
            |api, req| async move { api.update_idea(req).await },
            move |state, idea| {
                if state.cache.idea(&target).is_some() {
                    state.cache.apply_idea_update(&target, &idea)?;
                } else {
                    state.cache.ingest_idea(idea);
                }
                Ok(Some(target))
            },
        )
        .await
    }

    /// Delete an idea and drop it from every list that held it.
    pub async fn delete_idea(&self, id: IdeaId) -> DeleteIdeaStatus {
        let target = id.clone();

        self.execute(
            Operation::DeleteIdea,
            |s| &mut s.delete_idea,
            |state| {
                Ok(ByIdRequest {
                    auth_token: Some(state.session.require_token()?),
                    id,
                })
            },
            |api, req| async move { api.delete_idea(req).await },
            move |state, ()| {
                state.cache.remove_idea(&target);
                Ok(Some(target))
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::IdeaPage;
    use crate::events::Change;
    use crate::testing::{challenge, idea, store_with, user, MockApi};
    use ideabox_shared::UserId;

    fn page(ids: &[&str], total_count: u64) -> IdeaPage {
        IdeaPage {
            ideas: ids.iter().map(|id| idea(json!({"id": id}))).collect(),
            total_count,
        }
    }

    #[tokio::test]
    async fn test_delete_removes_from_every_list_that_held_it() {
        let api = MockApi::new();
        api.respond("fetch_me", Ok(user(json!({"id": "me"}))));
        api.respond("fetch_challenge", Ok(Some(challenge(json!({"id": "c1"})))));
        api.respond("fetch_challenge_ideas", Ok(page(&["x", "y"], 2)));
        api.respond("fetch_my_ideas", Ok(page(&["x", "z"], 9)));
        api.respond("fetch_ideas_with_user_reaction", Ok(page(&["y"], 3)));
        api.respond("delete_idea", Ok(()));
        let store = store_with(&api, true);
        store.fetch_me().await;
        store.fetch_challenge(ChallengeId::from("c1")).await;
        store.fetch_challenge_ideas(None).await;
        store.fetch_my_ideas().await;
        store.fetch_ideas_with_my_reaction().await;

        let status = store.delete_idea(IdeaId::from("x")).await;

        assert!(status.is_success());
        store.read(|cache| {
            let x = IdeaId::from("x");
            assert_eq!(cache.challenge(&ChallengeId::from("c1")).unwrap().ideas, vec![IdeaId::from("y")]);
            let me = cache.user(&UserId::from("me")).unwrap();
            assert_eq!(me.ideas, Some(vec![IdeaId::from("z")]));
            let mine = cache.my_ideas().unwrap();
            assert!(!mine.contains(&x));
            assert_eq!(mine.total_count, 8);
            assert_eq!(cache.ideas_with_my_reaction().unwrap().total_count, 3);
            assert!(cache.idea(&x).is_none());
        });
    }

    #[tokio::test]
    async fn test_challenge_ideas_point_back() {
        let api = MockApi::new();
        api.respond("fetch_challenge", Ok(Some(challenge(json!({"id": "c1"})))));
        api.respond("fetch_challenge_ideas", Ok(page(&["i1", "i2"], 2)));
        let store = store_with(&api, false);
        store.fetch_challenge(ChallengeId::from("c1")).await;

        let status = store.fetch_challenge_ideas(Some(ChallengeId::from("c1"))).await;

        assert_eq!(status.payload.unwrap().items.len(), 2);
        for id in ["i1", "i2"] {
            let parent = store.idea(&IdeaId::from(id)).unwrap().challenge;
            assert_eq!(parent, Some(ChallengeId::from("c1")));
        }
    }

    #[tokio::test]
    async fn test_challenge_ideas_without_current_challenge() {
        let api = MockApi::new();
        let store = store_with(&api, false);

        let status = store.fetch_challenge_ideas(None).await;

        assert_eq!(status.error_code(), Some("OBJECT_NOT_FOUND_ERROR"));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_created_idea_joins_parent_first() {
        let api = MockApi::new();
        api.respond(
            "fetch_challenge",
            Ok(Some(challenge(json!({
                "id": "c1",
                "ideas": {"edges": [{"node": {"id": "old"}}]}
            })))),
        );
        api.respond(
            "create_idea",
            Ok(idea(json!({"id": "new", "title": "Standing desks"}))),
        );
        let store = store_with(&api, true);
        store.fetch_challenge(ChallengeId::from("c1")).await;

        let status = store
            .create_idea(
                ChallengeId::from("c1"),
                IdeaFields {
                    title: "Standing desks".into(),
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(status.payload, Some(IdeaId::from("new")));
        let current = store.current_challenge().unwrap();
        assert_eq!(current.ideas, vec![IdeaId::from("new"), IdeaId::from("old")]);
        assert_eq!(store.idea(&IdeaId::from("new")).unwrap().challenge, Some(current.id));
    }

    #[tokio::test]
    async fn test_my_reactions_need_current_user() {
        let api = MockApi::new();
        let store = store_with(&api, true);

        let status = store.fetch_ideas_with_my_reaction().await;

        assert_eq!(status.error_code(), Some("USER_NOT_AUTHENTICATED_ERROR"));
        assert_eq!(api.calls("fetch_ideas_with_user_reaction"), 0);
    }

    #[tokio::test]
    async fn test_fetch_idea_merges_into_cache() {
        let api = MockApi::new();
        api.respond("fetch_challenge_ideas", Ok(page(&["i1"], 1)));
        api.respond(
            "fetch_idea",
            Ok(idea(json!({"id": "i1", "description": "Details"}))),
        );
        let store = store_with(&api, false);
        store.fetch_challenge_ideas(Some(ChallengeId::from("c1"))).await;

        store.fetch_idea(IdeaId::from("i1")).await;

        let cached = store.idea(&IdeaId::from("i1")).unwrap();
        assert_eq!(cached.description.as_deref(), Some("Details"));
    }

    #[tokio::test]
    async fn test_update_copies_editable_fields() {
        let api = MockApi::new();
        api.respond("fetch_challenge_ideas", Ok(page(&["i1"], 1)));
        api.respond(
            "update_idea",
            Ok(idea(json!({"id": "i1", "title": "Renamed"}))),
        );
        let store = store_with(&api, true);
        store.fetch_challenge_ideas(Some(ChallengeId::from("c1"))).await;

        let status = store
            .update_idea(IdeaId::from("i1"), IdeaFields::default())
            .await;

        assert!(status.is_success());
        assert_eq!(
            store.idea(&IdeaId::from("i1")).unwrap().title.as_deref(),
            Some("Renamed")
        );
    }

    #[tokio::test]
    async fn test_idea_mutations_need_a_token() {
        let api = MockApi::new();
        let store = store_with(&api, false);

        let errors = [
            store
                .create_idea(ChallengeId::from("c1"), IdeaFields::default())
                .await
                .error,
            store
                .update_idea(IdeaId::from("i1"), IdeaFields::default())
                .await
                .error,
            store.delete_idea(IdeaId::from("i1")).await.error,
            store.fetch_my_ideas().await.error,
        ];

        for error in &errors {
            assert_eq!(error.as_ref().map(ApiError::code), Some("USER_NOT_AUTHENTICATED_ERROR"));
        }
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_loading_is_visible_while_in_flight() {
        let api = MockApi::new();
        api.respond("fetch_challenge_ideas", Ok(page(&["i1"], 1)));
        let release = api.hold("fetch_challenge_ideas");
        let store = Arc::new(store_with(&api, false));
        let mut statuses = store.subscribe([Change::Status(Operation::FetchChallengeIdeas)]);

        let task = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.fetch_challenge_ideas(Some(ChallengeId::from("c1"))).await }
        });
        while api.calls("fetch_challenge_ideas") == 0 {
            tokio::task::yield_now().await;
        }

        assert!(store.status(|s| s.fetch_challenge_ideas.is_loading));
        assert!(store.status(|s| s.fetch_challenge_ideas.success.is_none()));
        assert_eq!(statuses.drain().len(), 1);

        release.notify_one();
        let status = task.await.unwrap();

        assert!(!status.is_loading);
        assert_eq!(status.success, Some(true));
        assert_eq!(store.status(|s| s.fetch_challenge_ideas.clone()), status);
        assert_eq!(statuses.drain().len(), 1);
    }

    #[tokio::test]
    async fn test_challenge_ideas_point_back_to_uncached_challenge() {
        let api = MockApi::new();
        api.respond("fetch_challenge_ideas", Ok(page(&["i1", "i2"], 2)));
        let store = store_with(&api, false);

        let status = store.fetch_challenge_ideas(Some(ChallengeId::from("c9"))).await;

        assert!(status.is_success());
        assert!(store.read(|cache| cache.challenge(&ChallengeId::from("c9")).is_none()));
        for id in ["i1", "i2"] {
            let parent = store.idea(&IdeaId::from(id)).unwrap().challenge;
            assert_eq!(parent, Some(ChallengeId::from("c9")));
        }
    }
}
