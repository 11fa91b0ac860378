use ideabox_shared::constants::{LIKE, MSG_ALREADY_REACTED, MSG_IDEA_NOT_FOUND, MSG_NO_REACTION};
use ideabox_shared::{ApiError, IdeaId};
use tracing::debug;

use crate::api::{ByIdRequest, CreateReactionRequest};
use crate::status::{CreateReactionStatus, DeleteReactionStatus, Operation, Status};
use crate::store::DataStore;

impl DataStore {
    /// Like an idea.
    ///
    /// An idea that is not cached, or that the viewer already reacted to, is
    /// rejected without a call, so the count moves at most once per
    /// transition.  The status reads loading while an earlier toggle on the
    /// same idea is still running.
    pub async fn create_idea_reaction(&self, idea: IdeaId) -> CreateReactionStatus {
        self.record(Operation::CreateReaction, |s| &mut s.create_reaction, Status::loading());
        let _serialized = self.reaction_guard(&idea).await;
        let target = idea.clone();

        self.execute(
            Operation::CreateReaction,
            |s| &mut s.create_reaction,
            |state| {
                let token = state.session.require_token()?;
                if state.cache.idea(&idea).is_none() {
                    return Err(ApiError::object_not_found(MSG_IDEA_NOT_FOUND));
                }
                if state.cache.has_my_reaction(&idea) {
                    return Err(ApiError::generic(MSG_ALREADY_REACTED));
                }
                Ok(CreateReactionRequest {
                    auth_token: Some(token),
                    idea_id: idea,
                    value: LIKE.to_string(),
                })
            },
            |api, req| async move { api.create_idea_reaction(req).await },
            move |state, reaction| {
                let id = reaction.id.clone();
                let viewer = state.cache.current_user().cloned();
                state
                    .cache
                    .apply_reaction_created(&target, reaction, viewer.as_ref());
                Ok(Some(id))
            },
        )
        .await
    }

    /// Remove the viewer's like from an idea.  The collaborator is called
    /// with the reaction's own id; without a cached reaction nothing is
    /// sent.
    pub async fn delete_idea_reaction(&self, idea: IdeaId) -> DeleteReactionStatus {
        self.record(Operation::DeleteReaction, |s| &mut s.delete_reaction, Status::loading());
        let _serialized = self.reaction_guard(&idea).await;
        let target = idea.clone();

        self.execute(
            Operation::DeleteReaction,
            |s| &mut s.delete_reaction,
            |state| {
                let token = state.session.require_token()?;
                let reaction = state
                    .cache
                    .my_reaction(&idea)
                    .map_err(|_| ApiError::object_not_found(MSG_NO_REACTION))?;
                Ok(ByIdRequest {
                    auth_token: Some(token),
                    id: reaction,
                })
            },
            |api, req| async move { api.delete_idea_reaction(req).await },
            move |state, ()| {
                let viewer = state.cache.current_user().cloned();
                match state.cache.my_reaction(&target) {
                    Ok(reaction) => {
                        state
                            .cache
                            .apply_reaction_deleted(&target, &reaction, viewer.as_ref());
                        Ok(Some(reaction))
                    }
                    Err(_) => {
                        debug!(idea_id = %target, "Reaction already gone from cache");
                        Ok(None)
                    }
                }
            },
        )
        .await
    }
}
