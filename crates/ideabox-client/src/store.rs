//! The [`DataStore`] context object.
//!
//! One instance is built at startup and shared by `Arc`.  All cached data,
//! session tokens and statuses sit behind a single lock that is never held
//! across an `.await`; every operation runs as
//!
//! 1. set its status to loading and run local guards,
//! 2. await the collaborator,
//! 3. reconcile the response into the cache (unless a sign-out happened in
//!    between), store the terminal status and publish the changes.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info, warn};

use ideabox_shared::{ApiError, IdeaId};
use ideabox_store::{Cache, ChallengeRecord, IdeaRecord, UserRecord};

use crate::api::{ApiClient, ApiResult};
use crate::config::ClientConfig;
use crate::events::{Change, EventBus, Subscription};
use crate::state::{Session, StoreState};
use crate::status::{Operation, Status, Statuses};

/// Selects the slot of one operation inside [`Statuses`].
pub(crate) type StatusSlot<R, P> = fn(&mut Statuses) -> &mut Status<R, P>;

type ReactionLocks = Mutex<HashMap<IdeaId, Arc<tokio::sync::Mutex<()>>>>;

/// Held while a reaction toggle on one idea runs.  The idea's entry leaves
/// the lock map once nobody else holds or waits for it.
pub(crate) struct ReactionGuard<'a> {
    locks: &'a ReactionLocks,
    idea: IdeaId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ReactionGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&self.idea)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.idea);
        }
    }
}

pub struct DataStore {
    api: Arc<dyn ApiClient>,
    config: ClientConfig,
    state: Mutex<StoreState>,
    events: EventBus,
    reaction_locks: ReactionLocks,
}

impl DataStore {
    pub fn new(api: Arc<dyn ApiClient>, config: ClientConfig) -> Self {
        let events = EventBus::new(config.event_capacity);
        Self {
            api,
            config,
            state: Mutex::new(StoreState::new()),
            events,
            reaction_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A panic inside a critical section leaves the state usable.
    pub(crate) fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------

    pub fn subscribe(&self, keys: impl IntoIterator<Item = Change>) -> Subscription {
        self.events.subscribe(keys)
    }

    pub fn subscribe_all(&self) -> Subscription {
        self.events.subscribe_all()
    }

    /// Run `f` against the cache under the lock.
    pub fn read<T>(&self, f: impl FnOnce(&Cache) -> T) -> T {
        f(&self.lock().cache)
    }

    pub fn status<T>(&self, f: impl FnOnce(&Statuses) -> T) -> T {
        f(&self.lock().statuses)
    }

    pub fn statuses(&self) -> Statuses {
        self.lock().statuses.clone()
    }

    pub fn session(&self) -> Session {
        self.lock().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().session.auth_token.is_some()
    }

    pub fn challenge_list(&self) -> Option<Vec<ChallengeRecord>> {
        self.read(|cache| {
            cache
                .challenge_list()
                .map(|ids| cache.resolve_challenges(ids).into_iter().cloned().collect())
        })
    }

    pub fn current_challenge(&self) -> Option<ChallengeRecord> {
        self.read(|cache| {
            cache
                .current_challenge()
                .and_then(|id| cache.challenge(id))
                .cloned()
        })
    }

    pub fn current_user(&self) -> Option<UserRecord> {
        self.read(|cache| cache.current_user().and_then(|id| cache.user(id)).cloned())
    }

    pub fn idea(&self, id: &IdeaId) -> Option<IdeaRecord> {
        self.read(|cache| cache.idea(id).cloned())
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    pub fn set_auth_token(&self, token: Option<String>) {
        self.mutate(|state| state.session.auth_token = token);
        self.publish_session();
    }

    pub(crate) fn publish_session(&self) {
        self.events.publish([Change::Session]);
    }

    /// Drop every cached record, token and status.
    ///
    /// Operations still in flight finish and report to their callers but no
    /// longer write into the cache.
    pub fn sign_out(&self) {
        let changes = {
            let mut state = self.lock();
            state.generation += 1;
            state.session = Session::default();
            state.statuses.reset();
            state.cache.clear();
            state.cache.take_changes()
        };
        info!("Signed out, cache cleared");

        self.events.publish(
            changes
                .into_iter()
                .map(Change::Cache)
                .chain(Operation::ALL.into_iter().map(Change::Status))
                .chain([Change::Session]),
        );
    }

    // ------------------------------------------------------------------
    // Operation plumbing
    // ------------------------------------------------------------------

    /// Apply `f` to the state and publish whatever it touched in the cache.
    pub(crate) fn mutate<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> T {
        let (out, changes) = {
            let mut state = self.lock();
            let out = f(&mut state);
            (out, state.cache.take_changes())
        };
        self.events.publish(changes.into_iter().map(Change::Cache));
        out
    }

    /// Store a terminal status produced without a collaborator call.
    pub(crate) fn reject<R, P>(
        &self,
        op: Operation,
        slot: StatusSlot<R, P>,
        error: ApiError,
    ) -> Status<R, P>
    where
        R: Clone,
        P: Clone,
    {
        warn!(op = %op, code = error.code(), error = %error, "Operation rejected locally");
        let status = Status::failed(error, None);
        self.record(op, slot, status.clone());
        status
    }

    /// Overwrite the status slot of `op` and announce it.
    pub(crate) fn record<R, P>(&self, op: Operation, slot: StatusSlot<R, P>, status: Status<R, P>) {
        *slot(&mut self.lock().statuses) = status;
        self.events.publish([Change::Status(op)]);
    }

    /// Run one operation end to end.
    ///
    /// `prepare` sees the state under the lock and either builds the request
    /// or rejects locally, in which case `call` never runs.  `reconcile`
    /// only runs for a successful response that arrives in the same session
    /// generation the operation started in.
    pub(crate) async fn execute<Req, R, P, Fut>(
        &self,
        op: Operation,
        slot: StatusSlot<R, P>,
        prepare: impl FnOnce(&StoreState) -> Result<Req, ApiError>,
        call: impl FnOnce(Arc<dyn ApiClient>, Req) -> Fut,
        reconcile: impl FnOnce(&mut StoreState, R) -> Result<Option<P>, ApiError>,
    ) -> Status<R, P>
    where
        R: Clone,
        P: Clone,
        Fut: Future<Output = ApiResult<R>>,
    {
        debug!(op = %op, "Operation started");

        let prepared = {
            let mut state = self.lock();
            *slot(&mut state.statuses) = Status::loading();
            let generation = state.generation;
            prepare(&state).map(|request| (request, generation))
        };
        self.events.publish([Change::Status(op)]);

        let (request, generation) = match prepared {
            Ok(prepared) => prepared,
            Err(error) => return self.reject(op, slot, error),
        };

        let result = call(Arc::clone(&self.api), request).await;

        let (status, changes) = {
            let mut state = self.lock();
            let current = state.generation == generation;

            let status = match result {
                Ok(response) if !current => {
                    warn!(op = %op, "Session changed while in flight, response not reconciled");
                    Status::succeeded(response, None)
                }
                Ok(response) => match reconcile(&mut state, response.clone()) {
                    Ok(payload) => {
                        info!(op = %op, "Operation succeeded");
                        Status::succeeded(response, payload)
                    }
                    Err(error) => {
                        warn!(op = %op, error = %error, "Response could not be reconciled");
                        Status::failed(error, Some(Ok(response)))
                    }
                },
                Err(error) => {
                    let classified = error.clone().classify(op.fallback_message());
                    warn!(op = %op, code = error.code(), error = %error, "Operation failed");
                    Status::failed(classified, Some(Err(error)))
                }
            };

            if current {
                *slot(&mut state.statuses) = status.clone();
            }
            (status, state.cache.take_changes())
        };

        self.events.publish(
            changes
                .into_iter()
                .map(Change::Cache)
                .chain([Change::Status(op)]),
        );
        status
    }

    /// Serialize reaction toggles on one idea when configured to.
    pub(crate) async fn reaction_guard(&self, idea: &IdeaId) -> Option<ReactionGuard<'_>> {
        if !self.config.serialize_reactions {
            return None;
        }
        let lock = {
            let mut locks = self
                .reaction_locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(idea.clone()).or_default())
        };
        let guard = lock.lock_owned().await;
        Some(ReactionGuard {
            locks: &self.reaction_locks,
            idea: idea.clone(),
            guard: Some(guard),
        })
    }

    #[cfg(test)]
    pub(crate) fn reaction_lock_count(&self) -> usize {
        self.reaction_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
