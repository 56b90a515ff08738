//! Client State Store
//!
//! Holds the session and the cached profile/team payloads, and funnels
//! every remote mutation through the platform API.
//!
//! Failure handling differs by direction:
//! - reads (`fetch_profile`, `fetch_my_team`) log and keep the previous cache
//! - every other action logs and hands the error back to the caller
//!
//! The `try_fetch_*` variants expose read failures for callers that need them.

use crate::api::{ApiClient, ApiError, Credentials};
use crate::session::Session;
use crate::storage::KeyValueStore;
use crate::store::error::{StoreError, StoreResult};
use crate::store::state::{Snapshot, StoreState, STORE_KEY, TOKEN_KEY};
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A snapshot taken under the state lock, written to storage after it is released
struct Pending {
    generation: u64,
    snapshot: Snapshot,
}

/// Application state shared by every view.
///
/// Construct once and share by `Arc`; there is no global instance.
pub struct Store {
    api: ApiClient,
    storage: Arc<dyn KeyValueStore>,
    state: RwLock<StoreState>,
    /// Last sequence number issued for profile reads
    profile_requests: AtomicU64,
    /// Last sequence number issued for team reads
    team_requests: AtomicU64,
    /// Last snapshot generation taken
    generation: AtomicU64,
    /// Generation of the snapshot most recently written to storage
    persisted: Mutex<u64>,
}

impl Store {
    /// Create a store with empty state
    pub fn new(api: ApiClient, storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_state(api, storage, StoreState::default())
    }

    /// Create a store from whatever was persisted by a previous run
    pub fn restore(api: ApiClient, storage: Arc<dyn KeyValueStore>) -> Self {
        let state = match Self::load_snapshot(storage.as_ref()) {
            Some(snapshot) => StoreState::from_snapshot(snapshot),
            None => {
                let token = storage.get(TOKEN_KEY).ok().flatten().unwrap_or_default();
                StoreState {
                    session: Session::from_token(token),
                    ..Default::default()
                }
            }
        };

        tracing::info!(
            authenticated = state.session.is_authenticated(),
            "Restored client state"
        );

        Self::with_state(api, storage, state)
    }

    fn with_state(api: ApiClient, storage: Arc<dyn KeyValueStore>, state: StoreState) -> Self {
        Self {
            api,
            storage,
            state: RwLock::new(state),
            profile_requests: AtomicU64::new(0),
            team_requests: AtomicU64::new(0),
            generation: AtomicU64::new(0),
            persisted: Mutex::new(0),
        }
    }

    fn load_snapshot(storage: &dyn KeyValueStore) -> Option<Snapshot> {
        let raw = match storage.get(STORE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Failed to read persisted state: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!("Ignoring unreadable persisted state: {}", e);
                None
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Capture `state` for [`Store::persist`]. Call with the write guard held
    /// so generations follow the order of mutations.
    fn snapshot(&self, state: &StoreState) -> Pending {
        Pending {
            generation: self.generation.fetch_add(1, Ordering::SeqCst) + 1,
            snapshot: state.to_snapshot(),
        }
    }

    /// Mirror a snapshot to durable storage. Failures are logged, never raised.
    ///
    /// Runs without the state lock. A snapshot older than the last one
    /// written is dropped.
    fn persist(&self, pending: Pending) {
        let mut written = self.persisted.lock().unwrap_or_else(PoisonError::into_inner);
        if pending.generation < *written {
            tracing::debug!(generation = pending.generation, "Skipping outdated snapshot");
            return;
        }

        let token = &pending.snapshot.token;
        let token_result = if token.is_empty() {
            self.storage.remove(TOKEN_KEY)
        } else {
            self.storage.set(TOKEN_KEY, token)
        };
        if let Err(e) = token_result {
            tracing::warn!("Failed to persist token: {}", e);
        }

        let result = serde_json::to_string(&pending.snapshot)
            .map_err(StoreError::from)
            .and_then(|json| Ok(self.storage.set(STORE_KEY, &json)?));

        match result {
            Ok(()) => *written = pending.generation,
            Err(e) => tracing::warn!("Failed to persist client state: {}", e),
        }
    }

    // ============================================
    // Getters
    // ============================================

    pub fn session(&self) -> Session {
        self.read().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().session.is_authenticated()
    }

    /// Bearer token for outgoing requests
    pub fn token(&self) -> Option<String> {
        self.read().session.token().map(str::to_string)
    }

    /// Last fetched profile (`null` until the first successful fetch)
    pub fn profile(&self) -> Value {
        self.read().profile.value.clone()
    }

    /// Last fetched team membership
    pub fn team(&self) -> Value {
        self.read().team.value.clone()
    }

    // ============================================
    // Session
    // ============================================

    /// Hold `token` as the session. The token is not validated; an empty
    /// token is the anonymous session.
    pub fn set_token(&self, token: impl Into<String>) {
        let pending = {
            let mut state = self.write();
            state.session = Session::from_token(token);
            self.snapshot(&state)
        };
        self.persist(pending);
    }

    /// Forget the session token
    pub fn clear_token(&self) {
        let pending = {
            let mut state = self.write();
            state.session = Session::Anonymous;
            self.snapshot(&state)
        };
        self.persist(pending);
    }

    /// Clear the token and every cached payload.
    ///
    /// Reads still in flight are discarded when they complete.
    pub fn logout(&self) {
        let profile_seq = self.profile_requests.fetch_add(1, Ordering::SeqCst) + 1;
        let team_seq = self.team_requests.fetch_add(1, Ordering::SeqCst) + 1;

        let pending = {
            let mut state = self.write();
            state.session = Session::Anonymous;
            state.profile.reset(profile_seq);
            state.team.reset(team_seq);
            self.snapshot(&state)
        };
        self.persist(pending);

        tracing::info!("Logged out");
    }

    /// Exchange credentials for a token and hold it as the session
    pub async fn login(&self, credentials: &Credentials) -> StoreResult<()> {
        match self.api.login(credentials).await {
            Ok(response) => {
                self.set_token(response.access_token);
                tracing::info!(username = %credentials.username, "Logged in");
                Ok(())
            }
            Err(e) => Err(report("login", e)),
        }
    }

    /// Register a new account. Does not log in.
    pub async fn register<T: Serialize + ?Sized>(&self, user: &T) -> StoreResult<Value> {
        let body = to_payload(user)?;
        self.api
            .register(body)
            .await
            .map_err(|e| report("register", e))
    }

    // ============================================
    // Reads
    // ============================================

    /// Refresh the cached profile; failures keep the previous cache
    pub async fn fetch_profile(&self) {
        if let Err(e) = self.try_fetch_profile().await {
            tracing::error!(error = %e, "Failed to fetch profile");
        }
    }

    /// Refresh the cached profile and return the fetched body
    pub async fn try_fetch_profile(&self) -> StoreResult<Value> {
        let seq = self.profile_requests.fetch_add(1, Ordering::SeqCst) + 1;
        let token = self.token();

        let body = self.api.get_profile(token.as_deref()).await?;

        let pending = {
            let mut state = self.write();
            if state.profile.apply(seq, body.clone()) {
                Some(self.snapshot(&state))
            } else {
                None
            }
        };
        match pending {
            Some(pending) => self.persist(pending),
            None => tracing::debug!(seq, "Discarding stale profile response"),
        }

        Ok(body)
    }

    /// Refresh the cached team membership; failures keep the previous cache
    pub async fn fetch_my_team(&self) {
        if let Err(e) = self.try_fetch_my_team().await {
            tracing::error!(error = %e, "Failed to fetch teams");
        }
    }

    /// Refresh the cached team membership and return the fetched body
    pub async fn try_fetch_my_team(&self) -> StoreResult<Value> {
        let seq = self.team_requests.fetch_add(1, Ordering::SeqCst) + 1;
        let token = self.token();

        let body = self.api.get_my_teams(token.as_deref()).await?;

        let pending = {
            let mut state = self.write();
            if state.team.apply(seq, body.clone()) {
                Some(self.snapshot(&state))
            } else {
                None
            }
        };
        match pending {
            Some(pending) => self.persist(pending),
            None => tracing::debug!(seq, "Discarding stale team response"),
        }

        Ok(body)
    }

    /// Members of `team_name`. Not cached.
    pub async fn fetch_team_members(&self, team_name: &str) -> StoreResult<Value> {
        let token = self.token();
        self.api
            .get_team_members(token.as_deref(), team_name)
            .await
            .map_err(|e| report("fetch team members", e))
    }

    /// Artifacts submitted by `team_name`. Not cached.
    pub async fn fetch_team_artifacts(&self, team_name: &str) -> StoreResult<Value> {
        let token = self.token();
        self.api
            .get_team_artifacts(token.as_deref(), team_name)
            .await
            .map_err(|e| report("fetch team artifacts", e))
    }

    // ============================================
    // Writes
    // ============================================

    /// Update the profile and set the cached `role_name` from `data`.
    ///
    /// The cache is patched from the request, not the response: until the
    /// next `fetch_profile` it shows what was asked for. A payload without
    /// `role_name` leaves the cache as it is, and so does a logout or a
    /// newer profile fetch landing while the update is in flight.
    pub async fn put_change_role<T: Serialize + ?Sized>(&self, data: &T) -> StoreResult<Value> {
        let body = to_payload(data)?;
        let role = body.get("role_name").cloned();
        let seq = self.profile_requests.load(Ordering::SeqCst);
        let token = self.token();

        let response = self
            .api
            .update_profile(token.as_deref(), body)
            .await
            .map_err(|e| report("change role", e))?;

        if let Some(role) = role {
            let pending = {
                let mut state = self.write();
                if state.profile.unchanged_since(seq) {
                    state.patch_role(role);
                    Some(self.snapshot(&state))
                } else {
                    None
                }
            };
            match pending {
                Some(pending) => self.persist(pending),
                None => tracing::debug!(seq, "Profile replaced during role change, not patching"),
            }
        }

        tracing::info!("Profile updated");
        Ok(response)
    }

    /// Invite a user into `team_name`
    pub async fn put_in_team<T: Serialize + ?Sized>(
        &self,
        data: &T,
        team_name: &str,
    ) -> StoreResult<Value> {
        let body = to_payload(data)?;
        let token = self.token();

        let response = self
            .api
            .add_team_member(token.as_deref(), team_name, body)
            .await
            .map_err(|e| report("invite to team", e))?;

        tracing::info!(team = %team_name, "Team member invited");
        Ok(response)
    }

    /// Create or replace the artifacts of `team_name`
    pub async fn put_team_data<T: Serialize + ?Sized>(
        &self,
        data: &T,
        team_name: &str,
    ) -> StoreResult<Value> {
        let body = to_payload(data)?;
        let token = self.token();

        let response = self
            .api
            .update_team_artifacts(token.as_deref(), team_name, body)
            .await
            .map_err(|e| report("update team artifacts", e))?;

        tracing::info!(team = %team_name, "Team artifacts saved");
        Ok(response)
    }

    /// Leave `team_name`; the server deletes the team when its lead leaves
    pub async fn delete_from_team(&self, team_name: &str) -> StoreResult<Value> {
        let token = self.token();

        let response = self
            .api
            .leave_team(token.as_deref(), team_name)
            .await
            .map_err(|e| report("leave team", e))?;

        tracing::info!(team = %team_name, "Left team");
        Ok(response)
    }

    /// Create a team led by the current user
    pub async fn post_create_team<T: Serialize + ?Sized>(&self, data: &T) -> StoreResult<Value> {
        let body = to_payload(data)?;
        let token = self.token();

        let response = self
            .api
            .create_team(token.as_deref(), body)
            .await
            .map_err(|e| report("create team", e))?;

        tracing::info!("Team created");
        Ok(response)
    }

    // ============================================
    // Jury
    // ============================================

    /// Teams with submitted artifacts the current jury member has not scored.
    /// Not cached.
    pub async fn fetch_pending_reviews(&self) -> StoreResult<Value> {
        let token = self.token();
        self.api
            .get_pending_reviews(token.as_deref())
            .await
            .map_err(|e| report("fetch pending reviews", e))
    }

    /// Teams the current jury member has already scored. Not cached.
    pub async fn fetch_reviewed_teams(&self) -> StoreResult<Value> {
        let token = self.token();
        self.api
            .get_reviewed_teams(token.as_deref())
            .await
            .map_err(|e| report("fetch reviewed teams", e))
    }

    /// Artifacts, members and case of `team_name` as shown to the jury
    pub async fn fetch_review_artifacts(&self, team_name: &str) -> StoreResult<Value> {
        let token = self.token();
        self.api
            .get_review_artifacts(token.as_deref(), team_name)
            .await
            .map_err(|e| report("fetch review artifacts", e))
    }

    /// Score `team_name` for the first time
    pub async fn post_review<T: Serialize + ?Sized>(
        &self,
        data: &T,
        team_name: &str,
    ) -> StoreResult<Value> {
        let body = to_payload(data)?;
        let token = self.token();

        let response = self
            .api
            .submit_review(token.as_deref(), team_name, body)
            .await
            .map_err(|e| report("submit review", e))?;

        tracing::info!(team = %team_name, "Review submitted");
        Ok(response)
    }

    /// Replace an earlier score for `team_name`
    pub async fn put_review<T: Serialize + ?Sized>(
        &self,
        data: &T,
        team_name: &str,
    ) -> StoreResult<Value> {
        let body = to_payload(data)?;
        let token = self.token();

        let response = self
            .api
            .update_review(token.as_deref(), team_name, body)
            .await
            .map_err(|e| report("update review", e))?;

        tracing::info!(team = %team_name, "Review updated");
        Ok(response)
    }
}

fn to_payload<T: Serialize + ?Sized>(data: &T) -> StoreResult<Value> {
    Ok(serde_json::to_value(data)?)
}

/// Log a failed write and hand it back to the caller
fn report(action: &str, err: ApiError) -> StoreError {
    tracing::error!(error = %err, "Failed to {}", action);
    StoreError::Api(err)
}
