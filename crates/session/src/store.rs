//! Session Store: who is logged in, persisted across restarts.
//!
//! The store is constructed explicitly and shared by handle (`Arc`); there is
//! no global. In-memory state is authoritative and the storage slot mirrors it.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex, watch};

use traveldesk_auth::{Action, Page, Resource, RoleClaim, User, UserPatch};
use traveldesk_core::DomainError;

use crate::config::{DEFAULT_STORAGE_KEY, SessionConfig};
use crate::storage::{Hydration, MemoryStorage, SessionStorage, SqliteStorage};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session store was already bootstrapped")]
    AlreadyBootstrapped,

    #[error("no user is logged in")]
    NotAuthenticated,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    /// True until bootstrap completes; never true again afterwards.
    pub loading: bool,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Option<&RoleClaim> {
        self.user.as_ref().map(|u| &u.role)
    }

    pub fn has_permission(&self, resource: Resource, action: Action) -> bool {
        traveldesk_auth::has_permission(self.role(), resource, action)
    }

    pub fn can_access_page(&self, page: Page) -> bool {
        traveldesk_auth::can_access_page(self.role(), page)
    }
}

pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    key: String,
    state: watch::Sender<SessionSnapshot>,
    /// Serializes read-modify-write of the user together with its storage write.
    mutation: Mutex<()>,
}

impl core::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionStore")
            .field("key", &self.key)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>, key: impl Into<String>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot {
            user: None,
            loading: true,
        });
        Self {
            storage,
            key: key.into(),
            state,
            mutation: Mutex::new(()),
        }
    }

    /// Non-persistent store (tests, or when no durable storage is wanted).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), DEFAULT_STORAGE_KEY)
    }

    /// Open the store described by `config`.
    ///
    /// If durable storage cannot be opened the store still works, but only
    /// for the lifetime of the process.
    pub async fn open(config: &SessionConfig) -> Self {
        let storage: Arc<dyn SessionStorage> = match &config.storage_path {
            Some(path) => match SqliteStorage::open(path).await {
                Ok(storage) => Arc::new(storage),
                Err(err) => {
                    tracing::warn!(
                        error = %format!("{err:#}"),
                        path = %path.display(),
                        "session storage unavailable; continuing with a memory-only session"
                    );
                    Arc::new(MemoryStorage::new())
                }
            },
            None => Arc::new(MemoryStorage::new()),
        };
        Self::new(storage, config.storage_key.clone())
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn has_permission(&self, resource: Resource, action: Action) -> bool {
        self.state.borrow().has_permission(resource, action)
    }

    pub fn can_access_page(&self, page: Page) -> bool {
        self.state.borrow().can_access_page(page)
    }

    /// Receiver that observes every session change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Load the persisted session. Runs once per store.
    ///
    /// A corrupt slot is cleared and the session starts logged out. On every
    /// path `loading` ends up false.
    pub async fn bootstrap(&self) -> Result<Hydration, SessionError> {
        let _guard = self.mutation.lock().await;
        if !self.state.borrow().loading {
            return Err(SessionError::AlreadyBootstrapped);
        }

        let raw = match self.storage.read(&self.key).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, key = %self.key, "failed to read stored session; starting logged out");
                None
            }
        };

        let hydration = Hydration::from_slot(raw.as_deref());
        if matches!(hydration, Hydration::Corrupt) {
            if let Err(err) = self.storage.remove(&self.key).await {
                tracing::error!(error = %err, key = %self.key, "failed to clear corrupt session slot");
            }
        }

        let user = match &hydration {
            Hydration::Hydrated(user) => Some(user.clone()),
            Hydration::Empty | Hydration::Corrupt => None,
        };
        self.state.send_replace(SessionSnapshot {
            user,
            loading: false,
        });

        tracing::info!(outcome = hydration.kind(), "session bootstrapped");
        Ok(hydration)
    }

    /// Make `user` the session principal, replacing any previous one.
    pub async fn login(&self, user: User) {
        let _guard = self.mutation.lock().await;
        tracing::info!(user_id = %user.id, role = %user.role, "user logged in");
        self.state.send_modify(|state| state.user = Some(user.clone()));
        self.persist(&user).await;
    }

    /// Clear the session. Calling it while logged out is a no-op.
    pub async fn logout(&self) {
        let _guard = self.mutation.lock().await;
        let mut previous = None;
        self.state.send_if_modified(|state| {
            previous = state.user.take();
            previous.is_some()
        });
        if let Some(user) = previous {
            tracing::info!(user_id = %user.id, "user logged out");
        }
        if let Err(err) = self.storage.remove(&self.key).await {
            tracing::error!(error = %err, key = %self.key, "failed to clear stored session");
        }
    }

    /// Merge `patch` into the current user and persist it.
    pub async fn update_user(&self, patch: UserPatch) -> Result<User, SessionError> {
        let _guard = self.mutation.lock().await;
        let current = self
            .state
            .borrow()
            .user
            .clone()
            .ok_or(SessionError::NotAuthenticated)?;

        let next = patch.apply(&current).inspect_err(|err| {
            tracing::warn!(user_id = %current.id, error = %err, "rejected user update");
        })?;

        self.state.send_modify(|state| state.user = Some(next.clone()));
        self.persist(&next).await;
        Ok(next)
    }

    /// Best-effort write of the slot. Failures are logged, never returned.
    async fn persist(&self, user: &User) {
        let payload = match serde_json::to_string(user) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(error = %err, user_id = %user.id, "failed to serialize session");
                return;
            }
        };
        if let Err(err) = self.storage.write(&self.key, &payload).await {
            tracing::error!(
                error = %err,
                key = %self.key,
                user_id = %user.id,
                "failed to persist session; it will not survive a restart"
            );
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
