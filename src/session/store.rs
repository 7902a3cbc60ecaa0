//! The session store itself.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::persist::PersistQueue;
use super::{PersistedSession, Session, STORAGE_KEY};
use crate::models::User;
use crate::traits::KeyValueStorage;

/// Authoritative in-memory session, mirrored to durable storage.
///
/// Cloning is cheap and every clone shares the same state and writer. Each
/// mutation commits in memory first and then queues its durable write while
/// still holding the state lock, so storage sees writes in commit order.
/// Mutations never block on I/O and never fail; persistence problems are
/// logged and counted in [`persistence_failures`](Self::persistence_failures).
///
/// # Example
///
/// ```ignore
/// use green_plate::adapters::FileStorage;
/// use green_plate::session::SessionStore;
///
/// let store = SessionStore::open(Arc::new(FileStorage::new(data_dir))).await;
/// if !store.is_authenticated() {
///     // route guard sends the user to the login screen
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionStore {
    state: Arc<watch::Sender<Session>>,
    persist: PersistQueue,
    key: Arc<str>,
}

impl SessionStore {
    /// Open a store backed by `storage`, restoring any saved user.
    ///
    /// Must be called inside a tokio runtime: the durable writer is spawned
    /// as a background task.
    pub async fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::open_with_key(storage, STORAGE_KEY).await
    }

    /// Open a store that keeps its record under a custom key.
    pub async fn open_with_key(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let key: String = key.into();
        let user = restore_user(storage.as_ref(), &key).await;
        match &user {
            Some(user) => info!(role = %user.role(), user_id = user.id(), "Restored session"),
            None => debug!(key = %key, "No saved session"),
        }

        let (persist, _writer) = PersistQueue::spawn(storage, key.clone());
        let (state, _) = watch::channel(Session {
            user,
            is_loading: false,
        });

        Self {
            state: Arc::new(state),
            persist,
            key: key.into(),
        }
    }

    /// Replace the stored user and queue a durable write of the new value.
    pub fn set_user(&self, user: Option<User>) {
        self.state.send_modify(|session| {
            session.user = user.clone();
            self.persist.write(user);
        });
    }

    /// Update the transient loading flag. Never persisted.
    pub fn set_loading(&self, is_loading: bool) {
        self.state.send_if_modified(|session| {
            let changed = session.is_loading != is_loading;
            session.is_loading = is_loading;
            changed
        });
    }

    /// Reset the session to its empty defaults and delete the durable record.
    ///
    /// Calling this while already signed out is harmless.
    pub fn sign_out(&self) {
        self.state.send_modify(|session| {
            if let Some(user) = session.user.as_ref() {
                info!(user_id = user.id(), "Signing out");
            }
            *session = Session::default();
            self.persist.remove();
        });
    }

    /// Clear only the user. The cleared state reaches storage through the
    /// regular write-through path.
    pub fn clear_user(&self) {
        self.state.send_modify(|session| {
            session.user = None;
            self.persist.write(None);
        });
    }

    /// A copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// The current user, if signed in.
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Receive every subsequent session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Wait until all queued durable writes have been applied.
    pub async fn flush(&self) {
        self.persist.flush().await;
    }

    /// Number of durable writes or removals that failed so far.
    pub fn persistence_failures(&self) -> u64 {
        self.persist.failures()
    }

    /// Durable storage key of this store's record.
    pub fn storage_key(&self) -> &str {
        &self.key
    }
}

/// Read the saved user, treating every failure as "signed out".
async fn restore_user(storage: &dyn KeyValueStorage, key: &str) -> Option<User> {
    let raw = match storage.get_item(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "Failed to read saved session; starting signed out");
            return None;
        }
    };

    match serde_json::from_str::<PersistedSession>(&raw) {
        Ok(record) => record.user,
        Err(e) => {
            warn!(key, error = %e, "Saved session is malformed; starting signed out");
            None
        }
    }
}
