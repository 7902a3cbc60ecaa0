//! Persisted session store.
//!
//! Holds the logged-in [`User`] and a transient loading flag. The user is
//! mirrored into durable storage under [`STORAGE_KEY`] and restored when a
//! store is opened; the loading flag never leaves memory.

mod persist;
mod store;

use serde::{Deserialize, Serialize};

use crate::models::User;

pub use store::SessionStore;

/// Durable storage key for the session record.
pub const STORAGE_KEY: &str = "@clean_plate:auth";

/// Current format marker written into the durable record.
pub(crate) const RECORD_VERSION: u32 = 0;

/// In-memory session state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub is_loading: bool,
}

impl Session {
    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// The subset of [`Session`] that survives a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PersistedSession {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub version: u32,
}

impl PersistedSession {
    pub(crate) fn new(user: Option<User>) -> Self {
        Self {
            user,
            version: RECORD_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_is_signed_out() {
        let session = Session::default();
        assert!(session.user.is_none());
        assert!(!session.is_loading);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_persisted_record_has_no_loading_flag() {
        let json = serde_json::to_value(PersistedSession::new(None)).unwrap();
        assert_eq!(json, serde_json::json!({"user": null, "version": 0}));
    }

    #[test]
    fn test_persisted_record_ignores_extra_fields() {
        let raw = r#"{"user": null, "isLoading": true, "version": 0}"#;
        let record: PersistedSession = serde_json::from_str(raw).unwrap();
        assert!(record.user.is_none());
    }
}
