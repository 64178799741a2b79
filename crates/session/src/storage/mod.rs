//! Durable key-value storage for the session slot.
//!
//! The store keeps a single serialized [`User`] under one key. Storage is a
//! cache of the in-memory session, never a second source of truth.

pub mod in_memory;
pub mod sqlite;

pub use in_memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use async_trait::async_trait;
use thiserror::Error;

use traveldesk_auth::User;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The storage facility cannot be reached at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded writing '{key}' ({size} bytes, quota {quota})")]
    QuotaExceeded { key: String, size: usize, quota: usize },

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Key-value slot storage.
///
/// Each call completes before returning; there are no queued writes.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite the slot.
    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the slot. Removing an absent slot succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Classification of a raw session slot read at bootstrap.
#[derive(Debug, Clone, PartialEq)]
pub enum Hydration {
    Hydrated(User),
    /// Nothing stored (or an explicit JSON `null`).
    Empty,
    /// Unparseable content. The slot must be cleared.
    Corrupt,
}

impl Hydration {
    pub fn from_slot(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Hydration::Empty;
        };

        match serde_json::from_str::<Option<User>>(raw) {
            Ok(Some(user)) => Hydration::Hydrated(user),
            Ok(None) => Hydration::Empty,
            Err(err) => {
                tracing::warn!(error = %err, "stored session is not a valid user record");
                Hydration::Corrupt
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Hydration::Hydrated(_) => "hydrated",
            Hydration::Empty => "empty",
            Hydration::Corrupt => "corrupt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traveldesk_auth::Role;

    #[test]
    fn absent_or_blank_slot_is_empty() {
        assert_eq!(Hydration::from_slot(None), Hydration::Empty);
        assert_eq!(Hydration::from_slot(Some("   ")), Hydration::Empty);
        assert_eq!(Hydration::from_slot(Some("null")), Hydration::Empty);
    }

    #[test]
    fn garbage_is_corrupt() {
        assert_eq!(Hydration::from_slot(Some("{not json")), Hydration::Corrupt);
        assert_eq!(Hydration::from_slot(Some("[1,2,3]")), Hydration::Corrupt);
        // Valid JSON, but not a user record.
        assert_eq!(Hydration::from_slot(Some(r#"{"name":"x"}"#)), Hydration::Corrupt);
    }

    #[test]
    fn valid_record_hydrates() {
        let raw = r#"{"id":"u-1","name":"Ayşe","email":"ayse@example.com","role":"operation"}"#;
        let Hydration::Hydrated(user) = Hydration::from_slot(Some(raw)) else {
            panic!("expected hydrated session");
        };
        assert_eq!(user.known_role(), Some(Role::Operation));
        assert_eq!(user.name, "Ayşe");
    }

    #[test]
    fn backend_record_with_naive_timestamp_hydrates() {
        let raw = r#"{"id":"u-1","name":"Admin","email":"admin@diogenes.com","role":"admin","status":"active","created_at":"2025-01-05T10:00:00.123456"}"#;
        let Hydration::Hydrated(user) = Hydration::from_slot(Some(raw)) else {
            panic!("expected hydrated session");
        };
        assert_eq!(user.known_role(), Some(Role::Admin));
        assert_eq!(user.extra["created_at"], "2025-01-05T10:00:00.123456");
    }

    #[test]
    fn blank_user_id_is_corrupt() {
        let raw = r#"{"id":"  ","name":"Admin","email":"admin@diogenes.com","role":"admin"}"#;
        assert_eq!(Hydration::from_slot(Some(raw)), Hydration::Corrupt);
    }
}
