//! Session principal record.
//!
//! A `User` is produced by the backend's login exchange and cached locally as
//! JSON. It is replaced wholesale on every login; the only in-place edits go
//! through [`UserPatch`], which cannot touch identity or role.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use traveldesk_core::{DomainError, DomainResult, UserId};

use crate::{Role, RoleClaim};

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: RoleClaim,

    /// Inline image (data URI). Has no bearing on permissions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,

    /// Fields the backend sends that this client does not model (`status`,
    /// `created_at`, ...); kept verbatim so the cached record matches what the
    /// server returned, whatever their format.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<RoleClaim>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role: role.into(),
            profile_picture: None,
            extra: Map::new(),
        }
    }

    pub fn with_profile_picture(mut self, data_uri: impl Into<String>) -> Self {
        self.profile_picture = Some(data_uri.into());
        self
    }

    /// Recognized role, if any.
    pub fn known_role(&self) -> Option<Role> {
        self.role.role()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Patch
// ─────────────────────────────────────────────────────────────────────────────

/// Partial update of the current user (e.g. a new profile picture).
///
/// `id` and `role` are accepted only so that an attempt to change them can be
/// detected and refused.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub role: Option<RoleClaim>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// `Some(None)` removes the picture; `None` leaves it untouched.
    #[serde(default, deserialize_with = "present")]
    pub profile_picture: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl UserPatch {
    pub fn profile_picture(data_uri: impl Into<String>) -> Self {
        Self {
            profile_picture: Some(Some(data_uri.into())),
            ..Default::default()
        }
    }

    /// Merge into `current`, returning the updated record.
    ///
    /// # Invariants
    /// - The user id never changes.
    /// - The role never changes (privilege escalation through a profile edit).
    pub fn apply(&self, current: &User) -> DomainResult<User> {
        if self.id.as_ref().is_some_and(|id| id != &current.id) {
            return Err(DomainError::invariant("user id cannot be changed"));
        }
        if let Some(role) = self.role.as_ref().filter(|role| *role != &current.role) {
            return Err(DomainError::unauthorized(format!(
                "role cannot be changed from '{}' to '{}'",
                current.role, role
            )));
        }

        let mut next = current.clone();
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(email) = &self.email {
            next.email = email.clone();
        }
        if let Some(picture) = &self.profile_picture {
            next.profile_picture = picture.clone();
        }
        Ok(next)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User::new(
            "u-alice".parse().unwrap(),
            "Alice",
            "alice@example.com",
            Role::Reservation,
        )
    }

    #[test]
    fn deserializes_backend_login_payload() {
        let json = r#"{
            "id": "3f1c2a",
            "name": "Bob",
            "email": "bob@example.com",
            "role": "flight",
            "status": "active",
            "created_at": "2025-01-05T10:00:00Z",
            "department": "ops"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.known_role(), Some(Role::Flight));
        assert_eq!(user.profile_picture, None);
        assert_eq!(user.extra["created_at"], "2025-01-05T10:00:00Z");
        assert_eq!(user.extra["department"], "ops");

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["department"], "ops");
        assert!(back.get("profile_picture").is_none());
    }

    #[test]
    fn backend_metadata_is_carried_verbatim() {
        // Naive timestamps and unexpected status values come straight from the
        // backend's SQL columns; they must not make the record unreadable.
        let json = r#"{
            "id": "u-1",
            "name": "Admin",
            "email": "admin@diogenes.com",
            "role": "admin",
            "status": "suspended",
            "created_at": "2025-01-05T10:00:00.123456"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.known_role(), Some(Role::Admin));
        assert_eq!(user.extra["status"], "suspended");
        assert_eq!(user.extra["created_at"], "2025-01-05T10:00:00.123456");

        let back: User = serde_json::from_str(&serde_json::to_string(&user).unwrap()).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn minimal_record_loads() {
        let user: User = serde_json::from_str(
            r#"{"id":"1","name":"A","email":"a@x","role":"admin"}"#,
        )
        .unwrap();
        assert!(user.extra.is_empty());
        assert_eq!(user.profile_picture, None);
    }

    #[test]
    fn unknown_role_still_loads() {
        let user: User = serde_json::from_str(
            r#"{"id":"1","name":"A","email":"a@x","role":"auditor"}"#,
        )
        .unwrap();
        assert_eq!(user.known_role(), None);
        assert_eq!(user.role.as_str(), "auditor");
    }

    #[test]
    fn patch_sets_profile_picture() {
        let user = alice();
        let next = UserPatch::profile_picture("data:image/png;base64,AAAA")
            .apply(&user)
            .unwrap();
        assert_eq!(next.profile_picture.as_deref(), Some("data:image/png;base64,AAAA"));
        assert_eq!(next.role, user.role);
        assert_eq!(next.id, user.id);
    }

    #[test]
    fn patch_distinguishes_absent_from_null_picture() {
        let user = alice().with_profile_picture("data:image/png;base64,AAAA");

        let untouched: UserPatch = serde_json::from_str(r#"{"name":"Alicia"}"#).unwrap();
        let next = untouched.apply(&user).unwrap();
        assert_eq!(next.name, "Alicia");
        assert!(next.profile_picture.is_some());

        let cleared: UserPatch = serde_json::from_str(r#"{"profile_picture":null}"#).unwrap();
        assert_eq!(cleared.apply(&user).unwrap().profile_picture, None);
    }

    #[test]
    fn patch_cannot_escalate_role() {
        let patch = UserPatch {
            role: Some(Role::Admin.into()),
            ..Default::default()
        };
        let err = patch.apply(&alice()).unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[test]
    fn patch_cannot_change_id() {
        let patch: UserPatch = serde_json::from_str(r#"{"id":"someone-else"}"#).unwrap();
        let err = patch.apply(&alice()).unwrap_err();
        assert!(err.to_string().contains("id"));
    }

    #[test]
    fn patch_with_unchanged_identity_is_allowed() {
        let user = alice();
        let patch = UserPatch {
            id: Some(user.id.clone()),
            role: Some(user.role.clone()),
            email: Some("alice@diogenes.example".to_string()),
            ..Default::default()
        };
        assert_eq!(patch.apply(&user).unwrap().email, "alice@diogenes.example");
    }
}
