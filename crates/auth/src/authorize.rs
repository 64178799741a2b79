use serde::Serialize;

use crate::matrix::{page_grant, resource_grants};
use crate::{Action, Page, Resource, Role, RoleClaim};

/// Outcome of a single policy lookup.
///
/// Every denial collapses to `false` at the boolean API; the kind is kept so
/// audit logs can tell "nobody is logged in" from "role unknown" from "the
/// matrix says no".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Granted,
    Denied(DenialKind),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// No session principal.
    NoSession,
    /// The principal's role is not part of the matrix.
    UnrecognizedRole,
    /// The matrix has no grant for this role.
    NotGranted,
}

impl Decision {
    pub fn is_granted(&self) -> bool {
        matches!(self, Decision::Granted)
    }

    fn from_grant(granted: bool) -> Self {
        if granted {
            Decision::Granted
        } else {
            Decision::Denied(DenialKind::NotGranted)
        }
    }
}

fn resolve(role: Option<&RoleClaim>) -> Result<Role, DenialKind> {
    match role {
        None => Err(DenialKind::NoSession),
        Some(RoleClaim::Known(role)) => Ok(*role),
        Some(RoleClaim::Unrecognized(raw)) => {
            tracing::debug!(role = %raw, "denying access for unrecognized role");
            Err(DenialKind::UnrecognizedRole)
        }
    }
}

/// Can `role` perform `action` on `resource`?
///
/// `None` means there is no session: nothing is granted.
///
/// - No IO
/// - No panics
pub fn check_permission(role: Option<&RoleClaim>, resource: Resource, action: Action) -> Decision {
    match resolve(role) {
        Ok(role) => Decision::from_grant(resource_grants(role, resource).contains(&action)),
        Err(kind) => Decision::Denied(kind),
    }
}

/// Can `role` open `page`?
pub fn check_page(role: Option<&RoleClaim>, page: Page) -> Decision {
    match resolve(role) {
        Ok(role) => Decision::from_grant(page_grant(role, page)),
        Err(kind) => Decision::Denied(kind),
    }
}

pub fn has_permission(role: Option<&RoleClaim>, resource: Resource, action: Action) -> bool {
    check_permission(role, resource, action).is_granted()
}

pub fn can_access_page(role: Option<&RoleClaim>, page: Page) -> bool {
    check_page(role, page).is_granted()
}

/// String-keyed permission check for callers that hold raw names (server
/// payloads, config files). Any name outside the vocabulary is a denial.
pub fn permits_named(role: Option<&str>, resource: &str, action: &str) -> bool {
    let (Ok(resource), Ok(action)) = (resource.parse::<Resource>(), action.parse::<Action>())
    else {
        return false;
    };
    let claim = role.map(RoleClaim::parse);
    has_permission(claim.as_ref(), resource, action)
}

/// Pages `role` may open, in sidebar order.
pub fn accessible_pages(role: Option<&RoleClaim>) -> Vec<Page> {
    Page::ALL
        .iter()
        .copied()
        .filter(|page| can_access_page(role, *page))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of a permission decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    /// Role being checked, verbatim (absent without a session).
    pub role: Option<String>,
    pub resource: Resource,
    pub action: Action,
    pub decision: Decision,
    /// Human-readable reason for the decision.
    pub reason: String,
    /// Everything the role may do on this resource.
    pub granted_actions: Vec<Action>,
}

/// Explain why a permission check is (or would be) granted or denied.
pub fn explain_permission(
    role: Option<&RoleClaim>,
    resource: Resource,
    action: Action,
) -> AuthorizationExplanation {
    let decision = check_permission(role, resource, action);
    let granted_actions = match role.and_then(RoleClaim::role) {
        Some(role) => resource_grants(role, resource).to_vec(),
        None => Vec::new(),
    };

    let reason = match decision {
        Decision::Granted => format!("role grants '{action}' on '{resource}'"),
        Decision::Denied(DenialKind::NoSession) => "no user is logged in".to_string(),
        Decision::Denied(DenialKind::UnrecognizedRole) => format!(
            "role '{}' is not part of the access policy",
            role.map(RoleClaim::as_str).unwrap_or_default()
        ),
        Decision::Denied(DenialKind::NotGranted) => format!(
            "role does not grant '{action}' on '{resource}'; granted: {:?}",
            granted_actions.iter().map(Action::as_str).collect::<Vec<_>>()
        ),
    };

    AuthorizationExplanation {
        role: role.map(|r| r.as_str().to_string()),
        resource,
        action,
        decision,
        reason,
        granted_actions,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
