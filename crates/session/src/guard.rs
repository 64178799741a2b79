//! Route protection.
//!
//! Re-evaluate on every navigation; decisions are never cached.

use serde::Serialize;

use traveldesk_auth::Page;

use crate::config::LOGIN_PATH;
use crate::store::SessionSnapshot;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardDecision {
    /// Bootstrap has not finished; show a neutral waiting state.
    Wait,
    RedirectToLogin,
    /// The page is denied; fall back to the landing page (never an error page).
    RedirectHome,
    Allow,
}

impl GuardDecision {
    /// Where to navigate, for the redirect decisions.
    pub fn target_path(&self) -> Option<&'static str> {
        match self {
            GuardDecision::RedirectToLogin => Some(LOGIN_PATH),
            GuardDecision::RedirectHome => Some(Page::HOME.path()),
            GuardDecision::Wait | GuardDecision::Allow => None,
        }
    }
}

/// Decide what to do with a navigation to `requested`.
///
/// `None` means the route needs a session but no particular page grant.
pub fn evaluate(snapshot: &SessionSnapshot, requested: Option<Page>) -> GuardDecision {
    if snapshot.loading {
        return GuardDecision::Wait;
    }
    if !snapshot.is_authenticated() {
        return GuardDecision::RedirectToLogin;
    }
    match requested {
        Some(page) if !snapshot.can_access_page(page) => {
            tracing::debug!(page = %page, role = ?snapshot.role().map(|r| r.as_str()), "page denied; redirecting home");
            GuardDecision::RedirectHome
        }
        _ => GuardDecision::Allow,
    }
}

/// [`evaluate`] for a raw route path.
pub fn evaluate_path(snapshot: &SessionSnapshot, path: &str) -> GuardDecision {
    evaluate(snapshot, Page::from_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use traveldesk_auth::{Role, RoleClaim, User};

    fn logged_in(role: impl Into<RoleClaim>) -> SessionSnapshot {
        SessionSnapshot {
            user: Some(User::new("u-1".parse().unwrap(), "Ece", "ece@example.com", role)),
            loading: false,
        }
    }

    fn logged_out() -> SessionSnapshot {
        SessionSnapshot {
            user: None,
            loading: false,
        }
    }

    #[test]
    fn loading_defers_every_decision() {
        let loading = SessionSnapshot {
            user: None,
            loading: true,
        };
        assert_eq!(evaluate(&loading, Some(Page::Admin)), GuardDecision::Wait);
        assert_eq!(evaluate(&loading, None), GuardDecision::Wait);
        assert_eq!(GuardDecision::Wait.target_path(), None);
    }

    #[test]
    fn unauthenticated_goes_to_login_not_home() {
        let decision = evaluate(&logged_out(), Some(Page::Admin));
        assert_eq!(decision, GuardDecision::RedirectToLogin);
        assert_eq!(decision.target_path(), Some("/login"));
        assert_eq!(evaluate(&logged_out(), None), GuardDecision::RedirectToLogin);
    }

    #[test]
    fn denied_page_falls_back_home() {
        let decision = evaluate(&logged_in(Role::Management), Some(Page::Admin));
        assert_eq!(decision, GuardDecision::RedirectHome);
        assert_eq!(decision.target_path(), Some("/"));
    }

    #[test]
    fn allowed_page_renders() {
        assert_eq!(evaluate(&logged_in(Role::Admin), Some(Page::Admin)), GuardDecision::Allow);
        assert_eq!(
            evaluate(&logged_in(Role::Reservation), Some(Page::Hotels)),
            GuardDecision::Allow
        );
        assert_eq!(evaluate(&logged_in(Role::Flight), None), GuardDecision::Allow);
    }

    #[test]
    fn unrecognized_role_is_sent_home_for_any_page() {
        let snapshot = logged_in(RoleClaim::parse("auditor"));
        assert_eq!(evaluate(&snapshot, Some(Page::Flights)), GuardDecision::RedirectHome);
    }

    #[test]
    fn paths_resolve_before_evaluation() {
        let flight = logged_in(Role::Flight);
        assert_eq!(evaluate_path(&flight, "/hotels"), GuardDecision::RedirectHome);
        assert_eq!(evaluate_path(&flight, "/flights/TK1923"), GuardDecision::Allow);
        assert_eq!(evaluate_path(&flight, "/profile"), GuardDecision::Allow);
        assert_eq!(evaluate_path(&logged_out(), "/profile"), GuardDecision::RedirectToLogin);
    }
}
