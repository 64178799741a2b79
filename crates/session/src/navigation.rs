//! Sidebar menu and action visibility derived from the session.

use serde::Serialize;

use traveldesk_auth::{Action, Page, Resource};

use crate::store::SessionSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub page: Page,
    pub label: &'static str,
    pub path: &'static str,
    /// The entry matches the current route.
    pub active: bool,
}

/// Menu entries the current user may open, in sidebar order.
///
/// Empty while loading or logged out.
pub fn menu(snapshot: &SessionSnapshot, current_path: &str) -> Vec<MenuItem> {
    if snapshot.loading {
        return Vec::new();
    }
    let current = Page::from_path(current_path);

    Page::ALL
        .iter()
        .copied()
        .filter(|page| snapshot.can_access_page(*page))
        .map(|page| MenuItem {
            page,
            label: page.label(),
            path: page.path(),
            active: current == Some(page),
        })
        .collect()
}

/// Header title for a route (the dashboard title for unknown routes).
pub fn page_title(path: &str) -> &'static str {
    Page::from_path(path).unwrap_or(Page::HOME).label()
}

/// Action controls to render for `resource` (upload, edit, delete buttons).
pub fn visible_actions(snapshot: &SessionSnapshot, resource: Resource) -> Vec<Action> {
    Action::ALL
        .iter()
        .copied()
        .filter(|action| snapshot.has_permission(resource, *action))
        .collect()
}
