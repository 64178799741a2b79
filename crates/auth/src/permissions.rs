use serde::{Deserialize, Serialize};

/// Capability domain subject to action-level checks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Flights,
    Reservations,
    Operations,
    Users,
    Logs,
    Management,
}

closed_vocabulary!(Resource, "resource", {
    Flights => "flights",
    Reservations => "reservations",
    Operations => "operations",
    Users => "users",
    Logs => "logs",
    Management => "management",
});

/// Action checked against a resource.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    /// Bulk import (Excel upload screens).
    Upload,
}

closed_vocabulary!(Action, "action", {
    Read => "read",
    Create => "create",
    Update => "update",
    Delete => "delete",
    Upload => "upload",
});

/// Top-level navigable section of the application.
///
/// Declaration order is sidebar order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Dashboard,
    Reservations,
    Operations,
    Flights,
    Management,
    Hotels,
    Admin,
}

closed_vocabulary!(Page, "page", {
    Dashboard => "dashboard",
    Reservations => "reservations",
    Operations => "operations",
    Flights => "flights",
    Management => "management",
    Hotels => "hotels",
    Admin => "admin",
});

impl Page {
    /// Landing page used when a denied page falls back to home.
    pub const HOME: Page = Page::Dashboard;

    /// Route path of the page (`/` for the dashboard).
    pub fn path(&self) -> &'static str {
        match self {
            Page::Dashboard => "/",
            Page::Reservations => "/reservations",
            Page::Operations => "/operations",
            Page::Flights => "/flights",
            Page::Management => "/management",
            Page::Hotels => "/hotels",
            Page::Admin => "/admin",
        }
    }

    /// Sidebar label.
    pub fn label(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Reservations => "Reservations",
            Page::Operations => "Operations",
            Page::Flights => "Flight Department",
            Page::Management => "Management Department",
            Page::Hotels => "Hotels",
            Page::Admin => "Administration",
        }
    }

    /// Resolve a route path to its page.
    ///
    /// Only the first path segment is considered, so `/flights/TK1234` maps
    /// to [`Page::Flights`]. Query strings and fragments are ignored.
    pub fn from_path(path: &str) -> Option<Page> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let first = path.trim_start_matches('/').split('/').next().unwrap_or_default();
        if first.is_empty() {
            return Some(Page::Dashboard);
        }
        first.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_action_does_not_parse() {
        assert!("approve".parse::<Action>().is_err());
        assert!("READ".parse::<Action>().is_err());
        assert_eq!("upload".parse::<Action>().unwrap(), Action::Upload);
    }

    #[test]
    fn vocabularies_are_complete() {
        assert_eq!(Action::ALL.len(), 5);
        assert_eq!(Resource::ALL.len(), 6);
        assert_eq!(Page::ALL.len(), 7);
    }

    #[test]
    fn page_paths_resolve_back_to_pages() {
        for page in Page::ALL {
            assert_eq!(Page::from_path(page.path()), Some(*page));
        }
    }

    #[test]
    fn from_path_tolerates_suffixes() {
        assert_eq!(Page::from_path(""), Some(Page::Dashboard));
        assert_eq!(Page::from_path("/flights/"), Some(Page::Flights));
        assert_eq!(Page::from_path("/flights/TK1234"), Some(Page::Flights));
        assert_eq!(Page::from_path("/admin?tab=logs"), Some(Page::Admin));
        assert_eq!(Page::from_path("/login"), None);
        assert_eq!(Page::from_path("/dashboard"), Some(Page::Dashboard));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Page::Hotels).unwrap(), "\"hotels\"");
        let r: Resource = serde_json::from_str("\"logs\"").unwrap();
        assert_eq!(r, Resource::Logs);
    }
}
