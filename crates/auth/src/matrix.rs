//! Compiled-in access policy.
//!
//! Two literal tables: role × resource → allowed actions, and role × page →
//! visible. Every role has its own explicit row; rows are tuned independently
//! and must not be derived from one another.

use crate::{Action, Page, Resource, Role};

const ALL: &[Action] = &[
    Action::Read,
    Action::Create,
    Action::Update,
    Action::Delete,
    Action::Upload,
];
const CRUD: &[Action] = &[Action::Read, Action::Create, Action::Update, Action::Delete];
const READ: &[Action] = &[Action::Read];
const NONE: &[Action] = &[];

/// Actions `role` may perform on `resource`.
pub fn resource_grants(role: Role, resource: Resource) -> &'static [Action] {
    match role {
        Role::Admin => match resource {
            Resource::Flights => ALL,
            Resource::Reservations => ALL,
            Resource::Operations => ALL,
            Resource::Users => CRUD,
            Resource::Logs => READ,
            Resource::Management => READ,
        },
        Role::Flight => match resource {
            Resource::Flights => ALL,
            Resource::Reservations => READ,
            Resource::Operations => READ,
            Resource::Users => NONE,
            Resource::Logs => NONE,
            Resource::Management => READ,
        },
        Role::Reservation => match resource {
            Resource::Flights => READ,
            Resource::Reservations => ALL,
            Resource::Operations => READ,
            Resource::Users => NONE,
            Resource::Logs => NONE,
            Resource::Management => READ,
        },
        Role::Operation => match resource {
            Resource::Flights => READ,
            Resource::Reservations => READ,
            Resource::Operations => ALL,
            Resource::Users => NONE,
            Resource::Logs => NONE,
            Resource::Management => READ,
        },
        Role::Management => match resource {
            Resource::Flights => READ,
            Resource::Reservations => READ,
            Resource::Operations => READ,
            Resource::Users => NONE,
            Resource::Logs => NONE,
            Resource::Management => READ,
        },
    }
}

/// Whether `role` may open `page`.
pub fn page_grant(role: Role, page: Page) -> bool {
    match role {
        Role::Admin => match page {
            Page::Dashboard => true,
            Page::Reservations => true,
            Page::Operations => true,
            Page::Flights => true,
            Page::Management => true,
            Page::Hotels => true,
            Page::Admin => true,
        },
        Role::Flight => match page {
            Page::Dashboard => true,
            Page::Reservations => true,
            Page::Operations => true,
            Page::Flights => true,
            Page::Management => true,
            Page::Hotels => false,
            Page::Admin => false,
        },
        Role::Reservation => match page {
            Page::Dashboard => true,
            Page::Reservations => true,
            Page::Operations => true,
            Page::Flights => true,
            Page::Management => true,
            Page::Hotels => true,
            Page::Admin => false,
        },
        Role::Operation => match page {
            Page::Dashboard => true,
            Page::Reservations => true,
            Page::Operations => true,
            Page::Flights => true,
            Page::Management => true,
            Page::Hotels => false,
            Page::Admin => false,
        },
        Role::Management => match page {
            Page::Dashboard => true,
            Page::Reservations => true,
            Page::Operations => true,
            Page::Flights => true,
            Page::Management => true,
            Page::Hotels => false,
            Page::Admin => false,
        },
    }
}
