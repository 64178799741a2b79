//! `traveldesk-auth` — role-based access control for the back-office client.
//!
//! This crate is intentionally decoupled from HTTP and storage: every check is
//! a pure lookup over the compiled-in matrices in [`matrix`].
//!
//! Client-side checks only decide what to render. The backend must enforce
//! the same policy on every request.

/// Generates the string vocabulary (`ALL`, `as_str`, `Display`, `FromStr`,
/// lowercase serde) for a closed, field-less enum.
macro_rules! closed_vocabulary {
    ($t:ident, $what:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $t {
            /// Every member, in declaration order.
            pub const ALL: &'static [$t] = &[$($t::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($t::$variant => $name),+
                }
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl core::str::FromStr for $t {
            type Err = traveldesk_core::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($t::$variant),)+
                    other => Err(traveldesk_core::DomainError::validation(format!(
                        "unknown {} '{}'",
                        $what, other
                    ))),
                }
            }
        }
    };
}

pub mod authorize;
pub mod matrix;
pub mod permissions;
pub mod roles;
pub mod user;

pub use authorize::{
    AuthorizationExplanation, Decision, DenialKind, accessible_pages, can_access_page, check_page,
    check_permission, explain_permission, has_permission, permits_named,
};
pub use permissions::{Action, Page, Resource};
pub use roles::{Role, RoleClaim};
pub use user::{User, UserPatch};
