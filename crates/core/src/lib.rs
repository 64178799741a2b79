//! `traveldesk-core` — shared domain primitives.
//!
//! This crate contains **pure domain** building blocks (no IO, no transport).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::UserId;
