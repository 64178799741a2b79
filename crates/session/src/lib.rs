//! `traveldesk-session`
//!
//! **Responsibility:** client-side session and access gating for the
//! back-office panel.
//!
//! This crate provides:
//! - The Session Store (login state persisted across restarts)
//! - Route protection and permission-filtered navigation
//! - REST client decoration and 401/403 handling
//!
//! The backend remains the authority; everything here decides what to show.

pub mod client;
pub mod config;
pub mod guard;
pub mod navigation;
pub mod storage;
pub mod store;

pub use client::{ApiClient, ApiError, Credentials};
pub use config::SessionConfig;
pub use guard::{GuardDecision, evaluate, evaluate_path};
pub use navigation::{MenuItem, menu};
pub use storage::{Hydration, MemoryStorage, SessionStorage, SqliteStorage, StorageError};
pub use store::{SessionError, SessionSnapshot, SessionStore};
