//! Client configuration.

use std::path::PathBuf;

/// Storage slot holding the serialized current user.
pub const DEFAULT_STORAGE_KEY: &str = "currentUser";

/// Header carrying the current user's id on every backend request.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Login entry point (redirect target for unauthenticated navigation).
pub const LOGIN_PATH: &str = "/login";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Session/client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Backend base URL (no trailing slash).
    pub api_url: String,
    /// SQLite file for the session slot; `None` keeps the session in memory.
    pub storage_path: Option<PathBuf>,
    pub storage_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_path: default_session_db_path(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl SessionConfig {
    /// Read configuration from the environment, falling back to defaults.
    ///
    /// - `TRAVELDESK_API_URL`
    /// - `TRAVELDESK_SESSION_DB` (`memory` for a non-persistent session)
    /// - `TRAVELDESK_SESSION_KEY`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("TRAVELDESK_API_URL") {
            config = config.with_api_url(url);
        }
        match lookup("TRAVELDESK_SESSION_DB").as_deref() {
            Some("memory") => config = config.in_memory(),
            Some(path) if !path.trim().is_empty() => config = config.with_storage_path(path),
            _ => {}
        }
        if let Some(key) = lookup("TRAVELDESK_SESSION_KEY").filter(|k| !k.trim().is_empty()) {
            config = config.with_storage_key(key);
        }

        config
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    pub fn in_memory(mut self) -> Self {
        self.storage_path = None;
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}

/// `{app_data_dir}/traveldesk/session.db`, if the OS data directory is known.
fn default_session_db_path() -> Option<PathBuf> {
    let base = dirs::data_dir().or_else(|| {
        dirs::home_dir().map(|mut h| {
            h.push(".local");
            h.push("share");
            h
        })
    })?;

    let mut path = base;
    path.push("traveldesk");
    path.push("session.db");
    Some(path)
}
