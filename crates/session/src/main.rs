//! Session status entry point.
//!
//! Opens the configured session, bootstraps it and prints what the panel
//! would show: the principal and the permitted menu.

use anyhow::Context;
use serde_json::json;

use traveldesk_session::{SessionConfig, SessionStore, menu};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    traveldesk_observability::init();

    let config = SessionConfig::from_env();
    tracing::info!(
        api_url = %config.api_url,
        storage = ?config.storage_path,
        "opening session store"
    );

    let store = SessionStore::open(&config).await;
    store
        .bootstrap()
        .await
        .context("failed to bootstrap session store")?;

    if std::env::var("TRAVELDESK_LOGOUT").is_ok_and(|v| v == "1") {
        store.logout().await;
    }

    let snapshot = store.snapshot();
    let report = json!({
        "authenticated": snapshot.is_authenticated(),
        "user": &snapshot.user,
        "menu": menu(&snapshot, "/"),
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to render session report")?
    );
    Ok(())
}
