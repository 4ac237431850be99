// src/db/mod.rs
pub mod insert;
pub mod schema;

use anyhow::{Context, Result};
use sqlx::any::install_default_drivers;
use sqlx::{AnyConnection, Connection};
use tracing::info;

pub use insert::{existing_keys, insert_table, LoadOutcome};
pub use schema::create_table;

/// Open the single connection used for the whole load phase.
///
/// The URL scheme picks the driver (`mysql://` in production, `sqlite:` in tests).
pub async fn connect(url: &str) -> Result<AnyConnection> {
    install_default_drivers();
    let conn = AnyConnection::connect(url)
        .await
        .with_context(|| format!("connecting to {}", redact(url)))?;
    info!(backend = conn.backend_name(), "connected to database");
    Ok(conn)
}

/// Drop the password from a URL before it reaches a log line.
fn redact(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(mut u) if u.password().is_some() => {
            let _ = u.set_password(Some("***"));
            u.to_string()
        }
        _ => url.to_string(),
    }
}
