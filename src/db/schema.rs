// src/db/schema.rs
use crate::dataset::Dataset;
use anyhow::{Context, Result};
use sqlx::AnyConnection;
use tracing::info;

/// Issue `dataset`'s `CREATE TABLE IF NOT EXISTS`. Safe to call every run.
#[tracing::instrument(level = "debug", skip(conn))]
pub async fn create_table(conn: &mut AnyConnection, dataset: Dataset) -> Result<()> {
    sqlx::query(dataset.spec().create_sql)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("creating table `{}`", dataset.table_name()))?;
    info!("table `{}` created or already exists", dataset.table_name());
    Ok(())
}
