// src/pipeline.rs
use crate::{
    clean::clean_table,
    config::Config,
    dataset::Dataset,
    db::{self, LoadOutcome},
    read::{detect_encoding, load_table},
    table::Table,
};
use anyhow::Result;
use sqlx::{AnyConnection, Connection};
use std::{collections::BTreeMap, path::Path, time::Instant};
use tracing::{error, info, warn};

/// What happened to one dataset over the run.
#[derive(Debug, Clone, Default)]
pub struct DatasetReport {
    /// Rows after cleaning, or why reading/cleaning failed.
    pub read: Option<Result<usize, String>>,
    /// Whether the table DDL ran cleanly. `None` when the load phase never ran.
    pub table_created: Option<bool>,
    pub load: Option<LoadOutcome>,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub datasets: BTreeMap<Dataset, DatasetReport>,
    /// Set when the database could not be reached; the load phase was skipped.
    pub connection_error: Option<String>,
}

impl RunSummary {
    pub fn report(&self, dataset: Dataset) -> Option<&DatasetReport> {
        self.datasets.get(&dataset)
    }

    fn entry(&mut self, dataset: Dataset) -> &mut DatasetReport {
        self.datasets.entry(dataset).or_default()
    }

    pub fn log(&self) {
        info!("run summary:");
        for d in Dataset::ALL {
            let Some(r) = self.datasets.get(&d) else {
                continue;
            };
            let read = match &r.read {
                Some(Ok(n)) => format!("{} rows cleaned", n),
                Some(Err(e)) => format!("read failed ({})", e),
                None => "not read".into(),
            };
            let created = match r.table_created {
                Some(true) => "table ok",
                Some(false) => "table failed",
                None => "table not attempted",
            };
            let load = r
                .load
                .as_ref()
                .map(|o| o.to_string())
                .unwrap_or_else(|| "not loaded".into());
            info!("  {:<16} {}; {}; {}", d.table_name(), read, created, load);
        }
        if let Some(e) = &self.connection_error {
            info!("  load phase skipped: {}", e);
        }
    }
}

/// Detect the encoding of `path`, load it, and clean it as `dataset`.
#[tracing::instrument(level = "info", skip(path, preview_rows), fields(path = %path.display()))]
pub fn read_and_clean(dataset: Dataset, path: &Path, preview_rows: usize) -> Result<Table> {
    let encoding = detect_encoding(path)?;
    let raw = load_table(path, encoding)?;
    info!(
        "file read successfully with encoding {}: {}",
        encoding.name(),
        path.display()
    );
    Ok(clean_table(dataset, raw, preview_rows)?)
}

/// One full run: read and clean every dataset, then (unless `dry_run`) create
/// the tables and load each cleaned dataset, committing table by table.
///
/// Per-dataset and per-table failures are logged, recorded in the summary and
/// skipped past. A connection failure skips the load phase but still returns
/// the summary of what was read.
pub async fn run(config: &Config, dry_run: bool) -> Result<RunSummary> {
    let start = Instant::now();
    let mut summary = RunSummary::default();

    let mut cleaned: Vec<(Dataset, Table)> = Vec::with_capacity(Dataset::ALL.len());
    for dataset in Dataset::ALL {
        let path = config.files.path(dataset);
        match read_and_clean(dataset, path, config.preview_rows) {
            Ok(table) => {
                summary.entry(dataset).read = Some(Ok(table.len()));
                cleaned.push((dataset, table));
            }
            Err(e) => {
                error!("failed to read and process {} data: {:#}", dataset, e);
                summary.entry(dataset).read = Some(Err(format!("{:#}", e)));
            }
        }
    }

    if dry_run {
        info!("dry run; skipping database phase");
        summary.log();
        return Ok(summary);
    }

    let mut conn = match open_connection(config).await {
        Ok(c) => c,
        Err(e) => {
            error!("error connecting to database: {:#}", e);
            summary.connection_error = Some(format!("{:#}", e));
            summary.log();
            return Ok(summary);
        }
    };

    load_phase(&mut conn, &cleaned, &mut summary).await;

    if let Err(e) = conn.close().await {
        warn!("error closing database connection: {}", e);
    }

    summary.log();
    info!(elapsed = ?start.elapsed(), "all done");
    Ok(summary)
}

async fn open_connection(config: &Config) -> Result<AnyConnection> {
    let url = config.database.connection_url()?;
    db::connect(&url).await
}

/// Create all five tables, then insert each cleaned dataset. Never fails:
/// every error is logged and recorded against its dataset.
async fn load_phase(
    conn: &mut AnyConnection,
    cleaned: &[(Dataset, Table)],
    summary: &mut RunSummary,
) {
    for dataset in Dataset::ALL {
        let ok = match db::create_table(conn, dataset).await {
            Ok(()) => true,
            Err(e) => {
                error!("error creating table `{}`: {:#}", dataset, e);
                false
            }
        };
        summary.entry(dataset).table_created = Some(ok);
    }

    for (dataset, table) in cleaned {
        let outcome = match db::insert_table(conn, *dataset, table).await {
            Ok(o) => o,
            Err(e) => {
                error!("error inserting data into {}: {:#}", dataset, e);
                LoadOutcome::Failed(format!("{:#}", e))
            }
        };
        summary.entry(*dataset).load = Some(outcome);
    }
}
