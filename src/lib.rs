//! One-shot loader for the retail CSV dataset: detect each file's encoding,
//! parse it, apply the per-dataset cleaning rules, and insert the result into
//! a relational database, skipping rows whose primary key is already stored.

pub mod clean;
pub mod config;
pub mod dataset;
pub mod db;
pub mod pipeline;
pub mod read;
pub mod table;

pub use dataset::Dataset;
pub use pipeline::{run, RunSummary};

#[cfg(test)]
pub(crate) fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,retail_etl=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
