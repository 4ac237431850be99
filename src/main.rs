use anyhow::Result;
use clap::Parser;
use retail_etl::{config::load_config, pipeline};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Load the retail CSV dataset into the configured database.
#[derive(Parser, Debug)]
#[command(name = "retail_etl", version, about, long_about = None)]
struct Cli {
    /// TOML config file (default: ./retail_etl.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read and clean only; do not touch the database
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stdout)
        .init();

    // ─── 2) configuration ────────────────────────────────────────────
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    info!(
        preview_rows = config.preview_rows,
        dry_run = cli.dry_run,
        "startup"
    );

    // ─── 3) read, clean, load ────────────────────────────────────────
    pipeline::run(&config, cli.dry_run).await?;
    Ok(())
}
