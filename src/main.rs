//! TechPulse — Binary Entrypoint
//! Batch curation CLI: collect → curate → snapshot, plus weekly/monthly
//! roll-ups over the stored snapshots.
//!
//! See `README.md` for quickstart and `DESIGN.md` for architecture notes.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use techpulse::collect::{self, config::CollectConfig};
use techpulse::{report, Curator, RetentionStore};

#[derive(Parser, Debug)]
#[command(name = "techpulse", version, about = "Bilingual tech-news curation pipeline")]
struct Cli {
    /// Pipeline mode: daily (collect + snapshot), weekly or monthly (roll-up).
    #[arg(long, default_value = "daily")]
    mode: String,
    /// Write the resulting document to this file (pretty-printed) instead of
    /// printing compact JSON to stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Store base directory; overrides TECHPULSE_DATA_DIR.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

/// Compact tracing logs on stderr, so stdout stays valid JSON.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("techpulse=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op where the vars come from the environment.
    let _ = dotenvy::dotenv();

    init_tracing();
    let cli = Cli::parse();

    let store = match &cli.data_dir {
        Some(dir) => RetentionStore::open(dir)?,
        None => RetentionStore::open_default()?,
    };

    match cli.mode.as_str() {
        "daily" => run_daily(&store, cli.output.as_deref()).await,
        "weekly" => {
            match report::weekly_report(&store, Utc::now())? {
                Some(doc) => emit(&doc, cli.output.as_deref()),
                None => Ok(()),
            }
        }
        "monthly" => {
            match report::monthly_report(&store, Utc::now())? {
                Some(doc) => emit(&doc, cli.output.as_deref()),
                None => Ok(()),
            }
        }
        other => bail!("unknown mode {other:?}, expected daily, weekly or monthly"),
    }
}

async fn run_daily(store: &RetentionStore, output: Option<&Path>) -> Result<()> {
    let cfg = CollectConfig::load_default()?;
    let collectors = collect::default_collectors(&cfg);

    let raw = collect::collect_all(&collectors, &cfg).await;
    let total_raw = raw.len();

    let curator = Curator::with_defaults();
    let (events, total_processed) = curator.curate(raw);

    let snapshot = report::daily_snapshot(store, Utc::now(), total_raw, total_processed, events)?;

    let removed = store.evict_expired();
    tracing::info!(
        removed,
        total_size_bytes = store.total_size_bytes(),
        "retention sweep finished"
    );

    emit(&snapshot, output)
}

fn emit<T: Serialize>(doc: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let json = serde_json::to_string_pretty(doc)?;
            std::fs::write(path, json)
                .with_context(|| format!("writing output to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => {
            println!("{}", serde_json::to_string(doc)?);
        }
    }
    Ok(())
}
