//! One-off mirror of the database into Google Sheets.
//!
//! Runs the same sync the server's worker runs, on demand. Prints a JSON
//! report and exits non-zero when any collection failed.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use api_core::config::Config;
use api_core::domains::sync::{MirrorCollection, MirrorSync};
use api_core::kernel::stores::PostgresStore;
use clap::Parser;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;

#[derive(Parser)]
#[command(name = "sync_sheets")]
#[command(about = "Mirror waitlist, contact messages and job applications into Google Sheets")]
struct Cli {
    /// Sync only this collection (waitlist, contact_messages, job_applications)
    #[arg(long)]
    collection: Option<MirrorCollection>,

    /// Spreadsheet to write to, overriding GOOGLE_SPREADSHEET_ID
    #[arg(long)]
    spreadsheet_id: Option<String>,
}

#[derive(Serialize)]
struct Report {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    spreadsheet_id: Option<String>,
    results: Vec<CollectionResult>,
}

#[derive(Serialize)]
struct CollectionResult {
    collection: MirrorCollection,
    synced: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,api_core=debug,sqlx=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let Some(database_url) = &config.database_url else {
        bail!("DATABASE_URL must be set to sync from the database");
    };
    if config.sheets_credentials.is_none() {
        bail!("GOOGLE_SERVICE_ACCOUNT_JSON or GOOGLE_SERVICE_ACCOUNT_FILE must be set");
    }

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    let store = Arc::new(PostgresStore::from_pool(pool));

    let mirror = MirrorSync::new(
        store,
        config.sheets_client()?,
        config.mirror_config(),
        cli.spreadsheet_id.or_else(|| config.spreadsheet_id.clone()),
    );

    let results = match cli.collection {
        Some(collection) => vec![(collection, mirror.sync(collection).await)],
        None => mirror.sync_each().await,
    };
    let report = Report {
        success: results.iter().all(|(_, synced)| *synced),
        spreadsheet_id: mirror.state().await.target_handle,
        results: results
            .into_iter()
            .map(|(collection, synced)| CollectionResult { collection, synced })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.success {
        std::process::exit(1);
    }
    Ok(())
}
