use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sheets::{ServiceAccountKey, SheetsOptions, SheetsService};

use crate::domains::sync::mirror::DEFAULT_SPREADSHEET_TITLE;
use crate::domains::sync::{MirrorConfig, SyncQueueConfig};
use crate::kernel::stores::ReadOrder;
use crate::kernel::{BaseSheetsClient, SheetsAdapter, UnconfiguredSheetsClient};

/// Where the service-account key comes from.
#[derive(Debug, Clone)]
pub enum SheetsCredentials {
    Json(String),
    File(String),
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Unset runs on the in-memory store
    pub database_url: Option<String>,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub admin_password: String,
    pub environment: String,
    pub sheets_sync_enabled: bool,
    pub sheets_credentials: Option<SheetsCredentials>,
    pub spreadsheet_id: Option<String>,
    pub spreadsheet_title: String,
    pub sheets_read_order: ReadOrder,
    pub sheets_clear_stale_rows: bool,
    pub sync_queue_capacity: usize,
    pub sync_max_attempts: u32,
    pub sync_retry_delay_ms: u64,
    pub rate_limit_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let is_production = environment == "production";

        let sheets_credentials = match (
            optional("GOOGLE_SERVICE_ACCOUNT_JSON"),
            optional("GOOGLE_SERVICE_ACCOUNT_FILE"),
        ) {
            (Some(json), _) => Some(SheetsCredentials::Json(json)),
            (None, Some(path)) => Some(SheetsCredentials::File(path)),
            (None, None) => None,
        };

        Ok(Self {
            database_url: optional("DATABASE_URL"),
            port: parse_or("PORT", 8000)?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "swipr-api".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?,
            sheets_sync_enabled: parse_or("SHEETS_SYNC_ENABLED", is_production)?,
            environment,
            sheets_credentials,
            spreadsheet_id: optional("GOOGLE_SPREADSHEET_ID"),
            spreadsheet_title: env::var("SHEETS_SPREADSHEET_TITLE")
                .unwrap_or_else(|_| DEFAULT_SPREADSHEET_TITLE.to_string()),
            sheets_read_order: parse_or("SHEETS_READ_ORDER", ReadOrder::Natural)?,
            sheets_clear_stale_rows: parse_or("SHEETS_CLEAR_STALE_ROWS", true)?,
            sync_queue_capacity: parse_or("SYNC_QUEUE_CAPACITY", 64)?,
            sync_max_attempts: parse_or("SYNC_MAX_ATTEMPTS", 3)?,
            sync_retry_delay_ms: parse_or("SYNC_RETRY_DELAY_MS", 2000)?,
            rate_limit_enabled: parse_or("RATE_LIMIT_ENABLED", true)?,
        })
    }

    pub fn mirror_config(&self) -> MirrorConfig {
        MirrorConfig {
            spreadsheet_title: self.spreadsheet_title.clone(),
            read_order: self.sheets_read_order,
            clear_stale_rows: self.sheets_clear_stale_rows,
            ..MirrorConfig::default()
        }
    }

    pub fn sync_queue_config(&self) -> SyncQueueConfig {
        SyncQueueConfig {
            capacity: self.sync_queue_capacity.max(1),
            max_attempts: self.sync_max_attempts.max(1),
            retry_delay: Duration::from_millis(self.sync_retry_delay_ms),
        }
    }

    /// The Sheets client, or a stand-in that always fails when no credentials
    /// are configured. Unreadable credentials are an error.
    pub fn sheets_client(&self) -> Result<Arc<dyn BaseSheetsClient>> {
        let key = match &self.sheets_credentials {
            Some(SheetsCredentials::Json(json)) => ServiceAccountKey::from_json(json)
                .context("GOOGLE_SERVICE_ACCOUNT_JSON is not a valid service account key")?,
            Some(SheetsCredentials::File(path)) => ServiceAccountKey::from_file(path)
                .context("GOOGLE_SERVICE_ACCOUNT_FILE could not be loaded")?,
            None => return Ok(Arc::new(UnconfiguredSheetsClient)),
        };
        let service = SheetsService::new(SheetsOptions::new(key))
            .context("Failed to build Google Sheets client")?;
        Ok(Arc::new(SheetsAdapter::new(Arc::new(service))))
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}
