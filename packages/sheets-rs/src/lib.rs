// Google Sheets v4 client authenticated with a service account.
//
// Only the three calls the mirror needs: create a spreadsheet, overwrite a
// value range, clear a value range.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::debug;

pub mod auth;
pub mod error;
pub mod models;
pub mod range;

pub use auth::{AccessToken, AssertionClaims, ServiceAccountKey, DEFAULT_TOKEN_URI};
pub use error::{Result, SheetsError};
pub use models::{SheetSpec, UpdateValuesResponse};
pub use range::{a1_range, column_letter, quote_sheet_name};

use crate::models::{CreateSpreadsheetRequest, Spreadsheet, TokenResponse, ValueRange};

pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[derive(Debug, Clone)]
pub struct SheetsOptions {
    pub credentials: ServiceAccountKey,
    pub request_timeout: Duration,
}

impl SheetsOptions {
    pub fn new(credentials: ServiceAccountKey) -> Self {
        Self {
            credentials,
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
pub struct SheetsService {
    options: SheetsOptions,
    client: Client,
    token: Mutex<Option<AccessToken>>,
}

impl SheetsService {
    pub fn new(options: SheetsOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(options.request_timeout)
            .build()?;
        Ok(Self {
            options,
            client,
            token: Mutex::new(None),
        })
    }

    /// Exchange the service-account assertion for an access token.
    ///
    /// Tokens are cached and reused until shortly before they expire.
    pub async fn authenticate(&self) -> Result<()> {
        self.bearer().await.map(|_| ())
    }

    async fn bearer(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if !token.is_expired(Utc::now()) {
                return Ok(token.value.clone());
            }
        }

        let credentials = &self.options.credentials;
        let assertion = credentials.sign_assertion(SPREADSHEETS_SCOPE, Utc::now())?;
        let response = self
            .client
            .post(&credentials.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;
        let body: TokenResponse = check_status(response).await?.json().await?;
        let token = AccessToken::from_response(body, Utc::now());
        debug!(
            client_email = %credentials.client_email,
            expires_at = %token.expires_at,
            "obtained Google access token"
        );

        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    /// Create a spreadsheet with the given tabs and return its id.
    pub async fn create_spreadsheet(&self, title: &str, sheets: &[SheetSpec]) -> Result<String> {
        let token = self.bearer().await?;
        let response = self
            .client
            .post(SHEETS_API_BASE)
            .bearer_auth(token)
            .json(&CreateSpreadsheetRequest::new(title, sheets))
            .send()
            .await?;
        let created: Spreadsheet = check_status(response).await?.json().await?;
        Ok(created.spreadsheet_id)
    }

    /// Overwrite `range` with `values` (row-major, RAW input).
    pub async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<UpdateValuesResponse> {
        let token = self.bearer().await?;
        let url = format!(
            "{}/{}/values/{}",
            SHEETS_API_BASE,
            spreadsheet_id,
            urlencoding::encode(range)
        );
        let response = self
            .client
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(token)
            .json(&ValueRange::rows(range, values))
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    /// Clear every value in `range`, keeping formatting.
    pub async fn clear_values(&self, spreadsheet_id: &str, range: &str) -> Result<()> {
        let token = self.bearer().await?;
        let url = format!(
            "{}/{}/values/{}:clear",
            SHEETS_API_BASE,
            spreadsheet_id,
            urlencoding::encode(range)
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SheetsError::Api {
        status: status.as_u16(),
        body,
    })
}
