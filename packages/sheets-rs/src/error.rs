use thiserror::Error;

/// Errors returned by the Sheets client.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Service account JSON could not be read or parsed
    #[error("invalid service account credentials: {0}")]
    Credentials(String),

    /// The private key could not be used to sign the token assertion
    #[error("failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// Transport-level failure (DNS, TLS, timeout, body decode)
    #[error("request to Google failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Google answered with a non-success status
    #[error("Google API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SheetsError>;
