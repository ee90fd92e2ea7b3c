//! AtB client error types.

use std::path::PathBuf;

/// Errors from talking to AtB (or the mock standing in for it).
#[derive(Debug, thiserror::Error)]
pub enum AtbError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid credentials
    #[error("unauthorized: check the username and password in the config file")]
    Unauthorized,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The SOAP envelope did not contain the expected result
    #[error("SOAP error: {0}")]
    Soap(String),

    /// The embedded JSON payload could not be parsed
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The credentials file could not be read
    #[error("failed to read config file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Mock data could not be loaded or has no entry for the request
    #[error("mock data error: {0}")]
    Mock(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}
