use thiserror::Error;

/// Errors surfaced by quote providers.
#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Failed to parse provider response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for MarketDataError {
    fn from(err: reqwest::Error) -> Self {
        MarketDataError::Http(err.to_string())
    }
}
