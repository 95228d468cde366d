use thiserror::Error;

/// Errors that can occur while extracting data from a URL
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Failed to fetch the URL (network error or non-success status)
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// Failed to read the response body
    #[error("Failed to read response: {0}")]
    ReadError(#[from] std::io::Error),

    /// The URL does not contain an Instagram post or reel shortcode
    #[error("Could not find Instagram shortcode in: {0}")]
    MissingShortcode(String),

    /// Failed to parse or serialize JSON
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error parsing HTTP headers
    #[error("Header parse error: {0}")]
    HeaderError(#[from] reqwest::header::InvalidHeaderValue),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
