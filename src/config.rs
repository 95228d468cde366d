use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Runtime settings for fetching and extraction
#[derive(Debug, Deserialize, Clone)]
pub struct ExtractConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent for ordinary web pages and the oEmbed API
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// User agent for the Instagram embed page (Instagram serves the full caption to crawlers)
    #[serde(default = "default_instagram_user_agent")]
    pub instagram_user_agent: String,
    /// Base URL the embed path is appended to
    #[serde(default = "default_instagram_base_url")]
    pub instagram_base_url: String,
    /// oEmbed API endpoint; the post URL is passed as the `url` query parameter
    #[serde(default = "default_oembed_endpoint")]
    pub oembed_endpoint: String,
    /// Maximum bytes read from a generic web page
    #[serde(default = "default_page_max_bytes")]
    pub page_max_bytes: usize,
    /// Maximum bytes read from the Instagram embed page
    #[serde(default = "default_embed_max_bytes")]
    pub embed_max_bytes: usize,
    /// Maximum bytes read from the oEmbed response
    #[serde(default = "default_oembed_max_bytes")]
    pub oembed_max_bytes: usize,
    /// Delay before retrying the embed fetch, in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Maximum characters of body text in a web result
    #[serde(default = "default_body_text_limit")]
    pub body_text_limit: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            instagram_user_agent: default_instagram_user_agent(),
            instagram_base_url: default_instagram_base_url(),
            oembed_endpoint: default_oembed_endpoint(),
            page_max_bytes: default_page_max_bytes(),
            embed_max_bytes: default_embed_max_bytes(),
            oembed_max_bytes: default_oembed_max_bytes(),
            retry_delay_ms: default_retry_delay_ms(),
            body_text_limit: default_body_text_limit(),
        }
    }
}

// Default value functions
fn default_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_instagram_user_agent() -> String {
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)".to_string()
}

fn default_instagram_base_url() -> String {
    "https://www.instagram.com".to_string()
}

fn default_oembed_endpoint() -> String {
    "https://api.instagram.com/oembed/".to_string()
}

fn default_page_max_bytes() -> usize {
    500_000
}

fn default_embed_max_bytes() -> usize {
    1_000_000
}

fn default_oembed_max_bytes() -> usize {
    50_000
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_body_text_limit() -> usize {
    5000
}

impl ExtractConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with LINK_EXTRACT__ prefix
    /// 2. The file passed in `path`, if any (must exist)
    /// 3. link-extract.toml in the current directory (optional)
    /// 4. Default values
    ///
    /// Environment variable format: LINK_EXTRACT__TIMEOUT
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::with_name("link-extract").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("LINK_EXTRACT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
