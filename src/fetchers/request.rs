use crate::config::ExtractConfig;
use crate::error::ExtractError;
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use std::io::Read;

/// Blocking HTTP fetcher with a fixed per-request deadline
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(config: &ExtractConfig) -> Result<Self, ExtractError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }

    /// Fetch `url` with the default headers, reading at most `max_bytes` of the body
    pub fn fetch(&self, url: &str, max_bytes: usize) -> Result<String, ExtractError> {
        self.fetch_with_headers(url, HeaderMap::new(), max_bytes)
    }

    /// Fetch `url` with extra headers, which override the client defaults
    ///
    /// Non-success statuses are errors. The body is cut at `max_bytes` and decoded
    /// as UTF-8, replacing invalid sequences.
    pub fn fetch_with_headers(
        &self,
        url: &str,
        headers: HeaderMap,
        max_bytes: usize,
    ) -> Result<String, ExtractError> {
        debug!("Fetching {url} (limit {max_bytes} bytes)");

        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()?
            .error_for_status()?;

        let mut body = Vec::new();
        response.take(max_bytes as u64).read_to_end(&mut body)?;
        debug!("Fetched {} bytes from {url}", body.len());

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
