use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::extractors::{detect_source, Extractor, InstagramExtractor, SourceKind, WebExtractor};
use crate::fetchers::RequestFetcher;
use crate::model::Extraction;
use log::info;

/// Fetches a URL and applies the extraction strategy that fits it
pub struct LinkExtractor {
    config: ExtractConfig,
    fetcher: RequestFetcher,
}

impl LinkExtractor {
    pub fn new(config: ExtractConfig) -> Result<Self, ExtractError> {
        let fetcher = RequestFetcher::new(&config)?;
        Ok(Self { config, fetcher })
    }

    /// Extract `url` with the given strategy, or the one detected from its host when `None`
    pub fn extract(&self, url: &str, kind: Option<SourceKind>) -> Result<Extraction, ExtractError> {
        let kind = kind.unwrap_or_else(|| detect_source(url));
        info!("Extracting {url} as {kind:?}");

        match kind {
            SourceKind::Instagram => InstagramExtractor::new(&self.fetcher, &self.config).extract(url),
            SourceKind::Web => WebExtractor::new(&self.fetcher, &self.config).extract(url),
        }
    }
}
