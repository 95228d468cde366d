use crate::error::ExtractError;
use crate::model::Extraction;
use log::debug;
use url::Url;

mod instagram;
mod json_ld;
mod web;

pub use instagram::{parse_shortcode, InstagramExtractor, PostKind};
pub use json_ld::find_recipe;
pub use web::{extract_from_html, WebExtractor};

/// The extraction strategy applied to a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Instagram,
    Web,
}

pub trait Extractor {
    fn extract(&self, url: &str) -> Result<Extraction, ExtractError>;
}

/// Pick a strategy from the URL's host.
///
/// Unparseable URLs are treated as web pages; the fetch reports the problem.
pub fn detect_source(url: &str) -> SourceKind {
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_default();

    let kind = if host.contains("instagram.com") || host.contains("instagr.am") {
        SourceKind::Instagram
    } else {
        SourceKind::Web
    };
    debug!("Detected source {kind:?} for host '{host}'");
    kind
}
