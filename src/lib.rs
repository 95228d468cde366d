//! Extract structured data from a URL.
//!
//! Instagram posts and reels are scraped from the captioned embed page, with the
//! oEmbed API as a fallback. Other pages yield their schema.org Recipe JSON-LD when
//! present, or otherwise their title, description, `og:image` and body text.
//!
//! ```no_run
//! let extraction = link_extract::extract("https://example.com/some-recipe")?;
//! println!("{}", serde_json::to_string(&extraction)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod model;
pub mod pipeline;

pub use config::ExtractConfig;
pub use error::ExtractError;
pub use extractors::{detect_source, parse_shortcode, PostKind, SourceKind};
pub use model::{Extraction, InstagramPost, MediaType, StructuredRecipe, StructuredType, WebPage};
pub use pipeline::LinkExtractor;

/// Extract `url` with the default configuration, detecting the source from its host
pub fn extract(url: &str) -> Result<Extraction, ExtractError> {
    LinkExtractor::new(ExtractConfig::default())?.extract(url, None)
}
