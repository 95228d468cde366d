use super::Extractor;
use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::fetchers::RequestFetcher;
use crate::model::{Extraction, InstagramPost, MediaType};
use html_escape::decode_html_entities;
use log::{debug, info, warn};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde_json::{Map, Value};
use std::sync::LazyLock;
use std::thread::sleep;
use url::Url;

const EMBED_ATTEMPTS: usize = 2;
const CAPTION_WINDOW_CHARS: usize = 10_000;
const CAPTION_FALLBACK_CHARS: usize = 5000;

const NOTE_RATE_LIMITED: &str =
    "Embed rate-limited. Caption unavailable — paste caption text manually for full extraction.";
const NOTE_UNAVAILABLE: &str =
    "Could not extract caption. Instagram may be rate-limiting. Try again later or paste caption text.";

static SHORTCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(p|reels?)/([A-Za-z0-9_-]+)").unwrap());
static CAPTION_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class="CaptionComments"|<div\s|<div>"#).unwrap());
static EDGE_CAPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"edge_media_to_caption".*?"text"\s*:\s*"((?:[^"\\]|\\.)*)""#).unwrap()
});
static CAPTION_OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""caption"\s*:\s*\{[^}]*"text"\s*:\s*"((?:[^"\\]|\\.)*)""#).unwrap()
});
static BR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<br\s*/?>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static CAPTION_USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class="CaptionUsername"[^>]*>([^<]+)<"#).unwrap());
static JSON_USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""username"\s*:\s*"([^"]*)""#).unwrap());
static MEDIA_IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class="EmbeddedMediaImage"[^>]*src="([^"]+)""#).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    Post,
    Reel,
}

/// Find the shortcode in a post (`/p/`) or reel (`/reel/`, `/reels/`) URL.
pub fn parse_shortcode(url: &str) -> Result<(PostKind, String), ExtractError> {
    let captures = SHORTCODE_RE
        .captures(url)
        .ok_or_else(|| ExtractError::MissingShortcode(url.to_string()))?;

    let kind = if &captures[1] == "p" {
        PostKind::Post
    } else {
        PostKind::Reel
    };
    Ok((kind, captures[2].to_string()))
}

/// Metadata returned by the oEmbed API; only a non-empty JSON object counts
type OEmbed = Map<String, Value>;

/// A string field of the oEmbed reply; missing, null and non-string values read as empty
fn oembed_field(oembed: &OEmbed, key: &str) -> String {
    oembed
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

/// Scrapes Instagram posts and reels.
///
/// The captioned embed page is fetched with a crawler user agent, which gets the
/// full caption markup. When that yields nothing the oEmbed API supplies title,
/// author and thumbnail, and the result carries a note explaining the missing
/// caption.
pub struct InstagramExtractor<'a> {
    fetcher: &'a RequestFetcher,
    config: &'a ExtractConfig,
}

impl<'a> InstagramExtractor<'a> {
    pub fn new(fetcher: &'a RequestFetcher, config: &'a ExtractConfig) -> Self {
        Self { fetcher, config }
    }

    fn embed_url(&self, shortcode: &str) -> String {
        format!(
            "{}/p/{shortcode}/embed/captioned/",
            self.config.instagram_base_url.trim_end_matches('/')
        )
    }

    /// Fetch the embed page, retrying once after a delay.
    ///
    /// Returns the raw HTML and the caption, or `None` if no attempt produced a caption.
    fn try_embed(&self, shortcode: &str) -> Option<(String, String)> {
        let embed_url = self.embed_url(shortcode);

        for attempt in 1..=EMBED_ATTEMPTS {
            match self.fetch_embed(&embed_url) {
                Ok(raw) => {
                    if let Some(caption) = caption_from_embed(&raw) {
                        debug!("Instagram: Caption found on attempt {attempt}");
                        return Some((raw, caption));
                    }
                    debug!("Instagram: No caption in embed page on attempt {attempt}");
                }
                Err(e) => warn!("Instagram: Embed fetch failed on attempt {attempt}: {e}"),
            }

            if attempt < EMBED_ATTEMPTS {
                sleep(self.config.retry_delay());
            }
        }

        None
    }

    fn fetch_embed(&self, embed_url: &str) -> Result<String, ExtractError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.config.instagram_user_agent)?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("text/html"));

        self.fetcher
            .fetch_with_headers(embed_url, headers, self.config.embed_max_bytes)
    }

    fn try_oembed(&self, url: &str) -> Option<OEmbed> {
        let result = Url::parse_with_params(&self.config.oembed_endpoint, &[("url", url)])
            .map_err(|e| e.to_string())
            .and_then(|oembed_url| {
                self.fetcher
                    .fetch(oembed_url.as_str(), self.config.oembed_max_bytes)
                    .map_err(|e| e.to_string())
            })
            .and_then(|raw| serde_json::from_str::<Value>(&raw).map_err(|e| e.to_string()));

        match result {
            Ok(Value::Object(oembed)) if !oembed.is_empty() => Some(oembed),
            Ok(other) => {
                warn!("Instagram: oEmbed reply has no metadata: {other}");
                None
            }
            Err(e) => {
                warn!("Instagram: oEmbed fallback failed: {e}");
                None
            }
        }
    }
}

impl Extractor for InstagramExtractor<'_> {
    fn extract(&self, url: &str) -> Result<Extraction, ExtractError> {
        let (kind, shortcode) = parse_shortcode(url)?;
        info!("Instagram: Extracting {shortcode} from {url}");

        let mut post = InstagramPost {
            shortcode: shortcode.clone(),
            url: url.to_string(),
            caption: String::new(),
            username: None,
            media_type: MediaType::Image,
            thumbnail: None,
            title: None,
            note: None,
        };

        let raw = match self.try_embed(&shortcode) {
            Some((raw, caption)) => {
                post.caption = clean_caption(&caption);
                post.username = username_from_embed(&raw);
                Some(raw)
            }
            None => {
                match self.try_oembed(url) {
                    Some(oembed) => {
                        post.title = Some(oembed_field(&oembed, "title"));
                        post.username = Some(oembed_field(&oembed, "author_name"));
                        post.thumbnail = Some(oembed_field(&oembed, "thumbnail_url"));
                        post.note = Some(NOTE_RATE_LIMITED.to_string());
                    }
                    None => post.note = Some(NOTE_UNAVAILABLE.to_string()),
                }
                None
            }
        };

        let is_video = raw.as_deref().is_some_and(|r| r.contains(r#""is_video":true"#));
        post.media_type = if kind == PostKind::Reel || is_video {
            MediaType::Video
        } else {
            MediaType::Image
        };

        if post.thumbnail.is_none() {
            post.thumbnail = raw.as_deref().and_then(thumbnail_from_embed);
        }

        Ok(Extraction::Instagram(post))
    }
}

/// Isolate the raw caption from embed HTML, trying the caption markup first and
/// then the JSON blobs Instagram sometimes inlines.
fn caption_from_embed(raw: &str) -> Option<String> {
    caption_from_markup(raw)
        .or_else(|| caption_from_json(&EDGE_CAPTION_RE, raw))
        .or_else(|| caption_from_json(&CAPTION_OBJECT_RE, raw))
}

fn caption_from_markup(raw: &str) -> Option<String> {
    let start = raw.find(r#"class="Caption""#)?;
    let chunk = prefix_chars(&raw[start..], CAPTION_WINDOW_CHARS);

    // Skip the username link that opens the caption
    let link_end = chunk.find("</a>")?;
    let rest = &chunk[link_end + "</a>".len()..];

    let caption = match CAPTION_END_RE.find(rest) {
        Some(end) => &rest[..end.start()],
        None => match rest.find("</div>") {
            Some(end) => &rest[..end],
            None => prefix_chars(rest, CAPTION_FALLBACK_CHARS),
        },
    };

    (!caption.is_empty()).then(|| caption.to_string())
}

fn caption_from_json(pattern: &Regex, raw: &str) -> Option<String> {
    let escaped = pattern.captures(raw)?.get(1)?.as_str();
    if escaped.is_empty() {
        return None;
    }

    // The capture is the body of a JSON string literal
    let caption = serde_json::from_str::<String>(&format!("\"{escaped}\""))
        .unwrap_or_else(|_| escaped.to_string());
    Some(caption)
}

fn clean_caption(caption: &str) -> String {
    let with_breaks = BR_RE.replace_all(caption, "\n");
    let without_tags = TAG_RE.replace_all(&with_breaks, "");
    decode_html_entities(&without_tags).trim().to_string()
}

fn username_from_embed(raw: &str) -> Option<String> {
    CAPTION_USERNAME_RE
        .captures(raw)
        .or_else(|| JSON_USERNAME_RE.captures(raw))
        .map(|c| c[1].trim().to_string())
}

fn thumbnail_from_embed(raw: &str) -> Option<String> {
    MEDIA_IMAGE_RE
        .captures(raw)
        .map(|c| decode_html_entities(&c[1]).into_owned())
}

/// The first `n` characters of `s`
fn prefix_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}
