use super::json_ld::find_recipe;
use super::Extractor;
use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::fetchers::RequestFetcher;
use crate::model::{Extraction, StructuredRecipe, StructuredType, WebPage};
use log::{debug, info};
use regex::Regex;
use scraper::{Html, Node, Selector};
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Extracts a schema.org recipe if the page has one, otherwise the basic page metadata
pub struct WebExtractor<'a> {
    fetcher: &'a RequestFetcher,
    config: &'a ExtractConfig,
}

impl<'a> WebExtractor<'a> {
    pub fn new(fetcher: &'a RequestFetcher, config: &'a ExtractConfig) -> Self {
        Self { fetcher, config }
    }
}

impl Extractor for WebExtractor<'_> {
    fn extract(&self, url: &str) -> Result<Extraction, ExtractError> {
        let html = self.fetcher.fetch(url, self.config.page_max_bytes)?;
        Ok(extract_from_html(&html, url, self.config.body_text_limit))
    }
}

/// Build the result for an already-fetched page
pub fn extract_from_html(html: &str, url: &str, body_text_limit: usize) -> Extraction {
    let document = Html::parse_document(html);

    if let Some(data) = find_recipe(&document) {
        info!("Web: Found schema.org recipe at {url}");
        return Extraction::Recipe(StructuredRecipe {
            kind: StructuredType::Recipe,
            url: url.to_string(),
            data,
        });
    }

    let page = WebPage {
        url: url.to_string(),
        title: title(&document),
        description: meta_content(&document, "name", "description")
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        image: meta_content(&document, "property", "og:image"),
        body_text: body_text(&document, body_text_limit),
    };
    debug!(
        "Web: title={:?}, body_text chars={}",
        page.title,
        page.body_text.as_deref().map_or(0, |t| t.chars().count())
    );

    Extraction::Web(page)
}

fn title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// The `content` of the first `<meta>` whose `attr` equals `value`, ignoring ASCII case
fn meta_content(document: &Html, attr: &str, value: &str) -> Option<String> {
    let selector = Selector::parse("meta").ok()?;
    document
        .select(&selector)
        .find(|el| {
            el.value()
                .attr(attr)
                .is_some_and(|v| v.eq_ignore_ascii_case(value))
        })
        .and_then(|el| el.value().attr("content"))
        .map(str::to_string)
}

/// Visible body text with whitespace collapsed, cut to `limit` characters
fn body_text(document: &Html, limit: usize) -> Option<String> {
    let selector = Selector::parse("body").ok()?;
    let body = document.select(&selector).next()?;

    let mut words: Vec<String> = Vec::new();
    for node in body.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let mut in_skipped_element = false;
        let mut in_noscript = false;
        for el in node.ancestors().filter_map(|a| a.value().as_element()) {
            match el.name() {
                "script" | "style" => in_skipped_element = true,
                "noscript" => in_noscript = true,
                _ => {}
            }
        }
        if in_skipped_element {
            continue;
        }

        // Scripting is on while parsing, so noscript content stays raw markup
        if in_noscript {
            let stripped = TAG_RE.replace_all(text, " ");
            words.extend(stripped.split_whitespace().map(str::to_string));
        } else {
            words.extend(text.split_whitespace().map(str::to_string));
        }
    }

    let text: String = words.join(" ").chars().take(limit).collect();
    (!text.is_empty()).then_some(text)
}
