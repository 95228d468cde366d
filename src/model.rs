use serde::Serialize;
use serde_json::Value;

/// The record printed for one extracted URL.
///
/// The `source` key is written first and names the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source")]
pub enum Extraction {
    #[serde(rename = "instagram")]
    Instagram(InstagramPost),
    #[serde(rename = "schema.org")]
    Recipe(StructuredRecipe),
    #[serde(rename = "web")]
    Web(WebPage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstagramPost {
    pub shortcode: String,
    pub url: String,
    /// Empty when neither the embed page nor the JSON fallbacks yielded a caption
    pub caption: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub media_type: MediaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Explains why the caption is missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuredType {
    Recipe,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredRecipe {
    #[serde(rename = "type")]
    pub kind: StructuredType,
    pub url: String,
    /// The JSON-LD object exactly as it appeared on the page
    pub data: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebPage {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,
}
