use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Metadata scraped from a YouTube watch or Shorts page
#[derive(Debug, Object, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase", default)]
pub struct VideoMetadata {
    /// Document title without the site suffix
    pub title: String,
    /// First 500 characters of the description
    #[oai(default)]
    pub description: String,
    /// Page URL at extraction time
    #[oai(default)]
    pub url: String,
    /// Extraction time (ISO-8601, UTC)
    #[oai(default)]
    pub timestamp: String,
    /// Whether the page is a Short
    #[oai(default)]
    pub is_short: bool,
    #[oai(default)]
    pub duration: String,
    #[oai(default)]
    pub view_count: String,
    #[oai(default)]
    pub upload_date: String,
    /// Hashtags linked from the page, first-seen order
    #[oai(default)]
    pub hashtags: Vec<String>,
    #[oai(default)]
    pub comments_enabled: bool,
    #[oai(default)]
    pub thumbnail_url: String,
    /// Whether the player exposes a captions toggle
    #[oai(default)]
    pub has_transcript: bool,
    /// Video identifier parsed from the tab URL
    pub video_id: Option<String>,
    /// Channel display name
    pub channel_name: Option<String>,
}
