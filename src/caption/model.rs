use crate::video::VideoMetadata;
use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};

/// Social platform the caption is written for
#[derive(Debug, Enum, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Instagram,
    Youtube,
    Tiktok,
    Linkedin,
}

/// Caption generation request
#[derive(Debug, Object, Clone)]
pub struct GenerateRequest {
    /// Target platform
    #[oai(default)]
    pub platform: Platform,
    /// YouTube watch or Shorts URL to scrape (ignored when `video` is given)
    pub url: Option<String>,
    /// Previously scraped metadata
    pub video: Option<VideoMetadata>,
}

/// Prompt preview request
#[derive(Debug, Object, Clone)]
pub struct PromptRequest {
    #[oai(default)]
    pub platform: Platform,
    pub video: VideoMetadata,
}

/// Rendered page handed over by a client that already has the document
#[derive(Debug, Object, Clone)]
pub struct SnapshotRequest {
    /// URL of the tab the document came from
    #[oai(validator(min_length = 1))]
    pub url: String,
    /// Serialized DOM of the tab
    pub html: String,
}

/// Generated caption
#[derive(Debug, Object, Clone, Serialize)]
pub struct Caption {
    pub platform: Platform,
    /// Caption text, trimmed
    pub caption: String,
    /// Metadata the caption was written from
    pub video: VideoMetadata,
}
