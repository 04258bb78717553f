use super::client::{CaptionError, CompletionClient};
use super::model::Platform;
use super::prompt::build_prompt;
use crate::bridge::{fetch_video_data, BridgeError};
use crate::browser::{PageError, PageOpener};
use crate::video::VideoMetadata;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please navigate to a YouTube video or Short")]
    NotAVideoPage,
    #[error("Please navigate to a YouTube video first")]
    NoVideo,
    #[error("Error loading video data: {0}")]
    Page(#[from] PageError),
    #[error("Error loading video data: {0}")]
    Bridge(#[from] BridgeError),
    #[error(transparent)]
    Caption(#[from] CaptionError),
}

/// Whether `url` is a YouTube watch page or Short
pub fn is_video_page(url: &str) -> bool {
    let url = match Url::parse(url) {
        Ok(url) => url,
        Err(_) => return false,
    };
    let on_youtube = match url.host_str() {
        Some(host) => host == "youtube.com" || host.ends_with(".youtube.com"),
        None => false,
    };
    on_youtube && (url.path() == "/watch" || url.path().starts_with("/shorts/"))
}

/// Everything one caption workflow needs, alive for one request only
#[derive(Debug, Default)]
pub struct PopupSession {
    selected_platform: Platform,
    video_data: Option<VideoMetadata>,
}

impl PopupSession {
    pub fn select_platform(&mut self, platform: Platform) {
        self.selected_platform = platform;
    }

    pub fn selected_platform(&self) -> Platform {
        self.selected_platform
    }

    pub fn video_data(&self) -> Option<&VideoMetadata> {
        self.video_data.as_ref()
    }

    /// Use metadata the caller already scraped
    pub fn set_video_data(&mut self, data: VideoMetadata) {
        self.video_data = Some(data);
    }

    pub fn into_video_data(self) -> Option<VideoMetadata> {
        self.video_data
    }

    pub async fn load_video_data(
        &mut self,
        opener: &dyn PageOpener,
        tab_url: &str,
        timeout: Duration,
    ) -> Result<&VideoMetadata, SessionError> {
        if !is_video_page(tab_url) {
            return Err(SessionError::NotAVideoPage);
        }

        let page = opener.open(tab_url).await?;
        let data = match fetch_video_data(page, tab_url, timeout).await {
            Ok(data) => data,
            Err(e) => {
                warn!(url = %tab_url, error = %e, "Error loading video data");
                return Err(e.into());
            }
        };
        info!(url = %tab_url, title = %data.title, is_short = data.is_short, "Video data loaded");

        Ok(self.video_data.insert(data))
    }

    pub fn prompt(&self) -> Result<String, SessionError> {
        let video = self.video_data().ok_or(SessionError::NoVideo)?;
        Ok(build_prompt(self.selected_platform, video))
    }

    pub async fn generate_caption(
        &self,
        api_key: &str,
        client: &CompletionClient,
    ) -> Result<String, SessionError> {
        if api_key.trim().is_empty() {
            return Err(CaptionError::MissingApiKey.into());
        }
        let prompt = self.prompt()?;
        Ok(client.generate_caption(api_key, &prompt).await?)
    }
}
