use super::extract::SelectorChain;
use crate::browser::{AttributeLookup, Page};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

const CAPTION_TOGGLE: &str = ".ytp-subtitles-button";
const TOGGLE_STATE: &str = "aria-pressed";

pub const CHANNEL_NAME: SelectorChain = SelectorChain(&[
    "ytd-channel-name a",
    "#channel-name a",
    ".ytd-channel-name a",
    "#upload-info #channel-name a",
    "#owner #channel-name a",
    "ytd-video-owner-renderer #channel-name a",
]);

lazy_static! {
    static ref VIDEO_ID: Regex =
        Regex::new(r"(?:youtube\.com/(?:watch\?v=|shorts/))([^&\n?#]+)").unwrap();
}

/// Whether the player exposes a captions toggle. The toggle only carries a pressed
/// state when captions exist, so the attribute's presence is the signal, not its value.
pub async fn check_transcript_availability(page: &dyn Page) -> bool {
    match page.query_attribute(CAPTION_TOGGLE, TOGGLE_STATE).await {
        Ok(AttributeLookup::Value(_)) => true,
        Ok(AttributeLookup::NoAttribute) | Ok(AttributeLookup::NoElement) => false,
        Err(e) => {
            warn!(error = %e, "Error checking transcript availability");
            false
        }
    }
}

/// Best-effort channel name lookup; any failure reads as unknown
pub async fn find_channel_name(page: &dyn Page) -> Option<String> {
    match CHANNEL_NAME.first_text_on(page).await {
        Ok(name) => name,
        Err(e) => {
            debug!(error = %e, "Could not get channel name");
            None
        }
    }
}

pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{PageError, PageSnapshot, StaticPage};
    use async_trait::async_trait;

    struct UnreachablePage;

    #[async_trait]
    impl Page for UnreachablePage {
        async fn current_url(&self) -> Result<String, PageError> {
            Err(PageError::Closed)
        }

        async fn snapshot(&self) -> Result<PageSnapshot, PageError> {
            Err(PageError::Closed)
        }

        async fn query_text(&self, _selector: &str) -> Result<Option<String>, PageError> {
            Err(PageError::Closed)
        }

        async fn query_attribute(
            &self,
            _selector: &str,
            _name: &str,
        ) -> Result<AttributeLookup, PageError> {
            Err(PageError::Driver("session deleted".to_string()))
        }
    }

    fn page(body: &str) -> StaticPage {
        StaticPage::new(
            "https://www.youtube.com/watch?v=abc",
            format!("<html><body>{}</body></html>", body),
        )
    }

    #[tokio::test]
    async fn toggle_with_state_attribute_means_transcript() {
        let pressed = page(r#"<button class="ytp-subtitles-button" aria-pressed="false"></button>"#);
        assert!(check_transcript_availability(&pressed).await);
    }

    #[tokio::test]
    async fn toggle_without_state_or_missing_toggle_means_none() {
        let stateless = page(r#"<button class="ytp-subtitles-button"></button>"#);
        assert!(!check_transcript_availability(&stateless).await);
        assert!(!check_transcript_availability(&page("")).await);
    }

    #[tokio::test]
    async fn page_errors_never_escape_the_prober() {
        assert!(!check_transcript_availability(&UnreachablePage).await);
        assert_eq!(find_channel_name(&UnreachablePage).await, None);
    }

    #[tokio::test]
    async fn channel_name_uses_first_non_empty_candidate() {
        let html = r#"
            <ytd-channel-name><a href="/@empty">  </a></ytd-channel-name>
            <div id="owner"><div id="channel-name"><a href="/@drx"> Dr. X </a></div></div>
        "#;
        assert_eq!(find_channel_name(&page(html)).await.as_deref(), Some("Dr. X"));
    }

    #[test]
    fn video_id_from_watch_and_shorts_urls() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://youtube.com/shorts/abc_-123?feature=share").as_deref(),
            Some("abc_-123")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/xyz#comments").as_deref(),
            Some("xyz")
        );
        assert_eq!(extract_video_id("https://www.youtube.com/feed/trending"), None);
    }
}
