use super::model::VideoMetadata;
use crate::browser::{element_text, select_all, select_first, Page, PageError, PageSnapshot};
use chrono::{DateTime, SecondsFormat, Utc};
use scraper::Html;

pub const TITLE_SUFFIX: &str = " - YouTube";
pub const NO_TITLE: &str = "No title found";
pub const NO_DESCRIPTION: &str = "No description available";
pub const DESCRIPTION_LIMIT: usize = 500;

pub const DESCRIPTION: SelectorChain = SelectorChain(&[
    "#description-inner",
    "ytd-video-secondary-info-renderer #description",
    ".ytd-expander #description",
    "yt-formatted-string.content",
]);

pub const DURATION: SelectorChain =
    SelectorChain(&[".ytp-time-duration", "span.ytp-time-duration"]);

pub const VIEW_COUNT: SelectorChain = SelectorChain(&[
    ".ytd-video-view-count-renderer .view-count",
    "ytd-video-view-count-renderer",
    "span.view-count",
]);

pub const UPLOAD_DATE: SelectorChain = SelectorChain(&[
    "#info-strings yt-formatted-string",
    ".ytd-video-primary-info-renderer #info-text",
]);

const HASHTAG_LINKS: &str = r#"a.yt-simple-endpoint[href^="/hashtag/"]"#;
const COMMENTS_DISABLED: &str = "ytd-message-renderer";
const THUMBNAIL_META: &str = r#"meta[property="og:image"]"#;

/// Ordered selector strategies against an external document.
///
/// The first selector whose first match has non-empty text wins. Selectors that fail
/// to parse or match nothing are skipped.
#[derive(Debug, Clone, Copy)]
pub struct SelectorChain(pub &'static [&'static str]);

impl SelectorChain {
    pub fn first_text(&self, document: &Html) -> Option<String> {
        self.0
            .iter()
            .filter_map(|selector| select_first(document, selector))
            .map(|element| element_text(&element))
            .find(|text| !text.is_empty())
    }

    /// Same probing against a live page; stops at the first page error
    pub async fn first_text_on(&self, page: &dyn Page) -> Result<Option<String>, PageError> {
        for selector in self.0 {
            if let Some(text) = page.query_text(selector).await? {
                let text = text.trim();
                if !text.is_empty() {
                    return Ok(Some(text.to_string()));
                }
            }
        }
        Ok(None)
    }
}

/// Scrape a page snapshot into a metadata record. Never fails: every field degrades
/// to its fallback on its own.
pub fn extract_video_data(snapshot: &PageSnapshot) -> VideoMetadata {
    extract_video_data_at(snapshot, Utc::now())
}

pub fn extract_video_data_at(snapshot: &PageSnapshot, now: DateTime<Utc>) -> VideoMetadata {
    let document = Html::parse_document(&snapshot.html);

    let title = clean_title(&document_title(&document));
    let description = truncate_description(&DESCRIPTION.first_text(&document).unwrap_or_default());

    let thumbnail_url = select_first(&document, THUMBNAIL_META)
        .and_then(|meta| meta.value().attr("content"))
        .unwrap_or_default()
        .to_string();

    VideoMetadata {
        title: if title.is_empty() {
            NO_TITLE.to_string()
        } else {
            title
        },
        description: if description.is_empty() {
            NO_DESCRIPTION.to_string()
        } else {
            description
        },
        url: snapshot.url.clone(),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        is_short: is_short_url(&snapshot.url),
        duration: DURATION.first_text(&document).unwrap_or_default(),
        view_count: VIEW_COUNT.first_text(&document).unwrap_or_default(),
        upload_date: UPLOAD_DATE.first_text(&document).unwrap_or_default(),
        hashtags: collect_hashtags(&document),
        comments_enabled: select_first(&document, COMMENTS_DISABLED).is_none(),
        thumbnail_url,
        has_transcript: false,
        video_id: None,
        channel_name: None,
    }
}

/// `<title>` text with whitespace collapsed the way `document.title` reports it
fn document_title(document: &Html) -> String {
    select_first(document, "title")
        .map(|title| {
            element_text(&title)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

pub fn clean_title(raw: &str) -> String {
    match raw.strip_suffix(TITLE_SUFFIX) {
        Some(title) => title.trim().to_string(),
        None => raw.to_string(),
    }
}

pub fn truncate_description(text: &str) -> String {
    text.chars().take(DESCRIPTION_LIMIT).collect()
}

pub fn is_short_url(url: &str) -> bool {
    url.contains("/shorts/")
}

fn collect_hashtags(document: &Html) -> Vec<String> {
    let mut hashtags: Vec<String> = Vec::new();
    for link in select_all(document, HASHTAG_LINKS) {
        let hashtag = element_text(&link).trim().to_string();
        if !hashtag.is_empty() && !hashtags.contains(&hashtag) {
            hashtags.push(hashtag);
        }
    }
    hashtags
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot(url: &str, html: &str) -> PageSnapshot {
        PageSnapshot {
            url: url.to_string(),
            html: html.to_string(),
        }
    }

    const WATCH_PAGE: &str = r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Hip Tips - YouTube</title>
            <meta property="og:image" content="https://i.ytimg.com/vi/abc123/maxresdefault.jpg">
        </head>
        <body>
            <div id="description-inner">Five things to do after a hip injection.</div>
            <span class="ytp-time-duration">4:20</span>
            <ytd-video-view-count-renderer><span class="view-count">1,234 views</span></ytd-video-view-count-renderer>
            <div id="info-strings"><yt-formatted-string>Mar 3, 2024</yt-formatted-string></div>
            <a class="yt-simple-endpoint" href="/hashtag/a"> #a </a>
            <a class="yt-simple-endpoint" href="/hashtag/b">#b</a>
            <a class="yt-simple-endpoint" href="/hashtag/a">#a</a>
            <a class="yt-simple-endpoint" href="/watch?v=other">#notatag</a>
        </body>
        </html>
    "#;

    #[test]
    fn extracts_every_field_from_a_watch_page() {
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).unwrap();
        let data = extract_video_data_at(
            &snapshot("https://www.youtube.com/watch?v=abc123", WATCH_PAGE),
            now,
        );

        assert_eq!(data.title, "Hip Tips");
        assert_eq!(data.description, "Five things to do after a hip injection.");
        assert_eq!(data.url, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(data.timestamp, "2024-03-04T05:06:07.000Z");
        assert!(!data.is_short);
        assert_eq!(data.duration, "4:20");
        assert_eq!(data.view_count, "1,234 views");
        assert_eq!(data.upload_date, "Mar 3, 2024");
        assert_eq!(data.hashtags, vec!["#a".to_string(), "#b".to_string()]);
        assert!(data.comments_enabled);
        assert_eq!(
            data.thumbnail_url,
            "https://i.ytimg.com/vi/abc123/maxresdefault.jpg"
        );
        assert!(!data.has_transcript);
        assert_eq!(data.video_id, None);
        assert_eq!(data.channel_name, None);
    }

    #[test]
    fn bare_page_degrades_to_fallbacks() {
        let data = extract_video_data(&snapshot(
            "https://www.youtube.com/shorts/xyz",
            "<html><head></head><body></body></html>",
        ));

        assert_eq!(data.title, NO_TITLE);
        assert_eq!(data.description, NO_DESCRIPTION);
        assert!(data.is_short);
        assert_eq!(data.duration, "");
        assert_eq!(data.view_count, "");
        assert_eq!(data.upload_date, "");
        assert!(data.hashtags.is_empty());
        assert!(data.comments_enabled);
        assert_eq!(data.thumbnail_url, "");
        assert!(!data.timestamp.is_empty());
    }

    #[test]
    fn comments_placeholder_disables_comments() {
        let data = extract_video_data(&snapshot(
            "https://www.youtube.com/watch?v=abc",
            "<html><body><ytd-message-renderer>Comments are turned off.</ytd-message-renderer></body></html>",
        ));
        assert!(!data.comments_enabled);
    }

    #[test]
    fn description_chain_skips_empty_candidates() {
        let html = r#"
            <html><body>
                <div id="description-inner"></div>
                <ytd-video-secondary-info-renderer><div id="description">Second choice</div></ytd-video-secondary-info-renderer>
            </body></html>
        "#;
        let document = Html::parse_document(html);
        assert_eq!(DESCRIPTION.first_text(&document).as_deref(), Some("Second choice"));
    }

    #[test]
    fn strips_site_suffix_from_title() {
        assert_eq!(clean_title("My Video - YouTube"), "My Video");
        assert_eq!(clean_title("My Video"), "My Video");
    }

    #[test]
    fn truncates_long_descriptions_only() {
        let long = "x".repeat(600);
        assert_eq!(truncate_description(&long).chars().count(), 500);

        let short = "0123456789";
        assert_eq!(truncate_description(short), short);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let long = "é".repeat(501);
        assert_eq!(truncate_description(&long), "é".repeat(500));
    }

    #[test]
    fn shorts_detection_follows_url_path() {
        assert!(is_short_url("https://www.youtube.com/shorts/abc"));
        assert!(!is_short_url("https://www.youtube.com/watch?v=abc"));
    }
}
