use super::model::{AttributeLookup, PageError, PageSnapshot};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::sync::Mutex;

/// Read-only view of a page the service does not control.
///
/// Every query is allowed to miss: a selector that matches nothing is `Ok(None)`
/// (or [`AttributeLookup::NoElement`]), never an error. Errors are reserved for the
/// page itself being unreachable.
#[async_trait]
pub trait Page: Send + Sync {
    async fn current_url(&self) -> Result<String, PageError>;

    async fn snapshot(&self) -> Result<PageSnapshot, PageError>;

    /// Text of the first element matching `selector`
    async fn query_text(&self, selector: &str) -> Result<Option<String>, PageError>;

    async fn query_attribute(
        &self,
        selector: &str,
        name: &str,
    ) -> Result<AttributeLookup, PageError>;
}

/// Opens a page for a tab URL, the way a browser tab would load it
#[async_trait]
pub trait PageOpener: Send + Sync {
    async fn open(&self, url: &str) -> Result<Box<dyn Page>, PageError>;

    /// Whatever renders the pages is up and answering
    async fn health(&self) -> Result<(), PageError> {
        Ok(())
    }
}

/// A page backed by an already rendered HTML document, parsed once up front
#[derive(Debug)]
pub struct StaticPage {
    url: String,
    html: String,
    document: Mutex<Html>,
}

impl StaticPage {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        let html = html.into();
        let document = Mutex::new(Html::parse_document(&html));
        Self {
            url: url.into(),
            html,
            document,
        }
    }

    fn with_document<T>(&self, query: impl FnOnce(&Html) -> T) -> Result<T, PageError> {
        let document = self.document.lock().map_err(|_| PageError::Closed)?;
        Ok(query(&document))
    }
}

#[async_trait]
impl Page for StaticPage {
    async fn current_url(&self) -> Result<String, PageError> {
        Ok(self.url.clone())
    }

    async fn snapshot(&self) -> Result<PageSnapshot, PageError> {
        Ok(PageSnapshot {
            url: self.url.clone(),
            html: self.html.clone(),
        })
    }

    async fn query_text(&self, selector: &str) -> Result<Option<String>, PageError> {
        self.with_document(|document| {
            select_first(document, selector).map(|element| element_text(&element))
        })
    }

    async fn query_attribute(
        &self,
        selector: &str,
        name: &str,
    ) -> Result<AttributeLookup, PageError> {
        self.with_document(|document| match select_first(document, selector) {
            None => AttributeLookup::NoElement,
            Some(element) => match element.value().attr(name) {
                Some(value) => AttributeLookup::Value(value.to_string()),
                None => AttributeLookup::NoAttribute,
            },
        })
    }
}

/// First element matching `selector`; an unparsable selector matches nothing
pub fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

/// All elements matching `selector` in document order
pub fn select_all<'a>(document: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Concatenated text content of an element and its descendants
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <html>
        <head><title>Clip - YouTube</title></head>
        <body>
            <button class="ytp-subtitles-button" aria-pressed="false">CC</button>
            <div id="owner"><span id="channel-name"><a href="/@x"> Dr. X </a></span></div>
        </body>
        </html>
    "#;

    #[tokio::test]
    async fn query_text_returns_first_match() {
        let page = StaticPage::new("https://www.youtube.com/watch?v=abc", HTML);
        let text = page.query_text("#owner #channel-name a").await.unwrap();
        assert_eq!(text.as_deref(), Some(" Dr. X "));
        assert_eq!(page.query_text("#missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn query_attribute_distinguishes_missing_element_and_attribute() {
        let page = StaticPage::new("https://www.youtube.com/watch?v=abc", HTML);
        assert_eq!(
            page.query_attribute(".ytp-subtitles-button", "aria-pressed")
                .await
                .unwrap(),
            AttributeLookup::Value("false".to_string())
        );
        assert_eq!(
            page.query_attribute(".ytp-subtitles-button", "aria-label")
                .await
                .unwrap(),
            AttributeLookup::NoAttribute
        );
        assert_eq!(
            page.query_attribute(".nope", "aria-pressed").await.unwrap(),
            AttributeLookup::NoElement
        );
    }

    #[tokio::test]
    async fn repeated_queries_share_one_parsed_document() {
        let page = StaticPage::new("https://www.youtube.com/watch?v=abc", HTML);

        for _ in 0..3 {
            assert_eq!(
                page.query_text("title").await.unwrap().as_deref(),
                Some("Clip - YouTube")
            );
        }
        assert_eq!(page.snapshot().await.unwrap().html, HTML);
    }

    #[test]
    fn static_page_can_cross_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StaticPage>();
    }

    #[test]
    fn invalid_selector_matches_nothing() {
        let document = Html::parse_document(HTML);
        assert!(select_first(&document, "a[[").is_none());
        assert!(select_all(&document, "a[[").is_empty());
    }
}
