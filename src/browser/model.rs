use thiserror::Error;

/// Rendered document of a page at one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    /// URL the document was loaded from
    pub url: String,
    /// Serialized DOM
    pub html: String,
}

/// Outcome of looking up an attribute on the first element matching a selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeLookup {
    NoElement,
    NoAttribute,
    Value(String),
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("webdriver error: {0}")]
    Driver(String),
    #[error("failed to navigate to {url}: {message}")]
    Navigation { url: String, message: String },
    #[error("page is no longer available")]
    Closed,
}

impl From<thirtyfour::error::WebDriverError> for PageError {
    fn from(err: thirtyfour::error::WebDriverError) -> Self {
        use thirtyfour::error::WebDriverError;

        match err {
            // the tab or the whole session went away under us
            WebDriverError::NoSuchWindow(_) | WebDriverError::InvalidSessionId(_) => {
                PageError::Closed
            }
            err => PageError::Driver(err.to_string()),
        }
    }
}
