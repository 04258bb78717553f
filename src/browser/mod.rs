use color_eyre::eyre::WrapErr;
use std::time::Duration;
use thirtyfour::{DesiredCapabilities, WebDriver};
use tracing::info;

mod driver;
mod model;
mod page;

pub use driver::BrowserOpener;
pub use model::{AttributeLookup, PageError, PageSnapshot};
pub use page::{element_text, select_all, select_first, Page, PageOpener, StaticPage};

pub async fn selenium(
    endpoint: &str,
    settle: Duration,
) -> color_eyre::Result<(BrowserOpener, WebDriver)> {
    let caps = DesiredCapabilities::chrome();

    let web_driver = WebDriver::new(endpoint, caps)
        .await
        .wrap_err_with(|| format!("Failed to create session at {}", endpoint))?;
    info!(endpoint = %endpoint, "WebDriver session created");

    let opener = BrowserOpener::new(web_driver.clone(), settle);

    Ok((opener, web_driver))
}
