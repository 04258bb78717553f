use super::model::{AttributeLookup, PageError, PageSnapshot};
use super::page::{Page, PageOpener};
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use thirtyfour::prelude::*;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error};

/// Opens pages in the single shared WebDriver session.
///
/// The session is one browser tab, so a page holds the session lock for as long as
/// it is alive and concurrent requests queue behind it.
#[derive(Clone)]
pub struct BrowserOpener {
    driver: Arc<Mutex<WebDriver>>,
    settle: Duration,
}

impl BrowserOpener {
    pub fn new(driver: WebDriver, settle: Duration) -> Self {
        Self {
            driver: Arc::new(Mutex::new(driver)),
            settle,
        }
    }
}

#[async_trait]
impl PageOpener for BrowserOpener {
    async fn open(&self, url: &str) -> Result<Box<dyn Page>, PageError> {
        let driver = self.driver.clone().lock_owned().await;

        if let Err(e) = driver.goto(url.to_string()).await {
            error!(url = %url, error = %e, "Failed to navigate to URL");
            return Err(PageError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            });
        }

        // Wait for page to be loaded.
        if let Err(e) = driver.find(By::Tag("title")).await {
            debug!(url = %url, error = %e, "Document has no title yet");
        }
        tokio::time::sleep(self.settle).await;

        Ok(Box::new(BrowserPage { driver }))
    }

    async fn health(&self) -> Result<(), PageError> {
        // a page holding the session proves the driver is answering
        let driver = match self.driver.try_lock() {
            Ok(driver) => driver,
            Err(_) => return Ok(()),
        };
        let status = driver.status().await?;
        if !status.ready {
            return Err(PageError::Driver(status.message));
        }
        Ok(())
    }
}

/// A live page in the WebDriver session
pub struct BrowserPage {
    driver: OwnedMutexGuard<WebDriver>,
}

#[async_trait]
impl Page for BrowserPage {
    async fn current_url(&self) -> Result<String, PageError> {
        Ok(self.driver.current_url().await?.to_string())
    }

    async fn snapshot(&self) -> Result<PageSnapshot, PageError> {
        let url = self.current_url().await?;
        let html = self.driver.source().await?;
        Ok(PageSnapshot { url, html })
    }

    async fn query_text(&self, selector: &str) -> Result<Option<String>, PageError> {
        let elements = self.driver.find_all(By::Css(selector)).await?;
        match elements.first() {
            Some(element) => Ok(Some(element.text().await?)),
            None => Ok(None),
        }
    }

    async fn query_attribute(
        &self,
        selector: &str,
        name: &str,
    ) -> Result<AttributeLookup, PageError> {
        let elements = self.driver.find_all(By::Css(selector)).await?;
        let element = match elements.first() {
            Some(element) => element,
            None => return Ok(AttributeLookup::NoElement),
        };
        Ok(match element.attr(name).await? {
            Some(value) => AttributeLookup::Value(value),
            None => AttributeLookup::NoAttribute,
        })
    }
}
