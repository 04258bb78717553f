use crate::browser::PageOpener;
use std::{sync::Arc, time::Duration};

mod client;
mod handler;
mod model;
mod prompt;
mod session;

pub use client::{CompletionClient, CompletionSettings};

pub async fn caption_api(
    opener: Arc<dyn PageOpener>,
    settings: CompletionSettings,
    service_key: String,
    bridge_timeout: Duration,
) -> handler::CaptionApi {
    handler::CaptionApi::new(
        opener,
        CompletionClient::new(settings),
        service_key,
        bridge_timeout,
    )
}
