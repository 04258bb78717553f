use super::model::{BridgeError, BridgeRequest, BridgeResponse};
use crate::browser::Page;
use crate::video::{check_transcript_availability, extract_video_data, VideoMetadata};
use std::{
    any::Any,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

pub(crate) type Envelope = (BridgeRequest, oneshot::Sender<BridgeResponse>);

/// Sending side of the bridge. Dropping every handle stops the responder.
#[derive(Clone)]
pub struct BridgeHandle {
    sender: mpsc::Sender<Envelope>,
}

impl BridgeHandle {
    #[cfg(test)]
    pub(crate) fn from_sender(sender: mpsc::Sender<Envelope>) -> Self {
        Self { sender }
    }

    /// Send one request and wait for its reply
    pub async fn send(&self, request: BridgeRequest) -> Result<BridgeResponse, BridgeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send((request, reply_tx))
            .await
            .map_err(|_| BridgeError::Transport("no responder is listening".to_string()))?;
        reply_rx
            .await
            .map_err(|_| BridgeError::Transport("responder closed before replying".to_string()))
    }
}

/// Run the page-side responder as its own task
pub fn spawn_responder(page: Arc<dyn Page>) -> BridgeHandle {
    let (sender, mut receiver) = mpsc::channel::<Envelope>(8);

    tokio::spawn(async move {
        while let Some((request, reply)) = receiver.recv().await {
            debug!(request = ?request, "Page received message");
            let response = respond(page.as_ref(), request).await;
            if reply.send(response).is_err() {
                warn!("Requester went away before the reply was delivered");
            }
        }
        debug!("Bridge closed");
    });

    BridgeHandle { sender }
}

/// Answer one request. Always produces a reply.
pub async fn respond(page: &dyn Page, request: BridgeRequest) -> BridgeResponse {
    match request {
        BridgeRequest::GetVideoData => match get_video_data(page).await {
            Ok(data) => {
                debug!(title = %data.title, has_transcript = data.has_transcript, "Sending video data back");
                BridgeResponse::ok(data)
            }
            Err(message) => {
                error!(error = %message, "Error extracting video data");
                BridgeResponse::failed(message)
            }
        },
    }
}

async fn get_video_data(page: &dyn Page) -> Result<VideoMetadata, String> {
    let snapshot = page.snapshot().await.map_err(|e| e.to_string())?;

    // the scrape has no await point, so it finishes before the flag is attached
    let scrape = async move { catch_unwind(AssertUnwindSafe(|| extract_video_data(&snapshot))) };
    let (scraped, has_transcript) = tokio::join!(scrape, check_transcript_availability(page));

    let mut data = scraped.map_err(panic_message)?;
    data.has_transcript = has_transcript;
    Ok(data)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "video data extraction failed".to_string()
    }
}
