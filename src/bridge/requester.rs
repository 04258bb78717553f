use super::model::{BridgeError, BridgeRequest, BridgeResponse};
use super::responder::BridgeHandle;
use crate::browser::Page;
use crate::video::{extract_video_id, find_channel_name, VideoMetadata};
use std::{sync::Arc, time::Duration};
use tracing::debug;

/// Requesting side: asks the page for its metadata, then fills in what only the
/// requester knows (the tab URL) or looks up separately (the channel name).
pub struct VideoDataRequester {
    bridge: BridgeHandle,
    page: Arc<dyn Page>,
    timeout: Duration,
}

impl VideoDataRequester {
    pub fn new(bridge: BridgeHandle, page: Arc<dyn Page>, timeout: Duration) -> Self {
        Self {
            bridge,
            page,
            timeout,
        }
    }

    pub async fn request_video_data(&self, tab_url: &str) -> Result<VideoMetadata, BridgeError> {
        let response =
            match tokio::time::timeout(self.timeout, self.bridge.send(BridgeRequest::GetVideoData))
                .await
            {
                Ok(response) => response?,
                Err(_) => {
                    return Err(BridgeError::Transport(format!(
                        "no reply within {}s",
                        self.timeout.as_secs_f32()
                    )))
                }
            };

        let mut data = match response {
            BridgeResponse {
                success: true,
                data: Some(data),
                ..
            } => data,
            BridgeResponse { success: true, .. } => return Err(BridgeError::EmptyResponse),
            BridgeResponse { error, .. } => {
                return Err(BridgeError::Extraction(
                    error.unwrap_or_else(|| "unknown extraction error".to_string()),
                ))
            }
        };

        data.video_id = extract_video_id(tab_url);
        if let Some(channel_name) = find_channel_name(self.page.as_ref()).await {
            data.channel_name = Some(channel_name);
        }
        debug!(video_id = ?data.video_id, channel_name = ?data.channel_name, "Video data augmented");

        Ok(data)
    }
}
