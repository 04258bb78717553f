use crate::browser::Page;
use crate::video::VideoMetadata;
use std::{sync::Arc, time::Duration};

mod model;
mod requester;
mod responder;

pub use model::BridgeError;
use requester::VideoDataRequester;
use responder::spawn_responder;

/// One round trip against a freshly opened page: the responder lives only as long as
/// this call.
pub async fn fetch_video_data(
    page: Box<dyn Page>,
    tab_url: &str,
    timeout: Duration,
) -> Result<VideoMetadata, BridgeError> {
    let page: Arc<dyn Page> = Arc::from(page);
    let bridge = spawn_responder(page.clone());
    let requester = VideoDataRequester::new(bridge, page, timeout);
    requester.request_video_data(tab_url).await
}
