use super::client::{CaptionError, CompletionClient};
use super::model::{Caption, GenerateRequest, PromptRequest, SnapshotRequest};
use super::prompt::build_prompt;
use super::session::{PopupSession, SessionError};
use crate::bridge::fetch_video_data;
use crate::browser::{PageOpener, StaticPage};
use crate::settings::ApiKeyStore;
use crate::utils::{verify_apikey, ApiTags, MyResponse, ResponseObject};
use crate::video::VideoMetadata;
use poem::{web::Data, Request};
use poem_openapi::{param::Query, payload::Json, OpenApi};
use sqlx::SqlitePool;
use std::{sync::Arc, time::Duration};
use tracing::error;

pub struct CaptionApi {
    opener: Arc<dyn PageOpener>,
    client: CompletionClient,
    service_key: String,
    bridge_timeout: Duration,
}

fn session_failure<T>(err: SessionError) -> MyResponse<T>
where
    T: poem_openapi::types::ParseFromJSON + poem_openapi::types::ToJSON + Send + Sync,
{
    match err {
        SessionError::NotAVideoPage
        | SessionError::NoVideo
        | SessionError::Caption(CaptionError::MissingApiKey) => ResponseObject::bad_request(err),
        SessionError::Page(_)
        | SessionError::Bridge(_)
        | SessionError::Caption(CaptionError::Upstream(_))
        | SessionError::Caption(CaptionError::Request(_))
        | SessionError::Caption(CaptionError::InvalidResponse) => ResponseObject::bad_gateway(err),
    }
}

#[OpenApi(
    request_header(name = "API-Key", ty = "String", description = "Private API Key"),
    tag = "ApiTags::Caption"
)]
impl CaptionApi {
    pub fn new(
        opener: Arc<dyn PageOpener>,
        client: CompletionClient,
        service_key: String,
        bridge_timeout: Duration,
    ) -> Self {
        Self {
            opener,
            client,
            service_key,
            bridge_timeout,
        }
    }

    /// Scrape metadata from a YouTube watch or Shorts page
    #[oai(
        path = "/video",
        method = "get",
        tag = "ApiTags::Video",
        operation_id = "video::get_video_data"
    )]
    async fn get_video_data(
        &self,
        req: &Request,
        /// YouTube watch or Shorts URL
        url: Query<String>,
    ) -> MyResponse<VideoMetadata> {
        if let Err(e) = verify_apikey(req, &self.service_key) {
            return ResponseObject::unauthorized(e);
        }

        let mut session = PopupSession::default();
        if let Err(e) = session
            .load_video_data(self.opener.as_ref(), &url.0, self.bridge_timeout)
            .await
        {
            return session_failure(e);
        }

        match session.into_video_data() {
            Some(data) => ResponseObject::ok(data),
            None => ResponseObject::internal_server_error("Video data was not loaded"),
        }
    }

    /// Scrape metadata from a document the caller already rendered
    #[oai(
        path = "/video/snapshot",
        method = "post",
        tag = "ApiTags::Video",
        operation_id = "video::scrape_snapshot"
    )]
    async fn scrape_snapshot(
        &self,
        req: &Request,
        payload: Json<SnapshotRequest>,
    ) -> MyResponse<VideoMetadata> {
        if let Err(e) = verify_apikey(req, &self.service_key) {
            return ResponseObject::unauthorized(e);
        }

        let SnapshotRequest { url, html } = payload.0;
        let page = Box::new(StaticPage::new(url.clone(), html));
        match fetch_video_data(page, &url, self.bridge_timeout).await {
            Ok(data) => ResponseObject::ok(data),
            Err(e) => {
                error!(url = %url, error = %e, "Failed to scrape snapshot");
                ResponseObject::bad_gateway(format!("Error loading video data: {}", e))
            }
        }
    }

    /// Preview the prompt that would be sent for a video
    #[oai(path = "/caption/prompt", method = "post", operation_id = "caption::prompt")]
    async fn prompt(&self, req: &Request, payload: Json<PromptRequest>) -> MyResponse<String> {
        if let Err(e) = verify_apikey(req, &self.service_key) {
            return ResponseObject::unauthorized(e);
        }

        ResponseObject::ok(build_prompt(payload.platform, &payload.video))
    }

    /// Generate a caption with the stored API key
    #[oai(path = "/caption", method = "post", operation_id = "caption::generate")]
    async fn generate(
        &self,
        req: &Request,
        pool: Data<&SqlitePool>,
        payload: Json<GenerateRequest>,
    ) -> MyResponse<Caption> {
        if let Err(e) = verify_apikey(req, &self.service_key) {
            return ResponseObject::unauthorized(e);
        }

        let api_key = match ApiKeyStore::new(pool.0.clone()).load().await {
            Ok(key) => key.unwrap_or_default(),
            Err(e) => {
                error!(error = %e, "Failed to load API key");
                return ResponseObject::internal_server_error("Failed to load API key");
            }
        };

        let GenerateRequest {
            platform,
            url,
            video,
        } = payload.0;

        let mut session = PopupSession::default();
        session.select_platform(platform);
        let platform = session.selected_platform();
        match (video, url) {
            (Some(video), _) => session.set_video_data(video),
            (None, Some(url)) => {
                if api_key.trim().is_empty() {
                    return session_failure(CaptionError::MissingApiKey.into());
                }
                if let Err(e) = session
                    .load_video_data(self.opener.as_ref(), &url, self.bridge_timeout)
                    .await
                {
                    return session_failure(e);
                }
            }
            (None, None) => {}
        }

        let caption = match session.generate_caption(&api_key, &self.client).await {
            Ok(caption) => caption,
            Err(e) => {
                error!(platform = ?platform, error = %e, "Failed to generate caption");
                return session_failure(e);
            }
        };

        match session.into_video_data() {
            Some(video) => ResponseObject::ok(Caption {
                platform,
                caption,
                video,
            }),
            None => ResponseObject::internal_server_error("Video data was not loaded"),
        }
    }
}
