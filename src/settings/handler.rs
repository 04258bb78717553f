use super::store::ApiKeyStore;
use crate::utils::{verify_apikey, ApiTags, MyResponse, ResponseObject};
use poem::{web::Data, Request};
use poem_openapi::{payload::Json, Object, OpenApi};
use sqlx::SqlitePool;
use tracing::{error, info};

/// Completion API key as edited by the user
#[derive(Debug, Object, Clone)]
#[oai(rename_all = "camelCase")]
pub struct ApiKeySetting {
    /// OpenAI API key (empty when cleared)
    pub api_key: String,
}

pub struct SettingsApi {
    service_key: String,
}

#[OpenApi(
    prefix_path = "/settings/",
    request_header(name = "API-Key", ty = "String", description = "Private API Key"),
    tag = "ApiTags::Settings"
)]
impl SettingsApi {
    pub fn new(service_key: String) -> Self {
        Self { service_key }
    }

    /// Read the stored completion API key
    #[oai(path = "/api-key", method = "get", operation_id = "settings::get_api_key")]
    async fn get_api_key(&self, req: &Request, pool: Data<&SqlitePool>) -> MyResponse<ApiKeySetting> {
        if let Err(e) = verify_apikey(req, &self.service_key) {
            return ResponseObject::unauthorized(e);
        }

        match ApiKeyStore::new(pool.0.clone()).load().await {
            Ok(key) => ResponseObject::ok(ApiKeySetting {
                api_key: key.unwrap_or_default(),
            }),
            Err(e) => {
                error!(error = %e, "Failed to load API key");
                ResponseObject::internal_server_error("Failed to load API key")
            }
        }
    }

    /// Replace the stored completion API key
    #[oai(path = "/api-key", method = "put", operation_id = "settings::put_api_key")]
    async fn put_api_key(
        &self,
        req: &Request,
        pool: Data<&SqlitePool>,
        payload: Json<ApiKeySetting>,
    ) -> MyResponse<ApiKeySetting> {
        if let Err(e) = verify_apikey(req, &self.service_key) {
            return ResponseObject::unauthorized(e);
        }

        if let Err(e) = ApiKeyStore::new(pool.0.clone()).save(&payload.api_key).await {
            error!(error = %e, "Failed to save API key");
            return ResponseObject::internal_server_error("Failed to save API key");
        }
        info!(cleared = payload.api_key.is_empty(), "API key updated");

        ResponseObject::ok(payload.0)
    }
}
