use crate::{browser::PageOpener, utils::ApiTags};
use poem::{error::InternalServerError, http::StatusCode, Error, Result};
use poem_openapi::{payload::PlainText, OpenApi};
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct HealthCheck {
    pool: SqlitePool,
    opener: Arc<dyn PageOpener>,
}

#[OpenApi(prefix_path = "/health/", tag = "ApiTags::HealthCheck")]
impl HealthCheck {
    pub fn new(pool: SqlitePool, opener: Arc<dyn PageOpener>) -> Self {
        Self { pool, opener }
    }

    #[oai(path = "/liveness", method = "get")]
    async fn liveness(&self) -> PlainText<String> {
        PlainText("OK".to_string())
    }
    #[oai(path = "/readiness", method = "get")]
    async fn readiness(&self) -> Result<PlainText<String>> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(InternalServerError)?;

        if let Err(err) = self.opener.health().await {
            return Err(Error::from_string(
                err.to_string(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }

        Ok(PlainText("OK".to_string()))
    }
}
