use crate::browser::PageOpener;
use sqlx::SqlitePool;
use std::sync::Arc;

pub mod handler;

pub async fn health_checks(pool: SqlitePool, opener: Arc<dyn PageOpener>) -> handler::HealthCheck {
    handler::HealthCheck::new(pool, opener)
}
