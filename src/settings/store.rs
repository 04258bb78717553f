use chrono::Utc;
use sqlx::SqlitePool;

const OPENAI_API_KEY: &str = "openaiApiKey";

/// The one persisted setting: the completion API key. Writes are last-write-wins.
#[derive(Clone)]
pub struct ApiKeyStore {
    pool: SqlitePool,
}

impl ApiKeyStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn load(&self) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = $1")
            .bind(OPENAI_API_KEY)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn save(&self, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO settings (key, value, updated_at) VALUES ($1, $2, $3)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(OPENAI_API_KEY)
        .bind(value)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
