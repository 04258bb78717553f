use crate::caption::CompletionSettings;
use color_eyre::eyre::{eyre, WrapErr};
use poem::{
    http::StatusCode,
    web::headers::authorization::Basic,
    web::headers::{self, HeaderMapExt},
    Endpoint, Error as PoemError, Middleware, Request, Response, Result as PoemResult,
};
use poem_openapi::{
    error::ParseRequestPayloadError,
    payload::Json,
    types::{ParseFromJSON, ToJSON},
    {ApiResponse, Object, Tags},
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::{env, fmt::Display, str::FromStr, time::Duration};

#[derive(Tags)]
pub enum ApiTags {
    /// Video metadata extraction
    Video,
    /// Caption generation
    Caption,
    /// Persisted settings
    Settings,
    /// Health check endpoints
    HealthCheck,
}

/// Service configuration, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: String,
    /// Value expected in the `API-Key` header
    pub api_key: String,
    pub basic_auth_username: String,
    pub basic_auth_password: String,
    pub database_url: String,
    pub chrome_driver_endpoint: String,
    /// Delay after navigation before the page is read
    pub page_settle: Duration,
    /// How long the requester waits for the page to reply
    pub bridge_timeout: Duration,
    pub completion: CompletionSettings,
}

impl Config {
    pub fn from_env() -> color_eyre::Result<Self> {
        let defaults = CompletionSettings::default();

        Ok(Self {
            host: required("HOST")?,
            port: env::var("PORT").unwrap_or("3000".to_string()),
            api_key: required("API_KEY")?,
            basic_auth_username: required("BASIC_AUTH_USERNAME")?,
            basic_auth_password: required("BASIC_AUTH_PASSWORD")?,
            database_url: env::var("DATABASE_URL").unwrap_or("sqlite:captionkit.db".to_string()),
            chrome_driver_endpoint: env::var("CHROME_DRIVER_ENDPOINT")
                .unwrap_or("http://localhost:9515".to_string()),
            page_settle: Duration::from_millis(parsed("PAGE_SETTLE_MS", 500)?),
            bridge_timeout: Duration::from_secs(parsed("BRIDGE_TIMEOUT_SECS", 10)?),
            completion: CompletionSettings {
                base_url: env::var("OPENAI_API_BASE").unwrap_or(defaults.base_url),
                model: env::var("OPENAI_MODEL").unwrap_or(defaults.model),
                ..defaults
            },
        })
    }
}

fn required(name: &str) -> color_eyre::Result<String> {
    env::var(name).wrap_err_with(|| format!("{} must be set", name))
}

fn parsed<T>(name: &str, default: T) -> color_eyre::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|e| eyre!("{} is invalid: {}", name, e)),
        Err(_) => Ok(default),
    }
}

/// Open the SQLite database and bring its schema up to date
pub async fn connect(database_url: &str) -> color_eyre::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .wrap_err_with(|| format!("Invalid DATABASE_URL {}", database_url))?
        .create_if_missing(true);

    // an in-memory database lives and dies with its only connection
    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .wrap_err("Failed to connect to SQLite")?;
    sqlx::migrate!()
        .run(&pool)
        .await
        .wrap_err("Failed to run migrations")?;
    Ok(pool)
}

#[derive(Object)]
pub struct ResponseObject<T: ParseFromJSON + ToJSON + Send + Sync> {
    data: Option<T>,
    error: Option<String>,
}

impl<T: ParseFromJSON + ToJSON + Send + Sync> ResponseObject<T> {
    pub fn ok(data: T) -> MyResponse<T> {
        MyResponse::Ok(Json(ResponseObject {
            data: Some(data),
            error: None,
        }))
    }

    pub fn bad_request(error: impl ToString) -> MyResponse<T> {
        MyResponse::BadRequest(Json(ResponseObject {
            data: None,
            error: Some(error.to_string()),
        }))
    }

    pub fn unauthorized(error: impl ToString) -> MyResponse<T> {
        MyResponse::Unauthorized(Json(ResponseObject {
            data: None,
            error: Some(error.to_string()),
        }))
    }

    pub fn internal_server_error(error: impl ToString) -> MyResponse<T> {
        MyResponse::InternalServerError(Json(ResponseObject {
            data: None,
            error: Some(error.to_string()),
        }))
    }

    pub fn bad_gateway(error: impl ToString) -> MyResponse<T> {
        MyResponse::BadGateway(Json(ResponseObject {
            data: None,
            error: Some(error.to_string()),
        }))
    }
}

#[derive(ApiResponse)]
#[oai(bad_request_handler = "bad_request_handler")]
pub enum MyResponse<T: ParseFromJSON + ToJSON + Send + Sync> {
    #[oai(status = 200)]
    Ok(Json<ResponseObject<T>>),
    #[oai(status = 400)]
    BadRequest(Json<ResponseObject<T>>),
    #[oai(status = 401)]
    Unauthorized(Json<ResponseObject<T>>),
    #[oai(status = 500)]
    InternalServerError(Json<ResponseObject<T>>),
    #[oai(status = 502)]
    BadGateway(Json<ResponseObject<T>>),
}

fn bad_request_handler<T: ParseFromJSON + ToJSON + Send + Sync>(err: PoemError) -> MyResponse<T> {
    if err.is::<ParseRequestPayloadError>() {
        MyResponse::BadRequest(Json(ResponseObject {
            data: None,
            error: Some(err.to_string()),
        }))
    } else {
        MyResponse::InternalServerError(Json(ResponseObject {
            data: None,
            error: Some(err.to_string()),
        }))
    }
}

pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        BasicAuth {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl<E: Endpoint> Middleware<E> for BasicAuth {
    type Output = BasicAuthEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        BasicAuthEndpoint {
            ep,
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

pub struct BasicAuthEndpoint<E> {
    ep: E,
    username: String,
    password: String,
}

impl<E: Endpoint> Endpoint for BasicAuthEndpoint<E> {
    type Output = E::Output;

    async fn call(&self, req: Request) -> PoemResult<Self::Output> {
        if let Some(auth) = req.headers().typed_get::<headers::Authorization<Basic>>() {
            if auth.0.username() == self.username && auth.0.password() == self.password {
                return self.ep.call(req).await;
            }
        }

        let res = Response::builder()
            .header("WWW-Authenticate", "Basic")
            .status(StatusCode::UNAUTHORIZED)
            .body(());

        Err(PoemError::from_response(res))
    }
}

pub fn verify_apikey(req: &Request, expected: &str) -> Result<(), String> {
    let api_key = match req.header("API-Key") {
        Some(key) => key,
        None => {
            return Err("API-Key header is missing".to_string());
        }
    };
    if expected != api_key {
        return Err("Invalid API-Key".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use poem::{handler, test::TestClient, EndpointExt, Route};

    #[handler]
    fn secret() -> &'static str {
        "secret"
    }

    #[tokio::test]
    async fn basic_auth_guards_endpoint() {
        let app = Route::new()
            .at("/", secret)
            .with(BasicAuth::new("admin", "hunter2"));
        let cli = TestClient::new(app);

        cli.get("/").send().await.assert_status(StatusCode::UNAUTHORIZED);

        cli.get("/")
            .typed_header(headers::Authorization::basic("admin", "hunter2"))
            .send()
            .await
            .assert_text("secret")
            .await;
    }

    #[test]
    fn api_key_header_is_checked() {
        let missing = Request::builder().finish();
        assert_eq!(
            verify_apikey(&missing, "k"),
            Err("API-Key header is missing".to_string())
        );

        let wrong = Request::builder().header("API-Key", "nope").finish();
        assert_eq!(verify_apikey(&wrong, "k"), Err("Invalid API-Key".to_string()));

        let right = Request::builder().header("API-Key", "k").finish();
        assert_eq!(verify_apikey(&right, "k"), Ok(()));
    }

    #[tokio::test]
    async fn in_memory_database_is_migrated() {
        let pool = connect("sqlite::memory:").await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM settings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
