#[deny(clippy::all)]
use browser::PageOpener;
use dotenv::dotenv;
use poem::{
    listener::TcpListener,
    middleware::{Cors, Tracing},
    EndpointExt, Route, Server,
};
use poem_openapi::OpenApiService;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use utils::{connect, BasicAuth, Config};

mod bridge;
mod browser;
mod caption;
mod health;
mod settings;
mod utils;
mod video;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenv().ok(); // This line loads the environment variables from the ".env" file.
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("RUST_LOG"))
        .init();

    let config = Config::from_env()?;
    let pool = connect(&config.database_url).await?;

    let (opener, driver) =
        browser::selenium(&config.chrome_driver_endpoint, config.page_settle).await?;
    let opener: Arc<dyn PageOpener> = Arc::new(opener);

    let caption_api = caption::caption_api(
        opener.clone(),
        config.completion.clone(),
        config.api_key.clone(),
        config.bridge_timeout,
    )
    .await;
    let settings_api = settings::settings_api(config.api_key.clone()).await;
    let health_api = health::health_checks(pool.clone(), opener.clone()).await;

    let api_service = OpenApiService::new(
        (caption_api, settings_api, health_api),
        "CaptionKit",
        "1.0",
    )
    .server(format!("{}/api/v1", config.host));
    let ui = api_service.swagger_ui().with(BasicAuth::new(
        config.basic_auth_username.clone(),
        config.basic_auth_password.clone(),
    ));
    let spec = api_service.spec_endpoint_yaml().with(BasicAuth::new(
        config.basic_auth_username.clone(),
        config.basic_auth_password.clone(),
    ));

    let route = Route::new()
        .nest("/api/v1", api_service)
        .nest("/swagger", ui)
        .nest("/swagger/spec", spec)
        .with(Cors::new())
        .with(Tracing)
        .data(pool.clone());

    info!(port = %config.port, "Starting server");
    Server::new(TcpListener::bind(format!("0.0.0.0:{}", config.port)))
        .run_with_graceful_shutdown(
            route,
            async move {
                let _ = tokio::signal::ctrl_c().await;
                pool.close().await;
                _ = driver.quit().await;
            },
            Some(Duration::from_secs(5)),
        )
        .await?;

    Ok(())
}
