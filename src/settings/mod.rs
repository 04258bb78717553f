mod handler;
mod store;

pub use store::ApiKeyStore;

pub async fn settings_api(service_key: String) -> handler::SettingsApi {
    handler::SettingsApi::new(service_key)
}
