use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub store_path: String,
    pub catalog_path: String,
    pub server_host: String,
    pub server_port: u16,
    /// Single operator account allowed to use the admin surface.
    pub operator_id: i64,
    pub chat_api_url: String,
    pub chat_api_token: String,
    /// Start with content calls short-circuited to "unavailable".
    pub maintenance_on_start: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("ARCANA"))
            .set_default("store_path", "data/store.json")?
            .set_default("catalog_path", "data/catalog.json")?
            .set_default("server_host", "0.0.0.0")?
            .set_default("server_port", 8080)?
            .set_default("chat_api_url", "https://api.example.com/bot")?
            .set_default("chat_api_token", "")?
            .set_default("maintenance_on_start", false)?
            .build()?;

        config.try_deserialize()
    }
}
