use config::{Config, ConfigError, File};
use serde::Deserialize;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:3000";

#[derive(Debug, Deserialize)]
pub struct Server {
    pub listen: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: Server,
    /// Taken from `USER`, annotates log lines only.
    #[serde(default)]
    pub user: String,
}

impl Settings {
    /// Loads settings from `path` when it exists, falling back to defaults.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.listen", DEFAULT_LISTEN)?
            .add_source(File::with_name(path).required(false))
            .set_override("user", std::env::var("USER").unwrap_or_default())?
            .build()?;

        config.try_deserialize()
    }
}
