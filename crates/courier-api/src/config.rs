use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub mongodb: MongoDbConfig,
    pub agent: AgentConfig,
    pub relay: RelayConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub mongodb_uri: String,
    #[serde(default)]
    pub webchat_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoDbConfig {
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    pub url: String,
    /// Upper bound on one agent call. Generous because the agent may run
    /// multi-step reasoning before answering.
    pub timeout_secs: u64,
    pub default_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Calling surface recorded in the conversation key.
    pub channel: String,
    /// Messages handed to the agent as context per turn.
    pub history_window: i64,
    /// Messages returned by the read path.
    pub history_limit: i64,
    /// Pause between reply chunks. Cosmetic pacing only; zero disables it.
    pub chunk_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (with SERVER_, MONGODB_, AGENT_, etc. prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .prefix("SERVER")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("MONGODB")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("AGENT")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("RELAY")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("LOG")
                    .separator("_")
                    .try_parsing(true),
            );

        let config = builder.build()?;

        let mut cfg: Config = config.try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        cfg.mongodb_uri = std::env::var("MONGODB_URI").map_err(|_| {
            ConfigError::Message("MONGODB_URI environment variable is required".to_string())
        })?;
        cfg.webchat_token = std::env::var("WEBCHAT_TOKEN").map_err(|_| {
            ConfigError::Message("WEBCHAT_TOKEN environment variable is required".to_string())
        })?;

        if cfg.webchat_token.is_empty() {
            return Err(ConfigError::Message(
                "WEBCHAT_TOKEN must not be empty".to_string(),
            ));
        }

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 3000

            [cors]
            enabled = true
            origins = ["http://localhost:3000"]

            [mongodb]
            database = "courier"

            [agent]
            url = "http://localhost:8000"
            timeout_secs = 120
            default_model = "main"

            [relay]
            channel = "webchat"
            history_window = 20
            history_limit = 100
            chunk_delay_ms = 20

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.agent.default_model, "main");
        assert_eq!(config.relay.history_window, 20);
        assert_eq!(config.relay.history_limit, 100);
    }
}
