use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub realm: RealmConfig,
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RealmConfig {
    /// Realm symbol or address to monitor - REALM env var overrides.
    #[serde(default)]
    pub identifier: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    /// Solana JSON-RPC endpoint - CLUSTER_URL env var overrides.
    #[serde(default = "default_cluster_url")]
    pub cluster_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookConfig {
    /// Discord webhook URL (secret) - loaded from env WEBHOOK_URL.
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_cluster_url() -> String {
    "https://api.mainnet-beta.solana.com".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            cluster_url: default_cluster_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Config {
    /// Load config from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.overlay_env();
        Ok(config)
    }

    /// Env-only config with defaults (no file needed).
    pub fn from_env() -> Self {
        let mut config = Config {
            realm: RealmConfig::default(),
            rpc: RpcConfig::default(),
            webhook: WebhookConfig::default(),
            logging: LoggingConfig::default(),
        };
        config.overlay_env();
        config
    }

    // Secrets and deployment-specific values never live in the config file.
    fn overlay_env(&mut self) {
        if let Ok(realm) = std::env::var("REALM") {
            self.realm.identifier = realm;
        }
        if let Ok(url) = std::env::var("CLUSTER_URL") {
            self.rpc.cluster_url = url;
        }
        if let Ok(url) = std::env::var("WEBHOOK_URL") {
            self.webhook.url = url;
        }
    }
}
