//! Configuration for the registration backend.

use anyhow::{Context, Result};
use chrono::FixedOffset;
use phonenumber::country;
use serde::Deserialize;
use std::time::Duration;

/// Backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Telegram bot configuration
    pub bot: BotConfig,

    /// Registration pipeline configuration
    #[serde(default)]
    pub registration: RegistrationConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection URL
    pub url: String,

    /// Connection pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Bot API token
    pub token: String,

    /// Chat that receives registration notifications
    pub admin_chat_id: i64,

    /// Public base URL Telegram delivers webhook updates to
    pub webhook_url: String,

    /// Path the webhook route is mounted on
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,

    /// Bot API base URL
    #[serde(default = "default_bot_api_url")]
    pub api_url: String,

    /// Bot API request timeout
    #[serde(default = "default_bot_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationConfig {
    /// Region every registered number must belong to
    #[serde(default = "default_region")]
    pub default_region: String,

    /// Fixed hour offset applied to stored UTC timestamps in notifications
    #[serde(default = "default_display_utc_offset")]
    pub display_utc_offset: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Frontend origin allowed to call the API; unset allows any origin
    #[serde(default)]
    pub frontend_origin: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            default_region: default_region(),
            display_utc_offset: default_display_utc_offset(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            frontend_origin: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8000
}

fn default_max_connections() -> u32 {
    5
}

fn default_webhook_path() -> String {
    "/webhook".into()
}

fn default_bot_api_url() -> String {
    telegram_client::DEFAULT_API_URL.into()
}

fn default_bot_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_region() -> String {
    "RU".into()
}

fn default_display_utc_offset() -> i32 {
    4
}

fn default_log_level() -> String {
    "info".into()
}

impl RegistrationConfig {
    /// Resolve the configured region code against the numbering-plan registry.
    pub fn region(&self) -> Result<country::Id> {
        self.default_region
            .to_uppercase()
            .parse()
            .map_err(|_| anyhow::anyhow!("Unknown region code {:?}", self.default_region))
    }

    /// Resolve the configured display offset into a fixed timezone.
    pub fn display_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.display_utc_offset * 3600).with_context(|| {
            format!(
                "Display offset {} is out of range",
                self.display_utc_offset
            )
        })
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
