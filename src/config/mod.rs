use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the dashboard
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL. Only optional when running against the demo store.
    pub database_url: Option<String>,
    /// Deployment environment; administrative routes only run in `development`
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,
}

fn default_app_env() -> String {
    "production".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Get the database URL, failing if it was never configured
    pub fn database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set")
    }

    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            app_env: default_app_env(),
            host: default_host(),
            port: default_port(),
            db_max_connections: default_max_connections(),
        }
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    dotenv().ok();

    let config = Config::load()?;

    Ok(config)
}
