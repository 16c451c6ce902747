//! Configuration management for Flagwatch
//!
//! This module defines the main `Config` struct and its sub-structs,
//! responsible for holding all application settings. It uses the `figment`
//! crate to load configuration from a `flagwatch.toml` file and merge it
//! with environment variables and command-line arguments.

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::bigquery::DEFAULT_BASE_URL;
use crate::cli::Cli;

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Configuration for the trigger server.
    pub server: ServerConfig,
    /// Configuration for the result-store client.
    pub bigquery: BigQueryConfig,
    /// Configuration for chat alert delivery.
    pub chat: ChatConfig,
}

/// Configuration for the trigger server.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// The address the trigger server listens on.
    pub bind_addr: String,
}

/// Configuration for the result-store client.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BigQueryConfig {
    /// Base URL of the BigQuery v2 REST API.
    pub base_url: String,
    /// Optional static bearer token attached to query requests. Token
    /// acquisition and refresh are externally supplied.
    #[serde(default)]
    pub auth_token: Option<String>,
}

/// Configuration for chat alert delivery.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatConfig {
    /// The incoming-webhook URL alerts are delivered to. Fixed for the
    /// process lifetime.
    pub webhook_url: String,
}

impl Config {
    /// Loads the application configuration by layering sources: struct
    /// defaults, the TOML file, environment variables, and CLI arguments.
    ///
    /// Nested keys are addressed in the environment with a double
    /// underscore, e.g. `FLAGWATCH_CHAT__WEBHOOK_URL`.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| "flagwatch.toml".into());

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("FLAGWATCH_").split("__"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }
}

// Provide a default implementation for tests and easy setup.
impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            server: ServerConfig {
                bind_addr: "0.0.0.0:8080".to_string(),
            },
            bigquery: BigQueryConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                auth_token: None,
            },
            chat: ChatConfig {
                webhook_url: String::new(),
            },
        }
    }
}
