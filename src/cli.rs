//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using
//! the `clap` crate. These arguments are parsed at startup and then merged
//! with the configuration from the `flagwatch.toml` file and environment
//! variables.

use clap::Parser;
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// An event-triggered notifier for flagged data-quality reports.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Address for the trigger server to listen on.
    #[arg(long, value_name = "ADDR")]
    pub listen: Option<String>,

    /// Chat webhook URL to deliver alerts to.
    #[arg(long, value_name = "URL")]
    pub webhook_url: Option<String>,

    /// Base URL of the BigQuery REST API.
    #[arg(long, value_name = "URL")]
    pub bigquery_url: Option<String>,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(addr) = &self.listen {
            let mut server = Dict::new();
            server.insert("bind_addr".into(), Value::from(addr.clone()));
            dict.insert("server".into(), Value::from(server));
        }

        if let Some(url) = &self.webhook_url {
            let mut chat = Dict::new();
            chat.insert("webhook_url".into(), Value::from(url.clone()));
            dict.insert("chat".into(), Value::from(chat));
        }

        if let Some(url) = &self.bigquery_url {
            let mut bigquery = Dict::new();
            bigquery.insert("base_url".into(), Value::from(url.clone()));
            dict.insert("bigquery".into(), Value::from(bigquery));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
