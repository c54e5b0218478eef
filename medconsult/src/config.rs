//! Client configuration management.
//!
//! Configuration is loaded from an optional YAML file with environment variable and command-line
//! overrides. The file path defaults to `medconsult.yaml` but can be specified via `-f` or the
//! `MEDCONSULT_CONFIG` environment variable. A missing file is not an error.
//!
//! ## Loading Priority
//!
//! Sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `medconsult.yaml`)
//! 2. **API_BASE_URL** - The conventional backend override, mapped to `api_base_url`
//! 3. **Environment variables** - Variables prefixed with `MEDCONSULT_` override the above
//! 4. **`--api-base-url`** - Command-line flag, wins over everything
//!
//! With nothing set, requests go to `http://localhost:8000`.
//!
//! ## Environment Variable Examples
//!
//! ```bash
//! # Point the client at a staging backend
//! API_BASE_URL="https://consult.staging.example.com"
//!
//! # Same thing, scoped to this tool
//! MEDCONSULT_API_BASE_URL="https://consult.staging.example.com"
//!
//! # Structured logs
//! MEDCONSULT_LOG_FORMAT=json
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::cli::Command;
use crate::errors::Error;

/// Backend address used when nothing overrides it.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// CLI args: config file location, overrides, and the command to run
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "MEDCONSULT_CONFIG", default_value = "medconsult.yaml")]
    pub config: String,

    /// Backend base URL, overriding the config file and environment
    #[arg(long, global = true)]
    pub api_base_url: Option<Url>,

    /// Validate configuration and exit without contacting the backend.
    #[arg(long)]
    pub validate: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Main client configuration.
///
/// Resolved once at startup; the client never re-reads it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Prefix for every request path (e.g. "http://localhost:8000")
    pub api_base_url: Url,
    /// Format of log lines written to stderr
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default base URL is valid"),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<(), Error> {
        match self.api_base_url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(Error::Config {
                message: format!(
                    "api_base_url must use http or https, got '{other}' in {}",
                    self.api_base_url
                ),
            }),
        }
    }

    pub fn figment(args: &Args) -> Figment {
        let figment = Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Conventional override shared with other tooling around the backend
            .merge(Env::raw().only(&["API_BASE_URL"]))
            // Tool-specific variables; MEDCONSULT_CONFIG is the file path, not a field
            .merge(Env::prefixed("MEDCONSULT_").ignore(&["config"]).split("__"));

        match &args.api_base_url {
            Some(url) => figment.merge(Serialized::default("api_base_url", url.as_str())),
            None => figment,
        }
    }
}
