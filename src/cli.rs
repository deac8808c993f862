//! Command-line interface parsing for the airport directory
//!
//! This module handles parsing of CLI arguments using clap and turns them into a
//! validated `StartupConfig`, including the choice of data source.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use reqwest::Url;
use thiserror::Error;

use crate::data::http::DEFAULT_BASE_URL;
use crate::data::{DataSource, DirectoryError, FixtureSource, HttpSource};
use crate::listing::DEFAULT_PAGE_SIZE;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// A freshness window of zero would disable caching entirely
    #[error("Invalid freshness window: must be at least 1 second")]
    ZeroFreshness,

    #[error("Invalid page size: must be at least 1")]
    ZeroPageSize,

    /// The base URL is not an http(s) URL with a host
    #[error("Invalid base URL: '{0}'. Expected http:// or https://")]
    InvalidBaseUrl(String),
}

/// Airport directory - browse airports, facility categories and facilities
#[derive(Parser, Debug)]
#[command(name = "airdir")]
#[command(about = "Browse airport facilities from the terminal")]
#[command(version)]
pub struct Cli {
    /// Use the bundled fixture dataset instead of the HTTP backend
    #[arg(long)]
    pub mock: bool,

    /// Load fixture data from a JSON file (implies --mock)
    #[arg(long, value_name = "PATH")]
    pub fixtures: Option<PathBuf>,

    /// Base URL of the directory API
    #[arg(
        long,
        value_name = "URL",
        env = "AIRDIR_API_BASE_URL",
        default_value = DEFAULT_BASE_URL
    )]
    pub base_url: String,

    /// How long fetched data is reused before it is requested again
    #[arg(long, value_name = "SECS", default_value_t = 300)]
    pub freshness_secs: u64,

    /// Number of entries per list page
    #[arg(long, value_name = "N", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Directory for the log file (defaults to the platform data directory)
    #[arg(long, value_name = "PATH")]
    pub log_dir: Option<PathBuf>,
}

/// Where directory data comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataMode {
    /// Live backend over HTTP
    Http { base_url: String },
    /// Dataset compiled into the binary
    Bundled,
    /// Dataset read from a JSON file
    FixtureFile(PathBuf),
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub data_mode: DataMode,
    /// Freshness window shared by every cache
    pub freshness_window: Duration,
    pub page_size: usize,
    pub log_dir: Option<PathBuf>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            data_mode: DataMode::Http {
                base_url: DEFAULT_BASE_URL.to_string(),
            },
            freshness_window: Duration::from_secs(300),
            page_size: DEFAULT_PAGE_SIZE,
            log_dir: None,
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if a value is out of range or the base URL is malformed
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.freshness_secs == 0 {
            return Err(CliError::ZeroFreshness);
        }
        if cli.page_size == 0 {
            return Err(CliError::ZeroPageSize);
        }

        let data_mode = match (&cli.fixtures, cli.mock) {
            (Some(path), _) => DataMode::FixtureFile(path.clone()),
            (None, true) => DataMode::Bundled,
            (None, false) => {
                let base_url = cli.base_url.trim();
                let is_http = Url::parse(base_url)
                    .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
                    .unwrap_or(false);
                if !is_http {
                    return Err(CliError::InvalidBaseUrl(cli.base_url.clone()));
                }
                DataMode::Http {
                    base_url: base_url.to_string(),
                }
            }
        };

        Ok(StartupConfig {
            data_mode,
            freshness_window: Duration::from_secs(cli.freshness_secs),
            page_size: cli.page_size,
            log_dir: cli.log_dir.clone(),
        })
    }

    /// Builds the data source selected by `data_mode`
    pub fn build_source(&self) -> Result<Arc<dyn DataSource>, DirectoryError> {
        let source: Arc<dyn DataSource> = match &self.data_mode {
            DataMode::Http { base_url } => Arc::new(HttpSource::new(base_url)?),
            DataMode::Bundled => Arc::new(FixtureSource::bundled()?),
            DataMode::FixtureFile(path) => Arc::new(FixtureSource::from_path(path)?),
        };
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args_uses_defaults() {
        let cli = Cli::parse_from(["airdir"]);
        assert!(!cli.mock);
        assert!(cli.fixtures.is_none());
        assert_eq!(cli.freshness_secs, 300);
        assert_eq!(cli.page_size, 6);
    }

    #[test]
    fn test_startup_config_default() {
        let config = StartupConfig::default();
        assert_eq!(config.freshness_window, Duration::from_secs(300));
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(matches!(config.data_mode, DataMode::Http { .. }));
    }

    #[test]
    fn test_startup_config_mock_selects_bundled() {
        let cli = Cli::parse_from(["airdir", "--mock"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.data_mode, DataMode::Bundled);
    }

    #[test]
    fn test_startup_config_fixtures_implies_mock() {
        let cli = Cli::parse_from(["airdir", "--fixtures", "data.json"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(
            config.data_mode,
            DataMode::FixtureFile(PathBuf::from("data.json"))
        );
    }

    #[test]
    fn test_startup_config_base_url() {
        let cli = Cli::parse_from(["airdir", "--base-url", "https://airports.example/api"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(
            config.data_mode,
            DataMode::Http {
                base_url: "https://airports.example/api".to_string()
            }
        );
    }

    #[test]
    fn test_startup_config_rejects_bad_base_url() {
        let cli = Cli::parse_from(["airdir", "--base-url", "localhost:5000"]);
        let err = StartupConfig::from_cli(&cli).unwrap_err();
        assert!(err.to_string().contains("localhost:5000"));
    }

    #[test]
    fn test_startup_config_rejects_base_url_without_host() {
        for url in ["http://", "ftp://airports.example/api", "not a url"] {
            let cli = Cli::parse_from(["airdir", "--base-url", url]);
            assert!(
                matches!(StartupConfig::from_cli(&cli), Err(CliError::InvalidBaseUrl(_))),
                "Should reject {}",
                url
            );
        }
    }

    #[test]
    fn test_bad_base_url_ignored_in_mock_mode() {
        let cli = Cli::parse_from(["airdir", "--mock", "--base-url", "nonsense"]);
        assert!(StartupConfig::from_cli(&cli).is_ok());
    }

    #[test]
    fn test_startup_config_rejects_zero_freshness() {
        let cli = Cli::parse_from(["airdir", "--freshness-secs", "0"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::ZeroFreshness)
        ));
    }

    #[test]
    fn test_startup_config_rejects_zero_page_size() {
        let cli = Cli::parse_from(["airdir", "--page-size", "0"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::ZeroPageSize)
        ));
    }

    #[test]
    fn test_startup_config_custom_window_and_page_size() {
        let cli = Cli::parse_from(["airdir", "--mock", "--freshness-secs", "60", "--page-size", "10"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.freshness_window, Duration::from_secs(60));
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_build_source_bundled() {
        let config = StartupConfig {
            data_mode: DataMode::Bundled,
            ..Default::default()
        };
        let source = config.build_source().unwrap();
        assert_eq!(source.name(), "fixtures");
    }

    #[test]
    fn test_build_source_missing_fixture_file_fails() {
        let config = StartupConfig {
            data_mode: DataMode::FixtureFile(PathBuf::from("/nonexistent/airports.json")),
            ..Default::default()
        };
        assert!(config.build_source().is_err());
    }
}
