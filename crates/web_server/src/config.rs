use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use campground_scan::AggregatorConfig;
use rec_gov::RecGovConfig;

/// Locations checked for frontend files when `STATIC_DIR` is unset
const STATIC_DIR_CANDIDATES: &[&str] = &["./public", "./frontend-build", "../frontend/build"];

/// Error reading server configuration from the environment
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable could not be parsed
    #[error("Invalid value for {key}: {value:?}")]
    InvalidNumber {
        /// Variable name
        key: &'static str,
        /// Raw value
        value: String,
    },
}

/// Server settings assembled from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind (`BIND_ADDRESS`, default `0.0.0.0`)
    pub bind_address: String,
    /// Port to bind (`PORT`, default `8080`)
    pub port: u16,
    /// Directory of static frontend files (`STATIC_DIR`)
    pub static_dir: PathBuf,
    /// Optional JSON file replacing the built-in campground names (`CAMPGROUND_NAMES_FILE`)
    pub campground_names_file: Option<PathBuf>,
    /// recreation.gov client settings (`REC_GOV_BASE_URL`, `FETCH_TIMEOUT_SECS`)
    pub rec_gov: RecGovConfig,
    /// Aggregator settings (`FETCH_TIMEOUT_SECS`, `MAX_CONCURRENT_FETCHES`)
    pub aggregator: AggregatorConfig,
}

impl ServerConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, "PORT", 8080)?;
        let fetch_timeout = Duration::from_secs(parse_or(&lookup, "FETCH_TIMEOUT_SECS", 30)?);
        let max_concurrent_fetches = parse_or(&lookup, "MAX_CONCURRENT_FETCHES", 2)?;

        let mut rec_gov = RecGovConfig {
            timeout: fetch_timeout,
            ..Default::default()
        };
        if let Some(base_url) = lookup("REC_GOV_BASE_URL") {
            rec_gov.base_url = base_url;
        }

        Ok(Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_static_dir),
            campground_names_file: lookup("CAMPGROUND_NAMES_FILE").map(PathBuf::from),
            rec_gov,
            aggregator: AggregatorConfig {
                fetch_timeout,
                max_concurrent_fetches,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}

fn default_static_dir() -> PathBuf {
    for candidate in STATIC_DIR_CANDIDATES {
        if Path::new(candidate).exists() {
            log::info!("✅ Using frontend path: {}", candidate);
            return PathBuf::from(candidate);
        }
    }

    log::info!("❌ Frontend files not found in any known location");
    PathBuf::from(STATIC_DIR_CANDIDATES[0])
}
