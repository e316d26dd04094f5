//! Server configuration read from the environment
//!
//! | Variable                  | Default                |
//! |---------------------------|------------------------|
//! | `FEED_DATA_FILE`          | `./feeds.jsonl`        |
//! | `FEED_HOST`               | `0.0.0.0`              |
//! | `FEED_PORT`               | `8080`                 |
//! | `FEED_BROADCAST_CAPACITY` | `1024`                 |

use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default store file name, resolved against the working directory
pub const DEFAULT_DATA_FILE: &str = "feeds.jsonl";

/// Where the counter store keeps its records
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub data_file: PathBuf,
}

impl StoreConfig {
    pub fn new<P: AsRef<Path>>(data_file: P) -> Self {
        Self {
            data_file: data_file.as_ref().to_path_buf(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(resolve_path(DEFAULT_DATA_FILE))
    }
}

/// Full server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub store: StoreConfig,
    pub host: String,
    pub port: u16,
    /// Buffer size of the live-update channel
    pub broadcast_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            broadcast_capacity: 1024,
        }
    }
}

impl ServerConfig {
    /// Build configuration from `FEED_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let store = match lookup("FEED_DATA_FILE") {
            Some(path) if !path.trim().is_empty() => StoreConfig::new(resolve_path(path.trim())),
            _ => defaults.store,
        };

        let host = lookup("FEED_HOST")
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or(defaults.host);

        let port = parse_or("FEED_PORT", lookup("FEED_PORT"), defaults.port);
        let broadcast_capacity = parse_or(
            "FEED_BROADCAST_CAPACITY",
            lookup("FEED_BROADCAST_CAPACITY"),
            defaults.broadcast_capacity,
        )
        .max(1);

        Self {
            store,
            host,
            port,
            broadcast_capacity,
        }
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match raw {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, %default, "invalid value, using default");
                default
            }
        },
    }
}

/// Relative paths resolve against the current working directory
fn resolve_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    current_dir.join(path)
}
