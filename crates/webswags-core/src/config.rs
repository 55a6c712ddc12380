//! Configuration management for webswags.
//!
//! This module defines the `Config` struct that controls where discovery
//! starts and how the web application is served. The configuration can be
//! loaded from a YAML file or created programmatically; command-line flags
//! override individual values.
//!
//! # Examples
//!
//! ```no_run
//! use webswags_core::config::Config;
//!
//! # #[tokio::main]
//! # async fn main() -> webswags_core::Result<()> {
//! // Create a new config programmatically
//! let mut config = Config::new("../services");
//! config.port = 9000;
//!
//! // Or load from a config file
//! let config = Config::from_file("webswags.yaml").await?;
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Configuration for discovery and the web application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory searched recursively for spec documents
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// IP address the web application binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the web application listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound for a single proxied request, in seconds
    #[serde(default = "default_proxy_timeout_secs")]
    pub proxy_timeout_secs: u64,

    /// Swagger UI release loaded from the CDN by the service page
    #[serde(default = "default_swagger_ui_version")]
    pub swagger_ui_version: String,
}

impl Config {
    /// Create a new Config with default values
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Socket address built from `host` and `port`
    pub fn listen_addr(&self) -> crate::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port).parse().map_err(|e| {
            crate::Error::config(format!(
                "invalid listen address {}:{}: {}",
                self.host, self.port, e
            ))
        })
    }

    pub fn proxy_timeout(&self) -> Duration {
        Duration::from_secs(self.proxy_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            host: default_host(),
            port: default_port(),
            proxy_timeout_secs: default_proxy_timeout_secs(),
            swagger_ui_version: default_swagger_ui_version(),
        }
    }
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("..")
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8085
}

fn default_proxy_timeout_secs() -> u64 {
    30
}

fn default_swagger_ui_version() -> String {
    "5.9.0".to_string()
}
