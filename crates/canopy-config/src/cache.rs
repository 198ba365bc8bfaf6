//! Cache driver configuration.
//!
//! This module provides the driver's option set, loadable from environment
//! variables or deserialized from a host application's configuration file.

use crate::endpoint::{ConfigError, Endpoint};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Canopy driver configuration.
///
/// # Environment Variables
///
/// - `CANOPY_SERVERS`: comma-separated endpoint descriptors
///   (default: `127.0.0.1:6379`). Two or more endpoints select the sharded
///   store variant.
/// - `CANOPY_DATABASE`: database index to select after connecting (default: `0`)
/// - `CANOPY_PASSWORD`: AUTH credential (default: none)
/// - `CANOPY_NORMALIZE_KEYS`: whether path segments are canonicalized before
///   encoding (default: `true`)
/// - `CANOPY_CONNECT_TIMEOUT_MS`: per-endpoint connect timeout in
///   milliseconds (default: `100`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Server endpoints. One endpoint yields a direct connection; several
    /// yield the key-routing sharded store.
    pub servers: Vec<Endpoint>,

    /// Database index to select after connecting.
    pub database: i64,

    /// AUTH credential, if the servers require one.
    pub password: Option<String>,

    /// Whether path segments are canonicalized before encoding. When off,
    /// segments containing `:` or `_` are rejected.
    pub normalize_keys: bool,

    /// Per-endpoint connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            servers: vec![Endpoint::localhost()],
            database: 0,
            password: None,
            normalize_keys: true,
            connect_timeout_ms: 100,
        }
    }
}

impl CacheConfig {
    /// Load configuration from environment variables.
    ///
    /// Scalar options fall back to their defaults when unset or unparseable.
    /// `CANOPY_SERVERS` is the exception: a present but malformed endpoint
    /// list is an error rather than a silent fallback, since connecting to
    /// the default server in place of a mistyped production one would be
    /// indistinguishable from a working cache.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] if any entry of
    /// `CANOPY_SERVERS` fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let servers = match env::var("CANOPY_SERVERS") {
            Ok(raw) => raw
                .split(',')
                .map(Endpoint::from_str)
                .collect::<Result<Vec<_>, _>>()?,
            Err(_) => vec![Endpoint::localhost()],
        };

        Ok(Self {
            servers,
            database: env::var("CANOPY_DATABASE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            password: env::var("CANOPY_PASSWORD").ok().filter(|p| !p.is_empty()),
            normalize_keys: env::var("CANOPY_NORMALIZE_KEYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            connect_timeout_ms: env::var("CANOPY_CONNECT_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
        })
    }

    /// Checks the configuration is connectable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoServers`] if the endpoint list is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.servers.is_empty() {
            return Err(ConfigError::NoServers);
        }
        Ok(())
    }

    /// The connect timeout as a [`Duration`].
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}
