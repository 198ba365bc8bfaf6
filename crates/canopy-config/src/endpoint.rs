//! Server endpoint descriptors.
//!
//! An [`Endpoint`] names one Redis server: a TCP `host:port` pair or a Unix
//! domain socket path. The textual forms accepted by [`Endpoint::from_str`]
//! (and therefore by the `CANOPY_SERVERS` environment variable) are:
//!
//! - `host:port`: TCP
//! - `host`: TCP with the default port 6379
//! - `unix:///var/run/redis.sock`: Unix socket

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default Redis host, used when only a port (or nothing) is configured.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default Redis port, used when an endpoint omits one.
pub const DEFAULT_PORT: u16 = 6379;

/// Error type for configuration parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The endpoint list was empty; the driver requires server information.
    #[error("at least one cache server endpoint is required")]
    NoServers,

    /// An endpoint descriptor could not be parsed.
    #[error("unrecognized server endpoint `{0}`")]
    InvalidEndpoint(String),
}

/// One Redis server endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Endpoint {
    /// TCP endpoint.
    Tcp {
        /// Host name or IP address.
        host: String,
        /// Port number.
        port: u16,
    },
    /// Unix domain socket endpoint.
    Unix {
        /// Filesystem path of the socket.
        path: String,
    },
}

impl Endpoint {
    /// The default endpoint, `127.0.0.1:6379`.
    #[must_use]
    pub fn localhost() -> Self {
        Self::Tcp {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::localhost()
    }
}

impl FromStr for Endpoint {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ConfigError::InvalidEndpoint(value.to_string()));
        }

        if let Some(path) = value.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(ConfigError::InvalidEndpoint(value.to_string()));
            }
            return Ok(Self::Unix {
                path: path.to_string(),
            });
        }

        match value.rsplit_once(':') {
            Some((host, port)) => {
                let port: u16 = port
                    .parse()
                    .map_err(|_| ConfigError::InvalidEndpoint(value.to_string()))?;
                if host.is_empty() {
                    return Err(ConfigError::InvalidEndpoint(value.to_string()));
                }
                Ok(Self::Tcp {
                    host: host.to_string(),
                    port,
                })
            }
            None => Ok(Self::Tcp {
                host: value.to_string(),
                port: DEFAULT_PORT,
            }),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp { host, port } => write!(f, "{host}:{port}"),
            Self::Unix { path } => write!(f, "unix://{path}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_and_port() {
        let endpoint: Endpoint = "redis.internal:6380".parse().unwrap();
        assert_eq!(
            endpoint,
            Endpoint::Tcp {
                host: "redis.internal".to_string(),
                port: 6380,
            }
        );
    }

    #[test]
    fn test_parse_bare_host_uses_default_port() {
        let endpoint: Endpoint = "10.0.0.5".parse().unwrap();
        assert_eq!(
            endpoint,
            Endpoint::Tcp {
                host: "10.0.0.5".to_string(),
                port: DEFAULT_PORT,
            }
        );
    }

    #[test]
    fn test_parse_unix_socket() {
        let endpoint: Endpoint = "unix:///var/run/redis.sock".parse().unwrap();
        assert_eq!(
            endpoint,
            Endpoint::Unix {
                path: "/var/run/redis.sock".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_invalid_port() {
        let result: Result<Endpoint, _> = "localhost:notaport".parse();
        assert_eq!(
            result,
            Err(ConfigError::InvalidEndpoint("localhost:notaport".to_string()))
        );
    }

    #[test]
    fn test_parse_empty_rejected() {
        let result: Result<Endpoint, _> = "  ".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["127.0.0.1:6379", "unix:///tmp/redis.sock"] {
            let endpoint: Endpoint = text.parse().unwrap();
            assert_eq!(endpoint.to_string(), text);
        }
    }
}
