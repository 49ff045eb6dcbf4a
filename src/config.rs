// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup (after an
//! optional `.env` file is loaded) and handed to the gateway and the token
//! verifier by value. Nothing here is read again after `main` builds the
//! application state.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CLIENT_ID` | Cognito app client ID | Required |
//! | `CLIENT_SECRET` | Cognito app client secret | Required |
//! | `USER_POOL_ID` | Cognito user pool ID | Required |
//! | `REGION` | Pool region (falls back to `AWS_REGION`) | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWKS_REFRESH_INTERVAL_SECS` | Background key-set refresh interval | `240` |
//! | `JWKS_FETCH_TIMEOUT_SECS` | Timeout for a single key-set fetch | `10` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

pub const CLIENT_ID_ENV: &str = "CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "CLIENT_SECRET";
pub const USER_POOL_ID_ENV: &str = "USER_POOL_ID";
pub const REGION_ENV: &str = "REGION";
/// Fallback for [`REGION_ENV`], as set by the AWS tooling.
pub const AWS_REGION_ENV: &str = "AWS_REGION";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWKS_REFRESH_INTERVAL_ENV: &str = "JWKS_REFRESH_INTERVAL_SECS";
pub const JWKS_FETCH_TIMEOUT_ENV: &str = "JWKS_FETCH_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
/// Kept below the key-set cache TTL so readers never hit an expired entry.
const DEFAULT_JWKS_REFRESH_INTERVAL: Duration = Duration::from_secs(240);
const DEFAULT_JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {0} has an invalid value")]
    Invalid(&'static str),
}

/// Cognito app client credentials and pool coordinates.
///
/// Immutable once loaded. `Debug` redacts the client secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub region: String,
    pub user_pool_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("region", &self.region)
            .field("user_pool_id", &self.user_pool_id)
            .finish()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Everything `main` needs to assemble the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub bind_addr: SocketAddr,
    pub jwks_refresh_interval: Duration,
    pub jwks_fetch_timeout: Duration,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let client_id = required(CLIENT_ID_ENV)?;
        let client_secret = required(CLIENT_SECRET_ENV)?;
        let user_pool_id = required(USER_POOL_ID_ENV)?;
        let region = get(REGION_ENV)
            .or_else(|| get(AWS_REGION_ENV))
            .ok_or(ConfigError::Missing(REGION_ENV))?;

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid(PORT_ENV))?,
            None => DEFAULT_PORT,
        };
        let ip: IpAddr = host.trim().parse().map_err(|_| ConfigError::Invalid(HOST_ENV))?;
        let bind_addr = SocketAddr::new(ip, port);

        let jwks_refresh_interval =
            parse_secs(get(JWKS_REFRESH_INTERVAL_ENV), JWKS_REFRESH_INTERVAL_ENV)?
                .unwrap_or(DEFAULT_JWKS_REFRESH_INTERVAL);
        let jwks_fetch_timeout = parse_secs(get(JWKS_FETCH_TIMEOUT_ENV), JWKS_FETCH_TIMEOUT_ENV)?
            .unwrap_or(DEFAULT_JWKS_FETCH_TIMEOUT);

        let log_format = match get(LOG_FORMAT_ENV).as_deref().map(str::to_ascii_lowercase) {
            None => LogFormat::default(),
            Some(f) if f == "json" => LogFormat::Json,
            Some(f) if f == "pretty" => LogFormat::Pretty,
            Some(_) => return Err(ConfigError::Invalid(LOG_FORMAT_ENV)),
        };

        Ok(Self {
            credentials: Credentials {
                client_id,
                client_secret,
                region,
                user_pool_id,
            },
            bind_addr,
            jwks_refresh_interval,
            jwks_fetch_timeout,
            log_format,
        })
    }
}

/// Parse a positive number of seconds.
fn parse_secs(raw: Option<String>, key: &'static str) -> Result<Option<Duration>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
            _ => Err(ConfigError::Invalid(key)),
        },
    }
}
