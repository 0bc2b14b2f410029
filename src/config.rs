//! Runtime configuration read from the environment.
//!
//! | Variable                     | Default                        |
//! |------------------------------|--------------------------------|
//! | `WEBHOOK_CERT_PATH`          | `/etc/webhook/certs/tls.crt`   |
//! | `WEBHOOK_KEY_PATH`           | `/etc/webhook/certs/tls.key`   |
//! | `WEBHOOK_PORT`               | `9443`                         |
//! | `HEALTH_PORT`                | `8080`                         |
//! | `SHUTDOWN_GRACE_PERIOD_SECS` | `5`                            |

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Default path to webhook TLS certificate
pub const WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to webhook TLS private key
pub const WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";
/// Default webhook server port
pub const WEBHOOK_PORT: u16 = 9443;
/// Default health server port
pub const HEALTH_PORT: u16 = 8080;
/// Default grace period for in-flight requests during shutdown
pub const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 5;

/// Invalid configuration value
#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid value for {key}: {value:?} ({reason})")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Webhook service configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
    pub webhook_port: u16,
    pub health_port: u16,
    pub shutdown_grace_period: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cert_path: PathBuf::from(WEBHOOK_CERT_PATH),
            key_path: PathBuf::from(WEBHOOK_KEY_PATH),
            webhook_port: WEBHOOK_PORT,
            health_port: HEALTH_PORT,
            shutdown_grace_period: Duration::from_secs(SHUTDOWN_GRACE_PERIOD_SECS),
        }
    }
}

impl Config {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for unset keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(path) = lookup("WEBHOOK_CERT_PATH") {
            cfg.cert_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("WEBHOOK_KEY_PATH") {
            cfg.key_path = PathBuf::from(path);
        }
        cfg.webhook_port = parse_or(&lookup, "WEBHOOK_PORT", cfg.webhook_port)?;
        cfg.health_port = parse_or(&lookup, "HEALTH_PORT", cfg.health_port)?;
        cfg.shutdown_grace_period = Duration::from_secs(parse_or(
            &lookup,
            "SHUTDOWN_GRACE_PERIOD_SECS",
            SHUTDOWN_GRACE_PERIOD_SECS,
        )?);
        Ok(cfg)
    }

    /// Whether both TLS files exist, which is required to serve webhooks
    pub fn tls_available(&self) -> bool {
        Path::new(&self.cert_path).exists() && Path::new(&self.key_path).exists()
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
