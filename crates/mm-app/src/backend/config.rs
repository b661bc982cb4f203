use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use anyhow::Context;
use mm_core::{CoordinatorConfig, RetentionPolicy};

const DEFAULT_PORT: u16 = 7860;
const DEFAULT_SWEEP_SECS: u64 = 600;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub retention: RetentionPolicy,
    pub sweep_interval: Duration,
    pub coordinator: CoordinatorConfig,
}

impl ServerConfig {
    /// Load from the environment, after an optional `.env`
    pub fn load() -> anyhow::Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e).context("failed to read .env");
            }
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("MM_PORT").or_else(|| lookup("PORT")) {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("port must be a number, got {value:?}"))?,
            None => DEFAULT_PORT,
        };

        let host = match lookup("MM_HOST") {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("MM_HOST must be an IP address, got {value:?}"))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let retention_secs = lookup("MM_RETENTION_SECS")
            .map(|value| positive_secs("MM_RETENTION_SECS", &value))
            .transpose()?;

        let sweep_secs = match lookup("MM_SWEEP_INTERVAL_SECS") {
            Some(value) => positive_secs("MM_SWEEP_INTERVAL_SECS", &value)?,
            None => DEFAULT_SWEEP_SECS,
        };

        Ok(Self {
            host,
            port,
            retention: RetentionPolicy::from_secs(retention_secs),
            sweep_interval: Duration::from_secs(sweep_secs),
            coordinator: CoordinatorConfig::from_lookup(&lookup)?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn positive_secs(key: &str, value: &str) -> anyhow::Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .with_context(|| format!("{key} must be a positive number of seconds, got {value:?}"))
}
