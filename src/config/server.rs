//! HTTP listener settings: where to bind, which environment, how to log.

use serde::Deserialize;
use std::net::SocketAddr;

use super::error::ValidationError;

/// Listener and runtime-mode settings (`REST_WS__SERVER__*`).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// IP address or hostname; hostnames are resolved at startup
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub environment: Environment,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Comma-separated browser origins allowed by CORS
    pub cors_origins: Option<String>,
}

/// Runtime mode. Production switches logs to JSON and tightens secrets.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ServerConfig {
    /// Resolve `host:port` to the address the listener binds.
    ///
    /// IP literals resolve without a lookup. For a hostname the first
    /// address returned by the system resolver wins.
    pub async fn resolve_addr(&self) -> Result<SocketAddr, ValidationError> {
        let target = self.bind_target();
        tokio::net::lookup_host((self.host.trim(), self.port))
            .await
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or(ValidationError::InvalidAddress(target))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Allowed CORS origins; blank entries are skipped.
    pub fn cors_origins_list(&self) -> Vec<String> {
        let Some(origins) = &self.cors_origins else {
            return Vec::new();
        };
        origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    /// Checks that need no network access. Resolution happens in
    /// [`resolve_addr`](Self::resolve_addr).
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        let host = self.host.trim();
        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(ValidationError::InvalidAddress(self.bind_target()));
        }
        Ok(())
    }

    fn bind_target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            log_level: default_log_level(),
            cors_origins: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info,rest_ws=debug,tower_http=info".to_string()
}
