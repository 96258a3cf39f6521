//! Configuration management for the demo site.
//!
//! Loads configuration from environment variables with sensible defaults.

use mvc_dispatch_core::DispatchOptions;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application server configuration
    pub server: ServerConfig,
    /// Dispatcher options (`MVC_*` variables)
    pub dispatch: DispatchOptions,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; missing or unparsable values fall back to
    /// the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3000),
            },
            dispatch: DispatchOptions::from_env(),
        }
    }

    /// Address the server listens on.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
