//! HTTP Server Configuration
//!
//! Bind address and CORS settings for the card server.

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configured port
pub const PORT_ENV: &str = "PORT";

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Applies a `PORT` value, if it parses.
    ///
    /// Returns the rejected value when it does not.
    pub fn apply_port_override(&mut self, raw: Option<&str>) -> Result<(), String> {
        if let Some(raw) = raw {
            self.port = raw.trim().parse().map_err(|_| raw.to_string())?;
        }
        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
