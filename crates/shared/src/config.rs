//! Layered application configuration.
//!
//! Values come from `config/default.toml`, then an optional
//! `config/{RUN_MODE}.toml`, then `TALLY__`-prefixed environment variables
//! (e.g. `TALLY__DATABASE__URL`), each layer overriding the previous one.

use serde::Deserialize;

/// Top-level configuration tree.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Token-signing settings.
    pub jwt: JwtConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// The `host:port` address the listener binds to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection URL.
    pub url: String,
}

/// Token-signing settings.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// HMAC secret used to sign access tokens.
    pub secret: String,
    /// Access token lifetime in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: i64,
}

fn default_token_ttl() -> i64 {
    15
}

impl AppConfig {
    /// Loads the configuration layers for the current run mode.
    ///
    /// # Errors
    ///
    /// Returns an error when a layer cannot be read or the merged result is
    /// missing a required value.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_partial_server_section_fills_defaults() {
        let server: ServerConfig =
            serde_json::from_value(serde_json::json!({ "port": 3000 })).unwrap();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 3000);
    }
}
