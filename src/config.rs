//! Base URL resolution.
//!
//! The base is fixed once at startup: development talks to a local service on
//! a fixed port, production uses the `/api` path on the origin the client is
//! served from.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

pub const DEV_BASE_URL: &str = "http://localhost:8000";
pub const PROD_BASE_PATH: &str = "/api";
pub const DEFAULT_ORIGIN: &str = "http://localhost";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Development,
    Production,
}

impl Mode {
    /// Mode implied by the build profile.
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            Mode::Development
        } else {
            Mode::Production
        }
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Development => f.write_str("development"),
            Mode::Production => f.write_str("production"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub mode: Mode,
    pub origin: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            mode: Mode::from_build(),
            origin: DEFAULT_ORIGIN.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(mode: Mode, origin: impl Into<String>) -> Self {
        ClientConfig {
            mode,
            origin: origin.into(),
        }
    }

    /// Base URL every request path is appended to. No trailing slash.
    pub fn base_url(&self) -> String {
        match self.mode {
            Mode::Development => DEV_BASE_URL.to_string(),
            Mode::Production => {
                format!("{}{}", self.origin.trim_end_matches('/'), PROD_BASE_PATH)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_uses_local_service() {
        let config = ClientConfig::new(Mode::Development, "https://iris.example.com");
        assert_eq!(config.base_url(), "http://localhost:8000");
    }

    #[test]
    fn production_uses_api_path_on_origin() {
        let config = ClientConfig::new(Mode::Production, "https://iris.example.com/");
        assert_eq!(config.base_url(), "https://iris.example.com/api");
    }

    #[test]
    fn mode_parses_short_and_long_names() {
        assert_eq!("dev".parse::<Mode>(), Ok(Mode::Development));
        assert_eq!("Production".parse::<Mode>(), Ok(Mode::Production));
        assert_eq!(
            "staging".parse::<Mode>(),
            Err(ConfigError::UnknownMode("staging".to_string()))
        );
    }
}
