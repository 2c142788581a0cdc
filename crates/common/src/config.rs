//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Support chat configuration.
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Minimum accepted password length at sign-up.
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

/// Support chat configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Text of the once-daily automated admin reply.
    #[serde(default = "default_auto_reply_text")]
    pub auto_reply_text: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_length: default_min_password_length(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            auto_reply_text: default_auto_reply_text(),
        }
    }
}

const fn default_min_password_length() -> usize {
    6
}

fn default_auto_reply_text() -> String {
    "Hi! This is an automated admin reply.".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `HUDDLE_ENV`)
    /// 3. Environment variables with `HUDDLE_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("HUDDLE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("HUDDLE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("HUDDLE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.auth.min_password_length, 6);
        assert_eq!(
            config.chat.auto_reply_text,
            "Hi! This is an automated admin reply."
        );
    }
}
