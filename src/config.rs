//! # Configuration Management
//!
//! Loads application configuration from multiple sources:
//! - TOML configuration files (config.toml)
//! - Environment variables (with APP_ prefix)
//! - Default values (built into the code)
//!
//! The two external collaborators both need credentials which have no
//! sensible defaults: the transcription API key and the waitlist store
//! URL/key. These are read from the conventional deployment variables
//! (`OPENAI_API_KEY`, `SUPABASE_URL`, `SUPABASE_ANON_KEY`) and validated at
//! startup; a missing credential is a deployment-time failure, not something
//! the handlers try to recover from.
//!
//! ## Configuration Priority (highest to lowest):
//! 1. Well-known deployment variables (HOST, PORT, OPENAI_API_KEY, ...)
//! 2. Environment variables (APP_SERVER_HOST, APP_SERVER_PORT, etc.)
//! 3. Configuration file (config.toml)
//! 4. Default values (defined in the Default impl)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Main application configuration, constructed once at startup and passed
/// to collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub transcription: TranscriptionConfig,
    pub waitlist: WaitlistConfig,
}

/// HTTP server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Settings for the external speech-to-text service.
///
/// `api_url` is the base of an OpenAI-compatible API; `model` is the fixed
/// model identifier sent with every transcription request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

/// Settings for the external waitlist data store (Supabase-style REST).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Table holding waitlist entries
    pub table: String,
    /// Origin tag stored with each signup
    pub source_tag: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            transcription: TranscriptionConfig {
                api_url: "https://api.openai.com/v1".to_string(),
                api_key: String::new(), // required, no sensible default
                model: "whisper-1".to_string(),
            },
            waitlist: WaitlistConfig {
                supabase_url: String::new(), // required, no sensible default
                supabase_anon_key: String::new(),
                table: "waitlist".to_string(),
                source_tag: "landing-page".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, config.toml, and the environment.
    ///
    /// ## Environment Variable Examples:
    /// - `APP_SERVER_HOST=0.0.0.0`: override server host
    /// - `APP_SERVER_PORT=3000`: override server port
    /// - `OPENAI_API_KEY=sk-...`: transcription service credential
    /// - `SUPABASE_URL=https://xyz.supabase.co`: waitlist store endpoint
    /// - `SUPABASE_ANON_KEY=...`: waitlist store credential
    /// - `HOST` / `PORT`: special cases for deployment platforms
    pub fn load() -> Result<Self> {
        let mut settings = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("_"));

        // Well-known deployment variables that don't follow the APP_ prefix
        if let Ok(host) = env::var("HOST") {
            settings = settings.set_override("server.host", host)?;
        }
        if let Ok(port) = env::var("PORT") {
            settings = settings.set_override("server.port", port)?;
        }
        if let Ok(key) = env::var("OPENAI_API_KEY") {
            settings = settings.set_override("transcription.api_key", key)?;
        }
        if let Ok(url) = env::var("SUPABASE_URL") {
            settings = settings.set_override("waitlist.supabase_url", url)?;
        }
        if let Ok(key) = env::var("SUPABASE_ANON_KEY") {
            settings = settings.set_override("waitlist.supabase_anon_key", key)?;
        }

        let config = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate that the configuration is usable.
    ///
    /// Catching a missing credential here turns a confusing mid-request
    /// failure into a clear startup error.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        if self.transcription.api_key.is_empty() {
            return Err(anyhow::anyhow!(
                "Transcription API key is required (set OPENAI_API_KEY)"
            ));
        }

        if self.waitlist.supabase_url.is_empty() {
            return Err(anyhow::anyhow!(
                "Waitlist store URL is required (set SUPABASE_URL)"
            ));
        }

        if self.waitlist.supabase_anon_key.is_empty() {
            return Err(anyhow::anyhow!(
                "Waitlist store API key is required (set SUPABASE_ANON_KEY)"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A config with all required credentials filled in, for tests.
    fn complete_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.transcription.api_key = "sk-test".to_string();
        config.waitlist.supabase_url = "https://example.supabase.co".to_string();
        config.waitlist.supabase_anon_key = "anon-key".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.transcription.model, "whisper-1");
        assert_eq!(config.waitlist.source_tag, "landing-page");
    }

    #[test]
    fn test_default_config_missing_credentials() {
        // Defaults alone are not deployable: credentials are required
        assert!(AppConfig::default().validate().is_err());
    }

    #[test]
    fn test_complete_config_validates() {
        assert!(complete_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_port_zero() {
        let mut config = complete_config();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_store_key_rejected() {
        let mut config = complete_config();
        config.waitlist.supabase_anon_key.clear();
        assert!(config.validate().is_err());
    }
}
