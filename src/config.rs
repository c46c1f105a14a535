//! # Configuration Management
//!
//! Loads application configuration from multiple sources:
//! - Default values (built into the code)
//! - TOML configuration file (config.toml, optional)
//! - Environment variables (with APP_ prefix)
//! - Well-known deployment variables (`DEEPGRAM_API_KEY`, `ZOHO_DESK_API_KEY`,
//!   `ZOHO_DESK_ORG_ID`, `ZOHO_DESK_DEPARTMENT_ID`, `HOST`, `PORT`)
//!
//! ## Configuration Priority (highest to lowest):
//! 1. Well-known deployment variables
//! 2. Environment variables (APP_SERVER_HOST, APP_SERVER_PORT, ...)
//! 3. Configuration file (config.toml)
//! 4. Default values (defined in the Default impl)
//!
//! Credentials are deliberately NOT validated at startup: a missing Deepgram
//! or Zoho Desk credential surfaces as a per-request error at the stage that
//! needs it, so the service can boot and report its configuration state over
//! HTTP even when partially configured.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Main application configuration, read once at startup and treated as
/// immutable for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub deepgram: DeepgramConfig,
    pub zoho: ZohoConfig,
}

/// HTTP server binding.
///
/// The worker is meant to sit behind a webhook forwarder (Zapier or similar),
/// so the default binds on all interfaces at the platform-conventional port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Deepgram speech-to-text settings.
///
/// ## Fields:
/// - `api_key`: Deepgram API token; absent means transcription requests fail
///   with a configuration error
/// - `model`: language model selection sent as the `model` query parameter
/// - `language`: target language sent as the `language` query parameter
/// - `endpoint`: pre-recorded listen endpoint (overridable for tests)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepgramConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub language: String,
    pub endpoint: String,
}

/// Zoho Desk ticketing settings.
///
/// ## Fields:
/// - `api_key`: OAuth bearer token for the Desk API
/// - `org_id`: organization id sent in the `orgId` header
/// - `department_id`: target department; tickets fall back to the literal
///   `"default"` when unset
/// - `endpoint`: tickets collection endpoint, also the base used when
///   synthesizing the URL of a created ticket (overridable for tests)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZohoConfig {
    pub api_key: Option<String>,
    pub org_id: Option<String>,
    pub department_id: Option<String>,
    pub endpoint: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            deepgram: DeepgramConfig {
                api_key: None,
                model: "nova-2".to_string(),
                language: "en-US".to_string(),
                endpoint: "https://api.deepgram.com/v1/listen".to_string(),
            },
            zoho: ZohoConfig {
                api_key: None,
                org_id: None,
                department_id: None,
                endpoint: "https://desk.zoho.com/desk/v1/tickets".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, config.toml, and the environment.
    ///
    /// Environment variables with the `APP_` prefix map onto the config tree
    /// (`APP_SERVER_HOST` becomes `server.host`). The credential variables the
    /// deployment platform exports don't follow that convention, so they are
    /// applied as explicit overrides afterwards.
    pub fn load() -> Result<Self> {
        let mut settings = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("_"));

        if let Ok(host) = env::var("HOST") {
            settings = settings.set_override("server.host", host)?;
        }
        if let Ok(port) = env::var("PORT") {
            settings = settings.set_override("server.port", port)?;
        }
        if let Ok(key) = env::var("DEEPGRAM_API_KEY") {
            settings = settings.set_override("deepgram.api_key", key)?;
        }
        if let Ok(key) = env::var("ZOHO_DESK_API_KEY") {
            settings = settings.set_override("zoho.api_key", key)?;
        }
        if let Ok(org) = env::var("ZOHO_DESK_ORG_ID") {
            settings = settings.set_override("zoho.org_id", org)?;
        }
        if let Ok(dept) = env::var("ZOHO_DESK_DEPARTMENT_ID") {
            settings = settings.set_override("zoho.department_id", dept)?;
        }

        let config = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate that the configuration values make sense.
    ///
    /// Only structural checks live here; missing credentials are reported
    /// per-request, not at startup.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }
        if self.deepgram.endpoint.is_empty() {
            return Err(anyhow::anyhow!("Deepgram endpoint cannot be empty"));
        }
        if self.zoho.endpoint.is_empty() {
            return Err(anyhow::anyhow!("Zoho Desk endpoint cannot be empty"));
        }
        Ok(())
    }

    /// Whether a usable Deepgram credential is present.
    pub fn deepgram_configured(&self) -> bool {
        non_empty(self.deepgram.api_key.as_deref())
    }

    /// Whether the Zoho Desk integration has everything it needs
    /// (API key and organization id).
    pub fn zoho_configured(&self) -> bool {
        non_empty(self.zoho.api_key.as_deref()) && non_empty(self.zoho.org_id.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.deepgram.model, "nova-2");
        assert_eq!(config.deepgram.language, "en-US");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unconfigured_integrations_by_default() {
        let config = AppConfig::default();
        assert!(!config.deepgram_configured());
        assert!(!config.zoho_configured());
    }

    #[test]
    fn test_zoho_needs_both_key_and_org() {
        let mut config = AppConfig::default();
        config.zoho.api_key = Some("zoho-key".to_string());
        assert!(!config.zoho_configured());

        config.zoho.org_id = Some("700000001".to_string());
        assert!(config.zoho_configured());
    }

    #[test]
    fn test_blank_credential_counts_as_unconfigured() {
        let mut config = AppConfig::default();
        config.deepgram.api_key = Some("   ".to_string());
        assert!(!config.deepgram_configured());

        config.deepgram.api_key = Some("dg-key".to_string());
        assert!(config.deepgram_configured());
    }
}
