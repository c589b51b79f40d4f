use std::collections::HashMap;
use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Per-request parameter carrying the Mandrill API key
pub const API_KEY_PARAM: &str = "mandrill.api_key";
pub const TEMPLATE_NAME_PARAM: &str = "mandrill.template_name";
pub const FROM_EMAIL_PARAM: &str = "mandrill.from_email";
pub const FROM_NAME_PARAM: &str = "mandrill.from_name";
pub const SUBJECT_PARAM: &str = "mandrill.subject";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub mandrill: MandrillConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted request body in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
}

#[derive(Clone, Deserialize)]
pub struct MandrillConfig {
    /// API key; sending is refused without one
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_template_name")]
    pub template_name: String,
    pub from_email: Option<String>,
    pub from_name: Option<String>,
    pub subject: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_body_limit() -> usize {
    1024 * 1024 // 1 MiB
}

fn default_base_url() -> String {
    "https://mandrillapp.com/api/1.0".to_string()
}

fn default_template_name() -> String {
    "order-confirmation".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8082)?
            .set_default("mandrill.base_url", "https://mandrillapp.com/api/1.0")?
            .set_default("mandrill.template_name", "order-confirmation")?
            .set_default("mandrill.timeout_seconds", 30)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // SERVER__PORT, MANDRILL__API_KEY, MANDRILL__TEMPLATE_NAME, etc.
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl MandrillConfig {
    /// Returns the API key when one is set and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Overlay per-request parameters (`mandrill.*` keys) on top of this config.
    ///
    /// Unknown keys are ignored. Parameters only ever replace values; an
    /// absent parameter leaves the service-level setting in place.
    pub fn with_parameters(&self, parameters: &HashMap<String, String>) -> Self {
        let mut merged = self.clone();
        for (key, value) in parameters {
            match key.as_str() {
                API_KEY_PARAM => merged.api_key = Some(value.clone()),
                TEMPLATE_NAME_PARAM => merged.template_name = value.clone(),
                FROM_EMAIL_PARAM => merged.from_email = Some(value.clone()),
                FROM_NAME_PARAM => merged.from_name = Some(value.clone()),
                SUBJECT_PARAM => merged.subject = Some(value.clone()),
                _ => {}
            }
        }
        merged
    }
}

// Keeps the API key out of logs
impl std::fmt::Debug for MandrillConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MandrillConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("template_name", &self.template_name)
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .field("subject", &self.subject)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit: default_body_limit(),
        }
    }
}

impl Default for MandrillConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            template_name: default_template_name(),
            from_email: None,
            from_name: None,
            subject: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8082);

        let mandrill = MandrillConfig::default();
        assert_eq!(mandrill.base_url, "https://mandrillapp.com/api/1.0");
        assert_eq!(mandrill.template_name, "order-confirmation");
        assert!(mandrill.api_key().is_none());
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let mandrill = MandrillConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(mandrill.api_key().is_none());
    }

    #[test]
    fn test_parameters_override_settings() {
        let base = MandrillConfig {
            api_key: Some("service-key".to_string()),
            ..Default::default()
        };

        let mut params = HashMap::new();
        params.insert(API_KEY_PARAM.to_string(), "request-key".to_string());
        params.insert(TEMPLATE_NAME_PARAM.to_string(), "spring-sale".to_string());
        params.insert("other.setting".to_string(), "ignored".to_string());

        let merged = base.with_parameters(&params);
        assert_eq!(merged.api_key(), Some("request-key"));
        assert_eq!(merged.template_name, "spring-sale");
        assert_eq!(merged.base_url, base.base_url);
        assert!(merged.from_email.is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mandrill = MandrillConfig {
            api_key: Some("secret-key".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", mandrill);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
