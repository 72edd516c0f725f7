//! Application configuration loaded from environment variables.
//!
//! Fail-fast loading: required variables must be present and valid or
//! the process exits with a clear message. There is no deferred or
//! silently-disabled initialization — if the mail provider or the
//! identity provider is not configured, the server does not start.

use std::env;
use thiserror::Error;

/// Application environment mode.
///
/// - `Development`: relaxed defaults are allowed with WARN logging.
/// - `Production`: insecure defaults refuse startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
}

impl AppEnvironment {
    /// Parse from the `APP_ENV` environment variable value.
    /// Defaults to `Development` if unset or unrecognized.
    pub fn from_env_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => {
                tracing::warn!(
                    value = other,
                    "Unrecognized APP_ENV value, defaulting to Development"
                );
                Self::Development
            }
        }
    }

    /// Returns true in production mode.
    #[must_use]
    pub fn is_production(&self) -> bool {
        *self == Self::Production
    }
}

impl std::fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Configuration errors that can occur during environment loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Failed to parse port: {0}")]
    InvalidPort(#[from] std::num::ParseIntError),
}

/// Keycloak connection settings.
#[derive(Debug, Clone)]
pub struct KeycloakConfig {
    /// Realm issuer URL, e.g. `https://idp.example.com/realms/ombrelle`.
    /// Also the expected `iss` of every accepted token.
    pub issuer_url: String,

    /// JWKS endpoint. Defaults to the realm's standard
    /// `protocol/openid-connect/certs` path.
    pub jwks_url: String,

    /// Optional static PEM public key; when set it is used instead of
    /// the JWKS endpoint.
    pub public_key_pem: Option<String>,
}

/// Mailjet settings.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_key: String,
    pub secret_key: String,
    pub sender_email: String,
    pub sender_name: String,
}

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    /// Application environment (development or production).
    pub app_env: AppEnvironment,

    /// PostgreSQL connection string.
    pub database_url: String,

    /// Server bind address.
    pub host: String,

    /// Server listen port.
    pub port: u16,

    /// Tracing filter directive (e.g. "info,ombrelle=debug").
    pub rust_log: String,

    /// Allowed CORS origins ("*" for development).
    pub cors_origins: Vec<String>,

    /// Keycloak settings.
    pub keycloak: KeycloakConfig,

    /// Mailjet settings.
    pub mail: MailConfig,

    /// Base URL of the client invitation page; the emailed link is
    /// `{invitation_base_url}?token={token}`.
    pub invitation_base_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("app_env", &self.app_env)
            .field("database_url", &"[redacted]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .field("keycloak_issuer", &self.keycloak.issuer_url)
            .field("invitation_base_url", &self.invitation_base_url)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Required Variables
    ///
    /// - `DATABASE_URL` — PostgreSQL connection string
    /// - `KEYCLOAK_ISSUER_URL` — realm issuer URL
    /// - `MAILJET_API_KEY` / `MAILJET_SECRET_KEY` — mail credentials
    /// - `MAIL_SENDER_EMAIL` — validated sender address
    /// - `INVITATION_BASE_URL` — client page acceptance links point at
    ///
    /// # Optional Variables
    ///
    /// - `APP_ENV` (default "development"), `HOST` (default "0.0.0.0"),
    ///   `PORT` (default 8080), `RUST_LOG` (default "info"),
    ///   `CORS_ORIGINS` (default "*"), `MAIL_SENDER_NAME`
    ///   (default "Ombrelle"), `KEYCLOAK_JWKS_URL`,
    ///   `KEYCLOAK_PUBLIC_KEY`
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env if present (development only).
        let _ = dotenvy::dotenv();

        let app_env = AppEnvironment::from_env_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let database_url = require("DATABASE_URL")?;

        let issuer_url = require("KEYCLOAK_ISSUER_URL")?;
        let jwks_url = env::var("KEYCLOAK_JWKS_URL").unwrap_or_else(|_| {
            format!(
                "{}/protocol/openid-connect/certs",
                issuer_url.trim_end_matches('/')
            )
        });
        let public_key_pem = env::var("KEYCLOAK_PUBLIC_KEY").ok().filter(|s| !s.is_empty());

        if let Some(ref pem) = public_key_pem {
            if !pem.contains("-----BEGIN") {
                return Err(ConfigError::InvalidValue {
                    var: "KEYCLOAK_PUBLIC_KEY".to_string(),
                    message: "Must be PEM format (should contain -----BEGIN)".to_string(),
                });
            }
        }

        let mail = MailConfig {
            api_key: require("MAILJET_API_KEY")?,
            secret_key: require("MAILJET_SECRET_KEY")?,
            sender_email: require("MAIL_SENDER_EMAIL")?,
            sender_name: env::var("MAIL_SENDER_NAME").unwrap_or_else(|_| "Ombrelle".to_string()),
        };

        let invitation_base_url = require("INVITATION_BASE_URL")?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()?;

        if port == 0 {
            return Err(ConfigError::InvalidValue {
                var: "PORT".to_string(),
                message: "Port must be between 1 and 65535".to_string(),
            });
        }

        Ok(Config {
            app_env,
            database_url,
            host,
            port,
            rust_log,
            cors_origins,
            keycloak: KeycloakConfig {
                issuer_url,
                jwks_url,
                public_key_pem,
            },
            mail,
            invitation_base_url,
        })
    }

    /// The server bind address as a socket address string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate security-sensitive configuration against the
    /// environment mode.
    ///
    /// Production: returns `Err(errors)` for each insecure value.
    /// Development: returns `Ok(warnings)` instead.
    pub fn validate_security_config(&self) -> Result<Vec<String>, Vec<String>> {
        let mut issues = Vec::new();

        if self.cors_origins.iter().any(|o| o == "*") {
            issues.push(
                "CORS_ORIGINS contains wildcard '*' which is not allowed in production"
                    .to_string(),
            );
        }

        if !self.keycloak.issuer_url.starts_with("https://")
            && !self.keycloak.issuer_url.contains("localhost")
            && !self.keycloak.issuer_url.contains("127.0.0.1")
        {
            issues.push("KEYCLOAK_ISSUER_URL is not using HTTPS".to_string());
        }

        if issues.is_empty() {
            return Ok(Vec::new());
        }

        if self.app_env.is_production() {
            Err(issues)
        } else {
            Ok(issues)
        }
    }
}

fn require(var: &str) -> Result<String, ConfigError> {
    env::var(var)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::MissingVar(var.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            app_env: AppEnvironment::Production,
            database_url: "postgres://localhost/test".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
            cors_origins: vec!["https://app.example.com".to_string()],
            keycloak: KeycloakConfig {
                issuer_url: "https://idp.example.com/realms/ombrelle".to_string(),
                jwks_url:
                    "https://idp.example.com/realms/ombrelle/protocol/openid-connect/certs"
                        .to_string(),
                public_key_pem: None,
            },
            mail: MailConfig {
                api_key: "key".to_string(),
                secret_key: "secret".to_string(),
                sender_email: "no-reply@example.com".to_string(),
                sender_name: "Ombrelle".to_string(),
            },
            invitation_base_url: "https://app.example.com/invitations/accept".to_string(),
        }
    }

    #[test]
    fn test_app_environment_parsing() {
        assert_eq!(
            AppEnvironment::from_env_str("production"),
            AppEnvironment::Production
        );
        assert_eq!(
            AppEnvironment::from_env_str("prod"),
            AppEnvironment::Production
        );
        assert_eq!(
            AppEnvironment::from_env_str("dev"),
            AppEnvironment::Development
        );
        assert_eq!(
            AppEnvironment::from_env_str("staging"),
            AppEnvironment::Development
        );
        assert_eq!(AppEnvironment::from_env_str(""), AppEnvironment::Development);
    }

    #[test]
    fn test_bind_addr() {
        let mut config = test_config();
        config.host = "127.0.0.1".to_string();
        config.port = 3000;
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_production_rejects_cors_wildcard() {
        let mut config = test_config();
        config.cors_origins = vec!["*".to_string()];

        let result = config.validate_security_config();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .iter()
            .any(|e| e.contains("CORS_ORIGINS")));
    }

    #[test]
    fn test_development_allows_cors_wildcard_with_warning() {
        let mut config = test_config();
        config.app_env = AppEnvironment::Development;
        config.cors_origins = vec!["*".to_string()];

        let result = config.validate_security_config();
        assert!(result.is_ok());
        assert!(!result.unwrap().is_empty());
    }

    #[test]
    fn test_production_rejects_plain_http_issuer() {
        let mut config = test_config();
        config.keycloak.issuer_url = "http://idp.example.com/realms/ombrelle".to_string();

        assert!(config.validate_security_config().is_err());
    }

    #[test]
    fn test_localhost_issuer_is_tolerated() {
        let mut config = test_config();
        config.keycloak.issuer_url = "http://localhost:8081/realms/ombrelle".to_string();

        assert!(config.validate_security_config().is_ok());
    }

    #[test]
    fn test_secure_production_config_passes() {
        let config = test_config();
        let warnings = config.validate_security_config().unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_config_debug_redacts_database_url() {
        let config = test_config();
        let debug = format!("{config:?}");
        assert!(!debug.contains("postgres://localhost/test"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingVar("MAILJET_API_KEY".to_string());
        assert_eq!(
            err.to_string(),
            "Missing required environment variable: MAILJET_API_KEY"
        );
    }
}
