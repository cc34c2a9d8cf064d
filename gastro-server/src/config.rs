//! Server configuration

use std::fmt;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be set in {environment} environment")]
    MissingSecret { name: &'static str, environment: String },
    #[error("{name} must not be empty in {environment} environment")]
    EmptySecret { name: &'static str, environment: String },
}

/// Hosted payment page credentials
#[derive(Clone)]
pub struct PaycometConfig {
    pub client_code: String,
    pub terminal: String,
    pub password: String,
    /// ISO currency code, e.g. `EUR`
    pub currency: String,
    /// Language of the hosted page, e.g. `ES`
    pub language: String,
    /// Endpoint the auto-submitting form posts to
    pub url: String,
}

impl fmt::Debug for PaycometConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaycometConfig")
            .field("client_code", &self.client_code)
            .field("terminal", &self.terminal)
            .field("password", &"<redacted>")
            .field("currency", &self.currency)
            .field("language", &self.language)
            .field("url", &self.url)
            .finish()
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 secret for session tokens
    pub jwt_secret: String,
    pub paycomet: PaycometConfig,
    /// Absolute base URL used to build gateway redirect URLs
    pub public_base_url: String,
    /// Directory for rolling daily log files
    pub log_dir: Option<String>,
    /// `LOG_FORMAT=json`
    pub log_json: bool,
}

/// One line of the production checklist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckItem {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

impl fmt::Display for CheckItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.passed { "OK  " } else { "FAIL" };
        write!(f, "[{mark}] {}: {}", self.name, self.detail)
    }
}

const DEV_SECRET_PREFIX: &str = "dev-";
const DEFAULT_HTTP_PORT: u16 = 8000;
const DEFAULT_PAYCOMET_URL: &str = "https://api.paycomet.com/gateway/ifr-bankstore";
const MIN_SECRET_LEN: usize = 20;

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".into());
        let http_port = lookup("HTTP_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_HTTP_PORT);

        Ok(Self {
            database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            http_port,
            jwt_secret: require_secret(&lookup, "JWT_SECRET", &environment)?,
            paycomet: PaycometConfig {
                client_code: require_secret(&lookup, "PAYCOMET_CLIENT_CODE", &environment)?,
                terminal: require_secret(&lookup, "PAYCOMET_TERMINAL", &environment)?,
                password: require_secret(&lookup, "PAYCOMET_PASSWORD", &environment)?,
                currency: lookup("PAYCOMET_CURRENCY").unwrap_or_else(|| "EUR".into()),
                language: lookup("PAYCOMET_LANGUAGE").unwrap_or_else(|| "ES".into()),
                url: lookup("PAYCOMET_URL").unwrap_or_else(|| DEFAULT_PAYCOMET_URL.into()),
            },
            public_base_url: lookup("PUBLIC_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| format!("http://localhost:{http_port}")),
            log_dir: lookup("LOG_DIR").filter(|s| !s.is_empty()),
            log_json: lookup("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            environment,
        })
    }

    /// Development configuration with placeholder secrets
    pub fn local(database_url: &str) -> Self {
        Self {
            database_url: database_url.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            environment: "development".into(),
            jwt_secret: dev_secret("JWT_SECRET"),
            paycomet: PaycometConfig {
                client_code: dev_secret("PAYCOMET_CLIENT_CODE"),
                terminal: dev_secret("PAYCOMET_TERMINAL"),
                password: dev_secret("PAYCOMET_PASSWORD"),
                currency: "EUR".into(),
                language: "ES".into(),
                url: DEFAULT_PAYCOMET_URL.into(),
            },
            public_base_url: format!("http://localhost:{DEFAULT_HTTP_PORT}"),
            log_dir: None,
            log_json: false,
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Absolute URL for a path on this server
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.public_base_url, path)
    }

    /// Production readiness checklist
    pub fn verify(&self) -> Vec<CheckItem> {
        let paycomet_set = [
            &self.paycomet.client_code,
            &self.paycomet.terminal,
            &self.paycomet.password,
        ]
        .iter()
        .all(|v| !v.is_empty() && !v.starts_with(DEV_SECRET_PREFIX));

        vec![
            CheckItem {
                name: "ENVIRONMENT",
                passed: !self.is_development(),
                detail: format!("running as {}", self.environment),
            },
            CheckItem {
                name: "JWT_SECRET",
                passed: self.jwt_secret.len() > MIN_SECRET_LEN
                    && !self.jwt_secret.starts_with(DEV_SECRET_PREFIX),
                detail: format!("must be longer than {MIN_SECRET_LEN} characters"),
            },
            CheckItem {
                name: "PAYCOMET",
                passed: paycomet_set,
                detail: "client code, terminal and password configured".into(),
            },
            CheckItem {
                name: "DATABASE_URL",
                passed: self.database_url.starts_with("postgres://")
                    || self.database_url.starts_with("postgresql://"),
                detail: "PostgreSQL connection URL".into(),
            },
            CheckItem {
                name: "PUBLIC_BASE_URL",
                passed: self.public_base_url.starts_with("https://"),
                detail: self.public_base_url.clone(),
            },
        ]
    }
}

/// Require a secret: must be set and non-empty outside development.
fn require_secret<F>(
    lookup: &F,
    name: &'static str,
    environment: &str,
) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let val = match lookup(name) {
        Some(v) => v,
        None => {
            if environment != "development" {
                return Err(ConfigError::MissingSecret {
                    name,
                    environment: environment.to_string(),
                });
            }
            dev_secret(name)
        }
    };
    if val.is_empty() && environment != "development" {
        return Err(ConfigError::EmptySecret {
            name,
            environment: environment.to_string(),
        });
    }
    Ok(val)
}

fn dev_secret(name: &str) -> String {
    format!("{DEV_SECRET_PREFIX}{name}-not-for-production")
}
