use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" | "local" => Self::Development,
            "test" | "ci" => Self::Test,
            _ => Self::Production,
        }
    }

    /// Whether error responses may carry internal details.
    pub fn exposes_error_details(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub cms: CmsConfig,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        // Unset or unrecognised values resolve to production.
        let environment = AppEnvironment::from_str(&env::var("APP_ENV").unwrap_or_default());

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let project_id = non_empty_var("NEXT_PUBLIC_SANITY_PROJECT_ID");
        if let Some(id) = project_id.as_deref() {
            if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(ConfigError::InvalidProjectId);
            }
        }

        let cms = CmsConfig {
            project_id,
            dataset: non_empty_var("NEXT_PUBLIC_SANITY_DATASET")
                .unwrap_or_else(|| "production".to_string()),
            api_version: non_empty_var("SANITY_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            write_token: non_empty_var("SANITY_WRITE_TOKEN")
                .or_else(|| non_empty_var("SANITY_API_WRITE_TOKEN")),
        };

        let rate_limit = RateLimitConfig {
            redis_url: non_empty_var("RATE_LIMIT_REDIS_URL"),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            cms,
            rate_limit,
        })
    }
}

const DEFAULT_API_VERSION: &str = "2024-01-01";

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Addressing and credentials for the hosted content store.
#[derive(Clone)]
pub struct CmsConfig {
    pub project_id: Option<String>,
    pub dataset: String,
    pub api_version: String,
    pub write_token: Option<String>,
}

impl fmt::Debug for CmsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CmsConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("write_token", &self.write_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Backend selection for submission rate limiting.
#[derive(Debug, Clone, Default)]
pub struct RateLimitConfig {
    pub redis_url: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidProjectId,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidProjectId => write!(
                f,
                "NEXT_PUBLIC_SANITY_PROJECT_ID may only contain letters, digits and dashes"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidProjectId => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
