use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::screening::{Grade, GradeParseError, ShortlistCriteria, DEFAULT_SKILL_KEYWORDS};

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
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub screening: ScreeningConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            screening: ScreeningConfig::from_env()?,
        })
    }
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Largest multipart upload the HTTP routes accept.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Default shortlisting thresholds and skill vocabulary; hosts may override per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningConfig {
    pub criteria: ShortlistCriteria,
    pub skill_keywords: Vec<String>,
    pub max_upload_bytes: usize,
}

impl ScreeningConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = ShortlistCriteria::default();
        let criteria = ShortlistCriteria {
            min_ol_grade: grade_from_env("SHORTLIST_MIN_OL_GRADE", defaults.min_ol_grade)?,
            min_al_grade: grade_from_env("SHORTLIST_MIN_AL_GRADE", defaults.min_al_grade)?,
            require_experience: match env::var("SHORTLIST_REQUIRE_EXPERIENCE") {
                Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                    key: "SHORTLIST_REQUIRE_EXPERIENCE",
                    value: raw,
                })?,
                Err(_) => defaults.require_experience,
            },
        };

        let skill_keywords = match env::var("SHORTLIST_SKILLS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|keyword| !keyword.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => DEFAULT_SKILL_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        };

        let max_upload_bytes = match env::var("SHORTLIST_MAX_UPLOAD_BYTES") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidUploadLimit { value: raw })?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            criteria,
            skill_keywords,
            max_upload_bytes,
        })
    }
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            criteria: ShortlistCriteria::default(),
            skill_keywords: DEFAULT_SKILL_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

fn grade_from_env(key: &'static str, default: Grade) -> Result<Grade, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|source| ConfigError::InvalidGrade { key, source }),
        Err(_) => Ok(default),
    }
}

/// Lenient yes/no parsing shared by env vars, CLI flags and form fields.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" | "" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidGrade {
        key: &'static str,
        source: GradeParseError,
    },
    InvalidFlag {
        key: &'static str,
        value: String,
    },
    InvalidUploadLimit {
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidGrade { key, source } => write!(f, "{key} is invalid: {source}"),
            ConfigError::InvalidFlag { key, value } => {
                write!(f, "{key} must be true or false, got '{value}'")
            }
            ConfigError::InvalidUploadLimit { value } => write!(
                f,
                "SHORTLIST_MAX_UPLOAD_BYTES must be a positive byte count, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidFlag { .. }
            | ConfigError::InvalidUploadLimit { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidGrade { source, .. } => Some(source),
        }
    }
}
