use std::path::PathBuf;

use super::error::{Result, ServerError};

/// Default placeholder used when a product has no image at all
pub const DEFAULT_PLACEHOLDER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1546069901-ba9599a7e63c?w=400";

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | working directory (database, logs) |
/// | DATABASE_PATH | {WORK_DIR}/menu.db | SQLite file |
/// | HTTP_PORT | 3000 | HTTP port |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | info | tracing level |
/// | LOG_DIR | - | daily rolling log files when set |
/// | LOG_JSON | false | JSON log lines |
/// | STORAGE_PUBLIC_URL | - | base URL for relative storage paths |
/// | PLACEHOLDER_IMAGE_URL | unsplash filler | image of last resort |
/// | REQUEST_TIMEOUT_MS | 30000 | request timeout |
/// | IMAGE_PROBE_TIMEOUT_MS | 5000 | per HEAD request |
/// | IMAGE_PROBE_CONCURRENCY | 8 | parallel HEAD requests |
///
/// ```ignore
/// WORK_DIR=/srv/menu HTTP_PORT=8080 cargo run -p menu-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub database_path: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub log_json: bool,
    /// Public base URL of the object storage, e.g. `https://cdn.example.com/storage/v1/object/public`
    pub storage_public_url: Option<String>,
    pub placeholder_image_url: String,
    pub request_timeout_ms: u64,
    pub image_probe_timeout_ms: u64,
    pub image_probe_concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("menu.db")
                .to_string_lossy()
                .into_owned()
        });

        Self {
            database_path,
            http_port: parse_env("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: non_empty_env("LOG_DIR"),
            log_json: parse_env("LOG_JSON", false),
            storage_public_url: non_empty_env("STORAGE_PUBLIC_URL")
                .map(|u| u.trim_end_matches('/').to_string()),
            placeholder_image_url: non_empty_env("PLACEHOLDER_IMAGE_URL")
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER_IMAGE_URL.into()),
            request_timeout_ms: parse_env("REQUEST_TIMEOUT_MS", 30_000),
            image_probe_timeout_ms: parse_env("IMAGE_PROBE_TIMEOUT_MS", 5_000),
            image_probe_concurrency: parse_env::<usize>("IMAGE_PROBE_CONCURRENCY", 8).max(1),
            work_dir,
        }
    }

    /// Reject values the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if !matches!(
            self.environment.as_str(),
            "development" | "staging" | "production"
        ) {
            return Err(ServerError::Config(format!(
                "unknown ENVIRONMENT '{}'",
                self.environment
            )));
        }
        if self.http_port == 0 {
            return Err(ServerError::Config("HTTP_PORT must not be 0".into()));
        }
        if self.request_timeout_ms == 0 || self.image_probe_timeout_ms == 0 {
            return Err(ServerError::Config("timeouts must be positive".into()));
        }
        if let Some(url) = &self.storage_public_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ServerError::Config(format!(
                "STORAGE_PUBLIC_URL must be an http(s) URL, got '{url}'"
            )));
        }
        Ok(())
    }

    /// Production logs are always JSON
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            work_dir: "./data".into(),
            database_path: ":memory:".into(),
            http_port: 3000,
            environment: "development".into(),
            log_level: "info".into(),
            log_dir: None,
            log_json: false,
            storage_public_url: None,
            placeholder_image_url: DEFAULT_PLACEHOLDER_IMAGE_URL.into(),
            request_timeout_ms: 30_000,
            image_probe_timeout_ms: 5_000,
            image_probe_concurrency: 8,
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn rejects_unknown_environment() {
        let config = Config {
            environment: "prod".into(),
            ..base()
        };
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn rejects_non_http_storage_url() {
        let config = Config {
            storage_public_url: Some("s3://bucket".into()),
            ..base()
        };
        assert!(config.validate().is_err());

        let config = Config {
            storage_public_url: Some("https://cdn.test/storage".into()),
            ..base()
        };
        assert!(config.validate().is_ok());
    }
}
