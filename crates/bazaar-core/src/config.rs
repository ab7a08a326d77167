//! Configuration module
//!
//! Env-based configuration for the API binary and services. Loaded once at
//! startup with [`Config::from_env`], validated, and injected; nothing
//! re-reads the environment after boot.

use std::env;

const DEFAULT_SERVER_PORT: u16 = 4000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;
const DEFAULT_UPLOAD_CONCURRENCY: usize = 8;

/// Selected media store backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaBackend {
    /// Remote CDN media store (Cloudinary-style HTTP API).
    Cdn,
    /// Local filesystem store for development and tests.
    Local,
}

impl MediaBackend {
    fn parse(value: &str) -> Result<Self, anyhow::Error> {
        match value.to_lowercase().as_str() {
            "cdn" => Ok(MediaBackend::Cdn),
            "local" => Ok(MediaBackend::Local),
            other => Err(anyhow::anyhow!("Unknown MEDIA_BACKEND: {}", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    server_port: u16,
    cors_origins: Vec<String>,
    environment: String,
    database_url: String,
    db_max_connections: u32,
    db_timeout_seconds: u64,
    media_backend: MediaBackend,
    // CDN backend
    cdn_cloud_name: Option<String>,
    cdn_api_key: Option<String>,
    cdn_api_secret: Option<String>,
    cdn_base_url: Option<String>,
    // Local backend
    local_media_path: Option<String>,
    local_media_base_url: Option<String>,
    upload_concurrency: usize,
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_opt(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        // .env is optional; real deployments set the environment directly
        dotenvy::dotenv().ok();

        let media_backend = match env_opt("MEDIA_BACKEND") {
            Some(v) => MediaBackend::parse(&v)?,
            None => MediaBackend::Cdn,
        };

        let config = Config {
            server_port: env_parsed("SERVER_PORT", DEFAULT_SERVER_PORT),
            cors_origins: env_opt("CORS_ORIGINS")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
            environment: env_opt("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env_parsed("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            db_timeout_seconds: env_parsed("DB_TIMEOUT_SECONDS", DEFAULT_DB_TIMEOUT_SECS),
            media_backend,
            cdn_cloud_name: env_opt("CDN_CLOUD_NAME"),
            cdn_api_key: env_opt("CDN_API_KEY"),
            cdn_api_secret: env_opt("CDN_API_SECRET"),
            cdn_base_url: env_opt("CDN_BASE_URL"),
            local_media_path: env_opt("LOCAL_MEDIA_PATH"),
            local_media_base_url: env_opt("LOCAL_MEDIA_BASE_URL"),
            upload_concurrency: env_parsed("UPLOAD_CONCURRENCY", DEFAULT_UPLOAD_CONCURRENCY),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.media_backend {
            MediaBackend::Cdn => {
                if self.cdn_cloud_name.is_none()
                    || self.cdn_api_key.is_none()
                    || self.cdn_api_secret.is_none()
                {
                    anyhow::bail!(
                        "MEDIA_BACKEND=cdn requires CDN_CLOUD_NAME, CDN_API_KEY and CDN_API_SECRET"
                    );
                }
            }
            MediaBackend::Local => {
                if self.local_media_path.is_none() || self.local_media_base_url.is_none() {
                    anyhow::bail!(
                        "MEDIA_BACKEND=local requires LOCAL_MEDIA_PATH and LOCAL_MEDIA_BASE_URL"
                    );
                }
            }
        }
        if self.upload_concurrency == 0 {
            anyhow::bail!("UPLOAD_CONCURRENCY must be at least 1");
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.db_timeout_seconds
    }

    pub fn media_backend(&self) -> MediaBackend {
        self.media_backend
    }

    pub fn cdn_cloud_name(&self) -> Option<&str> {
        self.cdn_cloud_name.as_deref()
    }

    pub fn cdn_api_key(&self) -> Option<&str> {
        self.cdn_api_key.as_deref()
    }

    pub fn cdn_api_secret(&self) -> Option<&str> {
        self.cdn_api_secret.as_deref()
    }

    pub fn cdn_base_url(&self) -> Option<&str> {
        self.cdn_base_url.as_deref()
    }

    pub fn local_media_path(&self) -> Option<&str> {
        self.local_media_path.as_deref()
    }

    pub fn local_media_base_url(&self) -> Option<&str> {
        self.local_media_base_url.as_deref()
    }

    pub fn upload_concurrency(&self) -> usize {
        self.upload_concurrency
    }

    /// Construct a config directly, bypassing the environment. Intended for
    /// tests and embedding.
    pub fn for_testing(database_url: String, local_media_path: String) -> Self {
        Config {
            server_port: 0,
            cors_origins: vec![],
            environment: "test".to_string(),
            database_url,
            db_max_connections: 2,
            db_timeout_seconds: 5,
            media_backend: MediaBackend::Local,
            cdn_cloud_name: None,
            cdn_api_key: None,
            cdn_api_secret: None,
            cdn_base_url: None,
            local_media_path: Some(local_media_path),
            local_media_base_url: Some("http://localhost:4000/media".to_string()),
            upload_concurrency: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_backend_parse() {
        assert_eq!(MediaBackend::parse("cdn").unwrap(), MediaBackend::Cdn);
        assert_eq!(MediaBackend::parse("LOCAL").unwrap(), MediaBackend::Local);
        assert!(MediaBackend::parse("s3").is_err());
    }

    #[test]
    fn test_validate_local_requires_paths() {
        let mut config = Config::for_testing("postgres://x".to_string(), "/tmp/m".to_string());
        assert!(config.validate().is_ok());
        config.local_media_path = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_cdn_requires_credentials() {
        let mut config = Config::for_testing("postgres://x".to_string(), "/tmp/m".to_string());
        config.media_backend = MediaBackend::Cdn;
        assert!(config.validate().is_err());
        config.cdn_cloud_name = Some("demo".to_string());
        config.cdn_api_key = Some("key".to_string());
        config.cdn_api_secret = Some("secret".to_string());
        assert!(config.validate().is_ok());
    }
}
