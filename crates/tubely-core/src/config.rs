//! Configuration module
//!
//! The service configuration is loaded once at startup from environment variables
//! (after loading a `.env` file if present), validated, and then shared read-only.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_THUMBNAIL_SIZE_MB: u64 = 10;
const MAX_VIDEO_SIZE_MB: u64 = 1024;
const ASSETS_ROOT: &str = "./assets";
const ASSETS_PATH_PREFIX: &str = "/assets";

/// Where thumbnails end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailStorage {
    /// Embedded in the record as a `data:` URI.
    Inline,
    /// Written under the assets root and served by the static file route.
    Local,
}

impl FromStr for ThumbnailStorage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inline" => Ok(ThumbnailStorage::Inline),
            "local" => Ok(ThumbnailStorage::Local),
            _ => Err(anyhow::anyhow!("Invalid thumbnail storage: {}", s)),
        }
    }
}

impl Display for ThumbnailStorage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ThumbnailStorage::Inline => write!(f, "inline"),
            ThumbnailStorage::Local => write!(f, "local"),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    /// Scheme, host and port used to build URLs for locally served assets.
    pub public_base_url: String,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Thumbnails
    pub thumbnail_storage: ThumbnailStorage,
    pub assets_root: PathBuf,
    pub assets_path_prefix: String,
    pub max_thumbnail_size_bytes: u64,
    // Videos
    pub max_video_size_bytes: u64,
    pub video_storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO, R2, ...)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    /// Directory for upload scratch files.
    pub scratch_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from any key lookup, applying defaults. Does not validate.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_port = match var("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid port number, got '{}'", port))?,
            None => SERVER_PORT,
        };

        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let public_base_url = var("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", server_port))
            .trim_end_matches('/')
            .to_string();

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let thumbnail_storage = match var("THUMBNAIL_STORAGE") {
            Some(value) => value.parse()?,
            None => ThumbnailStorage::Inline,
        };

        let video_storage_backend = match var("VIDEO_STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::S3,
        };

        let max_thumbnail_size_bytes = megabytes_to_bytes(
            "MAX_THUMBNAIL_SIZE_MB",
            parse_var(var("MAX_THUMBNAIL_SIZE_MB"), "MAX_THUMBNAIL_SIZE_MB", MAX_THUMBNAIL_SIZE_MB)?,
        )?;
        let max_video_size_bytes = megabytes_to_bytes(
            "MAX_VIDEO_SIZE_MB",
            parse_var(var("MAX_VIDEO_SIZE_MB"), "MAX_VIDEO_SIZE_MB", MAX_VIDEO_SIZE_MB)?,
        )?;

        Ok(Config {
            server_port,
            environment,
            public_base_url,
            cors_origins,
            jwt_secret: var("JWT_SECRET").unwrap_or_default(),
            database_url: var("DATABASE_URL").unwrap_or_default(),
            db_max_connections: parse_var(
                var("DB_MAX_CONNECTIONS"),
                "DB_MAX_CONNECTIONS",
                MAX_CONNECTIONS,
            )?,
            db_timeout_seconds: parse_var(
                var("DB_TIMEOUT_SECONDS"),
                "DB_TIMEOUT_SECONDS",
                CONNECTION_TIMEOUT_SECS,
            )?,
            thumbnail_storage,
            assets_root: PathBuf::from(var("ASSETS_ROOT").unwrap_or_else(|| ASSETS_ROOT.into())),
            assets_path_prefix: var("ASSETS_PATH_PREFIX")
                .unwrap_or_else(|| ASSETS_PATH_PREFIX.to_string())
                .trim_end_matches('/')
                .to_string(),
            max_thumbnail_size_bytes,
            max_video_size_bytes,
            video_storage_backend,
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION").or_else(|| var("AWS_REGION")),
            s3_endpoint: var("S3_ENDPOINT"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL"),
            scratch_dir: var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !(self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if !self.assets_path_prefix.starts_with('/') {
            return Err(anyhow::anyhow!(
                "ASSETS_PATH_PREFIX must start with '/', got '{}'",
                self.assets_path_prefix
            ));
        }

        if self.max_thumbnail_size_bytes == 0 || self.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_THUMBNAIL_SIZE_MB and MAX_VIDEO_SIZE_MB must be greater than zero"
            ));
        }

        match self.video_storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.local_storage_base_url.as_deref()
    }
}

/// Parse an optional variable, falling back to `default` only when it is unset.
fn parse_var<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, anyhow::Error> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer, got '{}'", key, raw)),
        None => Ok(default),
    }
}

fn megabytes_to_bytes(key: &str, megabytes: u64) -> Result<u64, anyhow::Error> {
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("{} is too large, got {}", key, megabytes))
}
