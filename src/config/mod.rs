//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::cache::CacheConfig;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "jokebox";
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_STORAGE_DIRECTORY: &str = "objects";
const DEFAULT_STORAGE_BUCKET: &str = "jokes";

/// Command-line arguments for the jokebox binary.
#[derive(Debug, Parser)]
#[command(name = "jokebox", version, about = "Jokebox cache pipeline tools")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "JOKEBOX_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print the number of jokes in the catalog.
    Total,
    /// Fetch one joke by its zero-based catalog index.
    Fetch(FetchArgs),
    /// Fetch a uniformly random joke.
    Random(RandomArgs),
}

#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    /// Zero-based catalog index.
    #[arg(value_name = "ID")]
    pub id: usize,

    /// Write the image to this path instead of stdout.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct RandomArgs {
    /// Write the image to this path instead of stdout.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct Overrides {
    /// Override the redis connection URL.
    #[arg(long = "redis-url", value_name = "URL")]
    pub redis_url: Option<String>,

    /// Override the distributed-tier key namespace.
    #[arg(long = "cache-key-prefix", value_name = "PREFIX")]
    pub cache_key_prefix: Option<String>,

    /// Override the object store root directory.
    #[arg(long = "storage-directory", value_name = "PATH")]
    pub storage_directory: Option<PathBuf>,

    /// Override the logical bucket enumerated for jokes.
    #[arg(long = "storage-bucket", value_name = "NAME")]
    pub storage_bucket: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub redis: RedisSettings,
    pub storage: StorageSettings,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct RedisSettings {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub directory: PathBuf,
    pub bucket: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("JOKEBOX").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    redis: RawRedisSettings,
    storage: RawStorageSettings,
    cache: CacheConfig,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(url) = overrides.redis_url.as_ref() {
            self.redis.url = Some(url.clone());
        }
        if let Some(prefix) = overrides.cache_key_prefix.as_ref() {
            self.cache.key_prefix = prefix.clone();
        }
        if let Some(directory) = overrides.storage_directory.as_ref() {
            self.storage.directory = Some(directory.clone());
        }
        if let Some(bucket) = overrides.storage_bucket.as_ref() {
            self.storage.bucket = Some(bucket.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRedisSettings {
    url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawStorageSettings {
    directory: Option<PathBuf>,
    bucket: Option<String>,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let level = match raw.logging.level {
            Some(level) => LevelFilter::from_str(&level)
                .map_err(|_| LoadError::invalid("logging.level", format!("`{level}` is not a log level")))?,
            None => LevelFilter::INFO,
        };
        let format = if raw.logging.json.unwrap_or(false) {
            LogFormat::Json
        } else {
            LogFormat::Compact
        };

        let bucket = raw
            .storage
            .bucket
            .unwrap_or_else(|| DEFAULT_STORAGE_BUCKET.to_string());
        if bucket.is_empty() || bucket.contains(['/', '\\']) {
            return Err(LoadError::invalid(
                "storage.bucket",
                "bucket must be a single non-empty path segment",
            ));
        }

        if raw.cache.key_prefix.is_empty() {
            return Err(LoadError::invalid(
                "cache.key_prefix",
                "prefix must not be empty",
            ));
        }
        if raw.cache.blob_ttl_seconds == 0 || raw.cache.listing_ttl_seconds == 0 {
            return Err(LoadError::invalid(
                "cache",
                "ttl values must be at least one second",
            ));
        }
        if raw.cache.op_timeout_ms == 0 || raw.cache.populate_timeout_ms == 0 {
            return Err(LoadError::invalid(
                "cache",
                "timeout budgets must be at least one millisecond",
            ));
        }

        Ok(Self {
            logging: LoggingSettings { level, format },
            redis: RedisSettings {
                url: raw
                    .redis
                    .url
                    .unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            },
            storage: StorageSettings {
                directory: raw
                    .storage
                    .directory
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIRECTORY)),
                bucket,
            },
            cache: raw.cache,
        })
    }
}
