//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand, ValueHint};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "tribuna";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_GRACEFUL_SHUTDOWN_SECS: u64 = 30;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_FEED_CACHE_TTL_SECS: u64 = 20;

/// Command-line arguments for the Tribuna binary.
#[derive(Debug, Parser)]
#[command(name = "tribuna", version, about = "Tribuna blog server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "TRIBUNA_CONFIG_FILE", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the Tribuna HTTP service.
    Serve(ServeArgs),
    /// Apply pending database migrations and exit.
    Migrate(MigrateArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct MigrateArgs {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub graceful_shutdown_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(long = "log-json", value_name = "BOOL")]
    pub log_json: Option<bool>,

    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,

    /// Override the global feed cache TTL.
    #[arg(long = "cache-feed-ttl-seconds", value_name = "SECONDS")]
    pub cache_feed_ttl_seconds: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Read(#[from] config::ConfigError),
    #[error("invalid configuration value for `{field}`: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub graceful_shutdown: Duration,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub feed_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(default)]
    server: RawServer,
    #[serde(default)]
    database: RawDatabase,
    #[serde(default)]
    logging: RawLogging,
    #[serde(default)]
    cache: RawCache,
}

#[derive(Debug, Default, Deserialize)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
    graceful_shutdown_seconds: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDatabase {
    url: Option<String>,
    max_connections: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLogging {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCache {
    feed_ttl_seconds: Option<u64>,
}

/// Parse CLI arguments and load layered settings.
pub fn load_with_cli() -> Result<(CliArgs, Settings), ConfigError> {
    let cli = CliArgs::parse();
    let overrides = match &cli.command {
        Some(Command::Serve(args)) => args.overrides.clone(),
        Some(Command::Migrate(args)) => ServeOverrides {
            database_url: args.database_url.clone(),
            ..ServeOverrides::default()
        },
        None => ServeOverrides::default(),
    };
    let settings = load(cli.config_file.as_deref(), &overrides)?;
    Ok((cli, settings))
}

/// Load settings from the default file, an optional local file or explicit
/// path, environment variables, then CLI overrides, in that precedence.
pub fn load(
    config_file: Option<&std::path::Path>,
    overrides: &ServeOverrides,
) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix("TRIBUNA")
            .separator("__")
            .try_parsing(true),
    );

    let raw: RawSettings = builder.build()?.try_deserialize()?;
    resolve(raw, overrides)
}

fn resolve(raw: RawSettings, overrides: &ServeOverrides) -> Result<Settings, ConfigError> {
    let host = overrides
        .server_host
        .clone()
        .or(raw.server.host)
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = overrides
        .server_port
        .or(raw.server.port)
        .unwrap_or(DEFAULT_PORT);
    let graceful_shutdown = Duration::from_secs(
        overrides
            .graceful_shutdown_seconds
            .or(raw.server.graceful_shutdown_seconds)
            .unwrap_or(DEFAULT_GRACEFUL_SHUTDOWN_SECS),
    );

    let url = overrides
        .database_url
        .clone()
        .or(raw.database.url)
        .ok_or_else(|| ConfigError::invalid("database.url", "no database URL configured"))?;
    let max_connections = overrides
        .database_max_connections
        .or(raw.database.max_connections)
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
    if max_connections == 0 {
        return Err(ConfigError::invalid(
            "database.max_connections",
            "pool size must be at least 1",
        ));
    }

    let level_text = overrides
        .log_level
        .clone()
        .or(raw.logging.level)
        .unwrap_or_else(|| "info".to_string());
    let level = LevelFilter::from_str(&level_text)
        .map_err(|err| ConfigError::invalid("logging.level", err.to_string()))?;
    let format = match overrides.log_json.or(raw.logging.json).unwrap_or(false) {
        true => LogFormat::Json,
        false => LogFormat::Compact,
    };

    let feed_ttl = Duration::from_secs(
        overrides
            .cache_feed_ttl_seconds
            .or(raw.cache.feed_ttl_seconds)
            .unwrap_or(DEFAULT_FEED_CACHE_TTL_SECS),
    );

    Ok(Settings {
        server: ServerSettings {
            host,
            port,
            graceful_shutdown,
        },
        database: DatabaseSettings {
            url,
            max_connections,
        },
        logging: LoggingSettings { level, format },
        cache: CacheSettings { feed_ttl },
    })
}
