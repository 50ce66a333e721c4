use anyhow::anyhow;
use clap::Parser;
use climate_core::{
    find_config_file, load_config, ConfigSource, CONFIG_ENV_VAR, CONFIG_FILE_NAME,
    DEFAULT_API_PORT, DEFAULT_DATABASE_URL,
};
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::env;
use time::{format_description::well_known::Iso8601, OffsetDateTime};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Climate API - read-only JSON endpoints over daily station observations"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $CLIMATE_API_CONFIG, ./climate-api.toml,
    /// $XDG_CONFIG_HOME/climate-api/climate-api.toml, /etc/climate-api/climate-api.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "CLIMATE_API_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, env = "CLIMATE_API_HOST")]
    #[serde(alias = "domain")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CLIMATE_API_PORT")]
    pub port: Option<String>,

    /// Connection string of the observation dataset, e.g. sqlite:Resources/hawaii.sqlite
    #[arg(short, long, env = "CLIMATE_API_DATABASE_URL")]
    #[serde(alias = "database")]
    pub database_url: Option<String>,
}

impl Cli {
    pub fn host(&self) -> String {
        self.host.clone().unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| DEFAULT_API_PORT.to_string())
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
    }

    /// Fills every unset value from `file_config`
    pub fn merge(self, file_config: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(file_config.level),
            host: self.host.or(file_config.host),
            port: self.port.or(file_config.port),
            database_url: self.database_url.or(file_config.database_url),
        }
    }
}

/// Load configuration from CLI args, config file, and environment
///
/// Returns the merged config together with where the file values came from,
/// so the caller can report it once logging is up.
pub fn get_config_info() -> anyhow::Result<(Cli, ConfigSource)> {
    let cli_args = Cli::parse();

    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file(CONFIG_ENV_VAR, CONFIG_FILE_NAME)
    };

    let cli = resolve_config(cli_args, &source)?;
    Ok((cli, source))
}

/// Merges the file at `source` under `cli_args`. A file that exists but
/// cannot be read or parsed is an error.
pub fn resolve_config(cli_args: Cli, source: &ConfigSource) -> anyhow::Result<Cli> {
    let file_config: Cli = load_config(source)
        .map_err(|e| anyhow!("error loading config file {}: {}", source, e))?;

    // env vars are already folded into cli_args by clap
    Ok(cli_args.merge(file_config))
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    match level_str.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                OffsetDateTime::now_utc()
                    .format(&Iso8601::DEFAULT)
                    .unwrap_or_default(),
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
