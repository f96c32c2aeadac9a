//! Command Line Configuration

use std::path::PathBuf;

use clap::Args;
use rebate::fixtures::DEFAULT_BASE_PATH;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "info")]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(long, global = true, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub(crate) log_format: LogFormat,
}

/// Fixture settings.
#[derive(Debug, Args)]
pub(crate) struct FixturesConfig {
    /// Directory holding `products/`, `carts/` and `coupons/` fixture files
    #[arg(long = "fixtures", global = true, env = "REBATE_FIXTURES", default_value = DEFAULT_BASE_PATH)]
    pub(crate) base_path: PathBuf,
}
