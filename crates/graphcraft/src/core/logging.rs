//! Logging infrastructure for graph building
//!
//! Structured logging uses the `tracing` crate. Every pipeline stage opens a
//! span (`parse_graph`, `validate_graph`, `layout_graph`, `assemble_graph`)
//! and reports counts at `debug`, per-element detail at `trace` and skipped
//! input at `warn`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use graphcraft::core::logging::init_logging;
//!
//! // Defaults: level from env or `info`, compact format
//! init_logging(None, None).unwrap();
//! ```
//!
//! # Environment Variables
//!
//! - `GRAPHCRAFT_LOG_LEVEL`: log level or filter directive
//! - `GRAPHCRAFT_LOG_FORMAT`: `compact`, `pretty` or `json`
//! - `RUST_LOG`: standard `tracing-subscriber` filter, used when the above is unset
//!
//! # Filtering Logs
//!
//! ```bash
//! # Only the DSL parser at debug level
//! RUST_LOG="graphcraft::parsers::dsl=debug" graphcraft build -i graph.txt
//!
//! # Everything at info, layout backends at trace
//! RUST_LOG="info,graphcraft::layout=trace" graphcraft build -i graph.txt
//! ```
//!
//! On wasm32 the subscriber is `tracing-wasm`, which writes to the browser
//! console; level and format arguments are ignored there.

use std::fmt;
use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{
    fmt::{self as subscriber_fmt, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Environment variable holding the log level
pub const LOG_LEVEL_ENV: &str = "GRAPHCRAFT_LOG_LEVEL";

/// Environment variable holding the log format
pub const LOG_FORMAT_ENV: &str = "GRAPHCRAFT_LOG_FORMAT";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact single-line format
    #[default]
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Resolve the effective level: argument, then `GRAPHCRAFT_LOG_LEVEL`, then
/// `RUST_LOG`, then `info`.
pub fn resolve_level(level: Option<&str>) -> String {
    level
        .map(str::to_string)
        .or_else(|| std::env::var(LOG_LEVEL_ENV).ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string())
}

/// Resolve the effective format: argument, then `GRAPHCRAFT_LOG_FORMAT`, then
/// `compact`.
pub fn resolve_format(format: Option<&str>) -> Result<LogFormat, String> {
    match format
        .map(str::to_string)
        .or_else(|| std::env::var(LOG_FORMAT_ENV).ok())
    {
        Some(name) => name.parse(),
        None => Ok(LogFormat::default()),
    }
}

/// Initialize the global tracing subscriber
///
/// Returns an error for an unknown format, or when a global subscriber is
/// already installed. An unparsable level falls back to `info`.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = (level, format);
        tracing_wasm::set_as_global_default_with_config(
            tracing_wasm::WASMLayerConfig::default(),
        );
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let log_level = resolve_level(level);
        let log_format = resolve_format(format).map_err(|e| format!("Invalid log format: {}", e))?;

        let filter = if log_level == "off" {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"))
        };

        // stdout carries command output
        let layer = subscriber_fmt::Layer::default()
            .with_level(true)
            .with_writer(std::io::stderr);
        match log_format {
            LogFormat::Compact => Registry::default()
                .with(filter)
                .with(
                    layer
                        .with_target(false)
                        .with_file(false)
                        .with_line_number(false)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init()?,
            LogFormat::Pretty => Registry::default()
                .with(filter)
                .with(
                    layer
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .pretty(),
                )
                .try_init()?,
            LogFormat::Json => Registry::default()
                .with(filter)
                .with(
                    layer
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .json(),
                )
                .try_init()?,
        }

        Ok(())
    }
}

/// Initialize logging with default settings (info level, compact format)
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}
