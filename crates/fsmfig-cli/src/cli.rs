//! Options shared by both binaries
//!
//! Logging flags, colour choice, and the output-path helpers used when
//! printing status lines.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use fsmfig::core::logging::{init_logging, LOG_FORMAT_ENV, LOG_LEVEL_ENV};

/// Flags common to `fsm-figure` and `fsm-export`
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Directory the diagrams are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error|off)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl CommonArgs {
    /// Install the global subscriber (environment variables take precedence)
    pub fn init_logging(&self) {
        let log_level_str = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| self.log_level.as_str().to_string());

        let log_format_str = std::env::var(LOG_FORMAT_ENV)
            .ok()
            .unwrap_or_else(|| self.log_format.as_str().to_string());

        if let Err(e) = init_logging(Some(&log_level_str), Some(&log_format_str)) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }
    }

    /// Make sure the output directory exists
    pub fn prepare_output_dir(&self) -> Result<&Path> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory '{}'",
                self.output_dir.display()
            )
        })?;
        Ok(&self.output_dir)
    }
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// When to colorize status lines
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if stdout is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Resolve against the environment and stdout
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var_os("NO_COLOR").is_some() {
                    return false;
                }
                crossterm::tty::IsTty::is_tty(&std::io::stdout())
            }
        }
    }
}

/// Path as shown to the user: relative to the working directory when the
/// output directory is the default `.`
pub fn display_path(path: &Path) -> String {
    path.strip_prefix(".").unwrap_or(path).display().to_string()
}
