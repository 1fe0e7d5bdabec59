//! Exporting DOT source to files
//!
//! `GraphvizExporter` pipes the DOT text into the Graphviz `dot` program.
//! `export_with_fallback` tries a primary format and, only if that fails,
//! one fallback format, reporting what happened as an `ExportOutcome`.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::core::DiagramError;

/// Environment variable naming the Graphviz program
pub const DOT_PROGRAM_ENV: &str = "FSMFIG_DOT";

/// Program used when nothing else is configured
pub const DEFAULT_DOT_PROGRAM: &str = "dot";

/// File formats an exporter can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Pdf,
    Png,
    /// Raw DOT source, written without invoking Graphviz
    Dot,
}

impl OutputFormat {
    /// File extension, also the Graphviz `-T` value
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Png => "png",
            OutputFormat::Dot => "dot",
        }
    }

    /// Path for `base` with this format's extension
    pub fn path_for(self, base: &Path) -> PathBuf {
        base.with_extension(self.extension())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "png" => Ok(OutputFormat::Png),
            "dot" | "gv" => Ok(OutputFormat::Dot),
            _ => Err(format!("Unknown output format: {}. Use pdf, png, or dot", s)),
        }
    }
}

/// Writes DOT source to a file in some format
pub trait GraphExporter: Send + Sync {
    /// Produce `path` from `dot` in the given format
    fn export(&self, dot: &str, format: OutputFormat, path: &Path) -> Result<()>;

    /// Get the name of this exporter
    fn name(&self) -> &'static str;
}

/// Exporter backed by the Graphviz command-line program
#[derive(Debug, Clone)]
pub struct GraphvizExporter {
    program: PathBuf,
}

impl Default for GraphvizExporter {
    fn default() -> Self {
        Self::new(DEFAULT_DOT_PROGRAM)
    }
}

impl GraphvizExporter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Program from `FSMFIG_DOT`, or `dot`
    pub fn from_env() -> Self {
        match std::env::var_os(DOT_PROGRAM_ENV) {
            Some(program) if !program.is_empty() => Self::new(program),
            _ => Self::default(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn run_graphviz(&self, dot: &str, format: OutputFormat, path: &Path) -> Result<(), DiagramError> {
        let program = self.program.display();
        trace!(program = %program, format = %format, path = %path.display(), "Spawning Graphviz");

        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", format.extension()))
            .arg("-o")
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                DiagramError::export_error(format!("failed to run '{}': {}", program, e))
            })?;

        // dot may exit before reading everything; its status and stderr explain why
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(dot.as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output().map_err(|e| {
            DiagramError::export_error(format!("failed to wait for '{}': {}", program, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DiagramError::export_error(format!(
                "'{}' failed ({}): {}",
                program,
                output.status,
                stderr.trim()
            )));
        }
        write_result.map_err(|e| {
            DiagramError::export_error(format!("failed to write DOT to '{}': {}", program, e))
        })?;

        debug!(path = %path.display(), "Graphviz export finished");
        Ok(())
    }
}

impl GraphExporter for GraphvizExporter {
    fn export(&self, dot: &str, format: OutputFormat, path: &Path) -> Result<()> {
        match format {
            OutputFormat::Dot => fs::write(path, dot)
                .with_context(|| format!("Failed to write '{}'", path.display())),
            _ => Ok(self.run_graphviz(dot, format, path)?),
        }
    }

    fn name(&self) -> &'static str {
        "graphviz"
    }
}

/// Result of exporting one graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportOutcome {
    /// Primary format written
    Primary { path: PathBuf },
    /// Primary failed, fallback written
    Fallback { path: PathBuf, primary_error: String },
    /// Nothing written; `fallback_error` is absent when no fallback ran
    Failed {
        primary_error: String,
        fallback_error: Option<String>,
    },
}

impl ExportOutcome {
    /// File actually written, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            ExportOutcome::Primary { path } | ExportOutcome::Fallback { path, .. } => Some(path),
            ExportOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ExportOutcome::Failed { .. })
    }

    pub fn used_fallback(&self) -> bool {
        matches!(self, ExportOutcome::Fallback { .. })
    }
}

/// Export `dot` as `base.<primary>`, then as `base.<fallback>` if that fails
///
/// The fallback runs at most once and only after the primary failed.
pub fn export_with_fallback(
    exporter: &dyn GraphExporter,
    dot: &str,
    base: &Path,
    primary: OutputFormat,
    fallback: Option<OutputFormat>,
) -> ExportOutcome {
    let primary_path = primary.path_for(base);
    let primary_error = match exporter.export(dot, primary, &primary_path) {
        Ok(()) => return ExportOutcome::Primary { path: primary_path },
        Err(e) => format!("{:#}", e),
    };
    warn!(path = %primary_path.display(), error = %primary_error, "Primary export failed");

    let Some(fallback) = fallback else {
        return ExportOutcome::Failed {
            primary_error,
            fallback_error: None,
        };
    };

    let fallback_path = fallback.path_for(base);
    match exporter.export(dot, fallback, &fallback_path) {
        Ok(()) => ExportOutcome::Fallback {
            path: fallback_path,
            primary_error,
        },
        Err(e) => ExportOutcome::Failed {
            primary_error,
            fallback_error: Some(format!("{:#}", e)),
        },
    }
}
