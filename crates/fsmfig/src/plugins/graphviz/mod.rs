//! Graphviz export plugin
//!
//! Turns declarative machines into DOT source and hands it to Graphviz,
//! falling back to a second format when the first cannot be produced.

mod dot;
mod export;

pub use dot::DotRenderer;
pub use export::{
    export_with_fallback, ExportOutcome, GraphExporter, GraphvizExporter, OutputFormat,
    DEFAULT_DOT_PROGRAM, DOT_PROGRAM_ENV,
};

use std::path::PathBuf;

/// Where and how machines are exported
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub primary: OutputFormat,
    /// Tried once after the primary fails; `None` disables it
    pub fallback: Option<OutputFormat>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            primary: OutputFormat::Pdf,
            fallback: Some(OutputFormat::Png),
        }
    }
}

impl ExportConfig {
    /// Write DOT source only, with nothing to fall back to
    pub fn dot_only(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            primary: OutputFormat::Dot,
            fallback: None,
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Output path without extension
    pub fn base_path(&self, base_name: &str) -> PathBuf {
        self.output_dir.join(base_name)
    }

    /// Path the primary format would be written to
    pub fn primary_path(&self, base_name: &str) -> PathBuf {
        self.primary.path_for(&self.base_path(base_name))
    }
}
