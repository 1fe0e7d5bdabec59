//! Hand-placed state figure plugin
//!
//! Renders the composite matching-module machine as a single PDF page:
//! fixed coordinates, circles for states, straight arrows between circle
//! edges, labels offset beside each arrow.

mod layout;
mod renderer;

pub use layout::{
    clip_to_circles, label_anchor, FigureLayoutResult, FixedLayout, PositionedState,
    PositionedTransition,
};
pub use renderer::{FigureRenderer, FigureStyle};

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::catalog::matching_module_machine;
use crate::core::Renderer;

/// File written by the figure generator
pub const FIGURE_FILE_NAME: &str = "matching_fsm.pdf";

/// Where the figure goes
#[derive(Debug, Clone)]
pub struct FigureConfig {
    pub output_dir: PathBuf,
    pub file_name: String,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            file_name: FIGURE_FILE_NAME.to_string(),
        }
    }
}

impl FigureConfig {
    /// Full path of the output file
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }
}

/// Build, lay out, render and write the matching-module figure
///
/// Any failure is returned to the caller; there is no fallback format.
pub fn generate_figure(config: &FigureConfig) -> Result<PathBuf> {
    let machine = matching_module_machine()?;
    let pdf = FigureRenderer::matching_module().render(&machine)?;

    let path = config.output_path();
    fs::write(&path, &pdf)
        .with_context(|| format!("Failed to write figure '{}'", path.display()))?;

    info!(path = %path.display(), bytes = pdf.len(), "Figure written");
    Ok(path)
}
