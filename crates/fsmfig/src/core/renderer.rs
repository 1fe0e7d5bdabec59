//! Core renderer trait for diagram output
//!
//! This trait defines the interface for rendering a topology into an
//! output representation (PDF bytes, DOT source, ...).

use anyhow::Result;

use super::Topology;

/// Core trait for diagram renderers
///
/// # Example
/// ```
/// use fsmfig::catalog::viewing_machine;
/// use fsmfig::core::Renderer;
/// use fsmfig::plugins::graphviz::DotRenderer;
///
/// let machine = viewing_machine().unwrap();
/// let dot = DotRenderer::new().render(&machine).unwrap();
/// assert!(dot.starts_with("digraph"));
/// ```
pub trait Renderer<T: Topology>: Send + Sync {
    /// The output type of this renderer
    type Output;

    /// Render the topology into the output format
    fn render(&self, topology: &T) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the supported output format
    fn format(&self) -> &'static str;
}
