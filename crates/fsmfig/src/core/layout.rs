//! Core layout trait for diagram positioning
//!
//! This trait defines the interface for arranging states and transitions
//! in a coordinate system before drawing.

use anyhow::Result;

use super::Topology;

/// Core trait for layout algorithms
///
/// Each figure style can choose its own strategy; the hand-placed figure
/// uses a fixed coordinate table.
pub trait LayoutAlgorithm<T: Topology>: Send + Sync {
    /// The output type of this layout algorithm
    type Output;

    /// Arrange the elements of a topology
    fn layout(&self, topology: &T) -> Result<Self::Output>;

    /// Get the name of this layout algorithm
    fn name(&self) -> &'static str;
}
