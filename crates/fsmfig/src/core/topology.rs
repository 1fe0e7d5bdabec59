//! Core topology trait for state-machine graph access
//!
//! Renderers and layout algorithms read machines through this trait rather
//! than through a concrete type, so any immutable state graph can be drawn.

/// Read-only view of a state graph
///
/// The associated types allow each implementation to expose its own node
/// and edge records. Topologies are built once and never mutated, so there
/// are no insertion methods here.
pub trait Topology: Send + Sync {
    /// The node data type for this topology
    type Node: Clone + Send + Sync;

    /// The edge data type for this topology
    type Edge: Clone + Send + Sync;

    /// Name of the machine this topology describes
    fn name(&self) -> &str;

    /// Get a node by ID
    fn get_node(&self, id: &str) -> Option<&Self::Node>;

    /// Iterate over all nodes in declaration order
    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    /// Iterate over all edges in declaration order
    fn edges(&self) -> impl Iterator<Item = &Self::Edge>;

    /// Get the number of nodes
    fn node_count(&self) -> usize;

    /// Get the number of edges
    fn edge_count(&self) -> usize;
}
