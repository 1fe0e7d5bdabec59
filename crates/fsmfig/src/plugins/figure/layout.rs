//! Fixed-coordinate layout for hand-placed figures
//!
//! Every state sits at a coordinate chosen by hand. Edges run along the
//! line between two centres and are clipped to the circle boundaries;
//! labels sit at the edge midpoint, pushed sideways so they do not cover
//! the line.

use anyhow::Result;
use tracing::{debug, span, trace, Level};

use crate::core::{
    DiagramError, EdgeStyle, LayoutAlgorithm, Point, StateData, StateRole, Topology,
    TransitionData,
};

/// Positioned state for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedState {
    pub id: String,
    pub label: String,
    pub role: StateRole,
    pub center: Point,
    pub radius: f64,
}

/// Positioned transition for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedTransition {
    pub from_id: String,
    pub to_id: String,
    pub label: String,
    pub style: EdgeStyle,
    /// Point on the source circle where the edge leaves
    pub start: Point,
    /// Point on the target circle where the arrow tip lands
    pub end: Point,
    /// Centre of the edge label
    pub label_anchor: Point,
}

impl PositionedTransition {
    /// Direction vector from start to end
    pub fn direction(&self) -> Point {
        Point::new(self.end.x - self.start.x, self.end.y - self.start.y)
    }
}

/// Layout result containing positioned elements
#[derive(Debug, Clone, PartialEq)]
pub struct FigureLayoutResult {
    pub states: Vec<PositionedState>,
    pub transitions: Vec<PositionedTransition>,
}

impl FigureLayoutResult {
    pub fn state(&self, id: &str) -> Option<&PositionedState> {
        self.states.iter().find(|s| s.id == id)
    }
}

/// Endpoints of the segment joining two circles, clipped to their edges
///
/// Returns `None` when the centres coincide.
pub fn clip_to_circles(c1: Point, r1: f64, c2: Point, r2: f64) -> Option<(Point, Point)> {
    let (dx, dy) = (c2.x - c1.x, c2.y - c1.y);
    let dist = dx.hypot(dy);
    if dist == 0.0 {
        return None;
    }
    let (ux, uy) = (dx / dist, dy / dist);
    let start = Point::new(c1.x + ux * r1, c1.y + uy * r1);
    let end = Point::new(c2.x - ux * r2, c2.y - uy * r2);
    Some((start, end))
}

/// Midpoint of `start..end` shifted by `offset` along the left-hand normal
///
/// The normal is `(-dy, dx)` of the segment direction. Returns `None` for a
/// zero-length segment.
pub fn label_anchor(start: Point, end: Point, offset: f64) -> Option<Point> {
    let (dx, dy) = (end.x - start.x, end.y - start.y);
    let dist = dx.hypot(dy);
    if dist == 0.0 {
        return None;
    }
    let mid = start.midpoint(end);
    Some(Point::new(
        mid.x - dy / dist * offset,
        mid.y + dx / dist * offset,
    ))
}

/// Layout that reads every state's centre from a fixed table
#[derive(Debug, Clone)]
pub struct FixedLayout {
    positions: Vec<(String, Point)>,
    /// State circle radius
    pub radius: f64,
    /// Perpendicular distance between an edge and its label
    pub label_offset: f64,
}

impl FixedLayout {
    pub fn new(radius: f64, label_offset: f64) -> Self {
        Self {
            positions: Vec::new(),
            radius,
            label_offset,
        }
    }

    /// Place a state; a later call for the same id replaces the position
    pub fn with_position(mut self, id: impl Into<String>, x: f64, y: f64) -> Self {
        let id = id.into();
        self.positions.retain(|(existing, _)| *existing != id);
        self.positions.push((id, Point::new(x, y)));
        self
    }

    /// Coordinates of the composite matching-module figure
    ///
    /// Main flow runs left to right along the top row, then turns down to
    /// ranking and back left to completion; the error state sits below.
    pub fn matching_module() -> Self {
        Self::new(0.4, 0.3)
            .with_position("initial", 1.0, 4.0)
            .with_position("retrieving", 3.0, 4.0)
            .with_position("filtering", 5.0, 4.0)
            .with_position("scoring", 7.0, 4.0)
            .with_position("ranking", 7.0, 2.0)
            .with_position("complete", 5.0, 2.0)
            .with_position("error", 4.0, 1.0)
    }

    /// Centre assigned to a state id
    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, p)| *p)
    }

    fn require_position(&self, id: &str) -> Result<Point, DiagramError> {
        self.position(id)
            .ok_or_else(|| DiagramError::layout_error(format!("no position for state '{}'", id)))
    }
}

impl<T> LayoutAlgorithm<T> for FixedLayout
where
    T: Topology<Node = StateData, Edge = TransitionData>,
{
    type Output = FigureLayoutResult;

    fn layout(&self, topology: &T) -> Result<FigureLayoutResult> {
        let layout_span = span!(
            Level::DEBUG,
            "fixed_layout",
            machine = topology.name(),
            states = topology.node_count()
        );
        let _enter = layout_span.enter();

        let mut states = Vec::with_capacity(topology.node_count());
        for state in topology.nodes() {
            let center = self.require_position(&state.id)?;
            trace!(state = %state.id, x = center.x, y = center.y, "Placed state");
            states.push(PositionedState {
                id: state.id.clone(),
                label: state.label.clone(),
                role: state.role,
                center,
                radius: self.radius,
            });
        }

        let mut transitions = Vec::with_capacity(topology.edge_count());
        for edge in topology.edges() {
            let from = self.require_position(&edge.from)?;
            let to = self.require_position(&edge.to)?;
            let (start, end) =
                clip_to_circles(from, self.radius, to, self.radius).ok_or_else(|| {
                    DiagramError::layout_error(format!(
                        "states '{}' and '{}' share a position",
                        edge.from, edge.to
                    ))
                })?;
            let anchor = label_anchor(start, end, self.label_offset).ok_or_else(|| {
                DiagramError::layout_error(format!(
                    "edge '{}' -> '{}' has no length after clipping",
                    edge.from, edge.to
                ))
            })?;
            transitions.push(PositionedTransition {
                from_id: edge.from.clone(),
                to_id: edge.to.clone(),
                label: edge.display_label().to_string(),
                style: edge.style,
                start,
                end,
                label_anchor: anchor,
            });
        }

        debug!(
            states = states.len(),
            transitions = transitions.len(),
            "Layout complete"
        );
        Ok(FigureLayoutResult {
            states,
            transitions,
        })
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::matching_module_machine;
    use crate::machine::MachineBuilder;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_clip_horizontal() {
        let (start, end) =
            clip_to_circles(Point::new(1.0, 4.0), 0.4, Point::new(3.0, 4.0), 0.4).unwrap();
        assert!(close(start, Point::new(1.4, 4.0)));
        assert!(close(end, Point::new(2.6, 4.0)));
    }

    #[test]
    fn test_clip_coincident_centres() {
        assert!(clip_to_circles(Point::new(1.0, 1.0), 0.4, Point::new(1.0, 1.0), 0.4).is_none());
    }

    #[test]
    fn test_label_offset_is_left_of_direction() {
        // Left to right: label goes above
        let above = label_anchor(Point::new(0.0, 0.0), Point::new(2.0, 0.0), 0.3).unwrap();
        assert!(close(above, Point::new(1.0, 0.3)));
        // Top to bottom: label goes to the right
        let right = label_anchor(Point::new(7.0, 3.6), Point::new(7.0, 2.4), 0.3).unwrap();
        assert!(close(right, Point::new(7.3, 3.0)));
    }

    #[test]
    fn test_matching_module_layout() {
        let machine = matching_module_machine().unwrap();
        let result = FixedLayout::matching_module().layout(&machine).unwrap();
        assert_eq!(result.states.len(), 7);
        assert_eq!(result.transitions.len(), 7);

        let error = result.state("error").unwrap();
        assert_eq!(error.center, Point::new(4.0, 1.0));

        let first = &result.transitions[0];
        assert_eq!(first.label, "userId provided");
        assert!(close(first.start, Point::new(1.4, 4.0)));
        assert!(close(first.end, Point::new(2.6, 4.0)));
        assert!(close(first.label_anchor, Point::new(2.0, 4.3)));
    }

    #[test]
    fn test_missing_position_is_layout_error() {
        let machine = MachineBuilder::new("m")
            .initial("a", "A")
            .final_state("b", "B")
            .transition("go", "a", "b")
            .build()
            .unwrap();
        let layout = FixedLayout::new(0.4, 0.3).with_position("a", 0.0, 0.0);
        let err = layout.layout(&machine).unwrap_err();
        let err = err.downcast_ref::<DiagramError>().unwrap();
        assert!(matches!(err, DiagramError::LayoutError { message } if message.contains("'b'")));
    }

    #[test]
    fn test_shared_position_is_layout_error() {
        let machine = MachineBuilder::new("m")
            .initial("a", "A")
            .final_state("b", "B")
            .transition("go", "a", "b")
            .build()
            .unwrap();
        let layout = FixedLayout::new(0.4, 0.3)
            .with_position("a", 1.0, 1.0)
            .with_position("b", 1.0, 1.0);
        assert!(layout.layout(&machine).is_err());
    }

    #[test]
    fn test_with_position_replaces() {
        let layout = FixedLayout::new(0.4, 0.3)
            .with_position("a", 0.0, 0.0)
            .with_position("a", 2.0, 1.0);
        assert_eq!(layout.position("a"), Some(Point::new(2.0, 1.0)));
    }
}
