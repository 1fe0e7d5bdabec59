//! Geometry of the hand-placed figure layout

use fsmfig::core::{LayoutAlgorithm, Point};
use fsmfig::catalog::matching_module_machine;
use fsmfig::plugins::figure::{clip_to_circles, label_anchor, FixedLayout};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    -20.0..20.0f64
}

#[test]
fn test_every_edge_starts_and_ends_on_a_circle() {
    let machine = matching_module_machine().unwrap();
    let layout = FixedLayout::matching_module();
    let result = layout.layout(&machine).unwrap();

    for t in &result.transitions {
        let from = result.state(&t.from_id).unwrap();
        let to = result.state(&t.to_id).unwrap();
        assert!((t.start.distance(from.center) - from.radius).abs() < 1e-9);
        assert!((t.end.distance(to.center) - to.radius).abs() < 1e-9);
    }
}

#[test]
fn test_error_edges_are_dashed() {
    let machine = matching_module_machine().unwrap();
    let result = FixedLayout::matching_module().layout(&machine).unwrap();
    let dashed: Vec<_> = result
        .transitions
        .iter()
        .filter(|t| t.style.is_dashed())
        .map(|t| (t.from_id.as_str(), t.to_id.as_str()))
        .collect();
    assert_eq!(dashed, [("retrieving", "error"), ("filtering", "error")]);
}

#[test]
fn test_downward_edge_label_sits_right_of_line() {
    let machine = matching_module_machine().unwrap();
    let result = FixedLayout::matching_module().layout(&machine).unwrap();
    let down = result
        .transitions
        .iter()
        .find(|t| t.from_id == "scoring" && t.to_id == "ranking")
        .unwrap();
    assert!((down.label_anchor.x - 7.3).abs() < 1e-9);
    assert!((down.label_anchor.y - 3.0).abs() < 1e-9);
}

proptest! {
    #[test]
    fn prop_clipped_points_lie_on_circles(
        x1 in coord(), y1 in coord(), x2 in coord(), y2 in coord(),
        r1 in 0.1..1.0f64, r2 in 0.1..1.0f64,
    ) {
        let (c1, c2) = (Point::new(x1, y1), Point::new(x2, y2));
        prop_assume!(c1.distance(c2) > 1e-6);
        let (start, end) = clip_to_circles(c1, r1, c2, r2).unwrap();
        prop_assert!((start.distance(c1) - r1).abs() < 1e-9);
        prop_assert!((end.distance(c2) - r2).abs() < 1e-9);
    }

    #[test]
    fn prop_label_offset_distance(
        x1 in coord(), y1 in coord(), x2 in coord(), y2 in coord(),
        offset in 0.0..2.0f64,
    ) {
        let (start, end) = (Point::new(x1, y1), Point::new(x2, y2));
        prop_assume!(start.distance(end) > 1e-6);
        let anchor = label_anchor(start, end, offset).unwrap();
        let mid = start.midpoint(end);
        prop_assert!((anchor.distance(mid) - offset).abs() < 1e-9);

        // Perpendicular to the segment
        let (dx, dy) = (end.x - start.x, end.y - start.y);
        let dot = (anchor.x - mid.x) * dx + (anchor.y - mid.y) * dy;
        prop_assert!(dot.abs() < 1e-6 * start.distance(end).max(1.0));
    }
}
