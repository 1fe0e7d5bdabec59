//! Core type definitions for state-machine diagrams
//!
//! This module contains the fundamental types used throughout fsmfig:
//! state roles, edge styles, and the state and transition records.

use serde::Serialize;
use std::fmt;

/// Role a state plays in its machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StateRole {
    /// Entry state; exactly one per machine
    Initial,
    /// Intermediate state
    #[default]
    Normal,
    /// Terminal state with no outgoing transitions
    Final,
}

impl StateRole {
    /// Returns true if this is the initial role
    pub fn is_initial(&self) -> bool {
        matches!(self, StateRole::Initial)
    }

    /// Returns true if this is the final role
    pub fn is_final(&self) -> bool {
        matches!(self, StateRole::Final)
    }
}

impl fmt::Display for StateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateRole::Initial => write!(f, "initial"),
            StateRole::Normal => write!(f, "normal"),
            StateRole::Final => write!(f, "final"),
        }
    }
}

/// Visual style of a transition edge
///
/// Only affects rendering; both styles are ordinary transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    /// Success or normal path
    #[default]
    Solid,
    /// Error or exceptional path
    Dashed,
}

impl EdgeStyle {
    /// Returns true if this edge is drawn dashed
    pub fn is_dashed(&self) -> bool {
        matches!(self, EdgeStyle::Dashed)
    }
}

impl fmt::Display for EdgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeStyle::Solid => write!(f, "solid"),
            EdgeStyle::Dashed => write!(f, "dashed"),
        }
    }
}

/// A state with its metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateData {
    /// Identifier, unique within its machine
    pub id: String,
    /// Display label; may contain `\n` line breaks
    pub label: String,
    /// Role of the state
    pub role: StateRole,
}

impl StateData {
    /// Create a new normal state
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            role: StateRole::Normal,
        }
    }

    /// Create a new state with a specific role
    pub fn with_role(id: impl Into<String>, label: impl Into<String>, role: StateRole) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            role,
        }
    }

    /// Label split into display lines
    pub fn label_lines(&self) -> impl Iterator<Item = &str> {
        self.label.lines()
    }
}

/// A single directed transition between two states
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionData {
    /// Trigger name
    pub event: String,
    /// Source state id
    pub from: String,
    /// Target state id
    pub to: String,
    /// Free-text condition shown on the edge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Visual style of the edge
    pub style: EdgeStyle,
}

impl TransitionData {
    /// Create a new solid, unlabelled transition
    pub fn new(event: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            from: from.into(),
            to: to.into(),
            label: None,
            style: EdgeStyle::Solid,
        }
    }

    /// Text to display on the edge: the label if set, else the event name
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.event)
    }
}

/// A point on the figure plane, in data units with y pointing up
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Midpoint between two points
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_role_properties() {
        assert!(StateRole::Initial.is_initial());
        assert!(!StateRole::Normal.is_initial());
        assert!(StateRole::Final.is_final());
        assert!(!StateRole::Initial.is_final());
        assert_eq!(StateRole::default(), StateRole::Normal);
    }

    #[test]
    fn test_state_role_display() {
        assert_eq!(StateRole::Initial.to_string(), "initial");
        assert_eq!(StateRole::Normal.to_string(), "normal");
        assert_eq!(StateRole::Final.to_string(), "final");
    }

    #[test]
    fn test_edge_style() {
        assert!(EdgeStyle::Dashed.is_dashed());
        assert!(!EdgeStyle::Solid.is_dashed());
        assert_eq!(EdgeStyle::default(), EdgeStyle::Solid);
        assert_eq!(EdgeStyle::Dashed.to_string(), "dashed");
    }

    #[test]
    fn test_state_data_constructors() {
        let state = StateData::new("idle", "Idle");
        assert_eq!(state.id, "idle");
        assert_eq!(state.role, StateRole::Normal);

        let multi = StateData::with_role("r", "RETRIEVING\nCANDIDATES", StateRole::Final);
        assert_eq!(multi.label_lines().collect::<Vec<_>>(), ["RETRIEVING", "CANDIDATES"]);
        assert!(multi.role.is_final());
    }

    #[test]
    fn test_transition_display_label() {
        let mut t = TransitionData::new("accept", "pending", "accepted");
        assert_eq!(t.display_label(), "accept");
        t.label = Some("driver accepted".to_string());
        assert_eq!(t.display_label(), "driver accepted");
    }

    #[test]
    fn test_point_math() {
        let a = Point::new(1.0, 4.0);
        let b = Point::new(4.0, 0.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
        assert_eq!(a.midpoint(b), Point::new(2.5, 2.0));
    }
}
