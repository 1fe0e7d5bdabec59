//! PDF renderer for hand-placed state figures
//!
//! Draws each state as a circle (double-ringed for initial and final
//! states), each transition as an arrow between circle edges, and each
//! label in a translucent box beside its arrow.

use std::collections::HashSet;

use anyhow::Result;
use tracing::{debug, span, Level};

use super::layout::{FigureLayoutResult, FixedLayout, PositionedState, PositionedTransition};
use crate::core::{
    Color, Font, LayoutAlgorithm, Renderer, StateData, StateRole, Stroke, Topology,
    TransitionData, VectorCanvas,
};

/// Points per data unit
const SCALE: f64 = 72.0;

/// Visual settings for the figure
#[derive(Debug, Clone)]
pub struct FigureStyle {
    /// Gap between the inner circle and the outer ring of double circles
    pub ring_gap: f64,
    pub state_font_size: f64,
    pub edge_font_size: f64,
    /// Edge line width in points
    pub edge_width: f64,
    /// Arrow head length in points
    pub arrow_length: f64,
    /// Arrow head half-angle in radians
    pub arrow_half_angle: f64,
    /// Label box padding as a fraction of the edge font size
    pub label_pad: f64,
    pub label_opacity: f64,
    /// States drawn with the error accent
    pub error_states: HashSet<String>,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            ring_gap: 0.05,
            state_font_size: 9.0,
            edge_font_size: 8.0,
            edge_width: 1.5,
            arrow_length: 8.0,
            arrow_half_angle: 0.4636,
            label_pad: 0.3,
            label_opacity: 0.8,
            error_states: HashSet::new(),
        }
    }
}

impl FigureStyle {
    /// Mark a state to be drawn with the error accent
    pub fn with_error_state(mut self, id: impl Into<String>) -> Self {
        self.error_states.insert(id.into());
        self
    }

    fn is_error(&self, id: &str) -> bool {
        self.error_states.contains(id)
    }

    /// Fill color for a state
    pub fn fill(&self, state: &PositionedState) -> Color {
        if self.is_error(&state.id) {
            return Color::LIGHT_CORAL;
        }
        match state.role {
            StateRole::Initial => Color::LIGHT_BLUE,
            StateRole::Final => Color::LIGHT_GREEN,
            StateRole::Normal => Color::LIGHT_GRAY,
        }
    }

    /// Label font for a state
    pub fn font(&self, state: &PositionedState) -> Font {
        if state.role != StateRole::Normal || self.is_error(&state.id) {
            Font::HelveticaBold
        } else {
            Font::Helvetica
        }
    }
}

/// Renders a topology onto a PDF page using a fixed layout
pub struct FigureRenderer {
    layout: FixedLayout,
    style: FigureStyle,
}

impl FigureRenderer {
    pub fn new(layout: FixedLayout, style: FigureStyle) -> Self {
        Self { layout, style }
    }

    /// Renderer for the composite matching-module figure
    pub fn matching_module() -> Self {
        Self::new(
            FixedLayout::matching_module(),
            FigureStyle::default().with_error_state(crate::catalog::MATCHING_MODULE_ERROR_STATE),
        )
    }

    fn draw_state(&self, canvas: &mut VectorCanvas, state: &PositionedState) {
        let fill = self.style.fill(state);
        if state.role == StateRole::Normal {
            canvas.draw_circle(state.center, state.radius, fill, Stroke::solid(2.0));
        } else {
            canvas.draw_circle(
                state.center,
                state.radius + self.style.ring_gap,
                fill,
                Stroke::solid(2.0),
            );
            canvas.draw_circle(state.center, state.radius, Color::WHITE, Stroke::solid(1.0));
        }
        canvas.draw_text_centered(
            state.center,
            &state.label,
            self.style.state_font_size,
            self.style.font(state),
        );
    }

    fn draw_transition(&self, canvas: &mut VectorCanvas, transition: &PositionedTransition) {
        let stroke = if transition.style.is_dashed() {
            Stroke::dashed(self.style.edge_width)
        } else {
            Stroke::solid(self.style.edge_width)
        };
        canvas.draw_line(transition.start, transition.end, stroke);
        canvas.draw_arrow_head(
            transition.end,
            transition.direction(),
            self.style.arrow_length / canvas.scale,
            self.style.arrow_half_angle,
            stroke,
        );

        let size = self.style.edge_font_size;
        let (w, h) = canvas.text_extent(&transition.label, size, Font::Helvetica);
        let pad = self.style.label_pad * size / canvas.scale;
        canvas.draw_rounded_box(
            transition.label_anchor,
            w + 2.0 * pad,
            h + 2.0 * pad,
            pad,
            Color::WHITE,
            self.style.label_opacity,
        );
        canvas.draw_text_centered(transition.label_anchor, &transition.label, size, Font::Helvetica);
    }

    /// Draw a finished layout onto a fresh canvas
    pub fn draw(&self, layout: &FigureLayoutResult, title: &str) -> VectorCanvas {
        let mut canvas = VectorCanvas::new(SCALE).with_title(title);
        for state in &layout.states {
            self.draw_state(&mut canvas, state);
        }
        for transition in &layout.transitions {
            self.draw_transition(&mut canvas, transition);
        }
        canvas
    }
}

impl<T> Renderer<T> for FigureRenderer
where
    T: Topology<Node = StateData, Edge = TransitionData>,
{
    type Output = Vec<u8>;

    fn render(&self, topology: &T) -> Result<Vec<u8>> {
        let render_span = span!(Level::INFO, "render_figure", machine = topology.name());
        let _enter = render_span.enter();

        let layout = self.layout.layout(topology)?;
        let canvas = self.draw(&layout, topology.name());
        let pdf = canvas.to_pdf()?;

        debug!(shapes = canvas.shape_count(), bytes = pdf.len(), "Figure rendered");
        Ok(pdf)
    }

    fn name(&self) -> &'static str {
        "figure"
    }

    fn format(&self) -> &'static str {
        "pdf"
    }
}
