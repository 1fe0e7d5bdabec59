//! Graphviz DOT renderer for state machines
//!
//! States become rounded boxes (final states get a second border), the
//! initial state is marked by an edge from a small black dot, and each
//! expanded transition becomes one edge labelled with its event name.

use std::fmt::Write;

use anyhow::Result;
use tracing::{debug, span, Level};

use crate::core::{Renderer, StateData, Topology, TransitionData};

/// Id of the synthetic entry node
const START_NODE: &str = "i";

/// DOT renderer settings
#[derive(Debug, Clone)]
pub struct DotRenderer {
    pub rankdir: &'static str,
    pub font_name: &'static str,
    pub state_font_size: u32,
    pub transition_font_size: u32,
    pub edge_color: &'static str,
}

impl Default for DotRenderer {
    fn default() -> Self {
        Self {
            rankdir: "LR",
            font_name: "Arial",
            state_font_size: 10,
            transition_font_size: 9,
            edge_color: "blue",
        }
    }
}

impl DotRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render any state topology to DOT source
    pub fn to_dot<T>(&self, topology: &T) -> String
    where
        T: Topology<Node = StateData, Edge = TransitionData>,
    {
        let mut dot = String::new();
        // Writing into a String cannot fail
        let _ = self.write_dot(&mut dot, topology);
        dot
    }

    fn write_dot<T>(&self, dot: &mut String, topology: &T) -> std::fmt::Result
    where
        T: Topology<Node = StateData, Edge = TransitionData>,
    {
        writeln!(dot, "digraph {} {{", quote(topology.name()))?;
        writeln!(
            dot,
            "  graph [rankdir={}, fontname={}];",
            self.rankdir,
            quote(self.font_name)
        )?;
        writeln!(
            dot,
            "  node [fontname={}, fontsize={}];",
            quote(self.font_name),
            self.state_font_size
        )?;
        writeln!(
            dot,
            "  edge [fontname={}, fontsize={}];",
            quote(self.font_name),
            self.transition_font_size
        )?;

        writeln!(
            dot,
            "  {} [label=\"\", shape=circle, style=filled, fillcolor=black, fixedsize=true, width=0.2, height=0.2];",
            quote(START_NODE)
        )?;
        if let Some(initial) = topology.nodes().find(|s| s.role.is_initial()) {
            writeln!(
                dot,
                "  {} -> {} [color={}];",
                quote(START_NODE),
                quote(&initial.id),
                self.edge_color
            )?;
        }

        for state in topology.nodes() {
            let peripheries = if state.role.is_final() { 2 } else { 1 };
            writeln!(
                dot,
                "  {} [label={}, shape=rectangle, style=\"rounded, filled\", fillcolor=white, peripheries={}];",
                quote(&state.id),
                quote(&state.label),
                peripheries
            )?;
        }

        for transition in topology.edges() {
            writeln!(
                dot,
                "  {} -> {} [label={}, color={}];",
                quote(&transition.from),
                quote(&transition.to),
                quote(&transition.event),
                self.edge_color
            )?;
        }

        dot.push_str("}\n");
        Ok(())
    }
}

impl<T> Renderer<T> for DotRenderer
where
    T: Topology<Node = StateData, Edge = TransitionData>,
{
    type Output = String;

    fn render(&self, topology: &T) -> Result<String> {
        let render_span = span!(Level::DEBUG, "render_dot", machine = topology.name());
        let _enter = render_span.enter();

        let dot = self.to_dot(topology);
        debug!(
            nodes = topology.node_count(),
            edges = topology.edge_count(),
            bytes = dot.len(),
            "DOT rendered"
        );
        Ok(dot)
    }

    fn name(&self) -> &'static str {
        "dot"
    }

    fn format(&self) -> &'static str {
        "dot"
    }
}

/// Quote and escape a DOT identifier or label
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
