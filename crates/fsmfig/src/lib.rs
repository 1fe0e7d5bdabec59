//! fsmfig - State machine documentation diagrams
//!
//! Declares the matching service's finite-state machines and renders them
//! as diagrams, either as a hand-placed PDF figure or through Graphviz.
//!
//! # Quick Start
//!
//! ```rust
//! use fsmfig::catalog::request_machine;
//!
//! let machine = request_machine().unwrap();
//! let state = machine.walk(&["create_request", "create_pending", "cancel"]).unwrap();
//! assert_eq!(state.id, "cancelled");
//! ```
//!
//! # Rendering
//!
//! ```rust
//! use fsmfig::prelude::*;
//!
//! let machine = MachineBuilder::new("Door")
//!     .initial("closed", "Closed")
//!     .final_state("open", "Open")
//!     .transition("push", "closed", "open")
//!     .build()
//!     .unwrap();
//!
//! let dot = DotRenderer::new().render(&machine).unwrap();
//! assert!(dot.contains("\"closed\" -> \"open\""));
//! ```

pub mod catalog;
pub mod core;
pub mod machine;
pub mod plugins;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::catalog::ExportTarget;
    pub use crate::core::{
        DiagramError, EdgeStyle, LayoutAlgorithm, Point, Renderer, StateData, StateRole, Topology,
        TransitionData,
    };
    pub use crate::machine::{MachineBuilder, StateMachine, TransitionSpec};
    pub use crate::plugins::figure::{FigureConfig, FigureRenderer, FixedLayout};
    pub use crate::plugins::graphviz::{
        DotRenderer, ExportConfig, ExportOutcome, GraphExporter, GraphvizExporter, OutputFormat,
    };
    pub use crate::plugins::orchestrator::{ExportReport, Orchestrator};
}

pub use plugins::figure::{generate_figure, FigureConfig};

/// Export the three focused machines with the given exporter
///
/// Every machine is attempted; failures are reported per machine.
pub fn export_catalog<E: plugins::graphviz::GraphExporter>(
    exporter: E,
    config: plugins::graphviz::ExportConfig,
) -> anyhow::Result<Vec<plugins::orchestrator::ExportReport>> {
    let targets = catalog::export_targets()?;
    let orchestrator = plugins::orchestrator::Orchestrator::new(exporter, config);
    Ok(orchestrator.export_all(&targets))
}
