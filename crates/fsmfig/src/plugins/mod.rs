//! Diagram generators
//!
//! `figure` draws a hand-placed PDF figure; `graphviz` exports declarative
//! machines through Graphviz; `orchestrator` runs a batch of exports.

pub mod figure;
pub mod graphviz;
pub mod orchestrator;

pub use figure::*;
pub use graphviz::*;
pub use orchestrator::*;
