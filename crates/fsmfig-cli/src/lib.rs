//! Command-line front ends for fsmfig
//!
//! Two binaries share this library: `fsm-figure` draws the hand-placed
//! matching-module figure and `fsm-export` exports the declarative
//! machines through Graphviz.

pub mod cli;
pub mod colorizer;
pub mod export;
pub mod figure;

pub use cli::{ColorChoice, CommonArgs, LogFormat, LogLevel};
pub use export::{ExportApp, ExportCli};
pub use figure::{FigureApp, FigureCli};
