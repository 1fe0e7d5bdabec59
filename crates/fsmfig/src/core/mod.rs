//! Core abstractions for diagram generation
//!
//! This module defines the traits every renderer builds on (topology access,
//! layout, rendering), the shared vector canvas, and the common error and
//! logging setup.

pub mod canvas;
pub mod font;
mod error;
mod layout;
pub mod logging;
mod renderer;
mod topology;
mod types;

pub use canvas::{Bounds, Color, Stroke, VectorCanvas};
pub use error::*;
pub use font::Font;
pub use layout::*;
pub use logging::*;
pub use renderer::*;
pub use topology::*;
pub use types::*;
