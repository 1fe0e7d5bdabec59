//! Core error types for diagram generation
//!
//! This module defines the error types used throughout the pipeline:
//! topology definition, layout, rendering and export.

use thiserror::Error;

/// Core error types for diagram generation
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Definition error in '{machine}': transition '{event}' references undeclared state '{state}'")]
    UndefinedState {
        machine: String,
        event: String,
        state: String,
    },

    #[error("Definition error in '{machine}': state '{state}' is declared more than once")]
    DuplicateState { machine: String, state: String },

    #[error("Definition error in '{machine}': no initial state declared")]
    MissingInitialState { machine: String },

    #[error("Definition error in '{machine}': multiple initial states ({states})")]
    MultipleInitialStates { machine: String, states: String },

    #[error("Definition error in '{machine}': no final state declared")]
    MissingFinalState { machine: String },

    #[error("Definition error in '{machine}': final state '{state}' has outgoing transition '{event}'")]
    FinalStateHasTransitions {
        machine: String,
        state: String,
        event: String,
    },

    #[error("Definition error in '{machine}': transition '{event}' has no source states")]
    EmptySources { machine: String, event: String },

    #[error("Definition error in '{machine}': empty {what} identifier")]
    EmptyIdentifier { machine: String, what: String },

    #[error("Definition error in '{machine}': transition '{event}' is declared twice from state '{state}'")]
    DuplicateTransition {
        machine: String,
        event: String,
        state: String,
    },

    #[error("Definition error in '{machine}': state '{state}' is unreachable from the initial state")]
    UnreachableState { machine: String, state: String },

    #[error("Transition '{event}' is not allowed from state '{state}' in '{machine}'")]
    TransitionNotAllowed {
        machine: String,
        event: String,
        state: String,
    },

    #[error("Layout error: {message}")]
    LayoutError { message: String },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("Export error: {message}")]
    ExportError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new layout error
    pub fn layout_error(message: impl Into<String>) -> Self {
        Self::LayoutError {
            message: message.into(),
        }
    }

    /// Create a new render error
    pub fn render_error(message: impl Into<String>) -> Self {
        Self::RenderError {
            message: message.into(),
        }
    }

    /// Create a new export error
    pub fn export_error(message: impl Into<String>) -> Self {
        Self::ExportError {
            message: message.into(),
        }
    }

    /// Returns true for errors raised while building a topology
    pub fn is_definition_error(&self) -> bool {
        matches!(
            self,
            Self::UndefinedState { .. }
                | Self::DuplicateState { .. }
                | Self::MissingInitialState { .. }
                | Self::MultipleInitialStates { .. }
                | Self::MissingFinalState { .. }
                | Self::FinalStateHasTransitions { .. }
                | Self::EmptySources { .. }
                | Self::EmptyIdentifier { .. }
                | Self::DuplicateTransition { .. }
                | Self::UnreachableState { .. }
        )
    }
}
