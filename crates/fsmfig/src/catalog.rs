//! The documented state machines
//!
//! Each function returns a freshly built, validated machine. The three
//! focused machines feed the Graphviz export; the composite matching-module
//! machine feeds the hand-placed figure. The two sets are separate
//! documentation artifacts and intentionally use different state names.

use crate::core::DiagramError;
use crate::machine::{MachineBuilder, StateMachine, TransitionSpec};

/// Match discovery, filtering, scoring and ranking
pub fn matching_machine() -> Result<StateMachine, DiagramError> {
    MachineBuilder::new("Matching FSM")
        .initial("idle", "Idle")
        .state("searching", "Searching for Matches")
        .state("applying_constraints", "Applying Hard Constraints")
        .state("scoring", "Scoring Compatibility")
        .state("filtering_ranking", "Filtering and Ranking")
        .final_state("matches_ready", "Matches Ready")
        .final_state("no_matches", "No Matches Found")
        .transition("start_search", "idle", "searching")
        .transition("apply_filters", "searching", "applying_constraints")
        .transition("compute_scores", "applying_constraints", "scoring")
        .transition("filter_and_rank", "scoring", "filtering_ranking")
        .transition("results_ready", "filtering_ranking", "matches_ready")
        .transition_from_any(
            "no_results",
            &["applying_constraints", "filtering_ranking"],
            "no_matches",
        )
        .build()
}

/// Ride request lifecycle
pub fn request_machine() -> Result<StateMachine, DiagramError> {
    MachineBuilder::new("Request FSM")
        .initial("idle", "Idle")
        .state("requesting", "Requesting Ride")
        .state("pending", "Pending Request")
        .state("accepted", "Accepted Request")
        .final_state("confirmed", "Confirmed Match")
        .final_state("cancelled", "Cancelled Request")
        .transition("create_request", "idle", "requesting")
        .transition("create_pending", "requesting", "pending")
        .transition("accept", "pending", "accepted")
        .transition("confirm", "accepted", "confirmed")
        .transition_from_any("cancel", &["pending", "accepted"], "cancelled")
        .build()
}

/// Viewing confirmed matches
pub fn viewing_machine() -> Result<StateMachine, DiagramError> {
    MachineBuilder::new("Viewing FSM")
        .initial("idle", "Idle")
        .final_state("viewing", "Viewing Matches")
        .transition("start_viewing", "idle", "viewing")
        .build()
}

/// Id of the composite figure's error state, drawn with an error accent
pub const MATCHING_MODULE_ERROR_STATE: &str = "error";

/// Composite matching-module machine drawn by the layout-and-draw figure
pub fn matching_module_machine() -> Result<StateMachine, DiagramError> {
    MachineBuilder::new("Matching Module")
        .initial("initial", "INITIAL")
        .state("retrieving", "RETRIEVING\nCANDIDATES")
        .state("filtering", "FILTERING")
        .state("scoring", "SCORING")
        .state("ranking", "RANKING")
        .final_state("complete", "COMPLETE")
        .state(MATCHING_MODULE_ERROR_STATE, "ERROR")
        .add(TransitionSpec::new("provide_user", "initial", "retrieving").labelled("userId provided"))
        .add(
            TransitionSpec::new("candidates_found", "retrieving", "filtering")
                .labelled("candidates found"),
        )
        .add(
            TransitionSpec::new("no_candidates", "retrieving", MATCHING_MODULE_ERROR_STATE)
                .labelled("no candidates")
                .dashed(),
        )
        .add(TransitionSpec::new("filtered_exist", "filtering", "scoring").labelled("filtered exist"))
        .add(
            TransitionSpec::new("no_valid", "filtering", MATCHING_MODULE_ERROR_STATE)
                .labelled("no valid")
                .dashed(),
        )
        .add(
            TransitionSpec::new("scores_computed", "scoring", "ranking")
                .labelled("scores computed"),
        )
        .add(
            TransitionSpec::new("ranking_complete", "ranking", "complete")
                .labelled("ranking complete"),
        )
        .build()
}

/// A machine scheduled for Graphviz export
#[derive(Debug, Clone)]
pub struct ExportTarget {
    pub machine: StateMachine,
    /// Output file name without extension
    pub base_name: String,
    /// Human-readable name for progress lines
    pub title: String,
}

impl ExportTarget {
    pub fn new(
        machine: StateMachine,
        base_name: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            machine,
            base_name: base_name.into(),
            title: title.into(),
        }
    }
}

/// The three focused machines in export order
pub fn export_targets() -> Result<Vec<ExportTarget>, DiagramError> {
    Ok(vec![
        ExportTarget::new(matching_machine()?, "matching_fsm", "Matching FSM"),
        ExportTarget::new(request_machine()?, "request_fsm", "Request FSM"),
        ExportTarget::new(viewing_machine()?, "viewing_fsm", "Viewing FSM"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_catalog_machines_build() {
        assert!(matching_machine().is_ok());
        assert!(request_machine().is_ok());
        assert!(viewing_machine().is_ok());
        assert!(matching_module_machine().is_ok());
    }

    #[test]
    fn test_export_targets_order() {
        let targets = export_targets().unwrap();
        let names: Vec<_> = targets.iter().map(|t| t.base_name.as_str()).collect();
        assert_eq!(names, ["matching_fsm", "request_fsm", "viewing_fsm"]);
        assert_eq!(targets[1].title, "Request FSM");
    }

    #[test]
    fn test_matching_module_shape() {
        let m = matching_module_machine().unwrap();
        assert_eq!(m.states().len(), 7);
        assert_eq!(m.transitions().len(), 7);
        assert_eq!(
            m.transitions().iter().filter(|t| t.style.is_dashed()).count(),
            2
        );
        assert!(m.transitions_from(MATCHING_MODULE_ERROR_STATE).next().is_none());
    }
}
