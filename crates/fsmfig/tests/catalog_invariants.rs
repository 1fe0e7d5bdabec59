//! Structural invariants that every declared machine must satisfy

use std::collections::HashSet;

use fsmfig::catalog::{
    export_targets, matching_machine, matching_module_machine, request_machine, viewing_machine,
};
use fsmfig::machine::{StateMachine, TransitionSpec};
use proptest::prelude::*;

fn all_machines() -> Vec<StateMachine> {
    vec![
        matching_machine().unwrap(),
        request_machine().unwrap(),
        viewing_machine().unwrap(),
        matching_module_machine().unwrap(),
    ]
}

#[test]
fn test_exactly_one_initial_state() {
    for machine in all_machines() {
        let initials = machine.states().iter().filter(|s| s.role.is_initial()).count();
        assert_eq!(initials, 1, "{}", machine.name());
    }
}

#[test]
fn test_at_least_one_final_state() {
    for machine in all_machines() {
        assert!(machine.final_states().count() >= 1, "{}", machine.name());
    }
}

#[test]
fn test_transition_endpoints_exist() {
    for machine in all_machines() {
        for t in machine.transitions() {
            assert!(machine.state(&t.from).is_some(), "{}: {}", machine.name(), t.from);
            assert!(machine.state(&t.to).is_some(), "{}: {}", machine.name(), t.to);
        }
    }
}

#[test]
fn test_final_states_have_no_outgoing_transitions() {
    for machine in all_machines() {
        for state in machine.final_states() {
            assert_eq!(machine.transitions_from(&state.id).count(), 0);
        }
    }
}

#[test]
fn test_state_ids_are_unique() {
    for machine in all_machines() {
        let ids: HashSet<_> = machine.states().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), machine.states().len());
    }
}

#[test]
fn test_disjunctive_transitions_share_target() {
    let matching = matching_machine().unwrap();
    let no_results: Vec<_> = matching.transitions_for_event("no_results").collect();
    assert_eq!(no_results.len(), 2);
    assert!(no_results.iter().all(|t| t.to == "no_matches"));

    let request = request_machine().unwrap();
    let sources: Vec<_> = request
        .transitions_for_event("cancel")
        .map(|t| t.from.as_str())
        .collect();
    assert_eq!(sources, ["pending", "accepted"]);
}

#[test]
fn test_export_targets_cover_focused_machines() {
    let targets = export_targets().unwrap();
    let titles: Vec<_> = targets.iter().map(|t| t.machine.name()).collect();
    assert_eq!(titles, ["Matching FSM", "Request FSM", "Viewing FSM"]);
}

fn state_id() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,8}"
}

proptest! {
    #[test]
    fn prop_expansion_one_per_source(
        sources in prop::collection::vec(state_id(), 1..6),
        target in state_id(),
        label in prop::option::of("[a-z ]{1,12}"),
    ) {
        let mut spec = TransitionSpec::from_any("go", &sources[..], target.clone());
        if let Some(label) = &label {
            spec = spec.labelled(label.clone());
        }
        let expanded = spec.expand();

        prop_assert_eq!(expanded.len(), sources.len());
        for (t, source) in expanded.iter().zip(&sources) {
            prop_assert_eq!(&t.from, source);
            prop_assert_eq!(&t.to, &target);
            prop_assert_eq!(t.event.as_str(), "go");
            prop_assert_eq!(&t.label, &label);
        }
    }
}
