//! Fluent builder for declaring state machines
//!
//! Declarations are collected without checks and validated as a whole in
//! [`MachineBuilder::build`], so a machine that exists is always well formed.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, span, trace, Level};

use super::StateMachine;
use crate::core::{DiagramError, EdgeStyle, StateData, StateRole, TransitionData};

/// One declared transition, possibly from several source states
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionSpec {
    pub event: String,
    pub sources: Vec<String>,
    pub target: String,
    pub label: Option<String>,
    pub style: EdgeStyle,
}

impl TransitionSpec {
    /// Transition from a single source
    pub fn new(event: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            sources: vec![from.into()],
            target: to.into(),
            label: None,
            style: EdgeStyle::Solid,
        }
    }

    /// Disjunctive transition: the same event from each of `sources`
    pub fn from_any<S: AsRef<str>>(
        event: impl Into<String>,
        sources: &[S],
        to: impl Into<String>,
    ) -> Self {
        Self {
            event: event.into(),
            sources: sources.iter().map(|s| s.as_ref().to_string()).collect(),
            target: to.into(),
            label: None,
            style: EdgeStyle::Solid,
        }
    }

    /// Attach a condition label shown on the edge
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Draw the edge dashed (error path)
    pub fn dashed(mut self) -> Self {
        self.style = EdgeStyle::Dashed;
        self
    }

    /// Expand into one transition per source, in declaration order
    pub fn expand(&self) -> Vec<TransitionData> {
        self.sources
            .iter()
            .map(|from| TransitionData {
                event: self.event.clone(),
                from: from.clone(),
                to: self.target.clone(),
                label: self.label.clone(),
                style: self.style,
            })
            .collect()
    }
}

/// Builder for [`StateMachine`]
///
/// # Example
/// ```
/// use fsmfig::machine::MachineBuilder;
///
/// let machine = MachineBuilder::new("Door")
///     .initial("closed", "Closed")
///     .state("open", "Open")
///     .final_state("removed", "Removed")
///     .transition("open", "closed", "open")
///     .transition_from_any("remove", &["closed", "open"], "removed")
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.transitions().len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MachineBuilder {
    name: String,
    states: Vec<StateData>,
    specs: Vec<TransitionSpec>,
}

impl MachineBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declare a state with an explicit role
    pub fn state_with_role(
        mut self,
        id: impl Into<String>,
        label: impl Into<String>,
        role: StateRole,
    ) -> Self {
        self.states.push(StateData::with_role(id, label, role));
        self
    }

    /// Declare the initial state
    pub fn initial(self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.state_with_role(id, label, StateRole::Initial)
    }

    /// Declare a normal state
    pub fn state(self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.state_with_role(id, label, StateRole::Normal)
    }

    /// Declare a final state
    pub fn final_state(self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.state_with_role(id, label, StateRole::Final)
    }

    /// Declare a transition from one source
    pub fn transition(
        self,
        event: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.add(TransitionSpec::new(event, from, to))
    }

    /// Declare one event from several sources into the same target
    pub fn transition_from_any<S: AsRef<str>>(
        self,
        event: impl Into<String>,
        sources: &[S],
        to: impl Into<String>,
    ) -> Self {
        self.add(TransitionSpec::from_any(event, sources, to))
    }

    /// Declare a prepared transition spec
    pub fn add(mut self, spec: TransitionSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Validate the declarations and build the machine
    pub fn build(self) -> Result<StateMachine, DiagramError> {
        let build_span = span!(Level::DEBUG, "build_machine", machine = %self.name);
        let _enter = build_span.enter();

        let machine = self.name.clone();
        let empty = |what: &str| DiagramError::EmptyIdentifier {
            machine: machine.clone(),
            what: what.to_string(),
        };

        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, state) in self.states.iter().enumerate() {
            if state.id.is_empty() {
                return Err(empty("state"));
            }
            if index.insert(state.id.as_str(), i).is_some() {
                return Err(DiagramError::DuplicateState {
                    machine,
                    state: state.id.clone(),
                });
            }
        }

        let initials: Vec<usize> = self
            .states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.role.is_initial())
            .map(|(i, _)| i)
            .collect();
        let initial = match initials.as_slice() {
            [] => return Err(DiagramError::MissingInitialState { machine }),
            [only] => *only,
            many => {
                let states = many
                    .iter()
                    .map(|i| self.states[*i].id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(DiagramError::MultipleInitialStates { machine, states });
            }
        };

        if !self.states.iter().any(|s| s.role.is_final()) {
            return Err(DiagramError::MissingFinalState { machine });
        }

        let mut transitions: Vec<TransitionData> = Vec::new();
        for spec in &self.specs {
            if spec.event.is_empty() {
                return Err(empty("event"));
            }
            if spec.sources.is_empty() {
                return Err(DiagramError::EmptySources {
                    machine,
                    event: spec.event.clone(),
                });
            }
            for state in spec.sources.iter().chain(std::iter::once(&spec.target)) {
                if !index.contains_key(state.as_str()) {
                    return Err(DiagramError::UndefinedState {
                        machine,
                        event: spec.event.clone(),
                        state: state.clone(),
                    });
                }
            }
            trace!(event = %spec.event, sources = spec.sources.len(), "Expanding transition");
            transitions.extend(spec.expand());
        }

        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        for t in &transitions {
            if !seen.insert((t.event.as_str(), t.from.as_str())) {
                return Err(DiagramError::DuplicateTransition {
                    machine,
                    event: t.event.clone(),
                    state: t.from.clone(),
                });
            }
            if self.states[index[t.from.as_str()]].role.is_final() {
                return Err(DiagramError::FinalStateHasTransitions {
                    machine,
                    state: t.from.clone(),
                    event: t.event.clone(),
                });
            }
        }

        let mut reached = vec![false; self.states.len()];
        let mut queue = VecDeque::from([initial]);
        reached[initial] = true;
        while let Some(current) = queue.pop_front() {
            let id = self.states[current].id.as_str();
            for t in transitions.iter().filter(|t| t.from == id) {
                let next = index[t.to.as_str()];
                if !reached[next] {
                    reached[next] = true;
                    queue.push_back(next);
                }
            }
        }
        if let Some(pos) = reached.iter().position(|r| !r) {
            return Err(DiagramError::UnreachableState {
                machine,
                state: self.states[pos].id.clone(),
            });
        }

        debug!(
            states = self.states.len(),
            transitions = transitions.len(),
            "Machine built"
        );

        Ok(StateMachine {
            name: self.name,
            states: self.states,
            transitions,
            initial,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn door() -> MachineBuilder {
        MachineBuilder::new("Door")
            .initial("closed", "Closed")
            .state("open", "Open")
            .final_state("gone", "Gone")
            .transition("open", "closed", "open")
            .transition("remove", "open", "gone")
    }

    #[test]
    fn test_valid_machine_builds() {
        let machine = door().build().unwrap();
        assert_eq!(machine.states().len(), 3);
        assert_eq!(machine.transitions().len(), 2);
        assert_eq!(machine.initial_state().id, "closed");
    }

    #[test]
    fn test_undefined_target_is_rejected() {
        let err = door().transition("lock", "closed", "locked").build().unwrap_err();
        match err {
            DiagramError::UndefinedState { event, state, .. } => {
                assert_eq!(event, "lock");
                assert_eq!(state, "locked");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_undefined_disjunctive_source_is_rejected() {
        let err = door()
            .transition_from_any("remove", &["closed", "ajar"], "gone")
            .build()
            .unwrap_err();
        assert!(matches!(err, DiagramError::UndefinedState { state, .. } if state == "ajar"));
    }

    #[test]
    fn test_duplicate_state_is_rejected() {
        let err = door().state("open", "Open again").build().unwrap_err();
        assert!(matches!(err, DiagramError::DuplicateState { state, .. } if state == "open"));
    }

    #[test]
    fn test_initial_state_count() {
        let err = MachineBuilder::new("none")
            .state("a", "A")
            .final_state("b", "B")
            .transition("go", "a", "b")
            .build()
            .unwrap_err();
        assert!(matches!(err, DiagramError::MissingInitialState { .. }));

        let err = door().initial("other", "Other").build().unwrap_err();
        assert!(
            matches!(err, DiagramError::MultipleInitialStates { states, .. } if states == "closed, other")
        );
    }

    #[test]
    fn test_final_state_required() {
        let err = MachineBuilder::new("loop")
            .initial("a", "A")
            .state("b", "B")
            .transition("go", "a", "b")
            .build()
            .unwrap_err();
        assert!(matches!(err, DiagramError::MissingFinalState { .. }));
    }

    #[test]
    fn test_final_state_cannot_have_outgoing() {
        let err = door().transition("return", "gone", "closed").build().unwrap_err();
        assert!(
            matches!(err, DiagramError::FinalStateHasTransitions { state, event, .. } if state == "gone" && event == "return")
        );
    }

    #[test]
    fn test_empty_sources_rejected() {
        let none: [&str; 0] = [];
        let err = door()
            .transition_from_any("noop", &none, "gone")
            .build()
            .unwrap_err();
        assert!(matches!(err, DiagramError::EmptySources { .. }));
    }

    #[test]
    fn test_empty_identifiers_rejected() {
        let err = door().state("", "Blank").build().unwrap_err();
        assert!(matches!(err, DiagramError::EmptyIdentifier { what, .. } if what == "state"));

        let err = door().transition("", "closed", "open").build().unwrap_err();
        assert!(matches!(err, DiagramError::EmptyIdentifier { what, .. } if what == "event"));
    }

    #[test]
    fn test_duplicate_event_from_same_source_rejected() {
        let err = door().transition("open", "closed", "gone").build().unwrap_err();
        assert!(matches!(err, DiagramError::DuplicateTransition { .. }));
    }

    #[test]
    fn test_unreachable_state_rejected() {
        let err = door().state("attic", "Attic").build().unwrap_err();
        assert!(matches!(err, DiagramError::UnreachableState { state, .. } if state == "attic"));
    }

    #[test]
    fn test_spec_expansion_keeps_order_and_metadata() {
        let spec = TransitionSpec::from_any("cancel", &["pending", "accepted"], "cancelled")
            .labelled("user cancelled")
            .dashed();
        let expanded = spec.expand();
        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[0].from, "pending");
        assert_eq!(expanded[1].from, "accepted");
        for t in &expanded {
            assert_eq!(t.to, "cancelled");
            assert_eq!(t.event, "cancel");
            assert_eq!(t.label.as_deref(), Some("user cancelled"));
            assert_eq!(t.style, EdgeStyle::Dashed);
        }
    }
}
