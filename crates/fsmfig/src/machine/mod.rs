//! Declarative state-machine topologies
//!
//! A [`StateMachine`] is an immutable, validated set of states and expanded
//! transitions. It is built once through [`MachineBuilder`] and then only
//! read: by renderers through the [`Topology`] trait, and by path checks
//! through [`StateMachine::walk`].

mod builder;

pub use builder::{MachineBuilder, TransitionSpec};

use serde::Serialize;

use crate::core::{DiagramError, StateData, Topology, TransitionData};

/// A validated state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateMachine {
    name: String,
    states: Vec<StateData>,
    transitions: Vec<TransitionData>,
    #[serde(skip)]
    initial: usize,
}

impl StateMachine {
    /// Machine name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// States in declaration order
    pub fn states(&self) -> &[StateData] {
        &self.states
    }

    /// Expanded transitions in declaration order
    pub fn transitions(&self) -> &[TransitionData] {
        &self.transitions
    }

    /// Look up a state by id
    pub fn state(&self, id: &str) -> Option<&StateData> {
        self.states.iter().find(|s| s.id == id)
    }

    /// The single initial state
    pub fn initial_state(&self) -> &StateData {
        &self.states[self.initial]
    }

    /// All final states
    pub fn final_states(&self) -> impl Iterator<Item = &StateData> {
        self.states.iter().filter(|s| s.role.is_final())
    }

    /// Returns true if `id` names a final state
    pub fn is_final(&self, id: &str) -> bool {
        self.state(id).is_some_and(|s| s.role.is_final())
    }

    /// Transitions leaving a state
    pub fn transitions_from<'a>(
        &'a self,
        id: &'a str,
    ) -> impl Iterator<Item = &'a TransitionData> + 'a {
        self.transitions.iter().filter(move |t| t.from == id)
    }

    /// Expanded transitions sharing an event name
    pub fn transitions_for_event<'a>(
        &'a self,
        event: &'a str,
    ) -> impl Iterator<Item = &'a TransitionData> + 'a {
        self.transitions.iter().filter(move |t| t.event == event)
    }

    /// Distinct event names in first-declaration order
    pub fn events(&self) -> Vec<&str> {
        let mut events: Vec<&str> = Vec::new();
        for t in &self.transitions {
            if !events.contains(&t.event.as_str()) {
                events.push(&t.event);
            }
        }
        events
    }

    /// State reached by firing `event` from `from`, if the event is allowed there
    pub fn target_of(&self, from: &str, event: &str) -> Option<&StateData> {
        self.transitions_from(from)
            .find(|t| t.event == event)
            .and_then(|t| self.state(&t.to))
    }

    /// Follow a sequence of events from the initial state
    ///
    /// Returns the state the path ends at, or `TransitionNotAllowed` for the
    /// first event that has no transition from the current state.
    ///
    /// # Example
    /// ```
    /// use fsmfig::catalog::viewing_machine;
    ///
    /// let machine = viewing_machine().unwrap();
    /// let end = machine.walk(&["start_viewing"]).unwrap();
    /// assert_eq!(end.id, "viewing");
    /// ```
    pub fn walk<S: AsRef<str>>(&self, events: &[S]) -> Result<&StateData, DiagramError> {
        let mut current = self.initial_state();
        for event in events {
            let event = event.as_ref();
            current = self
                .target_of(&current.id, event)
                .ok_or_else(|| DiagramError::TransitionNotAllowed {
                    machine: self.name.clone(),
                    event: event.to_string(),
                    state: current.id.clone(),
                })?;
        }
        Ok(current)
    }
}

impl Topology for StateMachine {
    type Node = StateData;
    type Edge = TransitionData;

    fn name(&self) -> &str {
        &self.name
    }

    fn get_node(&self, id: &str) -> Option<&Self::Node> {
        self.state(id)
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.states.iter()
    }

    fn edges(&self) -> impl Iterator<Item = &Self::Edge> {
        self.transitions.iter()
    }

    fn node_count(&self) -> usize {
        self.states.len()
    }

    fn edge_count(&self) -> usize {
        self.transitions.len()
    }
}
