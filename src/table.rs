//! This module provides the immutable [`TransitionTable`] the engine reads from, together with
//! the [`TableBuilder`] used by loaders to assemble one.

use crate::alphabet::Alphabet;
use crate::types::{StateId, SymbolId, Transition, TuringMachineError};
use std::collections::HashMap;

/// A complete machine definition: alphabet, named states and their transitions.
///
/// Transitions are stored in a dense `states × symbols` array so lookups are a
/// single index computation. The table never changes after [`TableBuilder::build`],
/// which makes it safe to share between any number of engines.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionTable {
    alphabet: Alphabet,
    states: Vec<String>,
    names: HashMap<String, StateId>,
    cells: Vec<Option<Transition>>,
    start: StateId,
}

impl TransitionTable {
    /// Returns the transition for `(state, symbol)`, or `None` when the machine
    /// has no rule for that pair (including when `state` is HALT).
    pub fn lookup(&self, state: StateId, symbol: SymbolId) -> Option<&Transition> {
        let row = state.index()?;
        if row >= self.states.len() || !self.alphabet.contains(symbol) {
            return None;
        }
        self.cells[row * self.alphabet.len() + symbol as usize].as_ref()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The state a fresh engine starts in.
    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn contains_state(&self, state: StateId) -> bool {
        state.index().is_some_and(|row| row < self.states.len())
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.names.get(name).copied()
    }

    /// Returns the declared name of `state`, `None` for HALT and unknown ids.
    pub fn state_name(&self, state: StateId) -> Option<&str> {
        state
            .index()
            .and_then(|row| self.states.get(row))
            .map(String::as_str)
    }

    /// Iterates over `(id, name)` pairs in declaration order.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &str)> {
        self.states
            .iter()
            .enumerate()
            .map(|(row, name)| (StateId::new(row as i32 + 1), name.as_str()))
    }

    /// Iterates over the transitions of `state` ordered by trigger symbol.
    pub fn transitions(&self, state: StateId) -> impl Iterator<Item = &Transition> {
        let width = self.alphabet.len();
        let range = match state.index() {
            Some(row) if row < self.states.len() => row * width..(row + 1) * width,
            _ => 0..0,
        };
        self.cells[range].iter().flatten()
    }

    pub fn transition_count(&self) -> usize {
        self.cells.iter().flatten().count()
    }
}

/// Incrementally assembles a [`TransitionTable`].
///
/// States are numbered from 1 in the order they are added. The first state
/// becomes the start state unless [`TableBuilder::set_start`] designates another.
#[derive(Debug)]
pub struct TableBuilder {
    alphabet: Alphabet,
    states: Vec<String>,
    names: HashMap<String, StateId>,
    rules: HashMap<(StateId, SymbolId), Transition>,
    start: Option<StateId>,
}

impl TableBuilder {
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            states: Vec::new(),
            names: HashMap::new(),
            rules: HashMap::new(),
            start: None,
        }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Declares a new state and returns its id.
    pub fn add_state(&mut self, name: impl Into<String>) -> Result<StateId, TuringMachineError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(TuringMachineError::DuplicateState(name));
        }

        let id = StateId::new(self.states.len() as i32 + 1);
        self.names.insert(name.clone(), id);
        self.states.push(name);
        Ok(id)
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.names.get(name).copied()
    }

    /// Adds `transition` to `state`. Each state accepts at most one transition
    /// per trigger symbol.
    pub fn add_transition(
        &mut self,
        state: StateId,
        transition: Transition,
    ) -> Result<(), TuringMachineError> {
        let row = state
            .index()
            .filter(|&row| row < self.states.len())
            .ok_or_else(|| TuringMachineError::UnknownState(state.to_string()))?;

        for symbol in [transition.trigger, transition.write] {
            if !self.alphabet.contains(symbol) {
                return Err(TuringMachineError::InvalidSymbolId(symbol));
            }
        }

        let key = (state, transition.trigger);
        if self.rules.contains_key(&key) {
            return Err(TuringMachineError::DuplicateTransition {
                state: self.states[row].clone(),
                symbol: self
                    .alphabet
                    .name_of(transition.trigger)
                    .unwrap_or_default()
                    .to_string(),
            });
        }

        self.rules.insert(key, transition);
        Ok(())
    }

    pub fn set_start(&mut self, state: StateId) -> Result<(), TuringMachineError> {
        if state.index().map_or(true, |row| row >= self.states.len()) {
            return Err(TuringMachineError::UnknownState(state.to_string()));
        }
        self.start = Some(state);
        Ok(())
    }

    /// Freezes the builder into a table.
    ///
    /// Fails with `NoStates` if nothing was declared and with `UnknownState` if
    /// a transition targets a positive id that was never declared.
    pub fn build(self) -> Result<TransitionTable, TuringMachineError> {
        if self.states.is_empty() {
            return Err(TuringMachineError::NoStates);
        }

        let width = self.alphabet.len();
        let mut cells = vec![None; self.states.len() * width];

        for ((state, symbol), transition) in self.rules {
            if !transition.next.is_halt()
                && transition
                    .next
                    .index()
                    .map_or(true, |row| row >= self.states.len())
            {
                return Err(TuringMachineError::UnknownState(
                    transition.next.to_string(),
                ));
            }

            // Keys were validated in `add_transition`.
            if let Some(row) = state.index() {
                cells[row * width + symbol as usize] = Some(transition);
            }
        }

        Ok(TransitionTable {
            alphabet: self.alphabet,
            states: self.states,
            names: self.names,
            cells,
            start: self.start.unwrap_or(StateId::new(1)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn binary() -> Alphabet {
        Alphabet::new(["0", "1"]).unwrap()
    }

    #[test]
    fn test_lookup() {
        let mut builder = TableBuilder::new(binary());
        let a = builder.add_state("A").unwrap();
        let b = builder.add_state("B").unwrap();
        builder
            .add_transition(a, Transition::new(0, 1, Direction::Right, b))
            .unwrap();
        builder
            .add_transition(b, Transition::new(1, 0, Direction::Left, StateId::HALT))
            .unwrap();

        let table = builder.build().unwrap();

        assert_eq!(table.start(), a);
        assert_eq!(table.state_count(), 2);
        assert_eq!(table.transition_count(), 2);
        assert_eq!(
            table.lookup(a, 0),
            Some(&Transition::new(0, 1, Direction::Right, b))
        );
        assert_eq!(table.lookup(a, 1), None);
        assert_eq!(table.lookup(b, 0), None);
        assert_eq!(table.lookup(StateId::HALT, 0), None);
        assert_eq!(table.lookup(StateId::new(3), 0), None);
        assert_eq!(table.lookup(a, 9), None);
    }

    #[test]
    fn test_state_ids_are_dense_from_one() {
        let mut builder = TableBuilder::new(binary());
        assert_eq!(builder.add_state("x").unwrap(), StateId::new(1));
        assert_eq!(builder.add_state("y").unwrap(), StateId::new(2));
        assert_eq!(builder.add_state("z").unwrap(), StateId::new(3));

        let table = builder.build().unwrap();
        let names: Vec<_> = table.states().map(|(_, name)| name).collect();
        assert_eq!(names, vec!["x", "y", "z"]);
        assert_eq!(table.state_id("y"), Some(StateId::new(2)));
        assert_eq!(table.state_name(StateId::new(3)), Some("z"));
        assert_eq!(table.state_name(StateId::HALT), None);
    }

    #[test]
    fn test_designated_start() {
        let mut builder = TableBuilder::new(binary());
        builder.add_state("A").unwrap();
        let b = builder.add_state("B").unwrap();
        builder.set_start(b).unwrap();

        assert_eq!(builder.build().unwrap().start(), b);
    }

    #[test]
    fn test_builder_errors() {
        let mut builder = TableBuilder::new(binary());
        let a = builder.add_state("A").unwrap();

        assert_eq!(
            builder.add_state("A"),
            Err(TuringMachineError::DuplicateState("A".into()))
        );
        assert_eq!(
            builder.add_transition(a, Transition::new(2, 0, Direction::Stay, a)),
            Err(TuringMachineError::InvalidSymbolId(2))
        );
        assert!(matches!(
            builder.add_transition(StateId::new(5), Transition::new(0, 0, Direction::Stay, a)),
            Err(TuringMachineError::UnknownState(_))
        ));
        assert!(matches!(
            builder.set_start(StateId::HALT),
            Err(TuringMachineError::UnknownState(_))
        ));

        builder
            .add_transition(a, Transition::new(0, 1, Direction::Stay, a))
            .unwrap();
        assert_eq!(
            builder.add_transition(a, Transition::new(0, 0, Direction::Left, a)),
            Err(TuringMachineError::DuplicateTransition {
                state: "A".into(),
                symbol: "0".into(),
            })
        );
    }

    #[test]
    fn test_build_rejects_dangling_next_state() {
        let mut builder = TableBuilder::new(binary());
        let a = builder.add_state("A").unwrap();
        builder
            .add_transition(a, Transition::new(0, 1, Direction::Right, StateId::new(4)))
            .unwrap();

        assert!(matches!(
            builder.build(),
            Err(TuringMachineError::UnknownState(_))
        ));
    }

    #[test]
    fn test_build_without_states() {
        let builder = TableBuilder::new(binary());
        assert_eq!(builder.build(), Err(TuringMachineError::NoStates));
    }

    #[test]
    fn test_transitions_of_state() {
        let mut builder = TableBuilder::new(binary());
        let a = builder.add_state("A").unwrap();
        builder
            .add_transition(a, Transition::new(1, 1, Direction::Left, a))
            .unwrap();
        builder
            .add_transition(a, Transition::new(0, 1, Direction::Right, StateId::HALT))
            .unwrap();
        let table = builder.build().unwrap();

        let triggers: Vec<_> = table.transitions(a).map(|t| t.trigger).collect();
        assert_eq!(triggers, vec![0, 1]);
        assert_eq!(table.transitions(StateId::HALT).count(), 0);
    }
}
