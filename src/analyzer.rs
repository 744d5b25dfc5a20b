//! This module provides functions for analyzing transition tables to detect likely mistakes
//! before execution: states that can never be entered, (state, symbol) pairs that would fault
//! at runtime, and machines that have no way to halt.

use crate::table::TransitionTable;
use crate::types::{StateId, SymbolId};
use std::collections::HashSet;
use std::fmt;

/// Represents an advisory finding about a [`TransitionTable`].
///
/// None of these prevent a machine from running; they point at states or
/// symbols that are probably wrong.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisWarning {
    /// States that cannot be reached from the start state, by name.
    UnreachableStates(Vec<String>),
    /// Reachable `(state, symbol)` pairs without a transition. Reading one of
    /// these symbols in that state raises an undefined-transition fault.
    MissingTransitions(Vec<(StateId, SymbolId)>),
    /// No reachable transition leads to HALT, so the machine can only stop by faulting.
    NoHaltingTransition,
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::UnreachableStates(states) => {
                write!(f, "Unreachable states detected: {:?}", states)
            }
            AnalysisWarning::MissingTransitions(pairs) => {
                write!(f, "{} reachable state/symbol pair(s) have no transition", pairs.len())
            }
            AnalysisWarning::NoHaltingTransition => {
                write!(f, "No reachable transition leads to HALT")
            }
        }
    }
}

/// Analyzes a [`TransitionTable`] and returns every finding.
///
/// # Returns
///
/// * An empty `Vec` when nothing looks suspicious.
/// * Otherwise the findings in a fixed order: unreachable states, missing
///   transitions, missing halt.
pub fn analyze(table: &TransitionTable) -> Vec<AnalysisWarning> {
    let reachable = reachable_states(table);

    [
        check_unreachable_states(table, &reachable),
        check_missing_transitions(table, &reachable),
        check_halting(table, &reachable),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Collects the states reachable from the start state by a depth-first walk.
fn reachable_states(table: &TransitionTable) -> HashSet<StateId> {
    let mut visited = HashSet::new();
    let mut queue = vec![table.start()];

    while let Some(state) = queue.pop() {
        if state.is_halt() || !visited.insert(state) {
            continue;
        }

        for transition in table.transitions(state) {
            if !visited.contains(&transition.next) {
                queue.push(transition.next);
            }
        }
    }

    visited
}

fn check_unreachable_states(
    table: &TransitionTable,
    reachable: &HashSet<StateId>,
) -> Option<AnalysisWarning> {
    let unreachable: Vec<String> = table
        .states()
        .filter(|(id, _)| !reachable.contains(id))
        .map(|(_, name)| name.to_string())
        .collect();

    (!unreachable.is_empty()).then_some(AnalysisWarning::UnreachableStates(unreachable))
}

fn check_missing_transitions(
    table: &TransitionTable,
    reachable: &HashSet<StateId>,
) -> Option<AnalysisWarning> {
    let missing: Vec<(StateId, SymbolId)> = table
        .states()
        .filter(|(id, _)| reachable.contains(id))
        .flat_map(|(state, _)| {
            table
                .alphabet()
                .iter()
                .filter(move |&(symbol, _)| table.lookup(state, symbol).is_none())
                .map(move |(symbol, _)| (state, symbol))
        })
        .collect();

    (!missing.is_empty()).then_some(AnalysisWarning::MissingTransitions(missing))
}

fn check_halting(table: &TransitionTable, reachable: &HashSet<StateId>) -> Option<AnalysisWarning> {
    let halts = reachable
        .iter()
        .flat_map(|&state| table.transitions(state))
        .any(|transition| transition.next.is_halt());

    (!halts).then_some(AnalysisWarning::NoHaltingTransition)
}
