//! This module renders a [`TransitionTable`] back into text: either the machine description
//! format read by the parser, or a compact human-readable listing.

use crate::table::TransitionTable;
use crate::types::{Transition, HALT_NAME};

/// Encodes a table in the machine description format.
///
/// Format: the alphabet on the first line, then one line per state:
/// `state,symbol,write,direction,next,...`. The start state is written first so
/// that re-parsing the output selects the same start state. Halting transitions
/// name [`HALT_NAME`], or a numbered variant of it if a state already uses that name
/// (only lenient parsing reads such a variant back as halting).
///
/// # Arguments
///
/// * `table` - The table to encode.
///
/// # Returns
///
/// * `String` - The encoded description, ending with a newline.
pub fn encode(table: &TransitionTable) -> String {
    let halt = halt_name(table);
    let symbols = table
        .alphabet()
        .iter()
        .map(|(_, name)| name)
        .collect::<Vec<_>>()
        .join(",");

    let start = table.start();
    let order = std::iter::once(start).chain(
        table
            .states()
            .map(|(id, _)| id)
            .filter(|&id| id != start),
    );

    let mut lines = vec![symbols];
    for state in order {
        let mut fields = vec![table.state_name(state).unwrap_or_default().to_string()];
        for transition in table.transitions(state) {
            let (trigger, write, next) = names(table, transition, &halt);
            fields.extend([
                trigger.to_string(),
                write.to_string(),
                transition.direction.as_char().to_string(),
                next.to_string(),
            ]);
        }
        lines.push(fields.join(","));
    }

    let mut encoded = lines.join("\n");
    encoded.push('\n');
    encoded
}

/// Lists every state with its transitions as `trigger/write/direction/next`.
///
/// ```text
/// A 0/1/R/B 1/1/L/B
/// B 0/1/L/A 1/1/R/HALT
/// ```
pub fn describe(table: &TransitionTable) -> String {
    table
        .states()
        .map(|(state, name)| {
            let mut line = name.to_string();
            for transition in table.transitions(state) {
                let (trigger, write, next) = names(table, transition, HALT_NAME);
                line.push_str(&format!(
                    " {}/{}/{}/{}",
                    trigger,
                    write,
                    transition.direction.as_char(),
                    next
                ));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolves the trigger, write and next-state names of a transition.
fn names<'a>(
    table: &'a TransitionTable,
    transition: &Transition,
    halt: &'a str,
) -> (&'a str, &'a str, &'a str) {
    let alphabet = table.alphabet();
    (
        alphabet.name_of(transition.trigger).unwrap_or_default(),
        alphabet.name_of(transition.write).unwrap_or_default(),
        table.state_name(transition.next).unwrap_or(halt),
    )
}

/// Picks a next-state name that cannot be mistaken for a declared state.
fn halt_name(table: &TransitionTable) -> String {
    let taken = |name: &str| table.state_id(name).is_some();
    if !taken(HALT_NAME) {
        return HALT_NAME.to_string();
    }

    (1..)
        .map(|n| format!("{}{}", HALT_NAME, n))
        .find(|name| !taken(name))
        .unwrap_or_default()
}
