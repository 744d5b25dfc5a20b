//! This module defines the core data structures and types used throughout the Turing Machine
//! engine, including symbol and state identifiers, transitions, step outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::Rule;

/// Dense identifier of a symbol in an [`Alphabet`](crate::alphabet::Alphabet).
pub type SymbolId = u32;

/// The blank symbol. Unwritten tape cells read as this id.
pub const BLANK: SymbolId = 0;
/// The default number of cells a new tape starts with.
pub const DEFAULT_TAPE_SIZE: usize = 1024;
/// The default number of cells added each time the tape grows in one direction.
pub const DEFAULT_GROWTH_SIZE: usize = 1024;
/// The default number of steps between two progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000_000;
/// The next-state name that always denotes halting.
pub const HALT_NAME: &str = "HALT";

/// Identifier of a machine state.
///
/// Real states are numbered from 1 in declaration order. Every id below 1 is
/// reserved and means the machine has halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(i32);

impl StateId {
    /// The canonical halting id.
    pub const HALT: StateId = StateId(0);

    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns `true` when this id denotes HALT rather than an addressable state.
    pub const fn is_halt(self) -> bool {
        self.0 < 1
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    /// Zero-based row of this state in a dense table, `None` for HALT.
    pub(crate) fn index(self) -> Option<usize> {
        if self.is_halt() {
            None
        } else {
            Some(self.0 as usize - 1)
        }
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_halt() {
            f.write_str(HALT_NAME)
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Signed offset applied to the head position.
    pub fn delta(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Stay => 0,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        }
    }
}

impl FromStr for Direction {
    type Err = TuringMachineError;

    /// Parses `L`, `R` or `S` in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" | "l" => Ok(Direction::Left),
            "R" | "r" => Ok(Direction::Right),
            "S" | "s" => Ok(Direction::Stay),
            other => Err(TuringMachineError::InvalidDirection(other.to_string())),
        }
    }
}

/// A single transition rule.
///
/// When the machine is in the owning state and reads `trigger`, it writes `write`,
/// moves in `direction` and enters `next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub trigger: SymbolId,
    pub write: SymbolId,
    pub direction: Direction,
    pub next: StateId,
}

impl Transition {
    pub fn new(trigger: SymbolId, write: SymbolId, direction: Direction, next: StateId) -> Self {
        Self {
            trigger,
            write,
            direction,
            next,
        }
    }
}

/// Represents the outcome of a single call to [`TuringMachine::step`](crate::TuringMachine::step).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A transition was applied and the machine is still running.
    Continue,
    /// The machine is halted, either by this step or already before it.
    Halted,
}

/// Controls how next-state names that do not match a declared state are resolved.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Any undeclared next-state name halts the machine.
    #[default]
    Lenient,
    /// Only [`HALT_NAME`] halts; any other undeclared name is an error.
    Strict,
}

/// Represents the errors that can occur while loading or running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    #[error("Alphabet must contain at least one symbol")]
    EmptyAlphabet,
    #[error("Duplicate symbol: {0}")]
    DuplicateSymbol(String),
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),
    #[error("Duplicate state: {0}")]
    DuplicateState(String),
    #[error("Unknown state: {0}")]
    UnknownState(String),
    #[error("State {state} already has a transition for symbol {symbol}")]
    DuplicateTransition { state: String, symbol: String },
    #[error("Invalid direction {0:?}, expected L, R or S")]
    InvalidDirection(String),
    #[error("Machine description declares no states")]
    NoStates,
    #[error("Symbol id {0} is outside the alphabet")]
    InvalidSymbolId(SymbolId),
    /// No rule is defined for the current state and the symbol under the head.
    #[error("No transition defined for state {state} and symbol {symbol} at step {step}")]
    UndefinedTransition {
        state: StateId,
        symbol: SymbolId,
        step: u64,
    },
    #[error("Tape growth size must be greater than zero, got {0}")]
    InvalidGrowthSize(usize),
    /// Indicates an error during the parsing of a machine description.
    #[error("Description parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    #[error("Program not found: {0}")]
    UnknownProgram(String),
    #[error("Checkpoint error: {0}")]
    CheckpointError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halt_ids() {
        assert!(StateId::HALT.is_halt());
        assert!(StateId::new(-3).is_halt());
        assert!(!StateId::new(1).is_halt());
        assert_eq!(StateId::new(1).index(), Some(0));
        assert_eq!(StateId::new(0).index(), None);
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("L".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!(" r ".parse::<Direction>().unwrap(), Direction::Right);
        assert_eq!("s".parse::<Direction>().unwrap(), Direction::Stay);

        let error = "X".parse::<Direction>().unwrap_err();
        assert_eq!(error, TuringMachineError::InvalidDirection("X".into()));
    }

    #[test]
    fn test_direction_serialization() {
        let json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(json, "\"Left\"");
        assert_eq!(
            serde_json::from_str::<Direction>(&json).unwrap(),
            Direction::Left
        );
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::UndefinedTransition {
            state: StateId::new(2),
            symbol: 1,
            step: 7,
        };

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("state #2"));
        assert!(error_msg.contains("symbol 1"));
        assert!(error_msg.contains("step 7"));
    }
}
