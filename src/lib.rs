//! This crate provides a deterministic single-tape Turing machine engine.
//! It includes modules for parsing machine descriptions into immutable transition tables,
//! a tape that grows in both directions, the step-by-step execution engine, checkpoints,
//! static analysis of tables, and a small catalogue of built-in machines.

pub mod alphabet;
pub mod analyzer;
pub mod checkpoint;
pub mod config;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `Alphabet` struct from the alphabet module.
pub use alphabet::Alphabet;
/// Re-exports the `analyze` function and `AnalysisWarning` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisWarning};
/// Re-exports the `Checkpoint` struct from the checkpoint module.
pub use checkpoint::Checkpoint;
/// Re-exports the configuration types from the config module.
pub use config::{LoadOptions, RunConfig, TapeConfig};
/// Re-exports the encoding functions from the encoder module.
pub use encoder::{describe, encode};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the engine and its run types from the machine module.
pub use machine::{Progress, RunOutcome, TuringMachine};
/// Re-exports the `parse` function from the parser module.
pub use parser::{parse, parse_with};
/// Re-exports `Program`, `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{Program, ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the table types from the table module.
pub use table::{TableBuilder, TransitionTable};
/// Re-exports the tape types from the tape module.
pub use tape::{Extent, Tape, TapeImage};
/// Re-exports the shared types and errors from the types module.
pub use types::{
    Direction, Mode, StateId, Step, SymbolId, Transition, TuringMachineError, BLANK, HALT_NAME,
};
