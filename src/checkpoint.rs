//! Serializable snapshots of a run, so a long computation can be stopped and resumed later.

use crate::machine::TuringMachine;
use crate::table::TransitionTable;
use crate::tape::{Tape, TapeImage};
use crate::types::{StateId, TuringMachineError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// The complete state of one run: machine registers plus the tape.
///
/// The transition table is not part of a checkpoint; it must be supplied again
/// on resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub start: StateId,
    pub state: StateId,
    pub head: i64,
    pub step_count: u64,
    pub tape: TapeImage,
}

impl Checkpoint {
    /// Captures `machine` together with the tape it runs on.
    pub fn capture(machine: &TuringMachine, tape: &Tape) -> Self {
        Self {
            start: machine.start_state(),
            state: machine.state(),
            head: machine.head(),
            step_count: machine.step_count(),
            tape: tape.image(),
        }
    }

    /// Restores a machine bound to `table` and its tape.
    ///
    /// Fails with `UnknownState` if the checkpoint names states the table does
    /// not have, and with `CheckpointError` or `InvalidGrowthSize` if the tape
    /// image is inconsistent.
    pub fn restore(
        self,
        table: Arc<TransitionTable>,
    ) -> Result<(TuringMachine, Tape), TuringMachineError> {
        if !table.contains_state(self.start) {
            return Err(TuringMachineError::UnknownState(self.start.to_string()));
        }
        if !self.state.is_halt() && !table.contains_state(self.state) {
            return Err(TuringMachineError::UnknownState(self.state.to_string()));
        }

        let tape = Tape::from_image(self.tape)?;
        let machine =
            TuringMachine::from_parts(table, self.start, self.state, self.head, self.step_count);

        Ok((machine, tape))
    }

    pub fn to_json(&self) -> Result<String, TuringMachineError> {
        serde_json::to_string(self).map_err(|e| TuringMachineError::CheckpointError(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, TuringMachineError> {
        serde_json::from_str(json).map_err(|e| TuringMachineError::CheckpointError(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<(), TuringMachineError> {
        fs::write(path, self.to_json()?).map_err(|e| {
            TuringMachineError::FileError(format!(
                "Failed to write checkpoint {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn load(path: &Path) -> Result<Self, TuringMachineError> {
        let json = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!(
                "Failed to read checkpoint {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }
}

impl TuringMachine {
    /// Shorthand for [`Checkpoint::capture`].
    pub fn checkpoint(&self, tape: &Tape) -> Checkpoint {
        Checkpoint::capture(self, tape)
    }

    /// Shorthand for [`Checkpoint::restore`].
    pub fn resume(
        table: Arc<TransitionTable>,
        checkpoint: Checkpoint,
    ) -> Result<(Self, Tape), TuringMachineError> {
        checkpoint.restore(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::RunOutcome;
    use crate::parser::parse;
    use tempfile::tempdir;

    const BUSY_BEAVER_3: &str =
        "0,1\nA,0,1,R,B,1,1,R,HALT\nB,0,0,R,C,1,1,R,B\nC,0,1,L,C,1,1,L,A";

    #[test]
    fn test_resume_continues_where_the_run_stopped() {
        let table = Arc::new(parse(BUSY_BEAVER_3).unwrap());
        let mut tape = Tape::new(2, 2).unwrap();
        let mut machine = TuringMachine::new(table.clone(), 0);

        let outcome = machine.run(&mut tape, Some(5)).unwrap();
        assert_eq!(outcome, RunOutcome::StepLimit { steps: 5 });

        let json = machine.checkpoint(&tape).to_json().unwrap();
        let checkpoint = Checkpoint::from_json(&json).unwrap();
        let (mut resumed, mut resumed_tape) = TuringMachine::resume(table, checkpoint).unwrap();

        assert_eq!(resumed.step_count(), 5);
        assert_eq!(resumed.head(), machine.head());
        assert_eq!(resumed.state(), machine.state());
        assert_eq!(resumed_tape, tape);

        let outcome = resumed.run(&mut resumed_tape, None).unwrap();
        assert_eq!(outcome, RunOutcome::Halted { steps: 14 });

        // Both copies finish identically.
        machine.run(&mut tape, None).unwrap();
        assert_eq!(resumed_tape, tape);
    }

    #[test]
    fn test_halted_checkpoint_stays_halted() {
        let table = Arc::new(parse("0,1\nA,0,1,S,HALT").unwrap());
        let mut tape = Tape::new(1, 1).unwrap();
        let mut machine = TuringMachine::new(table.clone(), 0);
        machine.run(&mut tape, None).unwrap();

        let (resumed, _) = machine.checkpoint(&tape).restore(table).unwrap();
        assert!(resumed.is_halted());
        assert_eq!(resumed.step_count(), 1);
    }

    #[test]
    fn test_restore_rejects_foreign_states() {
        let table = Arc::new(parse("0,1\nA,0,1,S,HALT").unwrap());
        let checkpoint = Checkpoint {
            start: StateId::new(1),
            state: StateId::new(3),
            head: 0,
            step_count: 10,
            tape: Tape::new(1, 1).unwrap().image(),
        };

        assert!(matches!(
            checkpoint.restore(table),
            Err(TuringMachineError::UnknownState(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Checkpoint::from_json("{\"state\": 1}"),
            Err(TuringMachineError::CheckpointError(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.json");
        let table = Arc::new(parse(BUSY_BEAVER_3).unwrap());
        let mut tape = Tape::new(4, 4).unwrap();
        let mut machine = TuringMachine::new(table, 1);
        machine.run(&mut tape, Some(3)).unwrap();

        let checkpoint = machine.checkpoint(&tape);
        checkpoint.save(&path).unwrap();
        assert_eq!(Checkpoint::load(&path).unwrap(), checkpoint);

        let missing = Checkpoint::load(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(TuringMachineError::FileError(_))));
    }
}
