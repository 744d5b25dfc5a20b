//! This module defines the `TuringMachine` struct, which executes a [`TransitionTable`] one
//! step at a time over a caller-owned [`Tape`], and the driver loop built on top of it.

use crate::config::RunConfig;
use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::types::{StateId, Step, TuringMachineError};
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{debug, trace};

/// The execution state of a single run.
///
/// The machine shares its table read-only and never owns a tape: every call to
/// [`TuringMachine::step`] borrows one. Independent machines may share the same
/// table across threads.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    table: Arc<TransitionTable>,
    start: StateId,
    state: StateId,
    head: i64,
    step_count: u64,
    halted: bool,
}

/// A snapshot handed to run observers between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub step_count: u64,
    pub state: StateId,
    pub head: i64,
    pub halted: bool,
    pub tape_len: usize,
}

/// Why a call to [`TuringMachine::run_with`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The machine entered HALT.
    Halted { steps: u64 },
    /// The configured step limit was reached first.
    StepLimit { steps: u64 },
    /// The observer asked the run to stop.
    Cancelled { steps: u64 },
}

impl RunOutcome {
    /// Total steps taken by the machine when the run returned.
    pub fn steps(&self) -> u64 {
        match *self {
            RunOutcome::Halted { steps }
            | RunOutcome::StepLimit { steps }
            | RunOutcome::Cancelled { steps } => steps,
        }
    }

    pub fn is_halted(&self) -> bool {
        matches!(self, RunOutcome::Halted { .. })
    }
}

impl TuringMachine {
    /// Creates a machine in the table's start state with the head at `head`.
    pub fn new(table: Arc<TransitionTable>, head: i64) -> Self {
        let start = table.start();
        Self {
            table,
            start,
            state: start,
            head,
            step_count: 0,
            halted: false,
        }
    }

    /// Creates a machine that starts in `start` instead of the table's default.
    pub fn with_start(
        table: Arc<TransitionTable>,
        start: StateId,
        head: i64,
    ) -> Result<Self, TuringMachineError> {
        if !table.contains_state(start) {
            return Err(TuringMachineError::UnknownState(start.to_string()));
        }

        let mut machine = Self::new(table, head);
        machine.start = start;
        machine.state = start;
        Ok(machine)
    }

    /// Rebuilds a machine from previously captured parts.
    pub(crate) fn from_parts(
        table: Arc<TransitionTable>,
        start: StateId,
        state: StateId,
        head: i64,
        step_count: u64,
    ) -> Self {
        Self {
            table,
            start,
            state,
            head,
            step_count,
            halted: state.is_halt(),
        }
    }

    /// Executes a single transition.
    ///
    /// The symbol under the head is read and looked up; the write symbol is
    /// stored at the head, then the head moves, then the state changes, and
    /// finally the machine halts if the new state is HALT. Each successful call
    /// adds exactly one to the step counter.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Continue)` if a transition was applied and the machine still runs.
    /// * `Ok(Step::Halted)` if this transition halted the machine, or if it was
    ///   already halted (in which case nothing changes).
    /// * `Err(TuringMachineError::UndefinedTransition)` if no rule exists for the
    ///   current state and symbol. The machine keeps running and its state, head,
    ///   counter and the tape contents are left untouched.
    pub fn step(&mut self, tape: &mut Tape) -> Result<Step, TuringMachineError> {
        if self.halted {
            return Ok(Step::Halted);
        }

        let symbol = tape.read(self.head);
        let transition = self
            .table
            .lookup(self.state, symbol)
            .copied()
            .ok_or(TuringMachineError::UndefinedTransition {
                state: self.state,
                symbol,
                step: self.step_count,
            })?;

        tape.write(transition.write, self.head);
        self.head += transition.direction.delta();
        self.state = transition.next;
        if self.state.is_halt() {
            self.halted = true;
        }
        self.step_count += 1;

        trace!(
            step = self.step_count,
            read = symbol,
            write = transition.write,
            head = self.head,
            state = %self.state,
            "step"
        );

        Ok(if self.halted {
            Step::Halted
        } else {
            Step::Continue
        })
    }

    /// Steps until the machine halts or `limit` steps have been taken by this call.
    pub fn run(
        &mut self,
        tape: &mut Tape,
        limit: Option<u64>,
    ) -> Result<RunOutcome, TuringMachineError> {
        let config = RunConfig {
            max_steps: limit,
            progress_interval: None,
        };
        self.run_with(tape, &config, |_| ControlFlow::Continue(()))
    }

    /// Steps until the machine halts, the step limit is reached, or `observer`
    /// returns [`ControlFlow::Break`].
    ///
    /// The observer only ever runs between steps: every `progress_interval`
    /// steps (counted on the machine's total) and once more when the run stops.
    /// Its return value on that final call is ignored.
    pub fn run_with<F>(
        &mut self,
        tape: &mut Tape,
        config: &RunConfig,
        mut observer: F,
    ) -> Result<RunOutcome, TuringMachineError>
    where
        F: FnMut(&Progress) -> ControlFlow<()>,
    {
        let interval = config.progress_interval.filter(|&n| n > 0);
        let mut taken = 0u64;

        let outcome = loop {
            if self.halted {
                break RunOutcome::Halted {
                    steps: self.step_count,
                };
            }
            if config.max_steps.is_some_and(|max| taken >= max) {
                break RunOutcome::StepLimit {
                    steps: self.step_count,
                };
            }

            self.step(tape)?;
            taken += 1;

            if interval.is_some_and(|n| self.step_count % n == 0)
                && observer(&self.progress(tape)).is_break()
            {
                break RunOutcome::Cancelled {
                    steps: self.step_count,
                };
            }
        };

        let _ = observer(&self.progress(tape));
        debug!(?outcome, tape_len = tape.len(), "run stopped");

        Ok(outcome)
    }

    /// Returns the machine to its start state with the head at `head`.
    pub fn restart(&mut self, head: i64) {
        self.state = self.start;
        self.head = head;
        self.step_count = 0;
        self.halted = false;
    }

    pub fn progress(&self, tape: &Tape) -> Progress {
        Progress {
            step_count: self.step_count,
            state: self.state,
            head: self.head,
            halted: self.halted,
            tape_len: tape.len(),
        }
    }

    pub fn table(&self) -> &Arc<TransitionTable> {
        &self.table
    }

    pub fn state(&self) -> StateId {
        self.state
    }

    /// Name of the current state, `None` once halted.
    pub fn state_name(&self) -> Option<&str> {
        self.table.state_name(self.state)
    }

    pub fn start_state(&self) -> StateId {
        self.start
    }

    pub fn head(&self) -> i64 {
        self.head
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }
}
