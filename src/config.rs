//! Configuration values shared by the loader, the tape and the run driver.

use crate::tape::Tape;
use crate::types::{
    Mode, TuringMachineError, DEFAULT_GROWTH_SIZE, DEFAULT_PROGRESS_INTERVAL, DEFAULT_TAPE_SIZE,
};

/// Options applied while turning a description into a table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub mode: Mode,
    /// Name of the start state. The first declared state is used when `None`.
    pub start: Option<String>,
}

/// Initial layout of a blank tape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapeConfig {
    pub initial_size: usize,
    pub growth_size: usize,
}

impl Default for TapeConfig {
    fn default() -> Self {
        Self {
            initial_size: DEFAULT_TAPE_SIZE,
            growth_size: DEFAULT_GROWTH_SIZE,
        }
    }
}

impl TapeConfig {
    pub fn build(&self) -> Result<Tape, TuringMachineError> {
        Tape::new(self.initial_size, self.growth_size)
    }

    /// The head position that places the head in the middle of a fresh tape.
    pub fn center(&self) -> i64 {
        (self.initial_size / 2) as i64
    }
}

/// Limits and reporting cadence for [`TuringMachine::run_with`](crate::TuringMachine::run_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Stop after this many steps of the run, even if the machine has not halted.
    pub max_steps: Option<u64>,
    /// Report progress every this many steps. `None` only reports when the run stops.
    pub progress_interval: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            progress_interval: Some(DEFAULT_PROGRESS_INTERVAL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tape_config_defaults() {
        let config = TapeConfig::default();
        let tape = config.build().unwrap();

        assert_eq!(tape.len(), 1024);
        assert_eq!(tape.growth_size(), 1024);
        assert_eq!(config.center(), 512);
    }

    #[test]
    fn test_tape_config_rejects_zero_growth() {
        let config = TapeConfig {
            initial_size: 8,
            growth_size: 0,
        };
        assert_eq!(
            config.build(),
            Err(TuringMachineError::InvalidGrowthSize(0))
        );
    }
}
