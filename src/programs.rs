use crate::config::LoadOptions;
use crate::parser::parse_with;
use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::types::TuringMachineError;

use std::sync::Arc;
use tracing::warn;

/// An embedded machine description and the tape it is meant to run on.
struct Builtin {
    name: &'static str,
    description: &'static str,
    source: &'static str,
    tape: &'static str,
}

// Default embedded programs
const BUILTINS: [Builtin; 3] = [
    Builtin {
        name: "Busy Beaver 2",
        description: "2-state, 2-symbol busy beaver: halts after 6 steps with 4 ones",
        source: include_str!("../machines/busy-beaver-2.tm"),
        tape: "",
    },
    Builtin {
        name: "Busy Beaver 3",
        description: "3-state, 2-symbol busy beaver: halts after 14 steps with 6 ones",
        source: include_str!("../machines/busy-beaver-3.tm"),
        tape: "",
    },
    Builtin {
        name: "Binary Increment",
        description: "Adds one to the binary number starting under the head",
        source: include_str!("../machines/binary-increment.tm"),
        tape: "1,0,1,1",
    },
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<Program> = load_builtins();
}

/// A ready-to-run machine from the built-in catalogue.
#[derive(Debug, Clone)]
pub struct Program {
    pub name: &'static str,
    pub description: &'static str,
    pub source: &'static str,
    pub table: Arc<TransitionTable>,
    initial_tape: &'static str,
}

impl Program {
    /// Builds the program's initial tape with logical position 0 at its first symbol.
    pub fn tape(&self, growth_size: usize) -> Result<Tape, TuringMachineError> {
        Tape::parse(self.initial_tape, self.table.alphabet(), growth_size)
    }

    pub fn initial_tape(&self) -> &'static str {
        self.initial_tape
    }
}

fn load_builtins() -> Vec<Program> {
    BUILTINS
        .iter()
        .filter_map(|builtin| {
            match parse_with(builtin.source, &LoadOptions::default()) {
                Ok(table) => Some(Program {
                    name: builtin.name,
                    description: builtin.description,
                    source: builtin.source,
                    table: Arc::new(table),
                    initial_tape: builtin.tape,
                }),
                Err(e) => {
                    warn!(program = builtin.name, error = %e, "failed to parse built-in program");
                    None
                }
            }
        })
        .collect()
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<&'static Program, TuringMachineError> {
        PROGRAMS.get(index).ok_or_else(|| {
            TuringMachineError::UnknownProgram(format!("index {} out of range", index))
        })
    }

    /// Get a program by its name, ignoring case
    pub fn get_program_by_name(name: &str) -> Result<&'static Program, TuringMachineError> {
        PROGRAMS
            .iter()
            .find(|program| program.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| TuringMachineError::UnknownProgram(name.to_string()))
    }

    /// List all program names
    pub fn list_program_names() -> Vec<&'static str> {
        PROGRAMS.iter().map(|program| program.name).collect()
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let program = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: program.name,
            description: program.description,
            initial_tape: program.initial_tape,
            state_count: program.table.state_count(),
            transition_count: program.table.transition_count(),
        })
    }

    /// Search for programs by name
    pub fn search_programs(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();
        PROGRAMS
            .iter()
            .enumerate()
            .filter(|(_, program)| program.name.to_lowercase().contains(&query))
            .map(|(index, _)| index)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: &'static str,
    pub description: &'static str,
    pub initial_tape: &'static str,
    pub state_count: usize,
    pub transition_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::machine::{RunOutcome, TuringMachine};
    use crate::tape::Extent;

    #[test]
    fn test_all_programs_are_loaded() {
        assert_eq!(ProgramManager::get_program_count(), BUILTINS.len());
    }

    #[test]
    fn test_all_programs_are_clean() {
        for program in PROGRAMS.iter() {
            assert!(
                analyze(&program.table).is_empty(),
                "Program '{}' has analysis warnings",
                program.name
            );
        }
    }

    #[test]
    fn test_programs_halt() {
        let expected = [
            ("Busy Beaver 2", 6, "1,1,1,1"),
            ("Busy Beaver 3", 14, "1,1,1,1,1,1"),
            ("Binary Increment", 8, "1,1,0,0,_"),
        ];

        for (name, steps, tape) in expected {
            let program = ProgramManager::get_program_by_name(name).unwrap();
            let mut machine_tape = program.tape(4).unwrap();
            let mut machine = TuringMachine::new(program.table.clone(), 0);

            let outcome = machine.run(&mut machine_tape, Some(1_000)).unwrap();

            assert_eq!(outcome, RunOutcome::Halted { steps }, "program {}", name);
            assert_eq!(
                machine_tape
                    .render(program.table.alphabet(), Extent::Written)
                    .unwrap(),
                tape,
                "program {}",
                name
            );
        }
    }

    #[test]
    fn test_program_manager_get_program_by_index() {
        assert!(ProgramManager::get_program_by_index(0).is_ok());
        assert!(matches!(
            ProgramManager::get_program_by_index(999),
            Err(TuringMachineError::UnknownProgram(_))
        ));
    }

    #[test]
    fn test_program_manager_get_program_by_name() {
        let program = ProgramManager::get_program_by_name("binary increment").unwrap();
        assert_eq!(program.initial_tape(), "1,0,1,1");

        let result = ProgramManager::get_program_by_name("Nonexistent");
        assert!(result.is_err());
    }

    #[test]
    fn test_program_manager_list_program_names() {
        let names = ProgramManager::list_program_names();
        assert!(names.contains(&"Busy Beaver 2"));
        assert!(names.contains(&"Binary Increment"));
    }

    #[test]
    fn test_program_manager_get_program_info() {
        let info = ProgramManager::get_program_info(1).unwrap();
        assert_eq!(info.index, 1);
        assert_eq!(info.name, "Busy Beaver 3");
        assert_eq!(info.state_count, 3);
        assert_eq!(info.transition_count, 6);

        assert!(ProgramManager::get_program_info(999).is_err());
    }

    #[test]
    fn test_program_manager_search_programs() {
        assert_eq!(ProgramManager::search_programs("beaver"), vec![0, 1]);
        assert_eq!(ProgramManager::search_programs("INCREMENT"), vec![2]);
        assert!(ProgramManager::search_programs("nonexistent").is_empty());
    }
}
