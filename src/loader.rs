//! This module provides the `ProgramLoader` struct, responsible for loading machine descriptions
//! and tapes from files and strings.

use crate::alphabet::Alphabet;
use crate::config::LoadOptions;
use crate::parser::parse_with;
use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::types::TuringMachineError;
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions recognized as machine descriptions.
pub const MACHINE_EXTENSIONS: [&str; 2] = ["tm", "csv"];

/// `ProgramLoader` is a utility struct for loading machine descriptions and tapes.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single machine description from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(TransitionTable)` if the file is read and parsed successfully.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * Any load error reported by the parser otherwise.
    pub fn load_machine(
        path: &Path,
        options: &LoadOptions,
    ) -> Result<TransitionTable, TuringMachineError> {
        let content = read(path)?;
        parse_with(&content, options)
    }

    /// Loads a machine description from string content.
    pub fn load_machine_from_string(
        content: &str,
        options: &LoadOptions,
    ) -> Result<TransitionTable, TuringMachineError> {
        parse_with(content, options)
    }

    /// Loads a tape file of comma-separated symbol names, placed from position 0.
    pub fn load_tape(
        path: &Path,
        alphabet: &Alphabet,
        growth_size: usize,
    ) -> Result<Tape, TuringMachineError> {
        let content = read(path)?;
        Tape::parse(&content, alphabet, growth_size)
    }

    /// Loads every machine description (`.tm` or `.csv`) from a given directory.
    ///
    /// Directories and files with other extensions are skipped.
    ///
    /// # Returns
    ///
    /// * `Vec<Result<(PathBuf, TransitionTable), TuringMachineError>>` - One entry per
    ///   candidate file, holding either the loaded table or the reason it failed.
    pub fn load_machines(
        directory: &Path,
        options: &LoadOptions,
    ) -> Vec<Result<(PathBuf, TransitionTable), TuringMachineError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                // Skip directories and unrelated files
                let is_machine = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| MACHINE_EXTENSIONS.contains(&ext));
                if path.is_dir() || !is_machine {
                    return None;
                }

                Some(Self::load_machine(&path, options).map(|table| (path, table)))
            })
            .collect();

        // Directory order is platform dependent.
        results.sort_by_key(|result| match result {
            Ok((path, _)) => Some(path.clone()),
            Err(_) => None,
        });

        results
    }
}

fn read(path: &Path) -> Result<String, TuringMachineError> {
    fs::read_to_string(path).map_err(|e| {
        TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const VALID: &str = "0,1\nA,0,1,R,B\nB,0,1,L,HALT\n";

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_machine() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "valid.tm", VALID);

        let table = ProgramLoader::load_machine(&path, &LoadOptions::default()).unwrap();
        assert_eq!(table.state_count(), 2);
        assert_eq!(table.state_name(table.start()), Some("A"));
    }

    #[test]
    fn test_load_invalid_machine() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "invalid.tm", "0,1,1\nA,0,1,R,HALT");

        let result = ProgramLoader::load_machine(&path, &LoadOptions::default());
        assert_eq!(result, Err(TuringMachineError::DuplicateSymbol("1".into())));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = ProgramLoader::load_machine(&dir.path().join("nope.tm"), &LoadOptions::default());
        assert!(matches!(result, Err(TuringMachineError::FileError(_))));
    }

    #[test]
    fn test_load_machine_from_string() {
        let table = ProgramLoader::load_machine_from_string(VALID, &LoadOptions::default());
        assert!(table.is_ok());
    }

    #[test]
    fn test_load_tape() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "input.tape", "1,1,0,1\n");
        let table = ProgramLoader::load_machine_from_string(VALID, &LoadOptions::default()).unwrap();

        let tape = ProgramLoader::load_tape(&path, table.alphabet(), 16).unwrap();
        assert_eq!(tape.len(), 8);
        assert_eq!(tape.cells()[..4], [1, 1, 0, 1]);

        let path = write_file(dir.path(), "bad.tape", "1,2");
        let result = ProgramLoader::load_tape(&path, table.alphabet(), 16);
        assert_eq!(result, Err(TuringMachineError::UnknownSymbol("2".into())));
    }

    #[test]
    fn test_load_machines_from_directory() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "valid.tm", VALID);
        write_file(dir.path(), "other.csv", VALID);
        write_file(dir.path(), "invalid.tm", "0,0\nA");
        write_file(dir.path(), "ignored.txt", "This file should be ignored");
        fs::create_dir(dir.path().join("nested.tm")).unwrap();

        let results = ProgramLoader::load_machines(dir.path(), &LoadOptions::default());

        assert_eq!(results.len(), 3);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    }

    #[test]
    fn test_load_machines_from_missing_directory() {
        let dir = tempdir().unwrap();
        let results =
            ProgramLoader::load_machines(&dir.path().join("missing"), &LoadOptions::default());

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(TuringMachineError::FileError(_))));
    }
}
