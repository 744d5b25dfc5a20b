//! The fixed set of symbols a machine works with.

use crate::types::{SymbolId, TuringMachineError};
use std::collections::HashMap;

/// A dense, immutable mapping between symbol names and [`SymbolId`]s.
///
/// The id of a symbol is its position in the list it was built from, so the
/// first symbol is always the blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    names: Vec<String>,
    ids: HashMap<String, SymbolId>,
}

impl Alphabet {
    /// Builds an alphabet from an ordered list of names.
    ///
    /// Fails with `DuplicateSymbol` if a name repeats and `EmptyAlphabet` if
    /// the list is empty.
    pub fn new<I, S>(names: I) -> Result<Self, TuringMachineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut alphabet = Self {
            names: Vec::new(),
            ids: HashMap::new(),
        };

        for name in names {
            let name = name.into();
            if alphabet.ids.contains_key(&name) {
                return Err(TuringMachineError::DuplicateSymbol(name));
            }
            alphabet
                .ids
                .insert(name.clone(), alphabet.names.len() as SymbolId);
            alphabet.names.push(name);
        }

        if alphabet.names.is_empty() {
            return Err(TuringMachineError::EmptyAlphabet);
        }

        Ok(alphabet)
    }

    pub fn id_of(&self, name: &str) -> Option<SymbolId> {
        self.ids.get(name).copied()
    }

    /// Resolves a name, failing with `UnknownSymbol`.
    pub fn resolve(&self, name: &str) -> Result<SymbolId, TuringMachineError> {
        self.id_of(name)
            .ok_or_else(|| TuringMachineError::UnknownSymbol(name.to_string()))
    }

    pub fn name_of(&self, id: SymbolId) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        (id as usize) < self.names.len()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over `(id, name)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(id, name)| (id as SymbolId, name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_declaration_order() {
        let alphabet = Alphabet::new(["_", "0", "1"]).unwrap();

        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.id_of("_"), Some(0));
        assert_eq!(alphabet.id_of("1"), Some(2));
        assert_eq!(alphabet.name_of(1), Some("0"));
        assert_eq!(alphabet.name_of(3), None);
        assert!(alphabet.contains(2));
        assert!(!alphabet.contains(3));
    }

    #[test]
    fn test_unknown_name_is_not_defaulted() {
        let alphabet = Alphabet::new(["0", "1"]).unwrap();

        assert_eq!(alphabet.id_of("x"), None);
        assert_eq!(
            alphabet.resolve("x"),
            Err(TuringMachineError::UnknownSymbol("x".into()))
        );
    }

    #[test]
    fn test_duplicate_symbol() {
        let result = Alphabet::new(["0", "1", "0"]);
        assert_eq!(result, Err(TuringMachineError::DuplicateSymbol("0".into())));
    }

    #[test]
    fn test_empty_alphabet() {
        let result = Alphabet::new(Vec::<String>::new());
        assert_eq!(result, Err(TuringMachineError::EmptyAlphabet));
    }
}
