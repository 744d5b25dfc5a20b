//! This module provides the parser for machine descriptions, utilizing the `pest` crate.
//! It defines the grammar for the comma-separated description format and turns the parse tree
//! into a validated [`TransitionTable`].

use crate::alphabet::Alphabet;
use crate::config::LoadOptions;
use crate::table::{TableBuilder, TransitionTable};
use crate::types::{Direction, Mode, StateId, Transition, TuringMachineError, HALT_NAME};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use tracing::debug;

/// Derives a `PestParser` for the description grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DescriptionParser;

/// Parses a machine description with the default [`LoadOptions`].
pub fn parse(input: &str) -> Result<TransitionTable, TuringMachineError> {
    parse_with(input, &LoadOptions::default())
}

/// Parses a machine description into a [`TransitionTable`].
///
/// The first non-blank line defines the alphabet. Each further line declares a
/// state followed by groups of four fields (`symbol, write, direction, next`).
/// All states are declared before any transition is resolved, so a transition
/// may target a state declared on a later line.
///
/// # Returns
///
/// * `Ok(TransitionTable)` if the description is well formed.
/// * `Err(TuringMachineError::DuplicateSymbol)` if a symbol name repeats. This is
///   detected before any state is declared.
/// * `Err(TuringMachineError::UnknownSymbol)` if a transition names a symbol missing
///   from the alphabet.
/// * `Err(TuringMachineError::ParseError)` if a line has the wrong number of fields
///   or an empty name.
pub fn parse_with(
    input: &str,
    options: &LoadOptions,
) -> Result<TransitionTable, TuringMachineError> {
    let mut records = DescriptionParser::parse(Rule::description, input)
        .map_err(|e| TuringMachineError::ParseError(Box::new(e)))?
        .flat_map(|description| description.into_inner())
        .filter(|pair| pair.as_rule() == Rule::record)
        .map(Record::from_pair)
        .filter(|record| !record.is_blank());

    let symbols = records
        .next()
        .ok_or(TuringMachineError::EmptyAlphabet)?;
    let alphabet = parse_alphabet(&symbols)?;

    let states = records.collect::<Vec<_>>();
    let mut builder = TableBuilder::new(alphabet);

    // Declare every state first so forward references resolve.
    for record in &states {
        check_field_count(record)?;
        builder.add_state(record.name()?)?;
    }

    for record in &states {
        parse_transitions(record, &mut builder, options.mode)?;
    }

    if let Some(start) = &options.start {
        let id = builder
            .state_id(start)
            .ok_or_else(|| TuringMachineError::UnknownState(start.clone()))?;
        builder.set_start(id)?;
    }

    let table = builder.build()?;
    debug!(
        symbols = table.alphabet().len(),
        states = table.state_count(),
        transitions = table.transition_count(),
        "parsed machine description"
    );

    Ok(table)
}

/// Parses the alphabet record.
fn parse_alphabet(record: &Record) -> Result<Alphabet, TuringMachineError> {
    let mut names = Vec::with_capacity(record.fields.len());
    for field in &record.fields {
        if field.text.is_empty() {
            return Err(parse_error("Empty symbol name", field.span));
        }
        names.push(field.text);
    }

    Alphabet::new(names)
}

/// Parses the transitions of one state record into `builder`.
fn parse_transitions(
    record: &Record,
    builder: &mut TableBuilder,
    mode: Mode,
) -> Result<(), TuringMachineError> {
    let name = record.name()?;
    let state = builder
        .state_id(name)
        .ok_or_else(|| TuringMachineError::UnknownState(name.to_string()))?;

    for group in record.fields[1..].chunks(4) {
        let alphabet = builder.alphabet();
        let trigger = alphabet.resolve(group[0].text)?;
        let write = alphabet.resolve(group[1].text)?;
        let direction = group[2].text.parse::<Direction>()?;
        let next = resolve_next_state(group[3].text, builder, mode)?;

        builder.add_transition(state, Transition::new(trigger, write, direction, next))?;
    }

    Ok(())
}

/// Resolves a next-state name.
///
/// Declared names resolve to their state. In [`Mode::Lenient`] any other name
/// halts; in [`Mode::Strict`] only [`HALT_NAME`] does.
fn resolve_next_state(
    name: &str,
    builder: &TableBuilder,
    mode: Mode,
) -> Result<StateId, TuringMachineError> {
    if let Some(id) = builder.state_id(name) {
        return Ok(id);
    }

    match mode {
        Mode::Strict if !name.eq_ignore_ascii_case(HALT_NAME) => {
            Err(TuringMachineError::UnknownState(name.to_string()))
        }
        _ => Ok(StateId::HALT),
    }
}

/// Checks that a state record holds a name plus whole transition groups.
fn check_field_count(record: &Record) -> Result<(), TuringMachineError> {
    let extra = (record.fields.len() - 1) % 4;
    if extra != 0 {
        return Err(parse_error(
            &format!(
                "Expected a state name followed by groups of 4 fields, found {} trailing field(s)",
                extra
            ),
            record.span,
        ));
    }
    Ok(())
}

/// Creates a `TuringMachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> TuringMachineError {
    TuringMachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// A single line of the description with its trimmed fields.
struct Record<'i> {
    span: Span<'i>,
    fields: Vec<Field<'i>>,
}

struct Field<'i> {
    text: &'i str,
    span: Span<'i>,
}

impl<'i> Record<'i> {
    fn from_pair(pair: Pair<'i, Rule>) -> Self {
        let span = pair.as_span();
        let fields = pair
            .into_inner()
            .map(|field| Field {
                text: field.as_str().trim(),
                span: field.as_span(),
            })
            .collect();

        Self { span, fields }
    }

    fn is_blank(&self) -> bool {
        self.fields.iter().all(|field| field.text.is_empty())
    }

    fn name(&self) -> Result<&'i str, TuringMachineError> {
        match self.fields.first() {
            Some(field) if !field.text.is_empty() => Ok(field.text),
            _ => Err(parse_error("Missing state name", self.span)),
        }
    }
}
