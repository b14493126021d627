//! This module provides the parser for machine definition files, utilizing the `pest` crate.
//! It defines the grammar for `.csv` machine files and functions to parse the input into a
//! `Machine` struct.

use crate::{
    analyzer::analyze,
    types::{Direction, Machine, MachineError, Transition, BLANK_SYMBOL},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;

/// Derives a `PestParser` for the machine definition grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct MachineParser;

/// Parses the given input string into a `Machine` struct.
///
/// This is the main entry point for parsing machine definitions. The parsed machine is
/// validated by the analyzer before being returned.
///
/// # Arguments
///
/// * `input` - A string slice containing the machine definition.
///
/// # Returns
///
/// * `Ok(Machine)` if the input is successfully parsed and validated.
/// * `Err(MachineError::ParseError)` if there are any syntax errors.
/// * `Err(MachineError::ValidationError)` if the machine fails validation.
pub fn parse(input: &str) -> Result<Machine, MachineError> {
    let machine = parse_unchecked(input)?;

    analyze(&machine)?;

    Ok(machine)
}

/// Parses the given input string into a `Machine` without running the analyzer.
pub fn parse_unchecked(input: &str) -> Result<Machine, MachineError> {
    let root = MachineParser::parse(Rule::machine, input.trim())
        .map_err(|e| MachineError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| MachineError::ValidationError("Empty machine definition".to_string()))?;

    parse_machine(root)
}

/// Parses the top-level structure of a machine definition from a `Pair<Rule::machine>`.
fn parse_machine(pair: Pair<Rule>) -> Result<Machine, MachineError> {
    let mut name: Option<String> = None;
    let mut states: Option<Vec<String>> = None;
    let mut input_alphabet: Option<Vec<char>> = None;
    let mut tape_alphabet: Option<Vec<char>> = None;
    let mut start: Option<String> = None;
    let mut accept: Option<String> = None;
    let mut reject: Option<String> = None;
    let mut transitions = Vec::new();

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::name => name = Some(parse_field(&p)),
            Rule::states => states = Some(p.into_inner().map(|f| parse_field(&f)).collect()),
            Rule::input_alphabet => input_alphabet = Some(parse_symbols(p)?),
            Rule::tape_alphabet => tape_alphabet = Some(parse_symbols(p)?),
            Rule::start_state => start = Some(parse_field(&p)),
            Rule::accept_state => accept = Some(parse_field(&p)),
            Rule::reject_state => reject = Some(parse_field(&p)),
            Rule::transitions => transitions = parse_transitions(p)?,
            _ => {} // Skip EOI
        }
    }

    Ok(Machine {
        name: check_required_line(name, "name")?,
        states: check_required_line(states, "states")?,
        input_alphabet: check_required_line(input_alphabet, "input alphabet")?,
        tape_alphabet: check_required_line(tape_alphabet, "tape alphabet")?,
        start: check_required_line(start, "start state")?,
        accept: check_required_line(accept, "accept state")?,
        reject: check_required_line(reject, "reject state")?,
        blank: BLANK_SYMBOL,
        transitions,
    })
}

/// Parses the transition records from a `Pair<Rule::transitions>`, keeping file order.
fn parse_transitions(pair: Pair<Rule>) -> Result<Vec<Transition>, MachineError> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::transition)
        .map(parse_transition)
        .collect()
}

/// Parses a single `from,read,to,write,direction` record.
fn parse_transition(pair: Pair<Rule>) -> Result<Transition, MachineError> {
    let span = pair.as_span();
    let fields: Vec<Pair<Rule>> = pair.into_inner().collect();

    let [from, read, to, write, direction] = fields.as_slice() else {
        return Err(parse_error("Transition must have exactly five fields", span));
    };

    Ok(Transition {
        from: parse_field(from),
        read: parse_symbol(read)?,
        to: parse_field(to),
        write: parse_symbol(write)?,
        direction: parse_direction(direction)?,
    })
}

/// Parses a comma separated list of symbols.
fn parse_symbols(pair: Pair<Rule>) -> Result<Vec<char>, MachineError> {
    pair.into_inner().map(|p| parse_symbol(&p)).collect()
}

/// Parses a single tape symbol. Symbols are exactly one character after trimming.
fn parse_symbol(pair: &Pair<Rule>) -> Result<char, MachineError> {
    let text = pair.as_str().trim();
    let mut chars = text.chars();

    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(parse_error(
            &format!("Symbol must be a single character: '{text}'"),
            pair.as_span(),
        )),
    }
}

/// Parses a direction. Supports 'L' for Left and 'R' for Right.
fn parse_direction(pair: &Pair<Rule>) -> Result<Direction, MachineError> {
    match pair.as_str().trim() {
        "L" => Ok(Direction::Left),
        "R" => Ok(Direction::Right),
        other => Err(parse_error(
            &format!("Unsupported direction: {other}"),
            pair.as_span(),
        )),
    }
}

fn parse_field(pair: &Pair<Rule>) -> String {
    pair.as_str().trim().to_string()
}

/// Creates a `MachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> MachineError {
    MachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Checks if a required header line is present, returning an `Err` if it's missing.
fn check_required_line<T>(value: Option<T>, line: &str) -> Result<T, MachineError> {
    value.ok_or_else(|| MachineError::ValidationError(format!("Missing {line} line")))
}
