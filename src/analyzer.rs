//! This module provides functions for analyzing machine definitions to detect structural
//! errors before simulation. This includes checks for declared states, sink halting states,
//! and symbols outside the tape alphabet.
//!
//! The explorer itself assumes a well-formed machine and performs no validation.

use crate::types::{Machine, MachineError};
use std::collections::HashSet;

/// Represents the problems that can be found during the analysis of a machine definition.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// A distinguished state (start, accept or reject) is not in the declared state list.
    UndeclaredState(String),
    /// The accept and reject states are the same state.
    AmbiguousHaltingState(String),
    /// Transitions leave the accept or reject state, which must be sinks.
    HaltingStateNotSink(Vec<String>),
    /// Transitions reference states that are not declared.
    UndefinedStates(Vec<String>),
    /// Transitions read or write symbols outside the tape alphabet.
    UndefinedSymbols(Vec<char>),
    /// The tape alphabet does not contain the blank symbol.
    MissingBlank(char),
    /// Input alphabet symbols are missing from the tape alphabet.
    InputNotOnTape(Vec<char>),
}

impl From<AnalysisError> for MachineError {
    /// Converts an `AnalysisError` into a `MachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::UndeclaredState(state) => {
                MachineError::ValidationError(format!("State is not declared: {}", state))
            }
            AnalysisError::AmbiguousHaltingState(state) => MachineError::ValidationError(format!(
                "Accept and reject states must differ: {}",
                state
            )),
            AnalysisError::HaltingStateNotSink(transitions) => MachineError::ValidationError(
                format!("Transitions leave a halting state: {:?}", transitions),
            ),
            AnalysisError::UndefinedStates(states) => MachineError::ValidationError(format!(
                "Transitions reference undefined states: {:?}",
                states
            )),
            AnalysisError::UndefinedSymbols(symbols) => MachineError::ValidationError(format!(
                "Transitions use symbols outside the tape alphabet: {:?}",
                symbols
            )),
            AnalysisError::MissingBlank(blank) => MachineError::ValidationError(format!(
                "Tape alphabet does not contain the blank symbol '{}'",
                blank
            )),
            AnalysisError::InputNotOnTape(symbols) => MachineError::ValidationError(format!(
                "Input alphabet symbols missing from the tape alphabet: {:?}",
                symbols
            )),
        }
    }
}

/// Analyzes a given `Machine` for structural errors.
///
/// # Arguments
///
/// * `machine` - A reference to the `Machine` to be analyzed.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(MachineError::ValidationError)` describing the first violated rule.
pub fn analyze(machine: &Machine) -> Result<(), MachineError> {
    [
        check_distinguished_states,
        check_halting_states_differ,
        check_halting_states_are_sinks,
        check_transition_states,
        check_alphabets,
        check_transition_symbols,
    ]
    .iter()
    .try_for_each(|check| check(machine))
    .map_err(MachineError::from)
}

/// Checks that every symbol of `input` can be written on the machine's tape.
///
/// # Returns
///
/// * `Ok(())` if the input only uses tape alphabet symbols.
/// * `Err(MachineError::InputError)` listing the offending symbols otherwise.
pub fn check_input(machine: &Machine, input: &str) -> Result<(), MachineError> {
    let mut unknown: Vec<char> = input
        .chars()
        .filter(|c| !machine.tape_alphabet.contains(c))
        .collect();
    unknown.sort_unstable();
    unknown.dedup();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(MachineError::InputError(format!(
            "Symbols not in the tape alphabet of {}: {:?}",
            machine.name, unknown
        )))
    }
}

fn check_distinguished_states(machine: &Machine) -> Result<(), AnalysisError> {
    [&machine.start, &machine.accept, &machine.reject]
        .into_iter()
        .find(|state| !machine.states.contains(state))
        .map_or(Ok(()), |state| {
            Err(AnalysisError::UndeclaredState(state.clone()))
        })
}

fn check_halting_states_differ(machine: &Machine) -> Result<(), AnalysisError> {
    if machine.accept == machine.reject {
        return Err(AnalysisError::AmbiguousHaltingState(machine.accept.clone()));
    }

    Ok(())
}

/// Checks that no transition leaves the accept or reject state.
fn check_halting_states_are_sinks(machine: &Machine) -> Result<(), AnalysisError> {
    let leaking: Vec<String> = machine
        .transitions
        .iter()
        .filter(|t| machine.is_halting(&t.from))
        .map(|t| t.to_string())
        .collect();

    if !leaking.is_empty() {
        return Err(AnalysisError::HaltingStateNotSink(leaking));
    }

    Ok(())
}

/// Checks that transitions only reference declared states.
fn check_transition_states(machine: &Machine) -> Result<(), AnalysisError> {
    let declared: HashSet<&str> = machine.states.iter().map(String::as_str).collect();

    let mut undefined: Vec<String> = machine
        .transitions
        .iter()
        .flat_map(|t| [t.from.as_str(), t.to.as_str()])
        .filter(|state| !declared.contains(state))
        .map(String::from)
        .collect();
    undefined.sort();
    undefined.dedup();

    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedStates(undefined));
    }

    Ok(())
}

/// Checks the blank and the input alphabet against the tape alphabet.
fn check_alphabets(machine: &Machine) -> Result<(), AnalysisError> {
    if !machine.tape_alphabet.contains(&machine.blank) {
        return Err(AnalysisError::MissingBlank(machine.blank));
    }

    let missing: Vec<char> = machine
        .input_alphabet
        .iter()
        .copied()
        .filter(|c| !machine.tape_alphabet.contains(c))
        .collect();

    if !missing.is_empty() {
        return Err(AnalysisError::InputNotOnTape(missing));
    }

    Ok(())
}

fn check_transition_symbols(machine: &Machine) -> Result<(), AnalysisError> {
    let mut undefined: Vec<char> = machine
        .transitions
        .iter()
        .flat_map(|t| [t.read, t.write])
        .filter(|c| !machine.tape_alphabet.contains(c))
        .collect();
    undefined.sort_unstable();
    undefined.dedup();

    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedSymbols(undefined));
    }

    Ok(())
}
