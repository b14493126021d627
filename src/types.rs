//! This module defines the core data structures and types used throughout the simulator,
//! including the machine definition, transitions, trace configurations, search outcomes,
//! and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The blank symbol used on the tape and in machine definitions.
pub const BLANK_SYMBOL: char = '_';
/// Number of blanks appended to an input that is not already blank-terminated.
pub const BLANK_PADDING: usize = 2;
/// The depth limit used when none is supplied.
pub const DEFAULT_DEPTH_LIMIT: usize = 100;
/// The deepest search allowed. Every step on the current path keeps a copy of the tape in
/// the trace, so memory grows with the square of the depth.
pub const MAX_DEPTH_LIMIT: usize = 10_000;
/// The maximum allowed size for a machine definition in bytes.
pub const MAX_MACHINE_SIZE: usize = 65536; // 64KB

/// A non-deterministic single-tape Turing machine definition.
///
/// The definition is built once (usually by the parser) and is read-only afterwards.
/// The `accept` and `reject` states are sinks: no transition may leave them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Machine {
    /// The name of the machine.
    pub name: String,
    /// Every declared state label.
    pub states: Vec<String>,
    /// Symbols an input string may be built from.
    pub input_alphabet: Vec<char>,
    /// Symbols that may appear on the tape, including the blank.
    pub tape_alphabet: Vec<char>,
    /// The state the machine starts in.
    pub start: String,
    /// Reaching this state accepts the input.
    pub accept: String,
    /// Reaching this state rejects the branch.
    pub reject: String,
    /// The blank symbol used to pad and extend the tape.
    pub blank: char,
    /// Transitions in definition order. Several may share the same `(from, read)` pair.
    pub transitions: Vec<Transition>,
}

impl Machine {
    /// Builds a machine in code, deriving the declared states and alphabets from the
    /// transitions and the three distinguished states.
    pub fn new(
        name: impl Into<String>,
        start: impl Into<String>,
        accept: impl Into<String>,
        reject: impl Into<String>,
        transitions: Vec<Transition>,
    ) -> Self {
        let start = start.into();
        let accept = accept.into();
        let reject = reject.into();

        let mut states: Vec<String> = Vec::new();
        let mut input_alphabet = Vec::new();
        let mut tape_alphabet = vec![BLANK_SYMBOL];
        let declared = [&start, &accept, &reject];
        let referenced = transitions.iter().flat_map(|t| [&t.from, &t.to]);
        for state in declared.into_iter().chain(referenced) {
            if !states.contains(state) {
                states.push(state.clone());
            }
        }
        for t in &transitions {
            for symbol in [t.read, t.write] {
                if !tape_alphabet.contains(&symbol) {
                    tape_alphabet.push(symbol);
                }
            }
            if t.read != BLANK_SYMBOL && !input_alphabet.contains(&t.read) {
                input_alphabet.push(t.read);
            }
        }

        Self {
            name: name.into(),
            states,
            input_alphabet,
            tape_alphabet,
            start,
            accept,
            reject,
            blank: BLANK_SYMBOL,
            transitions,
        }
    }

    /// Returns `true` if `state` is the accept or the reject state.
    pub fn is_halting(&self, state: &str) -> bool {
        state == self.accept || state == self.reject
    }
}

/// A single transition rule.
///
/// In state `from` reading `read`, the machine may write `write`, move the head in
/// `direction` and continue in state `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: String,
    pub read: char,
    pub to: String,
    pub write: char,
    pub direction: Direction,
}

impl Transition {
    pub fn new(
        from: impl Into<String>,
        read: char,
        to: impl Into<String>,
        write: char,
        direction: Direction,
    ) -> Self {
        Self {
            from: from.into(),
            read,
            to: to.into(),
            write,
            direction,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.from, self.read, self.to, self.write, self.direction
        )
    }
}

/// Represents the possible directions the tape head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => f.write_str("L"),
            Direction::Right => f.write_str("R"),
        }
    }
}

/// A trace snapshot taken immediately before a transition is applied.
///
/// `left` is the tape strictly left of the head, `right` is the symbol under the head
/// followed by everything to its right, and `state` is the state the machine was in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub left: String,
    pub state: String,
    pub right: String,
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "['{}', '{}', '{}']", self.left, self.state, self.right)
    }
}

/// How a search over all branches ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Some branch reached the accept state.
    Accepted,
    /// Every explored branch rejected before the depth limit.
    Rejected,
    /// No branch accepted and the deepest branch hit the depth limit.
    Truncated,
}

/// Counters accumulated across the whole search, including rejected branches.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Transition events: applied transitions plus one per dead end.
    pub transitions: usize,
    /// Configurations with no applicable transition.
    pub dead_ends: usize,
    /// Calls cut off by the depth limit.
    pub truncations: usize,
}

/// The result of exploring every branch for one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// The initial tape contents after blank padding.
    pub input: String,
    pub verdict: Verdict,
    /// Depth of the accepting path, or of the deepest rejecting branch.
    pub depth: usize,
    pub depth_limit: usize,
    pub stats: SearchStats,
    /// The configurations along the accepting path. Empty unless accepted.
    pub trace: Vec<Configuration>,
    /// The tape at the moment of acceptance.
    pub final_tape: Option<String>,
}

impl Outcome {
    /// Returns `true` if some branch accepted.
    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accepted
    }

    /// Returns the label of the state the search terminated in: the accept state on
    /// acceptance, the reject state otherwise (truncation included).
    pub fn terminal_state<'m>(&self, machine: &'m Machine) -> &'m str {
        match self.verdict {
            Verdict::Accepted => &machine.accept,
            Verdict::Rejected | Verdict::Truncated => &machine.reject,
        }
    }
}

/// Represents the errors that can occur while loading, validating or running a machine.
///
/// Accepting, rejecting and truncating are search outcomes and never appear here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// Indicates an error during the parsing of a machine definition.
    #[error("Machine parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates a structurally invalid machine definition.
    #[error("Machine validation error: {0}")]
    ValidationError(String),
    /// Indicates an input string the machine cannot be run on.
    #[error("Invalid input: {0}")]
    InputError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left = Direction::Left;
        let right = Direction::Right;

        let left_json = serde_json::to_string(&left).unwrap();
        let right_json = serde_json::to_string(&right).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(right_json, "\"Right\"");

        let left_deserialized: Direction = serde_json::from_str(&left_json).unwrap();
        assert_eq!(left, left_deserialized);
    }

    #[test]
    fn test_machine_new_derives_states_and_alphabets() {
        let machine = Machine::new(
            "Derived",
            "q0",
            "qa",
            "qr",
            vec![
                Transition::new("q0", '1', "q1", 'x', Direction::Right),
                Transition::new("q1", '_', "qa", '_', Direction::Left),
            ],
        );

        assert_eq!(machine.states, vec!["q0", "qa", "qr", "q1"]);
        assert_eq!(machine.tape_alphabet, vec!['_', '1', 'x']);
        // 'x' is only ever written, so inputs may not contain it
        assert_eq!(machine.input_alphabet, vec!['1']);
        assert_eq!(machine.blank, BLANK_SYMBOL);
        assert!(machine.is_halting("qa"));
        assert!(machine.is_halting("qr"));
        assert!(!machine.is_halting("q1"));
    }

    #[test]
    fn test_transition_display() {
        let transition = Transition::new("q0", '0', "q1", '1', Direction::Left);
        assert_eq!(transition.to_string(), "q0,0,q1,1,L");
    }

    #[test]
    fn test_configuration_display() {
        let config = Configuration {
            left: "ab".into(),
            state: "q3".into(),
            right: "c__".into(),
        };
        assert_eq!(config.to_string(), "['ab', 'q3', 'c__']");
    }

    #[test]
    fn test_terminal_state() {
        let machine = Machine::new("Terminal", "q0", "yes", "no", vec![]);
        let mut outcome = Outcome {
            input: "__".into(),
            verdict: Verdict::Truncated,
            depth: 0,
            depth_limit: 0,
            stats: SearchStats::default(),
            trace: vec![],
            final_tape: None,
        };

        assert_eq!(outcome.terminal_state(&machine), "no");
        outcome.verdict = Verdict::Accepted;
        assert_eq!(outcome.terminal_state(&machine), "yes");
        assert!(outcome.is_accepted());
    }

    #[test]
    fn test_error_display() {
        let error = MachineError::ValidationError("accept state q9 is not declared".to_string());

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Machine validation error"));
        assert!(error_msg.contains("q9"));
    }
}
