//! This crate provides the core logic for a non-deterministic Turing machine simulator.
//! It includes modules for parsing machine definitions, validating them, exploring every
//! computation branch up to a depth limit, and reporting the accepting path.

pub mod analyzer;
pub mod catalog;
pub mod explorer;
pub mod loader;
pub mod matcher;
pub mod parser;
pub mod report;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` and `check_input` functions and the `AnalysisError` enum.
pub use analyzer::{analyze, check_input, AnalysisError};
/// Re-exports the `MachineCatalog` struct from the catalog module.
pub use catalog::MachineCatalog;
/// Re-exports the `Explorer` struct from the explorer module.
pub use explorer::Explorer;
/// Re-exports the `MachineLoader` struct from the loader module.
pub use loader::MachineLoader;
pub use matcher::TransitionMatcher;
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
pub use report::Report;
pub use tape::Tape;
/// Re-exports the machine model, search outcome and error types from the types module.
pub use types::{
    Configuration, Direction, Machine, MachineError, Outcome, SearchStats, Transition, Verdict,
    BLANK_SYMBOL, DEFAULT_DEPTH_LIMIT, MAX_DEPTH_LIMIT, MAX_MACHINE_SIZE,
};
