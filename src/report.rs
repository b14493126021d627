//! This module renders an `Outcome` for people (`Display`) and for tools (`to_json`).

use crate::types::{Configuration, Machine, Outcome, SearchStats, Verdict};
use serde::Serialize;
use std::fmt;

/// A finished run of a machine, ready to be printed.
pub struct Report<'a> {
    machine: &'a Machine,
    outcome: &'a Outcome,
}

/// The JSON shape of a report.
#[derive(Serialize)]
struct JsonReport<'a> {
    machine: &'a str,
    input: &'a str,
    verdict: Verdict,
    terminal_state: &'a str,
    depth: usize,
    depth_limit: usize,
    stats: SearchStats,
    configurations: &'a [Configuration],
    final_tape: Option<&'a str>,
}

impl<'a> Report<'a> {
    pub fn new(machine: &'a Machine, outcome: &'a Outcome) -> Self {
        Self { machine, outcome }
    }

    /// Renders the report as a pretty-printed JSON document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&JsonReport {
            machine: &self.machine.name,
            input: &self.outcome.input,
            verdict: self.outcome.verdict,
            terminal_state: self.outcome.terminal_state(self.machine),
            depth: self.outcome.depth,
            depth_limit: self.outcome.depth_limit,
            stats: self.outcome.stats,
            configurations: &self.outcome.trace,
            final_tape: self.outcome.final_tape.as_deref(),
        })
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = self.outcome;

        writeln!(f, "Machine: {}", self.machine.name)?;
        writeln!(f, "Initial string: {}", outcome.input)?;
        writeln!(f, "Depth of the tree of configurations: {}", outcome.depth)?;
        writeln!(
            f,
            "Total number of transitions simulated: {}",
            outcome.stats.transitions
        )?;

        match outcome.verdict {
            Verdict::Accepted => {
                writeln!(f, "String accepted in {} steps", outcome.depth)?;
                writeln!(f, "Configurations:")?;
                for config in &outcome.trace {
                    writeln!(f, "{config}")?;
                }
            }
            Verdict::Truncated => writeln!(f, "Execution stopped after {} steps", outcome.depth)?,
            Verdict::Rejected => writeln!(f, "String rejected in {} steps", outcome.depth)?,
        }

        Ok(())
    }
}
