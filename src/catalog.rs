//! This module provides the `MachineCatalog`, a small set of machine definitions compiled
//! into the crate so the simulator can be tried without writing a definition file.

use crate::parser::parse;
use crate::types::{Machine, MachineError};
use log::warn;

// Embedded machine definitions, keyed by the name used to select them
const MACHINE_TEXTS: [(&str, &str); 4] = [
    (
        "unary-increment",
        include_str!("../machines/unary-increment.csv"),
    ),
    ("ends-in-one", include_str!("../machines/ends-in-one.csv")),
    ("contains-ab", include_str!("../machines/contains-ab.csv")),
    ("right-forever", include_str!("../machines/right-forever.csv")),
];

lazy_static::lazy_static! {
    static ref MACHINES: Vec<(&'static str, Machine)> = MACHINE_TEXTS
        .iter()
        .filter_map(|&(key, text)| match parse(text) {
            Ok(machine) => Some((key, machine)),
            Err(e) => {
                warn!("failed to parse built-in machine {key}: {e}");
                None
            }
        })
        .collect();
}

pub struct MachineCatalog;

impl MachineCatalog {
    /// List the keys of all built-in machines
    pub fn names() -> Vec<&'static str> {
        MACHINES.iter().map(|(key, _)| *key).collect()
    }

    /// Get a built-in machine by its key
    pub fn get(key: &str) -> Result<Machine, MachineError> {
        MACHINES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, machine)| machine.clone())
            .ok_or_else(|| {
                MachineError::ValidationError(format!(
                    "Built-in machine '{}' not found (available: {})",
                    key,
                    Self::names().join(", ")
                ))
            })
    }
}
