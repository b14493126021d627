//! This module provides the `MachineLoader` struct, responsible for loading machine
//! definition files.

use crate::parser::parse;
use crate::types::{Machine, MachineError, MAX_MACHINE_SIZE};
use log::debug;
use std::fs;
use std::path::Path;

/// `MachineLoader` is a utility struct for loading machine definitions.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a single machine definition from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the definition file to load.
    ///
    /// # Returns
    ///
    /// * `Ok(Machine)` if the file is successfully read, parsed and validated.
    /// * `Err(MachineError::FileError)` if the file cannot be read or is too large.
    /// * `Err(MachineError::ParseError)` if the file content is not a valid definition.
    pub fn load_machine(path: &Path) -> Result<Machine, MachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        if content.len() > MAX_MACHINE_SIZE {
            return Err(MachineError::FileError(format!(
                "File {} exceeds the maximum machine size of {} bytes",
                path.display(),
                MAX_MACHINE_SIZE
            )));
        }

        debug!("loaded {} bytes from {}", content.len(), path.display());

        parse(&content)
    }
}
