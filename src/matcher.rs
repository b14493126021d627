//! This module provides the `TransitionMatcher`, which answers "which transitions apply in
//! this state when reading this symbol?" for a `Machine`.

use crate::types::{Machine, Transition};
use std::collections::HashMap;

/// An index of a machine's transitions keyed by `(from, read)`.
///
/// Each bucket keeps the transitions in definition order, which is the order the explorer
/// tries branches in.
#[derive(Debug)]
pub struct TransitionMatcher<'m> {
    index: HashMap<&'m str, HashMap<char, Vec<&'m Transition>>>,
}

impl<'m> TransitionMatcher<'m> {
    /// Builds the index for `machine`.
    pub fn new(machine: &'m Machine) -> Self {
        let mut index: HashMap<&'m str, HashMap<char, Vec<&'m Transition>>> = HashMap::new();

        for transition in &machine.transitions {
            index
                .entry(transition.from.as_str())
                .or_default()
                .entry(transition.read)
                .or_default()
                .push(transition);
        }

        Self { index }
    }

    /// Returns every transition leaving `state` on `symbol`, in definition order.
    ///
    /// An empty slice means the configuration is a dead end.
    pub fn matches(&self, state: &str, symbol: char) -> &[&'m Transition] {
        self.index
            .get(state)
            .and_then(|by_symbol| by_symbol.get(&symbol))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
