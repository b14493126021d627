//! This module defines the `Tape`, a single-tape store with a read/write head whose edits
//! can be undone exactly, which is what lets the explorer backtrack between sibling branches.
//!
//! The tape grows on demand. Moving left of the first cell inserts a blank at the front
//! (the head stays at index 0) and moving right past the last cell appends a blank.

use crate::types::{Direction, BLANK_PADDING};
use std::fmt;

/// A tape with a head position and a blank symbol used to grow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<char>,
    head: usize,
    blank: char,
}

/// Records how a single `Tape::apply` changed the tape so it can be reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    previous: char,
    head: usize,
    growth: Option<Growth>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Growth {
    Front,
    Back,
}

impl Tape {
    /// Creates a tape holding `input` with the head on the first cell.
    ///
    /// Unless the input already ends in a blank, two blanks are appended so the head
    /// has room to move right of the input. An empty input becomes two blanks.
    pub fn from_input(input: &str, blank: char) -> Self {
        let mut cells: Vec<char> = input.chars().collect();
        if cells.last() != Some(&blank) {
            cells.extend(std::iter::repeat(blank).take(BLANK_PADDING));
        }

        Self {
            cells,
            head: 0,
            blank,
        }
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> char {
        self.cells.get(self.head).copied().unwrap_or(self.blank)
    }

    /// Returns the tape contents strictly left of the head.
    pub fn left(&self) -> String {
        self.cells[..self.head].iter().collect()
    }

    /// Returns the symbol under the head followed by everything to its right.
    pub fn right(&self) -> String {
        self.cells[self.head..].iter().collect()
    }

    /// Writes `symbol` under the head, then moves the head one cell in `direction`,
    /// growing the tape if the head would leave it.
    ///
    /// # Returns
    ///
    /// * `Edit` - the information `undo` needs to restore the tape exactly.
    pub fn apply(&mut self, symbol: char, direction: Direction) -> Edit {
        let previous = std::mem::replace(&mut self.cells[self.head], symbol);
        let head = self.head;
        let mut growth = None;

        match direction {
            Direction::Left => {
                if self.head == 0 {
                    self.cells.insert(0, self.blank);
                    growth = Some(Growth::Front);
                } else {
                    self.head -= 1;
                }
            }
            Direction::Right => {
                self.head += 1;
                if self.head >= self.cells.len() {
                    self.cells.push(self.blank);
                    growth = Some(Growth::Back);
                }
            }
        }

        Edit {
            previous,
            head,
            growth,
        }
    }

    /// Reverses an `Edit` produced by the most recent `apply` that has not been undone yet.
    pub fn undo(&mut self, edit: Edit) {
        match edit.growth {
            Some(Growth::Front) => {
                self.cells.remove(0);
            }
            Some(Growth::Back) => {
                self.cells.pop();
            }
            None => {}
        }

        self.head = edit.head;
        self.cells[self.head] = edit.previous;
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells.iter().try_for_each(|c| write!(f, "{c}"))
    }
}
