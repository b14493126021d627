//! This module defines the `Explorer`, which simulates a non-deterministic Turing machine by
//! exhaustively trying every applicable transition, depth first, up to a depth limit.
//!
//! A single tape, state and trace are shared by the whole search. The branches still to be
//! tried are kept on an explicit stack of `Frame`s, one per configuration on the current
//! path, so the search depth is bounded by the heap rather than the call stack. Each frame
//! holds the `Undo` of the transition it last applied; reverting it restores the tape, state
//! and trace, so every sibling branch starts from exactly the configuration its parent saw.
//! An accepting branch leaves its steps applied, which leaves the accepting path in the trace.

use crate::matcher::TransitionMatcher;
use crate::tape::{Edit, Tape};
use crate::types::{
    Configuration, Machine, MachineError, Outcome, SearchStats, Transition, Verdict,
    MAX_DEPTH_LIMIT,
};
use log::{debug, trace};
use std::slice;

/// The result of exploring the subtree below one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    /// The accept state was reached at this depth.
    Accept(usize),
    /// No accepting path; the depth is the deepest any rejecting branch got.
    Reject(usize),
}

/// The mutable part of a running machine: current state, tape and trace.
struct Cursor<'m> {
    state: &'m str,
    tape: Tape,
    trace: Vec<Configuration>,
}

/// What `Cursor::apply` changed, for `Cursor::revert`.
struct Undo<'m> {
    state: &'m str,
    edit: Edit,
}

impl<'m> Cursor<'m> {
    fn new(state: &'m str, tape: Tape) -> Self {
        Self {
            state,
            tape,
            trace: Vec::new(),
        }
    }

    fn snapshot(&self) -> Configuration {
        Configuration {
            left: self.tape.left(),
            state: self.state.to_string(),
            right: self.tape.right(),
        }
    }

    /// Records the current configuration and applies `transition`.
    fn apply(&mut self, transition: &'m Transition) -> Undo<'m> {
        self.trace.push(self.snapshot());
        let edit = self.tape.apply(transition.write, transition.direction);
        let state = std::mem::replace(&mut self.state, transition.to.as_str());

        Undo { state, edit }
    }

    /// Reverts the most recent `apply` that has not been reverted yet.
    fn revert(&mut self, undo: Undo<'m>) {
        self.tape.undo(undo.edit);
        self.state = undo.state;
        self.trace.pop();
    }
}

/// A configuration whose branches are being tried.
struct Frame<'e, 'm> {
    /// Transitions not tried yet, in definition order.
    pending: slice::Iter<'e, &'m Transition>,
    /// Depth of the configurations reached from this one.
    depth: usize,
    deepest: usize,
    /// The transition currently being explored, if any.
    applied: Option<Undo<'m>>,
}

impl<'m> Frame<'_, 'm> {
    /// Backs out of a rejected child that reached depth `reached`.
    fn backtrack(&mut self, cursor: &mut Cursor<'m>, reached: usize) {
        if let Some(undo) = self.applied.take() {
            cursor.revert(undo);
        }
        self.deepest = self.deepest.max(reached);
    }
}

/// What visiting a configuration produced.
enum Visit<'e, 'm> {
    /// The configuration was settled without trying any branch.
    Done(Branch),
    /// The configuration has branches to try.
    Expand(Frame<'e, 'm>),
}

/// Explores every computation branch of a machine on an input, up to `depth_limit` steps.
pub struct Explorer<'m> {
    machine: &'m Machine,
    matcher: TransitionMatcher<'m>,
    depth_limit: usize,
}

impl<'m> Explorer<'m> {
    /// Creates an explorer for `machine` that never follows a branch deeper than `depth_limit`.
    ///
    /// # Returns
    ///
    /// * `Err(MachineError::InputError)` if `depth_limit` is above `MAX_DEPTH_LIMIT`.
    pub fn new(machine: &'m Machine, depth_limit: usize) -> Result<Self, MachineError> {
        if depth_limit > MAX_DEPTH_LIMIT {
            return Err(MachineError::InputError(format!(
                "Depth limit {depth_limit} exceeds the maximum of {MAX_DEPTH_LIMIT}"
            )));
        }

        Ok(Self {
            machine,
            matcher: TransitionMatcher::new(machine),
            depth_limit,
        })
    }

    /// Runs the machine on `input` from its start state and explores all branches.
    ///
    /// The input is blank-padded as described in `Tape::from_input`. The search stops at the
    /// first accepting branch found in definition order; otherwise it reports the deepest
    /// rejecting branch, or truncation if that branch hit the depth limit.
    ///
    /// # Arguments
    ///
    /// * `input` - The input string written on the tape before the head.
    ///
    /// # Returns
    ///
    /// * `Outcome` - verdict, depth, search statistics and, on acceptance, the trace of
    ///   configurations along the accepting path and the final tape.
    pub fn run(&self, input: &str) -> Outcome {
        let tape = Tape::from_input(input, self.machine.blank);
        let initial = tape.to_string();
        let mut cursor = Cursor::new(&self.machine.start, tape);
        let mut stats = SearchStats::default();

        debug!(
            "exploring {} on {:?} with depth limit {}",
            self.machine.name, initial, self.depth_limit
        );

        let branch = self.explore(&mut cursor, &mut stats);

        let (verdict, depth) = match branch {
            Branch::Accept(depth) => (Verdict::Accepted, depth),
            Branch::Reject(depth) if depth >= self.depth_limit => (Verdict::Truncated, depth),
            Branch::Reject(depth) => (Verdict::Rejected, depth),
        };

        debug!(
            "{:?} at depth {} after {} transitions",
            verdict, depth, stats.transitions
        );

        let final_tape = (verdict == Verdict::Accepted).then(|| cursor.tape.to_string());

        Outcome {
            input: initial,
            verdict,
            depth,
            depth_limit: self.depth_limit,
            stats,
            trace: cursor.trace,
            final_tape,
        }
    }

    fn explore(&self, cursor: &mut Cursor<'m>, stats: &mut SearchStats) -> Branch {
        let mut frames = match self.visit(cursor, 0, stats) {
            Visit::Done(branch) => return branch,
            Visit::Expand(root) => vec![root],
        };
        let mut rejected = 0;

        while let Some(frame) = frames.last_mut() {
            match frame.pending.next().copied() {
                Some(transition) => {
                    let depth = frame.depth;
                    trace!("branching with {transition} at depth {depth}");
                    frame.applied = Some(cursor.apply(transition));
                    stats.transitions += 1;

                    match self.visit(cursor, depth, stats) {
                        Visit::Expand(child) => frames.push(child),
                        // The accepting path stays applied all the way up.
                        Visit::Done(Branch::Accept(reached)) => return Branch::Accept(reached),
                        Visit::Done(Branch::Reject(reached)) => frame.backtrack(cursor, reached),
                    }
                }
                None => {
                    let deepest = frame.deepest;
                    frames.pop();
                    match frames.last_mut() {
                        Some(parent) => parent.backtrack(cursor, deepest),
                        None => rejected = deepest,
                    }
                }
            }
        }

        Branch::Reject(rejected)
    }

    /// Settles the configuration at `depth` if it is cut off, a dead end, or can accept
    /// directly; otherwise returns a frame for its branches.
    fn visit<'e>(
        &'e self,
        cursor: &mut Cursor<'m>,
        depth: usize,
        stats: &mut SearchStats,
    ) -> Visit<'e, 'm> {
        if depth >= self.depth_limit {
            trace!("depth limit reached in {} at depth {}", cursor.state, depth);
            stats.truncations += 1;
            return Visit::Done(Branch::Reject(depth));
        }

        let symbol = cursor.tape.read();
        let matches = self.matcher.matches(cursor.state, symbol);

        // Entering the reject state counts as a transition.
        if matches.is_empty() {
            trace!("dead end in {} reading {:?} at depth {}", cursor.state, symbol, depth);
            stats.transitions += 1;
            stats.dead_ends += 1;
            return Visit::Done(Branch::Reject(depth));
        }

        let depth = depth + 1;

        if let Some(transition) = matches
            .iter()
            .copied()
            .find(|t| t.to == self.machine.accept)
        {
            trace!("accepting with {transition} at depth {depth}");
            cursor.apply(transition);
            stats.transitions += 1;
            return Visit::Done(Branch::Accept(depth));
        }

        Visit::Expand(Frame {
            pending: matches.iter(),
            depth,
            deepest: depth,
            applied: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, Transition};

    fn config(left: &str, state: &str, right: &str) -> Configuration {
        Configuration {
            left: left.into(),
            state: state.into(),
            right: right.into(),
        }
    }

    /// Writes a 1 at the end of a unary number.
    fn create_unary_increment() -> Machine {
        Machine::new(
            "Unary Increment",
            "q0",
            "qa",
            "qr",
            vec![
                Transition::new("q0", '0', "qa", '1', Direction::Right),
                Transition::new("q0", '1', "q0", '1', Direction::Right),
                Transition::new("q0", '_', "qa", '1', Direction::Right),
            ],
        )
    }

    #[test]
    fn test_accept_in_one_step() {
        let machine = create_unary_increment();
        let outcome = Explorer::new(&machine, 5).unwrap().run("0");

        assert_eq!(outcome.verdict, Verdict::Accepted);
        assert_eq!(outcome.depth, 1);
        assert_eq!(outcome.stats.transitions, 1);
        assert_eq!(outcome.trace, vec![config("", "q0", "0__")]);
        assert_eq!(outcome.final_tape.as_deref(), Some("1__"));
    }

    #[test]
    fn test_accepting_path_trace() {
        let machine = create_unary_increment();
        let outcome = Explorer::new(&machine, 5).unwrap().run("11");

        assert_eq!(outcome.verdict, Verdict::Accepted);
        assert_eq!(outcome.input, "11__");
        assert_eq!(outcome.depth, 3);
        assert_eq!(outcome.stats.transitions, 3);
        assert_eq!(
            outcome.trace,
            vec![
                config("", "q0", "11__"),
                config("1", "q0", "1__"),
                config("11", "q0", "__"),
            ]
        );
        assert_eq!(outcome.final_tape.as_deref(), Some("111_"));
        assert_eq!(outcome.terminal_state(&machine), "qa");
    }

    #[test]
    fn test_dead_end_at_root() {
        let machine = Machine::new(
            "Zero Only",
            "q0",
            "qa",
            "qr",
            vec![Transition::new("q0", '0', "qa", '0', Direction::Right)],
        );
        let outcome = Explorer::new(&machine, 5).unwrap().run("1");

        assert_eq!(outcome.verdict, Verdict::Rejected);
        assert_eq!(outcome.depth, 0);
        assert_eq!(outcome.stats.transitions, 1);
        assert_eq!(outcome.stats.dead_ends, 1);
        assert!(outcome.trace.is_empty());
        assert_eq!(outcome.final_tape, None);
    }

    #[test]
    fn test_zero_depth_limit_truncates_immediately() {
        let machine = create_unary_increment();
        let outcome = Explorer::new(&machine, 0).unwrap().run("0");

        assert_eq!(outcome.verdict, Verdict::Truncated);
        assert_eq!(outcome.depth, 0);
        assert_eq!(outcome.stats.transitions, 0);
        assert_eq!(outcome.stats.truncations, 1);
        assert!(outcome.trace.is_empty());
        assert_eq!(outcome.terminal_state(&machine), "qr");
    }

    #[test]
    fn test_truncation_below_the_root() {
        let machine = create_unary_increment();
        let outcome = Explorer::new(&machine, 2).unwrap().run("11");

        assert_eq!(outcome.verdict, Verdict::Truncated);
        assert_eq!(outcome.depth, 2);
        assert_eq!(outcome.stats.transitions, 2);
        assert!(outcome.trace.is_empty());
    }

    #[test]
    fn test_first_accepting_branch_wins_and_rejected_work_is_counted() {
        let machine = Machine::new(
            "Competing",
            "q0",
            "qa",
            "qr",
            vec![
                Transition::new("q0", '0', "qr", '0', Direction::Right),
                Transition::new("q0", '0', "q1", '0', Direction::Right),
                Transition::new("q1", '_', "qa", '_', Direction::Right),
            ],
        );
        let outcome = Explorer::new(&machine, 5).unwrap().run("0");

        assert_eq!(outcome.verdict, Verdict::Accepted);
        assert_eq!(outcome.depth, 2);
        // reject branch + its dead end, then the accepting branch and the accept shortcut
        assert_eq!(outcome.stats.transitions, 4);
        assert_eq!(outcome.stats.dead_ends, 1);
        assert_eq!(
            outcome.trace,
            vec![config("", "q0", "0__"), config("0", "q1", "__")]
        );
    }

    #[test]
    fn test_rejection_reports_deepest_branch() {
        let machine = Machine::new(
            "Two Dead Ends",
            "q0",
            "qa",
            "qr",
            vec![
                Transition::new("q0", '0', "q1", '0', Direction::Right),
                Transition::new("q0", '0', "q2", '0', Direction::Right),
                Transition::new("q1", '_', "q3", '_', Direction::Right),
            ],
        );
        let outcome = Explorer::new(&machine, 5).unwrap().run("0");

        assert_eq!(outcome.verdict, Verdict::Rejected);
        assert_eq!(outcome.depth, 2);
        assert_eq!(outcome.stats.transitions, 5);
        assert_eq!(outcome.stats.dead_ends, 2);
        assert!(outcome.trace.is_empty());
    }

    #[test]
    fn test_sibling_branch_sees_restored_tape() {
        // The first branch overwrites the 0 and dead-ends. The second branch walks back to
        // cell 0 and only accepts if the 0 is still there.
        let machine = Machine::new(
            "Restore",
            "q0",
            "qa",
            "qr",
            vec![
                Transition::new("q0", '0', "q1", 'x', Direction::Right),
                Transition::new("q0", '0', "q2", '0', Direction::Right),
                Transition::new("q2", '_', "q3", '_', Direction::Left),
                Transition::new("q3", '0', "qa", '0', Direction::Right),
            ],
        );
        let outcome = Explorer::new(&machine, 5).unwrap().run("0");

        assert_eq!(outcome.verdict, Verdict::Accepted);
        assert_eq!(outcome.depth, 3);
        assert_eq!(outcome.stats.transitions, 5);
        assert_eq!(
            outcome.trace,
            vec![
                config("", "q0", "0__"),
                config("0", "q2", "__"),
                config("", "q3", "0__"),
            ]
        );
        assert_eq!(outcome.final_tape.as_deref(), Some("0__"));
    }

    #[test]
    fn test_accept_shortcut_skips_earlier_siblings() {
        let machine = Machine::new(
            "Shortcut",
            "q0",
            "qa",
            "qr",
            vec![
                Transition::new("q0", '0', "q1", '0', Direction::Right),
                Transition::new("q0", '0', "qa", 'y', Direction::Right),
                Transition::new("q1", '_', "qa", '_', Direction::Right),
            ],
        );
        let outcome = Explorer::new(&machine, 5).unwrap().run("0");

        assert_eq!(outcome.verdict, Verdict::Accepted);
        assert_eq!(outcome.depth, 1);
        assert_eq!(outcome.stats.transitions, 1);
        assert_eq!(outcome.final_tape.as_deref(), Some("y__"));
    }

    #[test]
    fn test_moving_left_of_origin_extends_tape() {
        let machine = Machine::new(
            "Step Back",
            "q0",
            "qa",
            "qr",
            vec![
                Transition::new("q0", '0', "q1", '0', Direction::Left),
                Transition::new("q1", '_', "qa", '_', Direction::Right),
            ],
        );
        let outcome = Explorer::new(&machine, 5).unwrap().run("0");

        assert_eq!(outcome.verdict, Verdict::Accepted);
        assert_eq!(
            outcome.trace,
            vec![config("", "q0", "0__"), config("", "q1", "_0__")]
        );
        assert_eq!(outcome.final_tape.as_deref(), Some("_0__"));
    }

    #[test]
    fn test_runs_are_deterministic() {
        let machine = Machine::new(
            "Guess",
            "q0",
            "qa",
            "qr",
            vec![
                Transition::new("q0", '1', "q0", '1', Direction::Right),
                Transition::new("q0", '1', "q1", '1', Direction::Right),
                Transition::new("q0", '0', "q0", '0', Direction::Right),
                Transition::new("q1", '_', "qa", '_', Direction::Right),
            ],
        );
        let explorer = Explorer::new(&machine, 10).unwrap();

        let first = explorer.run("0101");
        let second = explorer.run("0101");

        assert_eq!(first, second);
        assert!(first.is_accepted());
    }

    /// Walks between cell 0 and cell 1 forever without growing the tape.
    fn create_shuttle() -> Machine {
        Machine::new(
            "Shuttle",
            "q0",
            "qa",
            "qr",
            vec![
                Transition::new("q0", '0', "q1", '0', Direction::Right),
                Transition::new("q1", '_', "q0", '_', Direction::Left),
            ],
        )
    }

    #[test]
    fn test_search_at_maximum_depth_limit() {
        let machine = create_shuttle();
        let outcome = Explorer::new(&machine, MAX_DEPTH_LIMIT).unwrap().run("0");

        assert_eq!(outcome.verdict, Verdict::Truncated);
        assert_eq!(outcome.depth, MAX_DEPTH_LIMIT);
        assert_eq!(outcome.stats.transitions, MAX_DEPTH_LIMIT);
        assert_eq!(outcome.stats.truncations, 1);
        assert!(outcome.trace.is_empty());
    }

    #[test]
    fn test_depth_limit_above_maximum_is_rejected() {
        let machine = create_shuttle();

        let error = Explorer::new(&machine, MAX_DEPTH_LIMIT + 1)
            .err()
            .unwrap();
        assert!(matches!(error, MachineError::InputError(_)));
        assert!(error.to_string().contains("exceeds the maximum"));
    }
}
