//! State Machine Runtime
//!
//! Flat, table-driven statecharts over caller-defined state and event
//! types. Each `(state, event)` pair maps to at most one target state;
//! events with no entry are ignored.
//!
//! Machines can keep a bounded log of the transitions they took. The log
//! is off unless the builder asks for it, and once full the oldest entry
//! is dropped for each new one.

use std::collections::VecDeque;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// One recorded transition: `(from, event, to)`
pub type Step<S, E> = (S, E, S);

/// Builder for [`StateMachine`]
pub struct StateMachineBuilder<S, E> {
    initial: S,
    table: FxHashMap<(S, E), S>,
    history_limit: usize,
}

impl<S, E> StateMachineBuilder<S, E>
where
    S: Copy + Eq + Hash,
    E: Copy + Eq + Hash,
{
    pub fn new(initial: S) -> Self {
        Self {
            initial,
            table: FxHashMap::default(),
            history_limit: 0,
        }
    }

    /// `event` moves the machine from `from` to `to`.
    ///
    /// A later entry for the same `(from, event)` replaces the earlier one.
    pub fn on(mut self, from: S, event: E, to: S) -> Self {
        self.table.insert((from, event), to);
        self
    }

    /// `event` moves the machine to `to` from each of `states`
    pub fn on_any(mut self, states: impl IntoIterator<Item = S>, event: E, to: S) -> Self {
        for from in states {
            self.table.insert((from, event), to);
        }
        self
    }

    /// Record the most recent `limit` transitions
    pub fn keep_history(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn build(self) -> StateMachine<S, E> {
        StateMachine {
            state: self.initial,
            table: self.table,
            history: VecDeque::with_capacity(self.history_limit),
            history_limit: self.history_limit,
        }
    }
}

/// A running state machine
pub struct StateMachine<S, E> {
    state: S,
    table: FxHashMap<(S, E), S>,
    history: VecDeque<Step<S, E>>,
    history_limit: usize,
}

impl<S, E> StateMachine<S, E>
where
    S: Copy + Eq + Hash,
    E: Copy + Eq + Hash,
{
    pub fn builder(initial: S) -> StateMachineBuilder<S, E> {
        StateMachineBuilder::new(initial)
    }

    pub fn current_state(&self) -> S {
        self.state
    }

    pub fn is_in(&self, state: S) -> bool {
        self.state == state
    }

    /// Target state of `event` from the current state, if any
    pub fn target(&self, event: E) -> Option<S> {
        self.table.get(&(self.state, event)).copied()
    }

    /// Apply `event`. Returns the new state, or `None` (leaving the state
    /// untouched) when the current state has no transition for it.
    pub fn send(&mut self, event: E) -> Option<S> {
        let from = self.state;
        let to = self.target(event)?;
        self.state = to;

        if self.history_limit > 0 {
            if self.history.len() == self.history_limit {
                self.history.pop_front();
            }
            self.history.push_back((from, event, to));
        }
        Some(to)
    }

    /// Recorded transitions, oldest first
    pub fn history(&self) -> impl ExactSizeIterator<Item = &Step<S, E>> + '_ {
        self.history.iter()
    }
}
