//! Image load lifecycle
//!
//! The component moves through `Idle → Loading → Loaded | Errored`. Every
//! call to [`LoadLifecycle::begin`] opens a new *generation*; completions
//! carrying an older generation belong to a superseded request and are
//! rejected without touching the state.

use crate::fsm::{StateMachine, Step};

/// Monotonic load request counter
pub type Generation = u64;

/// Transitions kept for debugging; older ones are dropped
pub const HISTORY_LIMIT: usize = 8;

/// Component load state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadState {
    /// Not mounted, or unmounted
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// The image decoded and the surface holds a composite
    Loaded,
    /// The most recent fetch failed
    Errored,
}

/// Events that drive the lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadEvent {
    /// A fetch started (mount, or src/size change)
    Begin,
    /// The current fetch decoded successfully
    Succeeded,
    /// The current fetch failed
    Failed,
    /// The component was torn down
    Unmount,
}

fn lifecycle_machine() -> StateMachine<LoadState, LoadEvent> {
    use LoadEvent::*;
    use LoadState::*;

    let all = [Idle, Loading, Loaded, Errored];
    StateMachine::builder(Idle)
        .on_any(all, Begin, Loading)
        .on_any(all, Unmount, Idle)
        .on(Loading, Succeeded, Loaded)
        .on(Loading, Failed, Errored)
        .keep_history(HISTORY_LIMIT)
        .build()
}

/// Load lifecycle with stale-completion guarding
pub struct LoadLifecycle {
    machine: StateMachine<LoadState, LoadEvent>,
    generation: Generation,
}

impl LoadLifecycle {
    pub fn new() -> Self {
        Self {
            machine: lifecycle_machine(),
            generation: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> LoadState {
        self.machine.current_state()
    }

    /// Generation of the most recent request
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether `generation` is still the request the component waits on
    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.generation && self.machine.is_in(LoadState::Loading)
    }

    /// Start a new request, superseding any in-flight one
    pub fn begin(&mut self) -> Generation {
        self.generation += 1;
        let from = self.state();
        self.machine.send(LoadEvent::Begin);
        tracing::debug!(
            generation = self.generation,
            "load lifecycle {:?} -> {:?}",
            from,
            self.state()
        );
        self.generation
    }

    /// Mark `generation` as loaded. Returns false for stale generations.
    pub fn succeed(&mut self, generation: Generation) -> bool {
        self.complete(generation, LoadEvent::Succeeded)
    }

    /// Mark `generation` as failed. Returns false for stale generations.
    pub fn fail(&mut self, generation: Generation) -> bool {
        self.complete(generation, LoadEvent::Failed)
    }

    /// Return to idle. Outstanding requests become stale.
    pub fn unmount(&mut self) {
        self.generation += 1;
        self.machine.send(LoadEvent::Unmount);
        tracing::debug!(generation = self.generation, "load lifecycle unmounted");
    }

    /// The last [`HISTORY_LIMIT`] transitions, oldest first
    pub fn history(&self) -> impl ExactSizeIterator<Item = &Step<LoadState, LoadEvent>> + '_ {
        self.machine.history()
    }

    fn complete(&mut self, generation: Generation, event: LoadEvent) -> bool {
        if !self.is_current(generation) {
            tracing::debug!(
                generation,
                current = self.generation,
                "ignoring stale {:?} completion",
                event
            );
            return false;
        }
        self.machine.send(event);
        tracing::debug!(generation, "load lifecycle -> {:?}", self.state());
        true
    }
}

impl Default for LoadLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_success_path() {
        let mut lifecycle = LoadLifecycle::new();
        assert_eq!(lifecycle.state(), LoadState::Idle);

        let generation = lifecycle.begin();
        assert_eq!(lifecycle.state(), LoadState::Loading);
        assert!(lifecycle.succeed(generation));
        assert_eq!(lifecycle.state(), LoadState::Loaded);
    }

    #[test]
    fn test_load_failure_path() {
        let mut lifecycle = LoadLifecycle::new();
        let generation = lifecycle.begin();
        assert!(lifecycle.fail(generation));
        assert_eq!(lifecycle.state(), LoadState::Errored);

        // A retry from the errored state is a fresh request
        let retry = lifecycle.begin();
        assert_eq!(lifecycle.state(), LoadState::Loading);
        assert!(retry > generation);
    }

    #[test]
    fn test_superseded_completion_is_ignored() {
        let mut lifecycle = LoadLifecycle::new();
        let first = lifecycle.begin();
        let second = lifecycle.begin();

        assert!(!lifecycle.succeed(first));
        assert_eq!(lifecycle.state(), LoadState::Loading);

        assert!(lifecycle.fail(second));
        assert_eq!(lifecycle.state(), LoadState::Errored);
    }

    #[test]
    fn test_completion_is_applied_once() {
        let mut lifecycle = LoadLifecycle::new();
        let generation = lifecycle.begin();
        assert!(lifecycle.succeed(generation));
        assert!(!lifecycle.fail(generation));
        assert_eq!(lifecycle.state(), LoadState::Loaded);
    }

    #[test]
    fn test_unmount_invalidates_outstanding_request() {
        let mut lifecycle = LoadLifecycle::new();
        let generation = lifecycle.begin();
        lifecycle.unmount();

        assert_eq!(lifecycle.state(), LoadState::Idle);
        assert!(!lifecycle.succeed(generation));
        assert_eq!(lifecycle.state(), LoadState::Idle);
    }

    #[test]
    fn test_history_records_transitions() {
        let mut lifecycle = LoadLifecycle::new();
        let generation = lifecycle.begin();
        lifecycle.succeed(generation);

        let steps: Vec<_> = lifecycle.history().copied().collect();
        assert_eq!(
            steps,
            vec![
                (LoadState::Idle, LoadEvent::Begin, LoadState::Loading),
                (LoadState::Loading, LoadEvent::Succeeded, LoadState::Loaded),
            ]
        );
    }

    #[test]
    fn test_history_stays_bounded_over_many_loads() {
        let mut lifecycle = LoadLifecycle::new();
        for _ in 0..10_000 {
            let generation = lifecycle.begin();
            assert!(lifecycle.succeed(generation));
        }

        assert_eq!(lifecycle.history().len(), HISTORY_LIMIT);
        assert_eq!(
            lifecycle.history().last().copied(),
            Some((LoadState::Loading, LoadEvent::Succeeded, LoadState::Loaded))
        );
    }
}
