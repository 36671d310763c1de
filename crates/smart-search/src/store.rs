use crate::{actions::Action, effect::Effect, reducer::reduce, state::SearchState};

/// Redux-style Store that holds the component state and dispatches actions
///
/// The Store follows the Redux pattern:
/// - Centralized state management
/// - Actions are dispatched to modify state
/// - A pure reducer handles state transitions
/// - State is replaced on each action
#[derive(Debug)]
pub struct Store {
    state: SearchState,
}

impl Store {
    /// Create a new store with initial state
    pub fn new(initial_state: SearchState) -> Self {
        Self {
            state: initial_state,
        }
    }

    /// Get immutable reference to current state
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Dispatch an action to update state
    ///
    /// Returns the effects the caller has to execute.
    pub fn dispatch(&mut self, action: &Action) -> Vec<Effect> {
        let (new_state, effects) = reduce(self.state.clone(), action);
        self.state = new_state;
        effects
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(SearchState::default())
    }
}
