//! Ordered event history for one aggregate and its replay.

use crate::error::DomainError;
use crate::state::State;

/// An ordered, immutable sequence of events for one aggregate, oldest first.
pub trait EventStream {
    /// The state this stream replays into.
    type State: State;

    /// Returns the events in stored order.
    fn events(&self) -> &[<Self::State as State>::Event];

    /// Returns the state of an aggregate with no history.
    fn blank_state(&self) -> Self::State;

    /// Returns `true` if the stream holds no events.
    fn is_empty(&self) -> bool {
        self.events().is_empty()
    }

    /// Left-folds the events over the blank state.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a fold step; no partial state is
    /// exposed.
    fn replay(&self) -> Result<Self::State, DomainError> {
        self.events()
            .iter()
            .try_fold(self.blank_state(), |state, event| state.apply(event))
    }
}
