//! Aggregate root abstraction.

use crate::revision::StreamRevision;
use crate::state::State;

/// Trait for aggregate roots that own a current state and the events raised
/// against it that have not been persisted yet.
pub trait Aggregate: Send + Sync {
    /// The state this aggregate wraps.
    type State: State;

    /// Returns the current, authoritative state.
    fn state(&self) -> &Self::State;

    /// Returns events raised by command handling, oldest first.
    fn pending_events(&self) -> &[<Self::State as State>::Event];

    /// Clears pending events after persistence.
    fn clear_pending_events(&mut self);

    /// Returns the aggregate identifier, if the aggregate has been created.
    fn aggregate_id(&self) -> Option<&str> {
        self.state().id()
    }

    /// Returns the revision of the current state, pending events included.
    fn version(&self) -> StreamRevision {
        self.state().version()
    }

    /// Returns the revision the aggregate had before its pending events were
    /// raised, i.e. the last durably stored revision.
    fn persisted_version(&self) -> StreamRevision {
        let pending = u64::try_from(self.pending_events().len()).unwrap_or(u64::MAX);
        StreamRevision::new(self.version().value().saturating_sub(pending))
    }
}
