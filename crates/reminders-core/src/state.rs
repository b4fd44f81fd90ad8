//! State abstraction: an immutable projection of an event stream.

use crate::error::DomainError;
use crate::event::DomainEvent;
use crate::revision::StreamRevision;

/// An immutable snapshot produced by folding events.
pub trait State: Sized {
    /// The event type this state folds.
    type Event: DomainEvent;

    /// Returns the revision of the last event folded into this state.
    fn version(&self) -> StreamRevision;

    /// Returns the aggregate identifier, absent until the creation event has
    /// been folded.
    fn id(&self) -> Option<&str>;

    /// Folds one event into this state, producing the next state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InconsistentRevision` if the event does not
    /// directly follow this state's revision.
    fn apply(&self, event: &Self::Event) -> Result<Self, DomainError>;

    /// Checks that `event` carries the revision directly following this
    /// state's.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InconsistentRevision` naming the stream, the
    /// event's revision and the expected one.
    fn ensure_next_revision(&self, event: &Self::Event) -> Result<(), DomainError> {
        if event.version().is_next(self.version()) {
            Ok(())
        } else {
            Err(DomainError::InconsistentRevision {
                stream_id: event.stream_id().to_owned(),
                actual: event.version(),
                expected: self.version().next(),
            })
        }
    }
}
