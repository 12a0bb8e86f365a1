//! Error types for Palaver.
//!
//! - [`PalaverError`] - Top-level error type
//! - [`OrderingError`] - Listener ordering resolution errors
//! - [`ClaimError`] - Claim protocol violations
//! - [`EnvelopeError`] - Envelope mutation errors

use crate::listener::ListenerId;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Palaver operations.
#[derive(Error, Debug)]
pub enum PalaverError {
    /// Listener ordering could not be resolved.
    #[error("ordering error: {0}")]
    Ordering(#[from] OrderingError),

    /// The claim protocol was violated.
    #[error("claim error: {0}")]
    Claim(#[from] ClaimError),

    /// An envelope was mutated outside its allowed window.
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors raised while resolving the listener order.
///
/// All of these are fatal configuration errors: a pipeline is never built
/// with an arbitrary order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderingError {
    /// The before/after constraints contain a cycle.
    ///
    /// `listeners` names every listener that could not be placed, in
    /// registration order.
    #[error("listener ordering contains a cycle through {}", join(.listeners))]
    Cycle {
        /// Listeners left unresolved.
        listeners: Vec<ListenerId>,
    },

    /// Two listeners were registered under the same id.
    #[error("listener `{0}` registered more than once")]
    DuplicateListener(ListenerId),
}

/// Errors raised by the claim protocol.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimError {
    /// The envelope already has an owner.
    #[error("envelope already claimed by `{owner}`, `{attempted}` cannot claim it")]
    AlreadyClaimed {
        /// Current owner.
        owner: ListenerId,
        /// Listener that attempted the second claim.
        attempted: ListenerId,
    },

    /// A listener other than the owner tried to mark the envelope handled.
    #[error("`{attempted}` cannot handle an envelope it does not own")]
    NotOwner {
        /// Listener that attempted the transition.
        attempted: ListenerId,
    },

    /// The owner tried to mark the envelope handled before delivery.
    #[error("`{attempted}` cannot mark an envelope handled before delivery")]
    BeforeDelivery {
        /// Listener that attempted the transition.
        attempted: ListenerId,
    },
}

/// Errors raised when mutating an envelope.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The message text is frozen once the envelope is claimed.
    #[error("message cannot change after the envelope is claimed by `{0}`")]
    MessageFrozen(ListenerId),

    /// Recipients are read-only once discovery has finished.
    #[error("recipients are sealed")]
    RecipientsSealed,
}

impl From<BoxError> for PalaverError {
    fn from(err: BoxError) -> Self {
        PalaverError::Custom(err)
    }
}

fn join(ids: &[ListenerId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}
