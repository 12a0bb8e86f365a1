//! # Chat Envelope
//!
//! The per-utterance record that threads through the listener chain.
//!
//! # Lifecycle
//!
//! ```text
//! Unclaimed ──claim(X)──▶ Claimed(X) ──mark_handled(X)──▶ Handled
//! ```
//!
//! - `claimed_by` is written at most once. Entry points normally claim at
//!   construction with [`ChatEnvelope::with_claim`].
//! - `handled` only moves from `false` to `true`, only the owner may move it,
//!   and only once recipients are sealed (that is, during delivery).
//! - The message text is frozen once the envelope is claimed.
//! - Recipients may be added until the executor seals them at the end of
//!   discovery; afterwards the map is read-only.

use crate::{
    channel::ChatChannel,
    data::{ChatData, ChatDatum, RecipientData},
    entity::EntityId,
    error::{ClaimError, EnvelopeError},
    listener::ListenerId,
};
use std::collections::BTreeMap;

/// One chat utterance and everything the listeners learn about it.
#[derive(Debug, Clone)]
pub struct ChatEnvelope {
    source: EntityId,
    channel: ChatChannel,
    message: String,
    claimed_by: Option<ListenerId>,
    handled: bool,
    recipients: BTreeMap<EntityId, RecipientData>,
    sealed: bool,
    data: ChatData,
}

impl ChatEnvelope {
    /// Create an unclaimed envelope on the local channel.
    pub fn new(source: EntityId, message: impl Into<String>) -> Self {
        Self {
            source,
            channel: ChatChannel::default(),
            message: message.into(),
            claimed_by: None,
            handled: false,
            recipients: BTreeMap::new(),
            sealed: false,
            data: ChatData::new(),
        }
    }

    /// Set the channel.
    pub fn with_channel(mut self, channel: ChatChannel) -> Self {
        debug_assert!(channel.is_single(), "an envelope carries exactly one channel");
        self.channel = channel;
        self
    }

    /// Pre-claim the envelope for `owner`.
    pub fn with_claim(mut self, owner: ListenerId) -> Self {
        self.claim(owner);
        self
    }

    /// Attach envelope-wide data.
    pub fn with_data(mut self, datum: ChatDatum) -> Self {
        self.data.set(datum);
        self
    }

    /// The entity that produced the utterance.
    pub fn source(&self) -> EntityId {
        self.source
    }

    /// The channel the utterance travels on.
    pub fn channel(&self) -> ChatChannel {
        self.channel
    }

    /// The raw message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Replace the message text. Fails once the envelope is claimed.
    pub fn set_message(&mut self, message: impl Into<String>) -> Result<(), EnvelopeError> {
        if let Some(owner) = self.claimed_by {
            return Err(EnvelopeError::MessageFrozen(owner));
        }
        self.message = message.into();
        Ok(())
    }

    /// Envelope-wide data.
    pub fn data(&self) -> &ChatData {
        &self.data
    }

    /// Mutable envelope-wide data.
    pub fn data_mut(&mut self) -> &mut ChatData {
        &mut self.data
    }

    // ------------------------------------------------------------------------
    // Claim protocol
    // ------------------------------------------------------------------------

    /// The listener that owns this envelope, if any.
    pub fn claimed_by(&self) -> Option<ListenerId> {
        self.claimed_by
    }

    /// Returns `true` once a listener owns this envelope.
    pub fn is_claimed(&self) -> bool {
        self.claimed_by.is_some()
    }

    /// Returns `true` if `listener` owns this envelope.
    pub fn is_claimed_by(&self, listener: ListenerId) -> bool {
        self.claimed_by == Some(listener)
    }

    /// Claim the envelope for `owner`.
    ///
    /// Claiming an envelope already owned by `owner` is a no-op. A claim by
    /// anyone else is rejected and leaves the owner unchanged.
    pub fn try_claim(&mut self, owner: ListenerId) -> Result<(), ClaimError> {
        match self.claimed_by {
            None => {
                self.claimed_by = Some(owner);
                Ok(())
            }
            Some(current) if current == owner => Ok(()),
            Some(current) => Err(ClaimError::AlreadyClaimed {
                owner: current,
                attempted: owner,
            }),
        }
    }

    /// Claim the envelope for `owner`, treating a conflicting claim as a bug.
    ///
    /// Panics in debug builds on a conflicting claim; in release builds the
    /// claim is ignored. Returns whether `owner` holds the claim afterwards.
    pub fn claim(&mut self, owner: ListenerId) -> bool {
        match self.try_claim(owner) {
            Ok(()) => true,
            Err(err) => {
                if cfg!(debug_assertions) {
                    panic!("{err}");
                }
                false
            }
        }
    }

    /// Returns `true` once the owner has delivered the envelope.
    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Mark the envelope handled on behalf of `by`.
    ///
    /// Fails if `by` is not the owner or if recipients are not sealed yet.
    pub fn try_mark_handled(&mut self, by: ListenerId) -> Result<(), ClaimError> {
        if self.claimed_by != Some(by) {
            return Err(ClaimError::NotOwner { attempted: by });
        }
        if !self.sealed {
            return Err(ClaimError::BeforeDelivery { attempted: by });
        }
        self.handled = true;
        Ok(())
    }

    /// Mark the envelope handled, treating a rejected transition as a bug.
    ///
    /// Panics in debug builds when `by` does not own the envelope or delivery
    /// has not started; in release builds the call is ignored.
    pub fn mark_handled(&mut self, by: ListenerId) -> bool {
        match self.try_mark_handled(by) {
            Ok(()) => true,
            Err(err) => {
                if cfg!(debug_assertions) {
                    panic!("{err}");
                }
                false
            }
        }
    }

    // ------------------------------------------------------------------------
    // Recipients
    // ------------------------------------------------------------------------

    /// Add a recipient with its data.
    ///
    /// The first listener to add a recipient wins; later additions for the
    /// same entity return `Ok(false)` and leave the existing data in place.
    pub fn add_recipient(
        &mut self,
        entity: EntityId,
        data: RecipientData,
    ) -> Result<bool, EnvelopeError> {
        if self.sealed {
            return Err(EnvelopeError::RecipientsSealed);
        }
        match self.recipients.entry(entity) {
            std::collections::btree_map::Entry::Occupied(_) => Ok(false),
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(data);
                Ok(true)
            }
        }
    }

    /// Mutable data for an already added recipient. `None` once sealed.
    pub fn recipient_mut(&mut self, entity: EntityId) -> Option<&mut RecipientData> {
        if self.sealed {
            return None;
        }
        self.recipients.get_mut(&entity)
    }

    /// Data for a recipient.
    pub fn recipient(&self, entity: EntityId) -> Option<&RecipientData> {
        self.recipients.get(&entity)
    }

    /// Iterate over recipients in entity order.
    pub fn recipients(&self) -> impl Iterator<Item = (EntityId, &RecipientData)> {
        self.recipients.iter().map(|(e, d)| (*e, d))
    }

    /// Number of recipients.
    pub fn recipient_count(&self) -> usize {
        self.recipients.len()
    }

    /// Freeze the recipient map. Called by the executor after discovery.
    pub fn seal_recipients(&mut self) {
        self.sealed = true;
    }

    /// Returns `true` once the recipient map is read-only.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RecipientDatum;

    const A: ListenerId = ListenerId::new("a");
    const B: ListenerId = ListenerId::new("b");

    #[test]
    fn test_first_claim_wins() {
        let mut chat = ChatEnvelope::new(EntityId(1), "hi");
        assert!(chat.try_claim(A).is_ok());
        let err = chat.try_claim(B).unwrap_err();
        assert_eq!(
            err,
            ClaimError::AlreadyClaimed {
                owner: A,
                attempted: B
            }
        );
        assert_eq!(chat.claimed_by(), Some(A));
    }

    #[test]
    fn test_reclaim_by_owner_is_noop() {
        let mut chat = ChatEnvelope::new(EntityId(1), "hi").with_claim(A);
        assert!(chat.try_claim(A).is_ok());
        assert!(chat.is_claimed_by(A));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "already claimed")]
    fn test_conflicting_claim_panics_in_debug() {
        let mut chat = ChatEnvelope::new(EntityId(1), "hi").with_claim(A);
        chat.claim(B);
    }

    #[test]
    fn test_message_frozen_after_claim() {
        let mut chat = ChatEnvelope::new(EntityId(1), "hi");
        chat.set_message("hello").unwrap();
        chat.try_claim(A).unwrap();
        assert_eq!(
            chat.set_message("bye"),
            Err(EnvelopeError::MessageFrozen(A))
        );
        assert_eq!(chat.message(), "hello");
    }

    #[test]
    fn test_only_owner_marks_handled() {
        let mut chat = ChatEnvelope::new(EntityId(1), "hi").with_claim(A);
        assert_eq!(
            chat.try_mark_handled(B),
            Err(ClaimError::NotOwner { attempted: B })
        );
        assert!(!chat.is_handled());
        chat.seal_recipients();
        chat.try_mark_handled(A).unwrap();
        assert!(chat.is_handled());
    }

    #[test]
    fn test_handled_only_after_seal() {
        let mut chat = ChatEnvelope::new(EntityId(1), "hi").with_claim(A);
        assert_eq!(
            chat.try_mark_handled(A),
            Err(ClaimError::BeforeDelivery { attempted: A })
        );
        assert!(!chat.is_handled());
        chat.seal_recipients();
        assert!(chat.try_mark_handled(A).is_ok());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "before delivery")]
    fn test_handled_during_discovery_panics_in_debug() {
        let mut chat = ChatEnvelope::new(EntityId(1), "hi").with_claim(A);
        chat.mark_handled(A);
    }

    #[test]
    fn test_unclaimed_cannot_be_handled() {
        let mut chat = ChatEnvelope::new(EntityId(1), "hi");
        assert!(chat.try_mark_handled(A).is_err());
    }

    #[test]
    fn test_add_recipient_first_wins() {
        let mut chat = ChatEnvelope::new(EntityId(1), "hi");
        let first = RecipientData::new().with(RecipientDatum::Distance(1.0));
        let second = RecipientData::new().with(RecipientDatum::Distance(9.0));
        assert_eq!(chat.add_recipient(EntityId(2), first), Ok(true));
        assert_eq!(chat.add_recipient(EntityId(2), second), Ok(false));
        assert_eq!(
            chat.recipient(EntityId(2)).and_then(|d| d.distance()),
            Some(1.0)
        );
    }

    #[test]
    fn test_sealed_recipients_are_read_only() {
        let mut chat = ChatEnvelope::new(EntityId(1), "hi");
        chat.add_recipient(EntityId(2), RecipientData::new()).unwrap();
        chat.seal_recipients();
        assert_eq!(
            chat.add_recipient(EntityId(3), RecipientData::new()),
            Err(EnvelopeError::RecipientsSealed)
        );
        assert!(chat.recipient_mut(EntityId(2)).is_none());
        assert_eq!(chat.recipient_count(), 1);
    }
}
