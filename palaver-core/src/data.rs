//! Keyed data bags.
//!
//! Both the envelope and each of its recipients carry a small bag of typed
//! values. The key set is closed: every value is a variant of a [`Datum`]
//! enum, and the variant doubles as the key. A bag holds at most one value
//! per key.
//!
//! Every lookup is optional. Listeners fall back to a computed default when
//! a key is absent rather than treating it as an error.

use crate::entity::EntityId;
use std::{collections::BTreeMap, fmt};

/// A value that knows its own key.
pub trait Datum: Clone + fmt::Debug {
    /// The closed key set for this datum type.
    type Key: Copy + Eq + Ord + fmt::Debug;

    /// The key this value is stored under.
    fn key(&self) -> Self::Key;
}

/// A mapping from a closed key set to typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct DataBag<D: Datum> {
    entries: BTreeMap<D::Key, D>,
}

impl<D: Datum> Default for DataBag<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Datum> DataBag<D> {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Store a value, returning the one it replaced.
    pub fn set(&mut self, value: D) -> Option<D> {
        self.entries.insert(value.key(), value)
    }

    /// Builder form of [`DataBag::set`].
    pub fn with(mut self, value: D) -> Self {
        self.set(value);
        self
    }

    /// Look up the value stored under `key`.
    pub fn get(&self, key: D::Key) -> Option<&D> {
        self.entries.get(&key)
    }

    /// Remove the value stored under `key`.
    pub fn remove(&mut self, key: D::Key) -> Option<D> {
        self.entries.remove(&key)
    }

    /// Returns `true` if a value is stored under `key`.
    pub fn contains(&self, key: D::Key) -> bool {
        self.entries.contains_key(&key)
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the bag holds no values.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over stored values in key order.
    pub fn iter(&self) -> impl Iterator<Item = &D> {
        self.entries.values()
    }
}

// ============================================================================
// Recipient data
// ============================================================================

/// Keys for per-recipient data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecipientKey {
    /// Distance between source and recipient.
    Distance,
    /// The name the recipient perceives the speaker as.
    Identity,
    /// The message text the recipient perceives.
    Message,
    /// A fully rendered message, bypassing formatting.
    WrappedMessage,
}

/// A per-recipient value, typed by its key.
#[derive(Debug, Clone, PartialEq)]
pub enum RecipientDatum {
    /// See [`RecipientKey::Distance`].
    Distance(f32),
    /// See [`RecipientKey::Identity`].
    Identity(String),
    /// See [`RecipientKey::Message`].
    Message(String),
    /// See [`RecipientKey::WrappedMessage`].
    WrappedMessage(String),
}

impl Datum for RecipientDatum {
    type Key = RecipientKey;

    fn key(&self) -> RecipientKey {
        match self {
            RecipientDatum::Distance(_) => RecipientKey::Distance,
            RecipientDatum::Identity(_) => RecipientKey::Identity,
            RecipientDatum::Message(_) => RecipientKey::Message,
            RecipientDatum::WrappedMessage(_) => RecipientKey::WrappedMessage,
        }
    }
}

/// Data attached to a single recipient of an envelope.
pub type RecipientData = DataBag<RecipientDatum>;

impl DataBag<RecipientDatum> {
    /// Distance to the source, if recorded during discovery.
    pub fn distance(&self) -> Option<f32> {
        match self.get(RecipientKey::Distance) {
            Some(RecipientDatum::Distance(d)) => Some(*d),
            _ => None,
        }
    }

    /// Identity override.
    pub fn identity(&self) -> Option<&str> {
        match self.get(RecipientKey::Identity) {
            Some(RecipientDatum::Identity(s)) => Some(s),
            _ => None,
        }
    }

    /// Message override.
    pub fn message(&self) -> Option<&str> {
        match self.get(RecipientKey::Message) {
            Some(RecipientDatum::Message(s)) => Some(s),
            _ => None,
        }
    }

    /// Pre-rendered message override.
    pub fn wrapped_message(&self) -> Option<&str> {
        match self.get(RecipientKey::WrappedMessage) {
            Some(RecipientDatum::WrappedMessage(s)) => Some(s),
            _ => None,
        }
    }
}

// ============================================================================
// Envelope data
// ============================================================================

/// Keys for envelope-wide data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChatKey {
    /// The entity whose words are being relayed by the source.
    RelayedSpeaker,
}

/// An envelope-wide value, typed by its key.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatDatum {
    /// See [`ChatKey::RelayedSpeaker`].
    RelayedSpeaker(EntityId),
}

impl Datum for ChatDatum {
    type Key = ChatKey;

    fn key(&self) -> ChatKey {
        match self {
            ChatDatum::RelayedSpeaker(_) => ChatKey::RelayedSpeaker,
        }
    }
}

/// Free-form data attached to an envelope.
pub type ChatData = DataBag<ChatDatum>;

impl DataBag<ChatDatum> {
    /// The relayed speaker, if any.
    pub fn relayed_speaker(&self) -> Option<EntityId> {
        match self.get(ChatKey::RelayedSpeaker) {
            Some(ChatDatum::RelayedSpeaker(e)) => Some(*e),
            None => None,
        }
    }
}
