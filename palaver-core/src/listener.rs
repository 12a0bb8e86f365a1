//! # Chat Listener
//!
//! A listener contributes to chat handling in two phases:
//!
//! 1. **Discovery** ([`ChatListener::get_recipients`]): every listener sees
//!    every envelope and may add recipients with per-recipient data. Discovery
//!    has no side effects outside the envelope.
//! 2. **Delivery** ([`ChatListener::on_chat`]): the listener that owns the
//!    envelope formats the message, transmits it and marks the envelope
//!    handled. Everyone else returns immediately.
//!
//! Listeners are identified by a [`ListenerId`] tag. Ownership checks compare
//! tags; there is no runtime type inspection.
//!
//! # Ordering
//!
//! A listener may declare that it runs [`before`](ChatListener::before) or
//! [`after`](ChatListener::after) other listeners. The declarations are
//! resolved once, when the pipeline is built, into a single order used by
//! both phases.

use crate::{
    envelope::ChatEnvelope,
    host::{Transmitter, World},
};
use std::fmt;

/// A listener identity tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(&'static str);

impl ListenerId {
    /// Create a listener id from a static name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The name this id was created with.
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A participant in the chat pipeline.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `ChatListener`",
    label = "missing `ChatListener` implementation",
    note = "Listeners must provide an `id` and may override `get_recipients` and `on_chat`."
)]
pub trait ChatListener: Send + 'static {
    /// The identity this listener claims envelopes under.
    fn id(&self) -> ListenerId;

    /// Listeners that must run after this one.
    fn before(&self) -> &[ListenerId] {
        &[]
    }

    /// Listeners that must run before this one.
    fn after(&self) -> &[ListenerId] {
        &[]
    }

    /// Discovery phase: add recipients to `chat`.
    fn get_recipients(&mut self, chat: &mut ChatEnvelope, world: &World<'_>) {
        let _ = (chat, world);
    }

    /// Delivery phase: format and transmit `chat`.
    fn on_chat(&mut self, chat: &mut ChatEnvelope, world: &World<'_>, out: &mut dyn Transmitter) {
        let _ = (chat, world, out);
    }

    /// Returns `true` if this listener owns `chat` and it is not yet handled.
    fn owns(&self, chat: &ChatEnvelope) -> bool {
        !chat.is_handled() && chat.is_claimed_by(self.id())
    }
}

impl<L: ChatListener + ?Sized> ChatListener for Box<L> {
    fn id(&self) -> ListenerId {
        (**self).id()
    }

    fn before(&self) -> &[ListenerId] {
        (**self).before()
    }

    fn after(&self) -> &[ListenerId] {
        (**self).after()
    }

    fn get_recipients(&mut self, chat: &mut ChatEnvelope, world: &World<'_>) {
        (**self).get_recipients(chat, world)
    }

    fn on_chat(&mut self, chat: &mut ChatEnvelope, world: &World<'_>, out: &mut dyn Transmitter) {
        (**self).on_chat(chat, world, out)
    }

    fn owns(&self, chat: &ChatEnvelope) -> bool {
        (**self).owns(chat)
    }
}
