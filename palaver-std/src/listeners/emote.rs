//! Emote listener.

use super::{add_in_range, deliver_wrapped};
use crate::{listeners::SayListener, strings::keys};
use palaver_core::{ChatEnvelope, ChatListener, ListenerId, Transmitter, World};

/// Delivers emotes ("Urist waves") to everyone within range of the source.
///
/// Only acts on envelopes claimed under [`EmoteListener::ID`].
#[derive(Debug, Clone)]
pub struct EmoteListener {
    range: f32,
}

impl EmoteListener {
    /// Identity emote envelopes are claimed under.
    pub const ID: ListenerId = ListenerId::new("emote");

    const BEFORE: &'static [ListenerId] = &[SayListener::ID];

    /// Create an emote listener with the given range.
    pub fn new(range: f32) -> Self {
        Self { range }
    }

    /// The emote range.
    pub fn range(&self) -> f32 {
        self.range
    }
}

impl ChatListener for EmoteListener {
    fn id(&self) -> ListenerId {
        Self::ID
    }

    fn before(&self) -> &[ListenerId] {
        Self::BEFORE
    }

    fn get_recipients(&mut self, chat: &mut ChatEnvelope, world: &World<'_>) {
        if !self.owns(chat) {
            return;
        }
        add_in_range(chat, world, self.range);
    }

    fn on_chat(&mut self, chat: &mut ChatEnvelope, world: &World<'_>, out: &mut dyn Transmitter) {
        if !self.owns(chat) {
            return;
        }
        let sent = deliver_wrapped(chat, world, out, keys::EMOTE_WRAP);
        tracing::debug!(source = %chat.source(), sent, "emote delivered");
        chat.mark_handled(Self::ID);
    }
}
