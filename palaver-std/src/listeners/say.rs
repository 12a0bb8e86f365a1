//! Say listener.

use super::{add_in_range, deliver_wrapped};
use crate::strings::keys;
use palaver_core::{ChatEnvelope, ChatListener, ListenerId, Transmitter, World};

/// Delivers local speech to everyone within voice range.
#[derive(Debug, Clone)]
pub struct SayListener {
    range: f32,
}

impl SayListener {
    /// Identity speech envelopes are claimed under.
    pub const ID: ListenerId = ListenerId::new("say");

    /// Create a say listener with the given voice range.
    pub fn new(range: f32) -> Self {
        Self { range }
    }
}

impl ChatListener for SayListener {
    fn id(&self) -> ListenerId {
        Self::ID
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
        let sent = deliver_wrapped(chat, world, out, keys::SAY_WRAP);
        tracing::debug!(source = %chat.source(), sent, "speech delivered");
        chat.mark_handled(Self::ID);
    }
}
