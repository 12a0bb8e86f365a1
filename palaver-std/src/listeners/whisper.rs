//! Whisper listener.
//!
//! Listeners within the clear range hear the whisper verbatim. Listeners out
//! to the muffled range get a bag override: a partially obfuscated message
//! and a pre-rendered wrapper that hides the speaker's name. Delivery then
//! uses the overrides without recomputing anything.

use super::{add_in_range, deliver_wrapped};
use crate::strings::keys;
use palaver_core::{
    ChatEnvelope, ChatListener, ListenerId, RecipientDatum, Transmitter, World, escape_text,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Delivers whispers, muffling them for distant listeners.
#[derive(Debug, Clone)]
pub struct WhisperListener {
    clear_range: f32,
    muffled_range: f32,
    obfuscation_chance: f64,
    rng: StdRng,
}

impl WhisperListener {
    /// Identity whisper envelopes are claimed under.
    pub const ID: ListenerId = ListenerId::new("whisper");

    /// Create a whisper listener seeded from the operating system.
    pub fn new(clear_range: f32, muffled_range: f32, obfuscation_chance: f64) -> Self {
        Self::with_rng(
            clear_range,
            muffled_range,
            obfuscation_chance,
            StdRng::from_os_rng(),
        )
    }

    /// Create a whisper listener with a fixed seed.
    pub fn seeded(clear_range: f32, muffled_range: f32, obfuscation_chance: f64, seed: u64) -> Self {
        Self::with_rng(
            clear_range,
            muffled_range,
            obfuscation_chance,
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(clear_range: f32, muffled_range: f32, obfuscation_chance: f64, rng: StdRng) -> Self {
        // NaN survives clamp and would panic in random_bool.
        let obfuscation_chance = if obfuscation_chance.is_nan() {
            0.0
        } else {
            obfuscation_chance.clamp(0.0, 1.0)
        };
        Self {
            clear_range,
            muffled_range,
            obfuscation_chance,
            rng,
        }
    }

    /// Replace non-whitespace characters with `~` at the configured chance.
    pub fn obfuscate(&mut self, message: &str) -> String {
        message
            .chars()
            .map(|c| {
                if !c.is_whitespace() && self.rng.random_bool(self.obfuscation_chance) {
                    '~'
                } else {
                    c
                }
            })
            .collect()
    }
}

impl ChatListener for WhisperListener {
    fn id(&self) -> ListenerId {
        Self::ID
    }

    fn get_recipients(&mut self, chat: &mut ChatEnvelope, world: &World<'_>) {
        if !self.owns(chat) {
            return;
        }
        add_in_range(chat, world, self.muffled_range);

        let muffled: Vec<_> = chat
            .recipients()
            .filter(|(_, data)| data.distance().is_some_and(|d| d > self.clear_range))
            .map(|(entity, _)| entity)
            .collect();
        if muffled.is_empty() {
            return;
        }

        let obfuscated = self.obfuscate(chat.message());
        let wrapped = world.strings.format(
            keys::WHISPER_UNKNOWN_WRAP,
            &[("message", &escape_text(&obfuscated))],
        );
        for entity in muffled {
            if let Some(data) = chat.recipient_mut(entity) {
                data.set(RecipientDatum::Message(obfuscated.clone()));
                data.set(RecipientDatum::WrappedMessage(wrapped.clone()));
            }
        }
    }

    fn on_chat(&mut self, chat: &mut ChatEnvelope, world: &World<'_>, out: &mut dyn Transmitter) {
        if !self.owns(chat) {
            return;
        }
        let sent = deliver_wrapped(chat, world, out, keys::WHISPER_WRAP);
        tracing::debug!(source = %chat.source(), sent, "whisper delivered");
        chat.mark_handled(Self::ID);
    }
}
