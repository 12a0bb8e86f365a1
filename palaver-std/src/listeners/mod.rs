//! Standard listener implementations.
//!
//! - [`EmoteListener`] - "X waves" within emote range; runs before Say
//! - [`SayListener`] - local speech within voice range
//! - [`WhisperListener`] - short-range speech, muffled at a distance
//! - [`LoggingListener`] - observer that logs every envelope

pub mod emote;
pub mod logging;
pub mod say;
pub mod whisper;

pub use emote::EmoteListener;
pub use logging::LoggingListener;
pub use say::SayListener;
pub use whisper::WhisperListener;

use crate::strings::keys;
use palaver_core::{
    ChatEnvelope, OutgoingChat, RecipientData, RecipientDatum, Transmitter, World, escape_text,
};

/// Add every entity within `range` of the source, recording its distance.
pub(crate) fn add_in_range(chat: &mut ChatEnvelope, world: &World<'_>, range: f32) {
    for (entity, distance) in world.proximity.in_range(chat.source(), range) {
        let data = RecipientData::new().with(RecipientDatum::Distance(distance));
        if let Err(err) = chat.add_recipient(entity, data) {
            tracing::warn!(%entity, %err, "could not add recipient");
            return;
        }
    }
}

/// The name recipients see by default: the source's name.
///
/// A relayed speaker stays in the chat data for listeners that relay; it does
/// not change the default identity.
pub(crate) fn speaker_name(chat: &ChatEnvelope, world: &World<'_>) -> String {
    world
        .entities
        .name(chat.source())
        .unwrap_or_else(|| world.strings.format(keys::UNKNOWN_SPEAKER, &[]))
}

/// Format and transmit `chat` to every recipient with a connection.
///
/// Bag entries override the computed identity, message and wrapped message.
/// Recipients without a connection are skipped. Returns the number of
/// messages sent.
pub(crate) fn deliver_wrapped(
    chat: &ChatEnvelope,
    world: &World<'_>,
    out: &mut dyn Transmitter,
    wrap_key: &str,
) -> usize {
    let default_identity = speaker_name(chat, world);
    let mut sent = 0;

    for (recipient, data) in chat.recipients() {
        let Some(client) = world.entities.connection(recipient) else {
            tracing::trace!(%recipient, "recipient has no connection, skipping");
            continue;
        };

        let identity = data.identity().unwrap_or(&default_identity);
        let message = data.message().unwrap_or(chat.message());
        let wrapped_message = match data.wrapped_message() {
            Some(wrapped) => wrapped.to_owned(),
            None => world.strings.format(
                wrap_key,
                &[("entityName", identity), ("message", &escape_text(message))],
            ),
        };

        out.send(
            &OutgoingChat {
                channel: chat.channel(),
                message: message.to_owned(),
                wrapped_message,
                source: chat.source(),
                hide_chat: false,
            },
            client,
        );
        sent += 1;
    }

    sent
}
