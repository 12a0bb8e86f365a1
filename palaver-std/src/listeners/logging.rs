//! Logging listener - observability for chat processing.

use palaver_core::{ChatEnvelope, ChatListener, ListenerId, Transmitter, World};

/// A listener that logs envelopes for observability.
///
/// It never claims and never marks anything handled, so it can sit anywhere
/// in the order without changing behaviour.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = PipelineBuilder::new()
///     .register(LoggingListener::named("chat.audit"))
///     .register(SayListener::new(10.0))
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct LoggingListener {
    name: &'static str,
}

impl LoggingListener {
    /// Create a new `LoggingListener` with a default name.
    pub fn new() -> Self {
        Self { name: "chat.log" }
    }

    /// Create a new `LoggingListener` with a custom name.
    ///
    /// The name doubles as the listener id, so distinct loggers in one
    /// pipeline need distinct names.
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatListener for LoggingListener {
    fn id(&self) -> ListenerId {
        ListenerId::new(self.name)
    }

    fn get_recipients(&mut self, chat: &mut ChatEnvelope, _world: &World<'_>) {
        tracing::debug!(
            name = %self.name,
            source = %chat.source(),
            channel = ?chat.channel(),
            claimed_by = ?chat.claimed_by(),
            message = %chat.message(),
            "chat discovery"
        );
    }

    fn on_chat(&mut self, chat: &mut ChatEnvelope, _world: &World<'_>, _out: &mut dyn Transmitter) {
        tracing::debug!(
            name = %self.name,
            source = %chat.source(),
            recipients = chat.recipient_count(),
            handled = chat.is_handled(),
            "chat delivery"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        strings::BuiltinStrings,
        testing::{MockWorld, RecordingTransmitter},
    };
    use palaver_core::EntityId;

    #[test]
    fn test_logging_listener_never_claims() {
        let world = MockWorld::new().with_player(1, "Urist", (0.0, 0.0));
        let strings = BuiltinStrings;
        let world = world.as_world(&strings);
        let mut listener = LoggingListener::named("audit");
        let mut chat = ChatEnvelope::new(EntityId(1), "hello");
        let mut out = RecordingTransmitter::new();

        listener.get_recipients(&mut chat, &world);
        listener.on_chat(&mut chat, &world, &mut out);

        assert_eq!(listener.id(), ListenerId::new("audit"));
        assert!(!chat.is_claimed());
        assert!(!chat.is_handled());
        assert_eq!(chat.recipient_count(), 0);
        assert!(out.is_empty());
    }
}
