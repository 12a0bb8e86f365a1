//! Chat entry points.
//!
//! Each `try_send_*` call builds an envelope pre-claimed by the listener that
//! owns its semantics, then runs it through the pipeline. Pre-claiming is what
//! lets discovery tell an emote from speech and pick the matching range.

use palaver_core::{
    ChatChannel, ChatDatum, ChatEnvelope, EntityId, ListenerId, PalaverError, Transmitter, World,
};
use palaver_std::{
    ChatConfig, ChatPipeline, PipelineBuilder,
    listeners::{EmoteListener, LoggingListener, SayListener, WhisperListener},
};

/// The chat subsystem: a resolved pipeline plus its configuration.
#[derive(Debug)]
pub struct ChatSystem {
    pipeline: ChatPipeline,
    config: ChatConfig,
}

impl ChatSystem {
    /// Build the standard pipeline from `config`.
    ///
    /// Fails if the configuration is invalid or the listener order cannot be
    /// resolved.
    pub fn new(config: ChatConfig) -> Result<Self, PalaverError> {
        config.validate()?;
        let pipeline = Self::standard_listeners(&config).build()?;
        Ok(Self { pipeline, config })
    }

    /// A builder holding the standard listeners for `config`.
    ///
    /// Hosts can register their own listeners on top before building.
    pub fn standard_listeners(config: &ChatConfig) -> PipelineBuilder {
        PipelineBuilder::new()
            .register(LoggingListener::new())
            .register(SayListener::new(config.voice_range))
            .register(WhisperListener::new(
                config.whisper_clear_range,
                config.whisper_muffled_range,
                config.whisper_obfuscation_chance,
            ))
            .register(EmoteListener::new(config.emote_range))
    }

    /// Use an already built pipeline.
    pub fn with_pipeline(pipeline: ChatPipeline, config: ChatConfig) -> Self {
        Self { pipeline, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// The resolved pipeline.
    pub fn pipeline(&self) -> &ChatPipeline {
        &self.pipeline
    }

    /// Send an emote from `source`, optionally relaying `speaker`'s identity.
    pub fn try_send_emote(
        &mut self,
        source: EntityId,
        message: &str,
        speaker: Option<EntityId>,
        world: &World<'_>,
        out: &mut dyn Transmitter,
    ) -> bool {
        self.send_claimed(
            source,
            message,
            ChatChannel::EMOTES,
            EmoteListener::ID,
            speaker,
            world,
            out,
        )
    }

    /// Send local speech from `source`.
    pub fn try_send_say(
        &mut self,
        source: EntityId,
        message: &str,
        speaker: Option<EntityId>,
        world: &World<'_>,
        out: &mut dyn Transmitter,
    ) -> bool {
        self.send_claimed(
            source,
            message,
            ChatChannel::LOCAL,
            SayListener::ID,
            speaker,
            world,
            out,
        )
    }

    /// Send a whisper from `source`.
    pub fn try_send_whisper(
        &mut self,
        source: EntityId,
        message: &str,
        speaker: Option<EntityId>,
        world: &World<'_>,
        out: &mut dyn Transmitter,
    ) -> bool {
        self.send_claimed(
            source,
            message,
            ChatChannel::WHISPER,
            WhisperListener::ID,
            speaker,
            world,
            out,
        )
    }

    /// Dispatch a prepared envelope.
    ///
    /// The message is trimmed, then empty messages and messages over the
    /// length limit are dropped. A claimed envelope's text is frozen, so only
    /// unclaimed envelopes have their stored text trimmed; the length check
    /// always uses the trimmed text. Returns whether a listener handled the
    /// envelope.
    pub fn try_send_chat(
        &mut self,
        mut chat: ChatEnvelope,
        world: &World<'_>,
        out: &mut dyn Transmitter,
    ) -> bool {
        if !chat.is_claimed() {
            let trimmed = chat.message().trim();
            if trimmed.len() != chat.message().len() {
                let trimmed = trimmed.to_owned();
                if let Err(err) = chat.set_message(trimmed) {
                    tracing::warn!(source = %chat.source(), %err, "could not trim message");
                }
            }
        }
        if let Err(reason) = self.check_message(chat.message()) {
            tracing::debug!(source = %chat.source(), reason, "chat rejected");
            return false;
        }
        let report = self.pipeline.dispatch(&mut chat, world, out);
        report.handled
    }

    #[allow(clippy::too_many_arguments)]
    fn send_claimed(
        &mut self,
        source: EntityId,
        message: &str,
        channel: ChatChannel,
        owner: ListenerId,
        speaker: Option<EntityId>,
        world: &World<'_>,
        out: &mut dyn Transmitter,
    ) -> bool {
        let mut chat = ChatEnvelope::new(source, message.trim())
            .with_channel(channel)
            .with_claim(owner);
        if let Some(speaker) = speaker {
            chat.data_mut().set(ChatDatum::RelayedSpeaker(speaker));
        }
        self.try_send_chat(chat, world, out)
    }

    fn check_message(&self, message: &str) -> Result<(), &'static str> {
        let message = message.trim();
        if message.is_empty() {
            return Err("empty message");
        }
        if message.chars().count() > self.config.max_message_length {
            return Err("message too long");
        }
        Ok(())
    }
}
