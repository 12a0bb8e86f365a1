//! # palaver - Chat Dispatch Pipeline
//!
//! `palaver` routes chat utterances through an ordered chain of listeners in
//! two phases: recipient discovery, then delivery by the single listener that
//! claimed the utterance.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use palaver::prelude::*;
//!
//! let mut chat = ChatSystem::new(ChatConfig::default())?;
//!
//! // `host` implements EntityLookup + ProximityQuery, `net` implements Transmitter.
//! let world = World::from_host(&host, &BuiltinStrings);
//! chat.try_send_emote(player, "waves", None, &world, &mut net);
//! ```
//!
//! ## Custom Listeners
//!
//! ```rust,ignore
//! struct ShoutListener;
//!
//! impl ChatListener for ShoutListener {
//!     fn id(&self) -> ListenerId { ListenerId::new("shout") }
//!     fn before(&self) -> &[ListenerId] { &[SayListener::ID] }
//!     // get_recipients / on_chat ...
//! }
//!
//! let pipeline = ChatSystem::standard_listeners(&config)
//!     .register(ShoutListener)
//!     .build()?;
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod system;

pub use palaver_core::{
    // Error types
    BoxError,
    // Envelope
    ChatChannel,
    ChatData,
    ChatDatum,
    ChatEnvelope,
    ChatKey,
    // Listener
    ChatListener,
    ClaimError,
    ConnectionId,
    // Data bags
    DataBag,
    Datum,
    EntityId,
    // Host
    EntityLookup,
    EnvelopeError,
    ListenerId,
    Localizer,
    OrderingError,
    OutgoingChat,
    PalaverError,
    ProximityQuery,
    RecipientData,
    RecipientDatum,
    RecipientKey,
    Transmitter,
    World,
    escape_text,
};

pub use palaver_std::{
    BuiltinStrings, ChatConfig, ChatPipeline, ConfigError, DispatchReport, ListenerDescriptor,
    PipelineBuilder, resolve_ids, resolve_order,
};

pub use system::ChatSystem;

/// Standard listener implementations.
pub mod listeners {
    pub use palaver_std::listeners::{
        EmoteListener, LoggingListener, SayListener, WhisperListener,
    };
}

/// Built-in message keys.
pub mod keys {
    pub use palaver_std::strings::keys::{
        EMOTE_WRAP, SAY_WRAP, UNKNOWN_SPEAKER, WHISPER_UNKNOWN_WRAP, WHISPER_WRAP,
    };
}

/// Testing utilities.
pub mod testing {
    pub use palaver_std::testing::{
        CallLog, MockWorld, Phase, RecordingListener, RecordingTransmitter,
    };
}

/// Prelude module - common imports for Palaver.
///
/// # Usage
///
/// ```rust,ignore
/// use palaver::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BuiltinStrings, ChatChannel, ChatConfig, ChatEnvelope, ChatListener, ChatPipeline,
        ChatSystem, EntityId, ListenerId, PalaverError, PipelineBuilder, RecipientData,
        RecipientDatum, Transmitter, World,
        listeners::{EmoteListener, LoggingListener, SayListener, WhisperListener},
    };
}
