//! # palaver-core
//!
//! Core types and traits for the Palaver chat dispatch pipeline.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! content plugins that only need to implement listeners.
//!
//! # Building Blocks
//!
//! ## Envelope ([`ChatEnvelope`])
//!
//! One chat utterance: source, channel, message, claim state and the
//! recipient map built during discovery.
//!
//! ## Data Bags ([`DataBag`])
//!
//! Closed-key, typed value maps. [`RecipientData`] rides along with each
//! recipient; [`ChatData`] with the envelope.
//!
//! ## Listener ([`ChatListener`])
//!
//! The two-phase extension point: contribute recipients, then deliver.
//!
//! ## Host ([`World`], [`Transmitter`])
//!
//! Abstract collaborators the host engine implements: entity lookups,
//! proximity queries, string formatting and transmission.
//!
//! # Error Types
//!
//! - [`PalaverError`] - Top-level error type
//! - [`OrderingError`] - Listener ordering errors
//! - [`ClaimError`] - Claim protocol violations
//! - [`EnvelopeError`] - Envelope mutation errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod channel;
mod data;
mod entity;
mod envelope;
mod error;
mod host;
mod listener;
mod markup;

// Re-exports
pub use channel::ChatChannel;
pub use data::{
    ChatData, ChatDatum, ChatKey, DataBag, Datum, RecipientData, RecipientDatum, RecipientKey,
};
pub use entity::{ConnectionId, EntityId};
pub use envelope::ChatEnvelope;
pub use error::{BoxError, ClaimError, EnvelopeError, OrderingError, PalaverError};
pub use host::{EntityLookup, Localizer, OutgoingChat, ProximityQuery, Transmitter, World};
pub use listener::{ChatListener, ListenerId};
pub use markup::escape_text;
