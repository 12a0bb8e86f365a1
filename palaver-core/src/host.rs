//! # Host collaborators
//!
//! The pipeline does not own entities, networking or string tables. The host
//! engine supplies them through the traits in this module:
//!
//! - [`EntityLookup`] - component lookup (display name, player connection)
//! - [`ProximityQuery`] - entities within a radius of a source
//! - [`Localizer`] - message key + named arguments → display text
//! - [`Transmitter`] - delivery of a formatted message to one connection
//!
//! Discovery only ever sees a [`World`], which bundles the read-only
//! services. The [`Transmitter`] is handed to listeners during delivery only.

use crate::{
    channel::ChatChannel,
    entity::{ConnectionId, EntityId},
};

/// Component lookups on host entities.
///
/// Each lookup fails with `None` when the entity lacks the component.
pub trait EntityLookup {
    /// The name other players see for `entity`.
    fn name(&self, entity: EntityId) -> Option<String>;

    /// The connection of the player controlling `entity`.
    fn connection(&self, entity: EntityId) -> Option<ConnectionId>;
}

/// Spatial queries against the host world.
pub trait ProximityQuery {
    /// Entities within `radius` of `source`, paired with their distance.
    fn in_range<'a>(
        &'a self,
        source: EntityId,
        radius: f32,
    ) -> Box<dyn Iterator<Item = (EntityId, f32)> + 'a>;
}

/// Localized string formatting.
pub trait Localizer {
    /// Render `key` with named substitution arguments.
    fn format(&self, key: &str, args: &[(&str, &str)]) -> String;
}

/// A formatted message ready for delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingChat {
    /// Channel the message travels on.
    pub channel: ChatChannel,
    /// Raw message text.
    pub message: String,
    /// Rendered text shown to the player.
    pub wrapped_message: String,
    /// The entity that produced the message.
    pub source: EntityId,
    /// Suppress the chat box entry (speech bubble only).
    pub hide_chat: bool,
}

/// The transmission primitive.
pub trait Transmitter {
    /// Deliver `chat` to a single connection.
    fn send(&mut self, chat: &OutgoingChat, client: ConnectionId);
}

/// Read-only host services available in both phases.
#[derive(Clone, Copy)]
pub struct World<'a> {
    /// Component lookups.
    pub entities: &'a dyn EntityLookup,
    /// Spatial queries.
    pub proximity: &'a dyn ProximityQuery,
    /// String table.
    pub strings: &'a dyn Localizer,
}

impl<'a> World<'a> {
    /// Bundle host services.
    pub fn new(
        entities: &'a dyn EntityLookup,
        proximity: &'a dyn ProximityQuery,
        strings: &'a dyn Localizer,
    ) -> Self {
        Self {
            entities,
            proximity,
            strings,
        }
    }

    /// Bundle a host that provides both entity and spatial lookups.
    pub fn from_host<H>(host: &'a H, strings: &'a dyn Localizer) -> Self
    where
        H: EntityLookup + ProximityQuery,
    {
        Self::new(host, host, strings)
    }
}

impl std::fmt::Debug for World<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World").finish_non_exhaustive()
    }
}
