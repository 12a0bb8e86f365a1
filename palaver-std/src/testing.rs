//! Testing utilities for Palaver.
//!
//! This module provides utilities to make testing listeners and pipelines easier.
//!
//! # Features
//!
//! - [`MockWorld`]: An in-memory host with named entities on a plane
//! - [`RecordingTransmitter`]: A transmitter that records everything it sends
//! - [`RecordingListener`]: A listener that records the phases it is called in

use palaver_core::{
    ChatEnvelope, ChatListener, ConnectionId, EntityId, EntityLookup, ListenerId, Localizer,
    OutgoingChat, ProximityQuery, Transmitter, World,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// ============================================================================
// Mock World
// ============================================================================

#[derive(Debug, Clone)]
struct MockEntity {
    id: EntityId,
    name: Option<String>,
    position: (f32, f32),
    connection: Option<ConnectionId>,
}

/// An in-memory host world.
///
/// Entities sit on a plane; proximity uses Euclidean distance and includes
/// the source itself at distance zero.
///
/// # Example
///
/// ```rust,ignore
/// let world = MockWorld::new()
///     .with_player(1, "Urist", (0.0, 0.0))
///     .with_npc(2, "Crab", (1.0, 0.0));
/// let strings = BuiltinStrings;
/// pipeline.dispatch(&mut chat, &world.as_world(&strings), &mut out);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockWorld {
    entities: Vec<MockEntity>,
}

impl MockWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player-controlled entity. Its connection id equals its entity id.
    pub fn with_player(mut self, id: u64, name: &str, position: (f32, f32)) -> Self {
        self.entities.push(MockEntity {
            id: EntityId(id),
            name: Some(name.to_owned()),
            position,
            connection: Some(ConnectionId(id)),
        });
        self
    }

    /// Add an entity without a player connection.
    pub fn with_npc(mut self, id: u64, name: &str, position: (f32, f32)) -> Self {
        self.entities.push(MockEntity {
            id: EntityId(id),
            name: Some(name.to_owned()),
            position,
            connection: None,
        });
        self
    }

    /// Add a player-controlled entity without a name.
    pub fn with_unnamed_player(mut self, id: u64, position: (f32, f32)) -> Self {
        self.entities.push(MockEntity {
            id: EntityId(id),
            name: None,
            position,
            connection: Some(ConnectionId(id)),
        });
        self
    }

    /// Bundle this world with a string table.
    pub fn as_world<'a>(&'a self, strings: &'a dyn Localizer) -> World<'a> {
        World::from_host(self, strings)
    }

    fn find(&self, id: EntityId) -> Option<&MockEntity> {
        self.entities.iter().find(|e| e.id == id)
    }
}

impl EntityLookup for MockWorld {
    fn name(&self, entity: EntityId) -> Option<String> {
        self.find(entity).and_then(|e| e.name.clone())
    }

    fn connection(&self, entity: EntityId) -> Option<ConnectionId> {
        self.find(entity).and_then(|e| e.connection)
    }
}

impl ProximityQuery for MockWorld {
    fn in_range<'a>(
        &'a self,
        source: EntityId,
        radius: f32,
    ) -> Box<dyn Iterator<Item = (EntityId, f32)> + 'a> {
        let Some(origin) = self.find(source).map(|e| e.position) else {
            return Box::new(std::iter::empty());
        };
        Box::new(self.entities.iter().filter_map(move |e| {
            let dx = e.position.0 - origin.0;
            let dy = e.position.1 - origin.1;
            let distance = (dx * dx + dy * dy).sqrt();
            (distance <= radius).then_some((e.id, distance))
        }))
    }
}

// ============================================================================
// Recording Transmitter
// ============================================================================

/// A transmitter that records every message.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransmitter {
    sent: Vec<(ConnectionId, OutgoingChat)>,
}

impl RecordingTransmitter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> &[(ConnectionId, OutgoingChat)] {
        &self.sent
    }

    /// Number of messages sent.
    pub fn count(&self) -> usize {
        self.sent.len()
    }

    /// Returns `true` if nothing was sent.
    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }

    /// Wrapped messages sent to `client`.
    pub fn wrapped_for(&self, client: ConnectionId) -> Vec<String> {
        self.sent
            .iter()
            .filter(|(c, _)| *c == client)
            .map(|(_, chat)| chat.wrapped_message.clone())
            .collect()
    }

    /// Connections that received at least one message, in send order.
    pub fn clients(&self) -> Vec<ConnectionId> {
        let mut clients: Vec<ConnectionId> = Vec::new();
        for (client, _) in &self.sent {
            if !clients.contains(client) {
                clients.push(*client);
            }
        }
        clients
    }

    /// Clear all recorded messages.
    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl Transmitter for RecordingTransmitter {
    fn send(&mut self, chat: &OutgoingChat, client: ConnectionId) {
        self.sent.push((client, chat.clone()));
    }
}

// ============================================================================
// Recording Listener
// ============================================================================

/// The phase a listener was invoked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// `get_recipients`.
    Discovery,
    /// `on_chat`.
    Delivery,
}

/// A shared log of listener invocations.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<(Phase, ListenerId)>>>);

impl CallLog {
    /// A copy of the recorded calls.
    pub fn calls(&self) -> Vec<(Phase, ListenerId)> {
        self.lock().clone()
    }

    /// Listener ids recorded for `phase`, in call order.
    pub fn phase(&self, phase: Phase) -> Vec<ListenerId> {
        self.lock()
            .iter()
            .filter(|(p, _)| *p == phase)
            .map(|(_, id)| *id)
            .collect()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn push(&self, phase: Phase, id: ListenerId) {
        self.lock().push((phase, id));
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(Phase, ListenerId)>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A listener that records its invocations into a [`CallLog`].
///
/// By default it only observes. [`RecordingListener::delivering`] makes it
/// mark envelopes it owns as handled during delivery.
///
/// # Example
///
/// ```rust,ignore
/// let log = CallLog::default();
/// let pipeline = PipelineBuilder::new()
///     .register(RecordingListener::new(B, &log))
///     .register(RecordingListener::new(A, &log).before(B))
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct RecordingListener {
    id: ListenerId,
    before: Vec<ListenerId>,
    after: Vec<ListenerId>,
    delivers: bool,
    recipients: Vec<EntityId>,
    log: CallLog,
}

impl RecordingListener {
    /// Create an observing listener.
    pub fn new(id: ListenerId, log: &CallLog) -> Self {
        Self {
            id,
            before: Vec::new(),
            after: Vec::new(),
            delivers: false,
            recipients: Vec::new(),
            log: log.clone(),
        }
    }

    /// Declare that this listener runs before `other`.
    pub fn before(mut self, other: ListenerId) -> Self {
        self.before.push(other);
        self
    }

    /// Declare that this listener runs after `other`.
    pub fn after(mut self, other: ListenerId) -> Self {
        self.after.push(other);
        self
    }

    /// Mark owned envelopes handled during delivery.
    pub fn delivering(mut self) -> Self {
        self.delivers = true;
        self
    }

    /// Add `entity` as a recipient of every envelope during discovery.
    pub fn adding(mut self, entity: EntityId) -> Self {
        self.recipients.push(entity);
        self
    }
}

impl ChatListener for RecordingListener {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn before(&self) -> &[ListenerId] {
        &self.before
    }

    fn after(&self) -> &[ListenerId] {
        &self.after
    }

    fn get_recipients(&mut self, chat: &mut ChatEnvelope, _world: &World<'_>) {
        self.log.push(Phase::Discovery, self.id);
        for entity in &self.recipients {
            if let Err(err) = chat.add_recipient(*entity, Default::default()) {
                tracing::warn!(listener = %self.id, %entity, %err, "could not add recipient");
            }
        }
    }

    fn on_chat(&mut self, chat: &mut ChatEnvelope, _world: &World<'_>, _out: &mut dyn Transmitter) {
        self.log.push(Phase::Delivery, self.id);
        if self.delivers && self.owns(chat) {
            chat.mark_handled(self.id);
        }
    }
}
