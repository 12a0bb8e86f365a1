//! Listener registration and the two-phase executor.
//!
//! [`PipelineBuilder`] collects listeners; [`PipelineBuilder::build`] resolves
//! their ordering constraints once and freezes the result into a
//! [`ChatPipeline`]. A cycle aborts the build.
//!
//! # Example
//! ```ignore
//! let mut pipeline = PipelineBuilder::new()
//!     .register(SayListener::new(10.0))
//!     .register(EmoteListener::new(10.0))
//!     .build()?;
//!
//! let report = pipeline.dispatch(&mut chat, &world, &mut transmitter);
//! ```

use crate::ordering::{ListenerDescriptor, resolve_order};
use palaver_core::{ChatEnvelope, ChatListener, ListenerId, OrderingError, Transmitter, World};

/// Builder for a [`ChatPipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    listeners: Vec<Box<dyn ChatListener>>,
}

impl PipelineBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a listener.
    pub fn register<L: ChatListener>(mut self, listener: L) -> Self {
        self.register_mut(listener);
        self
    }

    /// Register a listener (mutable version).
    pub fn register_mut<L: ChatListener>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    /// Register an already boxed listener.
    pub fn register_boxed(mut self, listener: Box<dyn ChatListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Resolve the listener order and build the pipeline.
    pub fn build(self) -> Result<ChatPipeline, OrderingError> {
        let descriptors: Vec<ListenerDescriptor> = self
            .listeners
            .iter()
            .map(|l| ListenerDescriptor::of(&**l))
            .collect();
        let order = resolve_order(&descriptors)?;

        let mut slots: Vec<Option<Box<dyn ChatListener>>> =
            self.listeners.into_iter().map(Some).collect();
        let listeners: Vec<Box<dyn ChatListener>> = order
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();

        tracing::info!(
            order = ?listeners.iter().map(|l| l.id()).collect::<Vec<_>>(),
            "resolved chat listener order"
        );

        Ok(ChatPipeline { listeners })
    }
}

/// Outcome of dispatching one envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Recipients found during discovery.
    pub recipients: usize,
    /// Whether a listener delivered the envelope.
    pub handled: bool,
    /// The listener that delivered it.
    pub handled_by: Option<ListenerId>,
}

/// Listeners in resolved order, ready to process envelopes.
///
/// The order is fixed at build time. Envelopes are processed one at a time,
/// each to completion.
pub struct ChatPipeline {
    listeners: Vec<Box<dyn ChatListener>>,
}

impl ChatPipeline {
    /// Listener ids in execution order.
    pub fn order(&self) -> impl Iterator<Item = ListenerId> + '_ {
        self.listeners.iter().map(|l| l.id())
    }

    /// Number of listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if the pipeline has no listeners.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Run both phases for `chat`.
    pub fn dispatch(
        &mut self,
        chat: &mut ChatEnvelope,
        world: &World<'_>,
        out: &mut dyn Transmitter,
    ) -> DispatchReport {
        let span = tracing::debug_span!(
            "chat_dispatch",
            source = %chat.source(),
            channel = ?chat.channel(),
            claimed_by = ?chat.claimed_by()
        );
        let _enter = span.enter();

        self.discover(chat, world);
        let handled_by = self.deliver(chat, world, out);

        DispatchReport {
            recipients: chat.recipient_count(),
            handled: chat.is_handled(),
            handled_by,
        }
    }

    /// Discovery phase.
    ///
    /// Every listener is invoked regardless of claim state. The recipient map
    /// is sealed afterwards. An envelope that is already sealed is left alone.
    pub fn discover(&mut self, chat: &mut ChatEnvelope, world: &World<'_>) {
        if chat.is_sealed() {
            tracing::debug!("recipients already sealed, skipping discovery");
            return;
        }
        for listener in &mut self.listeners {
            tracing::trace!(listener = %listener.id(), "get_recipients");
            listener.get_recipients(chat, world);
        }
        chat.seal_recipients();
        tracing::debug!(recipients = chat.recipient_count(), "discovery finished");
    }

    /// Delivery phase.
    ///
    /// Listeners run in order until one marks the envelope handled. Running
    /// delivery on a handled envelope does nothing. Returns the listener that
    /// handled the envelope during this call.
    pub fn deliver(
        &mut self,
        chat: &mut ChatEnvelope,
        world: &World<'_>,
        out: &mut dyn Transmitter,
    ) -> Option<ListenerId> {
        chat.seal_recipients();
        if chat.is_handled() {
            tracing::debug!("envelope already handled, skipping delivery");
            return None;
        }

        for listener in &mut self.listeners {
            tracing::trace!(listener = %listener.id(), "on_chat");
            listener.on_chat(chat, world, out);
            if chat.is_handled() {
                let id = listener.id();
                tracing::debug!(listener = %id, "envelope handled");
                return Some(id);
            }
        }

        tracing::debug!("no listener handled the envelope");
        None
    }
}

impl std::fmt::Debug for ChatPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.order()).finish()
    }
}
