//! # palaver-std
//!
//! Standard implementations for the Palaver chat dispatch pipeline.
//!
//! This crate provides:
//! - **Ordering**: [`resolve_order`] over before/after declarations
//! - **Execution**: [`PipelineBuilder`], [`ChatPipeline`]
//! - **Standard listeners**: Emote, Say, Whisper, Logging
//! - **Strings**: [`BuiltinStrings`]
//! - **Configuration**: [`ChatConfig`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use palaver_core;

// Modules
pub mod config;
pub mod listeners;
pub mod ordering;
pub mod pipeline;
pub mod strings;
pub mod testing;

pub use config::{ChatConfig, ConfigError};
pub use ordering::{ListenerDescriptor, resolve_ids, resolve_order};
pub use pipeline::{ChatPipeline, DispatchReport, PipelineBuilder};
pub use strings::BuiltinStrings;
