//! Chat configuration.
//!
//! Every field has a default, so an empty document is a valid configuration:
//!
//! ```toml
//! emote_range = 10.0
//! voice_range = 10.0
//! whisper_clear_range = 2.0
//! whisper_muffled_range = 5.0
//! whisper_obfuscation_chance = 0.2
//! max_message_length = 1000
//! ```

use palaver_core::PalaverError;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a [`ChatConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document is not valid TOML or has unknown fields.
    #[error("failed to parse chat config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds an unusable value.
    #[error("invalid chat config field `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<ConfigError> for PalaverError {
    fn from(err: ConfigError) -> Self {
        PalaverError::Custom(Box::new(err))
    }
}

/// Ranges and limits for the standard listeners.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChatConfig {
    /// Emote range.
    pub emote_range: f32,
    /// Say range.
    pub voice_range: f32,
    /// Whispers are heard verbatim within this range.
    pub whisper_clear_range: f32,
    /// Whispers are heard muffled out to this range.
    pub whisper_muffled_range: f32,
    /// Per-character chance of obfuscation for muffled whispers.
    pub whisper_obfuscation_chance: f64,
    /// Longest accepted message, in characters.
    pub max_message_length: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            emote_range: 10.0,
            voice_range: 10.0,
            whisper_clear_range: 2.0,
            whisper_muffled_range: 5.0,
            whisper_obfuscation_chance: 0.2,
            max_message_length: 1000,
        }
    }
}

impl ChatConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: ChatConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("emote_range", self.emote_range),
            ("voice_range", self.voice_range),
            ("whisper_clear_range", self.whisper_clear_range),
            ("whisper_muffled_range", self.whisper_muffled_range),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a non-negative number, got {value}"),
                });
            }
        }
        if self.whisper_clear_range > self.whisper_muffled_range {
            return Err(ConfigError::Invalid {
                field: "whisper_clear_range",
                reason: format!(
                    "must not exceed whisper_muffled_range ({})",
                    self.whisper_muffled_range
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.whisper_obfuscation_chance) {
            return Err(ConfigError::Invalid {
                field: "whisper_obfuscation_chance",
                reason: format!("must be within [0, 1], got {}", self.whisper_obfuscation_chance),
            });
        }
        if self.max_message_length == 0 {
            return Err(ConfigError::Invalid {
                field: "max_message_length",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
