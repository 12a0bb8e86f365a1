//! Built-in English string table.
//!
//! Templates use `{name}` placeholders. [`BuiltinStrings`] is a complete
//! [`Localizer`] for hosts without their own string tables, and a reference
//! for the keys the standard listeners use.

use palaver_core::Localizer;
use phf::phf_map;

/// Message keys used by the standard listeners.
pub mod keys {
    /// Emote wrapper: `entityName`, `message`.
    pub const EMOTE_WRAP: &str = "chat-manager-entity-me-wrap-message";
    /// Speech wrapper: `entityName`, `message`.
    pub const SAY_WRAP: &str = "chat-manager-entity-say-wrap-message";
    /// Whisper wrapper: `entityName`, `message`.
    pub const WHISPER_WRAP: &str = "chat-manager-entity-whisper-wrap-message";
    /// Whisper wrapper without a name: `message`.
    pub const WHISPER_UNKNOWN_WRAP: &str = "chat-manager-entity-whisper-unknown-wrap-message";
    /// Fallback name for a speaker without one.
    pub const UNKNOWN_SPEAKER: &str = "chat-manager-unknown-speaker";
}

static TEMPLATES: phf::Map<&'static str, &'static str> = phf_map! {
    "chat-manager-entity-me-wrap-message" => "{entityName} {message}",
    "chat-manager-entity-say-wrap-message" => "{entityName} says, \"{message}\"",
    "chat-manager-entity-whisper-wrap-message" => "{entityName} whispers, \"{message}\"",
    "chat-manager-entity-whisper-unknown-wrap-message" => "Someone whispers, \"{message}\"",
    "chat-manager-unknown-speaker" => "Someone",
};

/// The built-in string table.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinStrings;

impl BuiltinStrings {
    /// The raw template for `key`.
    pub fn template(key: &str) -> Option<&'static str> {
        TEMPLATES.get(key).copied()
    }
}

impl Localizer for BuiltinStrings {
    fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        match Self::template(key) {
            Some(template) => substitute(template, args),
            None => {
                tracing::debug!(key, "missing string");
                key.to_owned()
            }
        }
    }
}

/// Replace `{name}` placeholders with matching arguments.
///
/// Placeholders without an argument, and unterminated braces, are kept
/// verbatim. Argument values are not rescanned.
pub fn substitute(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after[..close];
        match args.iter().find(|(k, _)| *k == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emote_template() {
        let text = BuiltinStrings.format(
            keys::EMOTE_WRAP,
            &[("entityName", "Urist"), ("message", "waves")],
        );
        assert_eq!(text, "Urist waves");
    }

    #[test]
    fn test_missing_key_returns_key() {
        assert_eq!(BuiltinStrings.format("no-such-key", &[]), "no-such-key");
    }

    #[test]
    fn test_unknown_placeholder_kept() {
        assert_eq!(substitute("{a} and {b}", &[("a", "x")]), "x and {b}");
    }

    #[test]
    fn test_unterminated_brace_kept() {
        assert_eq!(substitute("hi {name", &[("name", "x")]), "hi {name");
    }

    #[test]
    fn test_values_not_rescanned() {
        assert_eq!(substitute("{a}", &[("a", "{a}")]), "{a}");
    }

    #[test]
    fn test_every_key_has_template() {
        for key in [
            keys::EMOTE_WRAP,
            keys::SAY_WRAP,
            keys::WHISPER_WRAP,
            keys::WHISPER_UNKNOWN_WRAP,
            keys::UNKNOWN_SPEAKER,
        ] {
            assert!(BuiltinStrings::template(key).is_some(), "{key}");
        }
    }
}
