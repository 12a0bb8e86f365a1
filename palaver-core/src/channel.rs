//! Chat channel flags.

use bitflags::bitflags;

bitflags! {
    /// The channel a chat utterance travels on.
    ///
    /// Channels are flags so that hosts can express client-side filters as
    /// masks (e.g. `ChatChannel::IC`). An envelope always carries exactly one
    /// flag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChatChannel: u16 {
        /// Speech heard by nearby entities.
        const LOCAL = 1 << 0;
        /// Quiet speech with a short range.
        const WHISPER = 1 << 1;
        /// Server announcements.
        const SERVER = 1 << 2;
        /// Damage notices.
        const DAMAGE = 1 << 3;
        /// Radio traffic.
        const RADIO = 1 << 4;
        /// Local out-of-character chat.
        const LOOC = 1 << 5;
        /// Global out-of-character chat.
        const OOC = 1 << 6;
        /// Visual descriptions.
        const VISUAL = 1 << 7;
        /// System notifications.
        const NOTIFICATIONS = 1 << 8;
        /// Emotes ("X waves").
        const EMOTES = 1 << 9;
        /// Deadchat.
        const DEAD = 1 << 10;
        /// Admin-only messages.
        const ADMIN = 1 << 11;
        /// Admin alerts.
        const ADMIN_ALERT = 1 << 12;
        /// Admin chat.
        const ADMIN_CHAT = 1 << 13;
        /// Fallback for messages without a channel.
        const UNSPECIFIED = 1 << 14;

        /// In-character channels.
        const IC = Self::LOCAL.bits()
            | Self::WHISPER.bits()
            | Self::RADIO.bits()
            | Self::DEAD.bits()
            | Self::EMOTES.bits()
            | Self::DAMAGE.bits()
            | Self::VISUAL.bits()
            | Self::NOTIFICATIONS.bits();
    }
}

impl Default for ChatChannel {
    fn default() -> Self {
        ChatChannel::LOCAL
    }
}

impl ChatChannel {
    /// Returns `true` if exactly one channel flag is set.
    pub fn is_single(self) -> bool {
        self.bits().count_ones() == 1
    }
}
