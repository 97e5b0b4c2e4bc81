//! Monitoring levels per mail channel.

use std::fmt;

/// How much of a channel's traffic is mirrored to the destination account.
///
/// `Unset` is not a monitoring mode: it means the channel's level is left
/// out of the written document entirely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum MonitorLevel {
    /// Not transmitted.
    #[default]
    Unset,
    /// Only message headers are mirrored (`HEADER_ONLY`).
    HeaderOnly,
    /// Complete messages are mirrored (`FULL_MESSAGE`).
    FullMessage,
    /// A level string this crate does not know, kept verbatim.
    Unrecognized(String),
}

impl MonitorLevel {
    /// Wire value for [`MonitorLevel::HeaderOnly`].
    pub const HEADER_ONLY: &'static str = "HEADER_ONLY";
    /// Wire value for [`MonitorLevel::FullMessage`].
    pub const FULL_MESSAGE: &'static str = "FULL_MESSAGE";

    /// Maps a wire string to a level. An empty string is `Unset`.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            "" => Self::Unset,
            Self::HEADER_ONLY => Self::HeaderOnly,
            Self::FULL_MESSAGE => Self::FullMessage,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Returns the wire string, or `None` when the level must not be sent.
    ///
    /// An empty [`MonitorLevel::Unrecognized`] value is never sent.
    #[must_use]
    pub fn as_wire(&self) -> Option<&str> {
        match self {
            Self::Unset => None,
            Self::HeaderOnly => Some(Self::HEADER_ONLY),
            Self::FullMessage => Some(Self::FULL_MESSAGE),
            Self::Unrecognized(value) if value.is_empty() => None,
            Self::Unrecognized(value) => Some(value),
        }
    }

    /// Returns true if the level is left out of written documents, i.e.
    /// [`MonitorLevel::Unset`] or an empty unrecognized value.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.as_wire().is_none()
    }
}

impl fmt::Display for MonitorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire().unwrap_or_default())
    }
}

impl From<&str> for MonitorLevel {
    fn from(value: &str) -> Self {
        Self::from_wire(value)
    }
}

impl From<String> for MonitorLevel {
    fn from(value: String) -> Self {
        Self::from_wire(&value)
    }
}

impl From<MonitorLevel> for String {
    fn from(level: MonitorLevel) -> Self {
        level.to_string()
    }
}

/// Mail channels that carry their own monitoring level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Mail received by the source account.
    Incoming,
    /// Mail sent by the source account.
    Outgoing,
    /// Drafts saved by the source account.
    Draft,
    /// Chat transcripts.
    Chat,
}

impl Channel {
    /// All channels, in the order their levels are written.
    pub const ALL: [Self; 4] = [Self::Incoming, Self::Outgoing, Self::Draft, Self::Chat];
}

/// Monitoring level for each of the four channels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorLevels {
    /// Incoming mail.
    pub incoming: MonitorLevel,
    /// Outgoing mail.
    pub outgoing: MonitorLevel,
    /// Drafts.
    pub draft: MonitorLevel,
    /// Chat.
    pub chat: MonitorLevel,
}

impl MonitorLevels {
    /// Creates levels with every channel unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates levels with every channel set to `level`.
    #[must_use]
    pub fn uniform(level: &MonitorLevel) -> Self {
        Self {
            incoming: level.clone(),
            outgoing: level.clone(),
            draft: level.clone(),
            chat: level.clone(),
        }
    }

    /// Returns the level of one channel.
    #[must_use]
    pub const fn get(&self, channel: Channel) -> &MonitorLevel {
        match channel {
            Channel::Incoming => &self.incoming,
            Channel::Outgoing => &self.outgoing,
            Channel::Draft => &self.draft,
            Channel::Chat => &self.chat,
        }
    }

    /// Sets the level of one channel.
    pub fn set(&mut self, channel: Channel, level: MonitorLevel) {
        match channel {
            Channel::Incoming => self.incoming = level,
            Channel::Outgoing => self.outgoing = level,
            Channel::Draft => self.draft = level,
            Channel::Chat => self.chat = level,
        }
    }

    /// Sets the level of one channel, builder style.
    #[must_use]
    pub fn with(mut self, channel: Channel, level: MonitorLevel) -> Self {
        self.set(channel, level);
        self
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_wire() {
        assert_eq!(MonitorLevel::from_wire(""), MonitorLevel::Unset);
        assert_eq!(
            MonitorLevel::from_wire("HEADER_ONLY"),
            MonitorLevel::HeaderOnly
        );
        assert_eq!(
            MonitorLevel::from_wire("FULL_MESSAGE"),
            MonitorLevel::FullMessage
        );
        assert_eq!(
            MonitorLevel::from_wire("full_message"),
            MonitorLevel::Unrecognized("full_message".to_string())
        );
    }

    #[test]
    fn test_unset_has_no_wire_value() {
        assert!(MonitorLevel::Unset.as_wire().is_none());
        assert!(MonitorLevel::Unset.is_unset());
        assert_eq!(MonitorLevel::Unset.to_string(), "");
    }

    #[test]
    fn test_unrecognized_kept_verbatim() {
        let level = MonitorLevel::from("SUBJECT_ONLY");
        assert_eq!(level.as_wire(), Some("SUBJECT_ONLY"));
        assert!(!level.is_unset());
    }

    #[test]
    fn test_empty_unrecognized_is_not_sent() {
        let level = MonitorLevel::Unrecognized(String::new());
        assert!(level.as_wire().is_none());
        assert!(level.is_unset());
        assert_eq!(level.to_string(), "");
    }

    #[test]
    fn test_levels_get_set() {
        let mut levels = MonitorLevels::new();
        assert!(Channel::ALL.iter().all(|c| levels.get(*c).is_unset()));

        levels.set(Channel::Draft, MonitorLevel::HeaderOnly);
        assert_eq!(levels.draft, MonitorLevel::HeaderOnly);
        assert_eq!(levels.get(Channel::Draft), &MonitorLevel::HeaderOnly);
        assert!(levels.incoming.is_unset());
    }

    #[test]
    fn test_levels_uniform() {
        let levels = MonitorLevels::uniform(&MonitorLevel::FullMessage);
        for channel in Channel::ALL {
            assert_eq!(levels.get(channel), &MonitorLevel::FullMessage);
        }
    }

    #[test]
    fn test_levels_builder() {
        let levels = MonitorLevels::uniform(&MonitorLevel::FullMessage)
            .with(Channel::Incoming, MonitorLevel::Unset);
        assert!(levels.incoming.is_unset());
        assert_eq!(levels.chat, MonitorLevel::FullMessage);
    }
}
