//! The mail monitor record and its resource locator.

use chrono::{DateTime, Utc};

use crate::level::MonitorLevels;

/// Root of the mail monitor feed. Every monitor resource lives below it.
pub const BASE_URL: &str = "https://apps-apis.google.com/a/feeds/compliance/audit/mail/monitor";

/// Returns the resource path addressing the monitors of one source account.
///
/// This is where records are written to and listed from, and the prefix of
/// every identifier the service hands back.
#[must_use]
pub fn locate(domain: &str, source_account: &str) -> String {
    format!("{BASE_URL}/{domain}/{source_account}")
}

/// Returns the resource path of a single monitor.
#[must_use]
pub fn locate_monitor(domain: &str, source_account: &str, destination_account: &str) -> String {
    format!("{BASE_URL}/{domain}/{source_account}/{destination_account}")
}

/// Splits a monitor identifier back into `(domain, source_account)`.
///
/// Identifiers outside [`BASE_URL`] yield `None`; missing segments come back
/// empty.
pub(crate) fn split_identifier(id: &str) -> Option<(String, String)> {
    let rest = id.trim().strip_prefix(BASE_URL)?.strip_prefix('/')?;
    let mut segments = rest.split('/');
    let domain = segments.next().unwrap_or_default().to_string();
    let source_account = segments.next().unwrap_or_default().to_string();
    Some((domain, source_account))
}

/// A monitor mirroring one account's mail and chat to another account.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorRecord {
    /// Administrative domain of both accounts.
    pub domain: String,
    /// Account being monitored.
    pub source_account: String,
    /// Account receiving the mirrored traffic.
    pub destination_account: String,
    /// When monitoring starts. Absent until the service has scheduled it.
    pub begin: Option<DateTime<Utc>>,
    /// When monitoring stops. Required when writing.
    pub end: Option<DateTime<Utc>>,
    /// Per-channel monitoring levels.
    pub levels: MonitorLevels,
    /// Last modification time reported by the service. Read-only.
    pub last_updated: Option<DateTime<Utc>>,
}

impl MonitorRecord {
    /// Creates a new record. Nothing is validated.
    #[must_use]
    pub fn new(
        domain: impl Into<String>,
        source_account: impl Into<String>,
        destination_account: impl Into<String>,
        end: Option<DateTime<Utc>>,
        levels: MonitorLevels,
    ) -> Self {
        Self {
            domain: domain.into(),
            source_account: source_account.into(),
            destination_account: destination_account.into(),
            begin: None,
            end,
            levels,
            last_updated: None,
        }
    }

    /// Sets the begin date.
    #[must_use]
    pub const fn with_begin(mut self, begin: DateTime<Utc>) -> Self {
        self.begin = Some(begin);
        self
    }

    /// Sets the monitoring levels.
    #[must_use]
    pub fn with_levels(mut self, levels: MonitorLevels) -> Self {
        self.levels = levels;
        self
    }

    /// Resource path for writing and listing this record's monitors.
    #[must_use]
    pub fn url(&self) -> String {
        locate(&self.domain, &self.source_account)
    }

    /// Resource path of this monitor itself.
    #[must_use]
    pub fn monitor_url(&self) -> String {
        locate_monitor(
            &self.domain,
            &self.source_account,
            &self.destination_account,
        )
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
    use crate::level::MonitorLevel;
    use chrono::TimeZone;

    #[test]
    fn test_new_leaves_read_fields_unset() {
        let end = Utc.with_ymd_and_hms(2016, 10, 30, 14, 59, 0).unwrap();
        let record = MonitorRecord::new(
            "example.com",
            "src",
            "dest",
            Some(end),
            MonitorLevels::uniform(&MonitorLevel::HeaderOnly),
        );
        assert_eq!(record.domain, "example.com");
        assert_eq!(record.source_account, "src");
        assert_eq!(record.destination_account, "dest");
        assert_eq!(record.end, Some(end));
        assert!(record.begin.is_none());
        assert!(record.last_updated.is_none());
    }

    #[test]
    fn test_builders() {
        let begin = Utc.with_ymd_and_hms(2016, 8, 31, 15, 0, 0).unwrap();
        let record = MonitorRecord::default()
            .with_begin(begin)
            .with_levels(MonitorLevels::uniform(&MonitorLevel::FullMessage));
        assert_eq!(record.begin, Some(begin));
        assert_eq!(record.levels.chat, MonitorLevel::FullMessage);
        assert!(record.end.is_none());
    }

    #[test]
    fn test_new_accepts_empty_values() {
        let record = MonitorRecord::new("", "", "", None, MonitorLevels::new());
        assert_eq!(record, MonitorRecord::default());
    }

    #[test]
    fn test_url() {
        let record = MonitorRecord {
            domain: "example.com".to_string(),
            source_account: "src".to_string(),
            ..MonitorRecord::default()
        };
        assert_eq!(
            record.url(),
            "https://apps-apis.google.com/a/feeds/compliance/audit/mail/monitor/example.com/src"
        );
        assert_eq!(record.url(), locate("example.com", "src"));
    }

    #[test]
    fn test_monitor_url() {
        assert_eq!(
            locate_monitor("example.com", "abhishek", "namrata"),
            format!("{BASE_URL}/example.com/abhishek/namrata")
        );
    }

    #[test]
    fn test_split_identifier() {
        let id = format!("{BASE_URL}/example.com/abhishek/namrata");
        assert_eq!(
            split_identifier(&id),
            Some(("example.com".to_string(), "abhishek".to_string()))
        );
    }

    #[test]
    fn test_split_identifier_short() {
        let id = format!("{BASE_URL}/example.com");
        assert_eq!(
            split_identifier(&id),
            Some(("example.com".to_string(), String::new()))
        );
    }

    #[test]
    fn test_split_identifier_foreign_prefix() {
        assert!(split_identifier("https://example.com/a/b/c").is_none());
        assert!(split_identifier("").is_none());
        assert!(split_identifier(&format!("{BASE_URL}s/example.com/a")).is_none());
    }
}
