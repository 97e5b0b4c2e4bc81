//! Property-bag mapping between records and `apps:property` pairs.
//!
//! Writing goes through [`write_properties`], which decides which pairs a
//! record produces and in what order. Reading goes through
//! [`PropertyName::apply`], a fixed mapping from a known name to the record
//! field it populates. Conversion of dates and levels to and from their wire
//! strings lives in [`crate::date`] and [`crate::level`].

use crate::date::{format_date, parse_date};
use crate::error::{Error, Result};
use crate::level::{Channel, MonitorLevel};
use crate::record::MonitorRecord;

/// A single `name`/`value` pair of the property bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name as it appears on the wire.
    pub name: String,
    /// Property value as it appears on the wire.
    pub value: String,
}

impl Property {
    /// Creates a property.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Property names understood by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyName {
    /// `destUserName`
    DestUserName,
    /// `beginDate`
    BeginDate,
    /// `endDate`
    EndDate,
    /// `incomingEmailMonitorLevel`
    IncomingEmailMonitorLevel,
    /// `outgoingEmailMonitorLevel`
    OutgoingEmailMonitorLevel,
    /// `draftMonitorLevel`
    DraftMonitorLevel,
    /// `chatMonitorLevel`
    ChatMonitorLevel,
}

impl PropertyName {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DestUserName => "destUserName",
            Self::BeginDate => "beginDate",
            Self::EndDate => "endDate",
            Self::IncomingEmailMonitorLevel => "incomingEmailMonitorLevel",
            Self::OutgoingEmailMonitorLevel => "outgoingEmailMonitorLevel",
            Self::DraftMonitorLevel => "draftMonitorLevel",
            Self::ChatMonitorLevel => "chatMonitorLevel",
        }
    }

    /// Looks up a wire name. Unknown names (e.g. `requestId`) yield `None`.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Some(match name {
            "destUserName" => Self::DestUserName,
            "beginDate" => Self::BeginDate,
            "endDate" => Self::EndDate,
            "incomingEmailMonitorLevel" => Self::IncomingEmailMonitorLevel,
            "outgoingEmailMonitorLevel" => Self::OutgoingEmailMonitorLevel,
            "draftMonitorLevel" => Self::DraftMonitorLevel,
            "chatMonitorLevel" => Self::ChatMonitorLevel,
            _ => return None,
        })
    }

    /// Property carrying the level of `channel`.
    #[must_use]
    pub const fn for_channel(channel: Channel) -> Self {
        match channel {
            Channel::Incoming => Self::IncomingEmailMonitorLevel,
            Channel::Outgoing => Self::OutgoingEmailMonitorLevel,
            Channel::Draft => Self::DraftMonitorLevel,
            Channel::Chat => Self::ChatMonitorLevel,
        }
    }

    /// Stores a wire value into the field this property maps to.
    ///
    /// A date that does not parse leaves its field `None`; the rest of the
    /// record is unaffected.
    pub fn apply(self, record: &mut MonitorRecord, value: &str) {
        match self {
            Self::DestUserName => record.destination_account = value.to_string(),
            Self::BeginDate => record.begin = parse_date(value),
            Self::EndDate => record.end = parse_date(value),
            Self::IncomingEmailMonitorLevel => record.levels.incoming = MonitorLevel::from(value),
            Self::OutgoingEmailMonitorLevel => record.levels.outgoing = MonitorLevel::from(value),
            Self::DraftMonitorLevel => record.levels.draft = MonitorLevel::from(value),
            Self::ChatMonitorLevel => record.levels.chat = MonitorLevel::from(value),
        }
    }
}

/// Builds the ordered property list written for `record`.
///
/// `destUserName` and `endDate` always come first, then each set channel
/// level (incoming, outgoing, draft, chat), then `beginDate` if present.
///
/// # Errors
///
/// Returns [`Error::MissingEndDate`] if the record has no end date.
pub fn write_properties(record: &MonitorRecord) -> Result<Vec<Property>> {
    let end = record.end.ok_or_else(|| Error::MissingEndDate {
        destination: record.destination_account.clone(),
    })?;

    let mut properties = vec![
        Property::new(
            PropertyName::DestUserName.as_str(),
            &record.destination_account,
        ),
        Property::new(PropertyName::EndDate.as_str(), format_date(&end)),
    ];

    for channel in Channel::ALL {
        if let Some(level) = record.levels.get(channel).as_wire() {
            properties.push(Property::new(
                PropertyName::for_channel(channel).as_str(),
                level,
            ));
        }
    }

    if let Some(begin) = &record.begin {
        properties.push(Property::new(
            PropertyName::BeginDate.as_str(),
            format_date(begin),
        ));
    }

    Ok(properties)
}

/// Populates a record from properties read off the wire.
pub fn read_properties<'a>(
    record: &mut MonitorRecord,
    properties: impl IntoIterator<Item = &'a Property>,
) {
    for property in properties {
        if let Some(name) = PropertyName::from_wire(&property.name) {
            name.apply(record, &property.value);
        }
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
    use crate::level::MonitorLevels;
    use chrono::{TimeZone, Utc};

    fn names(properties: &[Property]) -> Vec<&str> {
        properties.iter().map(|p| p.name.as_str()).collect()
    }

    fn record(levels: MonitorLevels) -> MonitorRecord {
        let end = Utc.with_ymd_and_hms(2016, 10, 30, 14, 59, 0).unwrap();
        MonitorRecord::new("example.com", "src", "dest", Some(end), levels)
    }

    #[test]
    fn test_name_round_trip() {
        for channel in Channel::ALL {
            let name = PropertyName::for_channel(channel);
            assert_eq!(PropertyName::from_wire(name.as_str()), Some(name));
        }
        assert_eq!(
            PropertyName::from_wire("destUserName"),
            Some(PropertyName::DestUserName)
        );
        assert_eq!(PropertyName::from_wire("requestId"), None);
        assert_eq!(PropertyName::from_wire("DESTUSERNAME"), None);
    }

    #[test]
    fn test_write_minimal() {
        let properties = write_properties(&record(MonitorLevels::new())).unwrap();
        assert_eq!(
            properties,
            vec![
                Property::new("destUserName", "dest"),
                Property::new("endDate", "2016-10-30 14:59"),
            ]
        );
    }

    #[test]
    fn test_write_skips_unset_levels() {
        let levels = MonitorLevels {
            incoming: MonitorLevel::Unset,
            outgoing: MonitorLevel::HeaderOnly,
            draft: MonitorLevel::FullMessage,
            chat: MonitorLevel::HeaderOnly,
        };
        let properties = write_properties(&record(levels)).unwrap();
        assert_eq!(
            names(&properties),
            vec![
                "destUserName",
                "endDate",
                "outgoingEmailMonitorLevel",
                "draftMonitorLevel",
                "chatMonitorLevel",
            ]
        );
        assert!(properties.iter().all(|p| !p.value.is_empty()));
    }

    #[test]
    fn test_write_begin_last() {
        let begin = Utc.with_ymd_and_hms(2016, 8, 31, 15, 0, 0).unwrap();
        let record = record(MonitorLevels::uniform(&MonitorLevel::FullMessage)).with_begin(begin);
        let properties = write_properties(&record).unwrap();
        assert_eq!(properties.len(), 7);
        assert_eq!(
            properties.last(),
            Some(&Property::new("beginDate", "2016-08-31 15:00"))
        );
    }

    #[test]
    fn test_write_empty_destination_still_emitted() {
        let mut record = record(MonitorLevels::new());
        record.destination_account = String::new();
        let properties = write_properties(&record).unwrap();
        assert_eq!(properties[0], Property::new("destUserName", ""));
    }

    #[test]
    fn test_write_requires_end_date() {
        let mut record = record(MonitorLevels::new());
        record.end = None;
        let err = write_properties(&record).unwrap_err();
        assert!(matches!(err, Error::MissingEndDate { ref destination } if destination == "dest"));
    }

    #[test]
    fn test_read_properties() {
        let properties = vec![
            Property::new("requestId", "53156"),
            Property::new("destUserName", "namrata"),
            Property::new("beginDate", "2009-06-15 00:00"),
            Property::new("endDate", "2009-06-30 23:20"),
            Property::new("incomingEmailMonitorLevel", "FULL_MESSAGE"),
            Property::new("chatMonitorLevel", "HEADER_ONLY"),
        ];
        let mut record = MonitorRecord::default();
        read_properties(&mut record, &properties);

        assert_eq!(record.destination_account, "namrata");
        assert_eq!(
            record.begin,
            Some(Utc.with_ymd_and_hms(2009, 6, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(
            record.end,
            Some(Utc.with_ymd_and_hms(2009, 6, 30, 23, 20, 0).unwrap())
        );
        assert_eq!(record.levels.incoming, MonitorLevel::FullMessage);
        assert!(record.levels.outgoing.is_unset());
        assert!(record.levels.draft.is_unset());
        assert_eq!(record.levels.chat, MonitorLevel::HeaderOnly);
    }

    #[test]
    fn test_read_bad_date_leaves_field_empty() {
        let properties = vec![
            Property::new("destUserName", "namrata"),
            Property::new("beginDate", "not a date"),
            Property::new("endDate", "2009-06-30 23:20"),
        ];
        let mut record = MonitorRecord::default();
        read_properties(&mut record, &properties);

        assert!(record.begin.is_none());
        assert!(record.end.is_some());
        assert_eq!(record.destination_account, "namrata");
    }
}
