//! Serialization of records into `atom:entry` write documents.

use std::borrow::Cow;
use std::fmt::Write as _;

use quick_xml::escape::escape;

use crate::property::{Property, write_properties};
use crate::record::MonitorRecord;
use crate::{APPS_NS, ATOM_NS, Result};

const INDENT: &str = "  ";

/// Encodes a record as the body of a create/update request.
///
/// The document has no XML declaration, is indented by two spaces and
/// writes every property as an explicit open/close pair:
///
/// ```text
/// <atom:entry xmlns:atom="http://www.w3.org/2005/Atom" xmlns:apps="http://schemas.google.com/apps/2006">
///   <apps:property name="destUserName" value="dest"></apps:property>
///   <apps:property name="endDate" value="2016-10-30 14:59"></apps:property>
/// </atom:entry>
/// ```
///
/// Domain and source account are not part of the body; they travel in the
/// request path (see [`MonitorRecord::url`]).
///
/// # Errors
///
/// Returns [`crate::Error::MissingEndDate`] if the record has no end date.
pub fn encode(record: &MonitorRecord) -> Result<Vec<u8>> {
    let properties = write_properties(record)?;
    Ok(render_entry(&properties).into_bytes())
}

fn render_entry(properties: &[Property]) -> String {
    let mut xml = format!(r#"<atom:entry xmlns:atom="{ATOM_NS}" xmlns:apps="{APPS_NS}">"#);
    for property in properties {
        // Writing to a String cannot fail.
        let _ = write!(
            xml,
            "\n{INDENT}<apps:property name=\"{}\" value=\"{}\"></apps:property>",
            escape_attribute(&property.name),
            escape_attribute(&property.value),
        );
    }
    xml.push_str("\n</atom:entry>");
    xml
}

/// Escapes an attribute value, including the whitespace a parser would
/// otherwise normalize to plain spaces.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(['\n', '\r', '\t']) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for ch in escaped.chars() {
        match ch {
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            '\t' => out.push_str("&#x9;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
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
    use crate::level::{MonitorLevel, MonitorLevels};
    use chrono::{FixedOffset, TimeZone, Utc};

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn record(levels: MonitorLevels) -> MonitorRecord {
        let end = jst().with_ymd_and_hms(2016, 10, 30, 23, 59, 59).unwrap();
        MonitorRecord::new(
            "littleapps.co.jp",
            "src",
            "dest",
            Some(end.with_timezone(&Utc)),
            levels,
        )
    }

    fn encode_str(record: &MonitorRecord) -> String {
        String::from_utf8(encode(record).unwrap()).unwrap()
    }

    #[test]
    fn test_encode_no_levels() {
        let expected = concat!(
            r#"<atom:entry xmlns:atom="http://www.w3.org/2005/Atom" xmlns:apps="http://schemas.google.com/apps/2006">"#,
            "\n",
            r#"  <apps:property name="destUserName" value="dest"></apps:property>"#,
            "\n",
            r#"  <apps:property name="endDate" value="2016-10-30 14:59"></apps:property>"#,
            "\n",
            "</atom:entry>"
        );
        assert_eq!(encode_str(&record(MonitorLevels::new())), expected);
    }

    #[test]
    fn test_encode_header_only() {
        let expected = concat!(
            r#"<atom:entry xmlns:atom="http://www.w3.org/2005/Atom" xmlns:apps="http://schemas.google.com/apps/2006">"#,
            "\n",
            r#"  <apps:property name="destUserName" value="dest"></apps:property>"#,
            "\n",
            r#"  <apps:property name="endDate" value="2016-10-30 14:59"></apps:property>"#,
            "\n",
            r#"  <apps:property name="incomingEmailMonitorLevel" value="HEADER_ONLY"></apps:property>"#,
            "\n",
            r#"  <apps:property name="outgoingEmailMonitorLevel" value="HEADER_ONLY"></apps:property>"#,
            "\n",
            r#"  <apps:property name="draftMonitorLevel" value="HEADER_ONLY"></apps:property>"#,
            "\n",
            r#"  <apps:property name="chatMonitorLevel" value="HEADER_ONLY"></apps:property>"#,
            "\n",
            "</atom:entry>"
        );
        let record = record(MonitorLevels::uniform(&MonitorLevel::HeaderOnly));
        assert_eq!(encode_str(&record), expected);
    }

    #[test]
    fn test_encode_full_message_with_begin() {
        let begin = jst().with_ymd_and_hms(2016, 9, 1, 0, 0, 0).unwrap();
        let record = record(MonitorLevels::uniform(&MonitorLevel::FullMessage))
            .with_begin(begin.with_timezone(&Utc));
        let expected = concat!(
            r#"<atom:entry xmlns:atom="http://www.w3.org/2005/Atom" xmlns:apps="http://schemas.google.com/apps/2006">"#,
            "\n",
            r#"  <apps:property name="destUserName" value="dest"></apps:property>"#,
            "\n",
            r#"  <apps:property name="endDate" value="2016-10-30 14:59"></apps:property>"#,
            "\n",
            r#"  <apps:property name="incomingEmailMonitorLevel" value="FULL_MESSAGE"></apps:property>"#,
            "\n",
            r#"  <apps:property name="outgoingEmailMonitorLevel" value="FULL_MESSAGE"></apps:property>"#,
            "\n",
            r#"  <apps:property name="draftMonitorLevel" value="FULL_MESSAGE"></apps:property>"#,
            "\n",
            r#"  <apps:property name="chatMonitorLevel" value="FULL_MESSAGE"></apps:property>"#,
            "\n",
            r#"  <apps:property name="beginDate" value="2016-08-31 15:00"></apps:property>"#,
            "\n",
            "</atom:entry>"
        );
        assert_eq!(encode_str(&record), expected);
    }

    #[test]
    fn test_encode_escapes_values() {
        let mut record = record(MonitorLevels::new());
        record.destination_account = r#"a&b<"c">"#.to_string();
        let xml = encode_str(&record);
        assert!(xml.contains(r#"value="a&amp;b&lt;&quot;c&quot;&gt;""#));
    }

    #[test]
    fn test_encode_escapes_whitespace_in_values() {
        let mut record = record(MonitorLevels::new());
        record.destination_account = "line\nbreak\r\ttab".to_string();
        let xml = encode_str(&record);
        assert!(xml.contains(r#"value="line&#xA;break&#xD;&#x9;tab""#));

        let decoded = crate::decode_one(xml.as_bytes()).unwrap();
        assert_eq!(decoded.destination_account, "line\nbreak\r\ttab");
    }

    #[test]
    fn test_encode_skips_empty_unrecognized_level() {
        let levels = MonitorLevels {
            incoming: MonitorLevel::Unrecognized(String::new()),
            ..MonitorLevels::default()
        };
        let xml = encode_str(&record(levels));
        assert!(!xml.contains("incomingEmailMonitorLevel"));
        assert!(!xml.contains(r#"value="""#));
    }

    #[test]
    fn test_encode_has_no_prolog_or_self_closing_tags() {
        let xml = encode_str(&record(MonitorLevels::uniform(&MonitorLevel::FullMessage)));
        assert!(!xml.starts_with("<?xml"));
        assert!(!xml.contains("/>"));
        assert!(!xml.ends_with('\n'));
    }

    #[test]
    fn test_encode_without_end_date_fails() {
        let mut record = record(MonitorLevels::new());
        record.end = None;
        assert!(matches!(
            encode(&record),
            Err(crate::Error::MissingEndDate { .. })
        ));
    }
}
