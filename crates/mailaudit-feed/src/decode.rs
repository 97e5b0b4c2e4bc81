//! Deserialization of `entry` and `feed` response documents.
//!
//! Only the root element is checked strictly: it must carry the expected
//! local name in the Atom namespace. Inside an entry, the `id`, `updated`
//! and `property` children are picked up whatever their namespace; links,
//! unknown elements and unknown property names are skipped.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::date::parse_updated;
use crate::error::{Error, Result};
use crate::property::{Property, read_properties};
use crate::record::{MonitorRecord, split_identifier};
use crate::ATOM_NS;

const ENTRY: &str = "entry";
const FEED: &str = "feed";

/// Decodes a single-entry response document.
///
/// # Errors
///
/// Returns [`Error::MalformedDocument`] if the root element is not `entry`,
/// [`Error::UnexpectedNamespace`] if it is not in the Atom namespace, and an
/// XML error if the document is not well formed. Values that fail to parse
/// (dates, the identifier) never cause an error; the affected fields are
/// left empty.
pub fn decode_one(data: &[u8]) -> Result<MonitorRecord> {
    let mut reader = reader(data);
    let mut buf = Vec::new();

    let fields = if read_root(&mut reader, &mut buf, ENTRY)? {
        EntryFields::default()
    } else {
        read_entry(&mut reader, &mut buf)?
    };
    Ok(fields.into_record())
}

/// Decodes a feed response document into its entries, in document order.
///
/// A feed without entries decodes to an empty vector.
///
/// # Errors
///
/// Same as [`decode_one`], with `feed` as the expected root element.
pub fn decode_many(data: &[u8]) -> Result<Vec<MonitorRecord>> {
    let mut reader = reader(data);
    let mut buf = Vec::new();
    let mut records = Vec::new();

    if read_root(&mut reader, &mut buf, FEED)? {
        return Ok(records);
    }

    let mut entry_buf = Vec::new();
    let mut depth = 0usize;
    loop {
        buf.clear();
        let (ns, event) = reader.read_resolved_event_into(&mut buf)?;
        let in_atom = is_atom(&ns);
        match event {
            Event::Start(start) => {
                if depth == 0 && in_atom && start.local_name().as_ref() == ENTRY.as_bytes() {
                    entry_buf.clear();
                    records.push(read_entry(&mut reader, &mut entry_buf)?.into_record());
                } else {
                    depth += 1;
                }
            }
            Event::Empty(start) => {
                if depth == 0 && in_atom && start.local_name().as_ref() == ENTRY.as_bytes() {
                    records.push(EntryFields::default().into_record());
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Ok(records);
                }
                depth -= 1;
            }
            Event::Eof => return Err(Error::UnexpectedEof { element: FEED }),
            _ => {}
        }
    }
}

fn reader(data: &[u8]) -> NsReader<&[u8]> {
    let mut reader = NsReader::from_reader(data);
    reader.config_mut().trim_text(true);
    reader
}

fn is_atom(ns: &ResolveResult<'_>) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == ATOM_NS.as_bytes())
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Advances to the root element and checks it. Returns true if the root is
/// an empty element (`<entry/>`), i.e. it has no content to read.
fn read_root<R: BufRead>(
    reader: &mut NsReader<R>,
    buf: &mut Vec<u8>,
    expected: &'static str,
) -> Result<bool> {
    loop {
        buf.clear();
        let (ns, event) = reader.read_resolved_event_into(buf)?;
        let (start, empty) = match event {
            Event::Start(start) => (start, false),
            Event::Empty(start) => (start, true),
            Event::Eof => return Err(Error::EmptyDocument { expected }),
            _ => continue,
        };

        let found = start.local_name();
        if found.as_ref() != expected.as_bytes() {
            return Err(Error::MalformedDocument {
                expected,
                found: lossy(found.as_ref()),
            });
        }

        let namespace = match ns {
            ResolveResult::Bound(Namespace(uri)) if uri == ATOM_NS.as_bytes() => return Ok(empty),
            ResolveResult::Bound(Namespace(uri)) => Some(lossy(uri)),
            ResolveResult::Unknown(prefix) => Some(lossy(&prefix)),
            ResolveResult::Unbound => None,
        };
        return Err(Error::UnexpectedNamespace {
            element: expected,
            expected: ATOM_NS,
            found: namespace,
        });
    }
}

/// Raw values collected from one entry before they are interpreted.
#[derive(Debug, Default)]
struct EntryFields {
    id: String,
    updated: String,
    properties: Vec<Property>,
}

#[derive(Debug, Clone, Copy)]
enum TextField {
    Id,
    Updated,
}

impl EntryFields {
    fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Id => &mut self.id,
            TextField::Updated => &mut self.updated,
        }
    }

    fn into_record(self) -> MonitorRecord {
        let mut record = MonitorRecord::default();
        read_properties(&mut record, &self.properties);
        if let Some((domain, source_account)) = split_identifier(&self.id) {
            record.domain = domain;
            record.source_account = source_account;
        }
        record.last_updated = parse_updated(&self.updated);
        record
    }
}

/// Reads the content of an `entry` whose start tag was just consumed, up to
/// and including its end tag.
fn read_entry<R: BufRead>(reader: &mut NsReader<R>, buf: &mut Vec<u8>) -> Result<EntryFields> {
    let mut fields = EntryFields::default();
    let mut depth = 0usize;
    let mut target: Option<TextField> = None;

    loop {
        buf.clear();
        match reader.read_event_into(buf)? {
            Event::Start(start) => {
                if depth == 0 {
                    target = match start.local_name().as_ref() {
                        b"id" => Some(TextField::Id),
                        b"updated" => Some(TextField::Updated),
                        b"property" => {
                            fields.properties.push(read_property(&start)?);
                            None
                        }
                        _ => None,
                    };
                }
                depth += 1;
            }
            Event::Empty(start) => {
                if depth == 0 && start.local_name().as_ref() == b"property" {
                    fields.properties.push(read_property(&start)?);
                }
            }
            Event::Text(text) => {
                if let (1, Some(field)) = (depth, target) {
                    fields.text_mut(field).push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let (1, Some(field)) = (depth, target) {
                    fields.text_mut(field).push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Ok(fields);
                }
                depth -= 1;
                if depth == 0 {
                    target = None;
                }
            }
            Event::Eof => return Err(Error::UnexpectedEof { element: ENTRY }),
            _ => {}
        }
    }
}

fn read_property(start: &BytesStart<'_>) -> Result<Property> {
    let mut property = Property::new(String::new(), String::new());
    for attr in start.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"name" => property.name = attr.unescape_value()?.into_owned(),
            b"value" => property.value = attr.unescape_value()?.into_owned(),
            _ => {}
        }
    }
    Ok(property)
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
    use crate::record::BASE_URL;
    use chrono::{TimeZone, Utc};

    const MONITOR_XML: &str = r#"<entry xmlns='http://www.w3.org/2005/Atom' xmlns:apps='http://schemas.google.com/apps/2006'>
  <id>https://apps-apis.google.com/a/feeds/compliance/audit/mail/monitor/example.com/abhishek/namrata</id>
  <updated>2009-08-20T00:28:57.319Z</updated>
  <link rel='self' type='application/atom+xml' href="https://apps-apis.google.com/a/feeds/compliance/audit/mail/monitor/example.com/abhishek/namrata" />
  <link rel='edit' type='application/atom+xml' href="https://apps-apis.google.com/a/feeds/compliance/audit/mail/monitor/example.com/abhishek/namrata" />
  <apps:property name="destUserName" value="namrata"></apps:property>
  <apps:property name="endDate" value="2016-10-30 14:59"></apps:property>
  <apps:property name="incomingEmailMonitorLevel" value="FULL_MESSAGE"></apps:property>
  <apps:property name="outgoingEmailMonitorLevel" value="FULL_MESSAGE"></apps:property>
  <apps:property name="draftMonitorLevel" value="FULL_MESSAGE"></apps:property>
  <apps:property name="chatMonitorLevel" value="FULL_MESSAGE"></apps:property>
  <apps:property name="beginDate" value="2016-08-31 15:00"></apps:property>
</entry>"#;

    fn entry(id: &str, properties: &str) -> String {
        format!(
            "<entry xmlns='http://www.w3.org/2005/Atom' xmlns:apps='http://schemas.google.com/apps/2006'>\
             <id>{id}</id><updated>2009-08-20T00:28:57.319Z</updated>{properties}</entry>"
        )
    }

    #[test]
    fn test_decode_one() {
        let record = decode_one(MONITOR_XML.as_bytes()).unwrap();

        assert_eq!(record.domain, "example.com");
        assert_eq!(record.source_account, "abhishek");
        assert_eq!(record.destination_account, "namrata");
        assert_eq!(record.levels.incoming, MonitorLevel::FullMessage);
        assert_eq!(record.levels.outgoing, MonitorLevel::FullMessage);
        assert_eq!(record.levels.draft, MonitorLevel::FullMessage);
        assert_eq!(record.levels.chat, MonitorLevel::FullMessage);
        assert_eq!(
            record.end,
            Some(Utc.with_ymd_and_hms(2016, 10, 30, 14, 59, 0).unwrap())
        );
        assert_eq!(
            record.begin,
            Some(Utc.with_ymd_and_hms(2016, 8, 31, 15, 0, 0).unwrap())
        );
        assert_eq!(
            record.last_updated,
            Some(
                Utc.with_ymd_and_hms(2009, 8, 20, 0, 28, 57).unwrap()
                    + chrono::Duration::milliseconds(319)
            )
        );
    }

    #[test]
    fn test_decode_one_wrong_root() {
        let err = decode_one(b"<foo />").unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(err.to_string(), "expected element type <entry> but have <foo>");
    }

    #[test]
    fn test_decode_one_feed_is_not_an_entry() {
        let err = decode_one(b"<feed xmlns='http://www.w3.org/2005/Atom'/>").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedDocument { expected: "entry", ref found } if found == "feed"
        ));
    }

    #[test]
    fn test_decode_one_without_namespace() {
        let err = decode_one(b"<entry><id>x</id></entry>").unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedNamespace { element: "entry", found: None, .. }
        ));
        assert!(err.is_malformed());
    }

    #[test]
    fn test_decode_one_foreign_namespace() {
        let err = decode_one(b"<entry xmlns='urn:other'/>").unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedNamespace { ref found, .. } if found.as_deref() == Some("urn:other")
        ));
    }

    #[test]
    fn test_decode_one_empty_input() {
        let err = decode_one(b"").unwrap_err();
        assert!(matches!(err, Error::EmptyDocument { expected: "entry" }));
    }

    #[test]
    fn test_decode_one_truncated() {
        let err = decode_one(b"<entry xmlns='http://www.w3.org/2005/Atom'><id>x</id>").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_decode_one_with_prolog() {
        let xml = format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{MONITOR_XML}");
        let record = decode_one(xml.as_bytes()).unwrap();
        assert_eq!(record.destination_account, "namrata");
    }

    #[test]
    fn test_decode_one_unknown_property_ignored() {
        let id = format!("{BASE_URL}/example.com/abhishek/namrata");
        let xml = entry(
            &id,
            r#"<apps:property name="requestId" value="53156"/>
               <apps:property name="destUserName" value="namrata"/>
               <apps:property name="somethingNew" value="FULL_MESSAGE"/>"#,
        );
        let record = decode_one(xml.as_bytes()).unwrap();
        assert_eq!(record.destination_account, "namrata");
        assert_eq!(record.domain, "example.com");
        assert!(record.levels.incoming.is_unset());
        assert!(record.end.is_none());
    }

    #[test]
    fn test_decode_one_foreign_identifier() {
        let xml = entry(
            "https://example.com/other/feed/example.com/abhishek",
            r#"<apps:property name="destUserName" value="namrata"/>"#,
        );
        let record = decode_one(xml.as_bytes()).unwrap();
        assert_eq!(record.domain, "");
        assert_eq!(record.source_account, "");
        assert_eq!(record.destination_account, "namrata");
    }

    #[test]
    fn test_decode_one_bad_dates_tolerated() {
        let id = format!("{BASE_URL}/example.com/abhishek/namrata");
        let xml = entry(
            &id,
            r#"<apps:property name="beginDate" value="31/08/2016"/>
               <apps:property name="endDate" value="2016-10-30 14:59"/>
               <apps:property name="chatMonitorLevel" value="HEADER_ONLY"/>"#,
        );
        let record = decode_one(xml.as_bytes()).unwrap();
        assert!(record.begin.is_none());
        assert!(record.end.is_some());
        assert_eq!(record.levels.chat, MonitorLevel::HeaderOnly);
    }

    #[test]
    fn test_decode_one_missing_updated() {
        let xml = "<entry xmlns='http://www.w3.org/2005/Atom' xmlns:apps='http://schemas.google.com/apps/2006'>\
                   <apps:property name='destUserName' value='joe'/></entry>";
        let record = decode_one(xml.as_bytes()).unwrap();
        assert!(record.last_updated.is_none());
        assert_eq!(record.destination_account, "joe");
    }

    #[test]
    fn test_decode_one_escaped_values() {
        let id = format!("{BASE_URL}/example.com/abhishek/namrata");
        let xml = entry(&id, r#"<apps:property name="destUserName" value="a&amp;b"/>"#);
        let record = decode_one(xml.as_bytes()).unwrap();
        assert_eq!(record.destination_account, "a&b");
    }

    #[test]
    fn test_decode_one_empty_entry() {
        let record = decode_one(b"<entry xmlns='http://www.w3.org/2005/Atom'/>").unwrap();
        assert_eq!(record, MonitorRecord::default());
    }

    #[test]
    fn test_decode_many_wrong_root() {
        let err = decode_many(b"<foo />").unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(err.to_string(), "expected element type <feed> but have <foo>");
    }

    #[test]
    fn test_decode_many_empty_feed() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <id>https://apps-apis.google.com/a/feeds/compliance/audit/mail/monitor/example.com/abhishek</id>
  <updated>2016-10-26T03:03:03.192Z</updated>
</feed>"#;
        assert!(decode_many(xml.as_bytes()).unwrap().is_empty());
        assert!(
            decode_many(b"<feed xmlns='http://www.w3.org/2005/Atom'/>")
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_decode_many_skips_foreign_entries() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:x="urn:x">
  <x:entry><id>ignored</id></x:entry>
  <entry><apps:property xmlns:apps="http://schemas.google.com/apps/2006" name="destUserName" value="joe"/></entry>
</feed>"#;
        let records = decode_many(xml.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].destination_account, "joe");
    }
}
