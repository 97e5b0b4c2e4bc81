//! # mailaudit-feed
//!
//! Mail monitor records and their wire format for the Email Audit
//! `mail/monitor` feed.
//!
//! ## Features
//!
//! - **Record model**: [`MonitorRecord`] with typed dates and per-channel
//!   [`MonitorLevel`]s
//! - **Encoding**: write documents (`atom:entry` with `apps:property` pairs)
//! - **Decoding**: single entries and feeds, tolerant of unknown properties
//!   and malformed dates
//! - **Locators**: resource paths derived from domain and account names
//!
//! ## Quick Start
//!
//! ### Encoding a Monitor
//!
//! ```ignore
//! use chrono::{TimeZone, Utc};
//! use mailaudit_feed::{MonitorLevel, MonitorLevels, MonitorRecord, encode};
//!
//! let end = Utc.with_ymd_and_hms(2016, 10, 30, 14, 59, 0).unwrap();
//! let record = MonitorRecord::new(
//!     "example.com",
//!     "abhishek",
//!     "namrata",
//!     Some(end),
//!     MonitorLevels::uniform(&MonitorLevel::FullMessage),
//! );
//!
//! let body = encode(&record)?;
//! // POST body to record.url()
//! ```
//!
//! ### Decoding Responses
//!
//! ```ignore
//! use mailaudit_feed::{decode_many, decode_one};
//!
//! let record = decode_one(entry_bytes)?;
//! println!("{} -> {}", record.source_account, record.destination_account);
//!
//! for record in decode_many(feed_bytes)? {
//!     println!("{:?}", record.levels);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod decode;
mod encode;
mod error;
mod level;
mod record;

pub mod date;
pub mod property;

pub use decode::{decode_many, decode_one};
pub use encode::encode;
pub use error::{Error, Result};
pub use level::{Channel, MonitorLevel, MonitorLevels};
pub use record::{BASE_URL, MonitorRecord, locate, locate_monitor};

/// Atom syndication namespace.
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Google Apps property namespace.
pub const APPS_NS: &str = "http://schemas.google.com/apps/2006";
