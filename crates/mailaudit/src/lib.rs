//! # mailaudit
//!
//! Client for the Google Apps Email Audit API `mail/monitor` feed.
//!
//! ## Features
//!
//! - **Create/update** monitors that mirror an account's mail to another
//!   account
//! - **List** the monitors configured for a source account
//! - **Disable** a monitor
//! - **Pluggable transport**: `reqwest` by default, any [`Transport`]
//!   implementation otherwise
//!
//! Authentication is left to the HTTP client: build it with credentials for
//! the [`AUDIT_SCOPE`] scope, or attach a bearer token to the transport.
//!
//! ## Quick Start
//!
//! ```ignore
//! use chrono::{TimeZone, Utc};
//! use mailaudit::{HttpTransport, MonitorLevel, MonitorLevels, MonitorRecord, Service};
//!
//! #[tokio::main]
//! async fn main() -> mailaudit::Result<()> {
//!     let transport = HttpTransport::default().with_bearer_token(access_token);
//!     let service = Service::new(transport);
//!
//!     let end = Utc.with_ymd_and_hms(2016, 10, 30, 14, 59, 0).unwrap();
//!     let monitor = MonitorRecord::new(
//!         "example.com",
//!         "abhishek",
//!         "namrata",
//!         Some(end),
//!         MonitorLevels::uniform(&MonitorLevel::HeaderOnly),
//!     );
//!     let stored = service.mail_monitor().update(&monitor).await?;
//!
//!     for monitor in service.mail_monitor().list("example.com", "abhishek").await? {
//!         println!("{} until {:?}", monitor.destination_account, monitor.end);
//!     }
//!
//!     service
//!         .mail_monitor()
//!         .disable("example.com", "abhishek", &stored.destination_account)
//!         .await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod service;
pub mod transport;

pub use config::{ATOM_CONTENT_TYPE, Config, ConfigBuilder, LIBRARY_USER_AGENT};
pub use error::{BoxError, Error, Result};
pub use service::{MailMonitorService, Service};
pub use transport::{HttpTransport, Method, Request, Response, Transport};

pub use mailaudit_feed as feed;
pub use mailaudit_feed::{Channel, MonitorLevel, MonitorLevels, MonitorRecord};

/// `OAuth2` scope required by the Email Audit API.
pub const AUDIT_SCOPE: &str = "https://apps-apis.google.com/a/feeds/compliance/audit/";
