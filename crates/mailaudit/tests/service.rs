//! Integration tests for the mail monitor service.
//!
//! These tests use a mock transport to replay recorded Email Audit
//! responses without contacting the real API.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use mailaudit::feed::locate;
use mailaudit::{
    ATOM_CONTENT_TYPE, Config, Error, LIBRARY_USER_AGENT, Method, MonitorLevel, MonitorLevels,
    MonitorRecord, Request, Response, Service, Transport,
};

const MONITOR_RESPONSE: &str = r#"<entry xmlns='http://www.w3.org/2005/Atom' xmlns:apps='http://schemas.google.com/apps/2006'>
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

const LIST_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:apps="http://schemas.google.com/apps/2006">
<id>https://apps-apis.google.com/a/feeds/compliance/audit/mail/monitor/example.com/abhishek</id>
<updated>2016-10-26T03:03:03.192Z</updated>
<entry>
    <id>https://apps-apis.google.com/a/feeds/compliance/audit/mail/monitor/example.com/abhishek/namrata</id>
    <updated>2009-04-17T15:29:21.064Z</updated>
    <apps:property name="destUserName" value="namrata"/>
    <apps:property name="endDate" value="2009-06-30 23:20"/>
</entry>
<entry>
    <id>https://apps-apis.google.com/a/feeds/compliance/audit/mail/monitor/example.com/abhishek/joe</id>
    <updated>2009-05-17T15:29:21.064Z</updated>
    <apps:property name="destUserName" value="joe"/>
    <apps:property name="endDate" value="2009-07-30 23:20"/>
</entry>
</feed>"#;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct MockError(String);

/// Mock transport that replays scripted outcomes.
#[derive(Debug, Clone, Default)]
struct MockTransport {
    /// Outcomes to return (in order).
    outcomes: Arc<Mutex<VecDeque<Result<Response, String>>>>,
    /// Captured requests sent by the service.
    sent: Arc<Mutex<Vec<Request>>>,
}

impl MockTransport {
    fn replying(status: u16, body: &str) -> Self {
        let transport = Self::default();
        transport
            .outcomes
            .lock()
            .unwrap()
            .push_back(Ok(Response::new(status, body)));
        transport
    }

    fn failing(message: &str) -> Self {
        let transport = Self::default();
        transport
            .outcomes
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        transport
    }

    fn sent(&self) -> Vec<Request> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    type Error = MockError;

    async fn send(&self, request: Request) -> Result<Response, MockError> {
        self.sent.lock().unwrap().push(request);
        let outcome = self.outcomes.lock().unwrap().pop_front();
        match outcome {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(MockError(message)),
            None => Err(MockError("no response scripted".to_string())),
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailaudit=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn monitor() -> MonitorRecord {
    let end = Utc.with_ymd_and_hms(2016, 10, 30, 14, 59, 0).unwrap();
    MonitorRecord::new(
        "example.com",
        "abhishek",
        "namrata",
        Some(end),
        MonitorLevels::uniform(&MonitorLevel::HeaderOnly),
    )
}

#[tokio::test]
async fn test_update() {
    init_tracing();
    let transport = MockTransport::replying(200, MONITOR_RESPONSE);
    let service = Service::new(transport.clone());

    let stored = service.mail_monitor().update(&monitor()).await.unwrap();
    assert_eq!(stored.domain, "example.com");
    assert_eq!(stored.source_account, "abhishek");
    assert_eq!(stored.destination_account, "namrata");
    assert_eq!(stored.levels, MonitorLevels::uniform(&MonitorLevel::FullMessage));
    assert!(stored.last_updated.is_some());

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    let request = &sent[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, locate("example.com", "abhishek"));
    assert_eq!(request.content_type, Some(ATOM_CONTENT_TYPE));
    assert_eq!(request.user_agent, LIBRARY_USER_AGENT);

    let body = String::from_utf8(request.body.clone().unwrap()).unwrap();
    assert!(body.starts_with("<atom:entry "));
    assert!(
        body.contains(r#"<apps:property name="destUserName" value="namrata"></apps:property>"#)
    );
    assert!(body.contains(
        r#"<apps:property name="incomingEmailMonitorLevel" value="HEADER_ONLY"></apps:property>"#
    ));
}

#[tokio::test]
async fn test_update_with_custom_user_agent() {
    let transport = MockTransport::replying(201, MONITOR_RESPONSE);
    let service = Service::new(transport.clone())
        .with_config(Config::builder().user_agent("foo").build());

    service.mail_monitor().update(&monitor()).await.unwrap();
    assert_eq!(
        transport.sent()[0].user_agent,
        format!("{LIBRARY_USER_AGENT} foo")
    );
}

#[tokio::test]
async fn test_update_without_end_date_sends_nothing() {
    let transport = MockTransport::replying(200, MONITOR_RESPONSE);
    let service = Service::new(transport.clone());

    let mut record = monitor();
    record.end = None;
    let err = service.mail_monitor().update(&record).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Feed(mailaudit::feed::Error::MissingEndDate { .. })
    ));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_update_transport_failure() {
    init_tracing();
    let transport = MockTransport::failing("Error!");
    let service = Service::new(transport.clone());

    let err = service.mail_monitor().update(&monitor()).await.unwrap_err();
    let source = match err {
        Error::Transport(source) => source,
        other => panic!("expected transport error, got {other:?}"),
    };
    assert_eq!(source.to_string(), "Error!");
    assert!(source.downcast_ref::<MockError>().is_some());
    assert_eq!(transport.sent().len(), 1);
}

#[tokio::test]
async fn test_update_rejected() {
    let body = "<AppsForYourDomainErrors><error errorCode=\"1301\" reason=\"EntityDoesNotExist\"/></AppsForYourDomainErrors>";
    let transport = MockTransport::replying(400, body);
    let service = Service::new(transport.clone());

    let err = service.mail_monitor().update(&monitor()).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), body);
    assert_eq!(transport.sent().len(), 1);
}

#[tokio::test]
async fn test_update_undecodable_response() {
    let transport = MockTransport::replying(200, "<foo />");
    let service = Service::new(transport);

    let err = service.mail_monitor().update(&monitor()).await.unwrap_err();
    let feed_err = match err {
        Error::Feed(feed_err) => feed_err,
        other => panic!("expected feed error, got {other:?}"),
    };
    assert!(feed_err.is_malformed());
}

#[tokio::test]
async fn test_list() {
    init_tracing();
    let transport = MockTransport::replying(200, LIST_RESPONSE);
    let service = Service::new(transport.clone());

    let monitors = service
        .mail_monitor()
        .list("example.com", "abhishek")
        .await
        .unwrap();
    let destinations: Vec<&str> = monitors
        .iter()
        .map(|m| m.destination_account.as_str())
        .collect();
    assert_eq!(destinations, vec!["namrata", "joe"]);

    let request = &transport.sent()[0];
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, locate("example.com", "abhishek"));
    assert!(request.body.is_none());
}

#[tokio::test]
async fn test_list_empty_feed() {
    let transport =
        MockTransport::replying(200, "<feed xmlns='http://www.w3.org/2005/Atom'></feed>");
    let service = Service::new(transport);

    let monitors = service
        .mail_monitor()
        .list("example.com", "abhishek")
        .await
        .unwrap();
    assert!(monitors.is_empty());
}

#[tokio::test]
async fn test_disable() {
    let transport = MockTransport::replying(200, "");
    let service = Service::new(transport.clone());

    service
        .mail_monitor()
        .disable("example.com", "abhishek", "namrata")
        .await
        .unwrap();

    let request = &transport.sent()[0];
    assert_eq!(request.method, Method::Delete);
    assert_eq!(
        request.url,
        "https://apps-apis.google.com/a/feeds/compliance/audit/mail/monitor/example.com/abhishek/namrata"
    );
}

#[tokio::test]
async fn test_disable_rejected() {
    let transport = MockTransport::replying(404, "not found");
    let service = Service::new(transport);

    let err = service
        .mail_monitor()
        .disable("example.com", "abhishek", "nobody")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::RemoteRejection { status: 404, ref body } if body == "not found"
    ));
}
