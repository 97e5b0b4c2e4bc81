//! Mail monitor service.

use mailaudit_feed::{MonitorRecord, decode_many, decode_one, encode, locate, locate_monitor};
use reqwest::Client;

use crate::config::{ATOM_CONTENT_TYPE, Config};
use crate::error::{Error, Result};
use crate::transport::{HttpTransport, Method, Request, Transport};

/// Entry point to the Email Audit API.
///
/// Each operation sends exactly one request and returns the first failure
/// it meets; nothing is retried.
#[derive(Debug, Clone)]
pub struct Service<T = HttpTransport> {
    transport: T,
    config: Config,
}

impl Service<HttpTransport> {
    /// Creates a service on top of an authorized `reqwest` client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self::new(HttpTransport::new(client))
    }
}

impl<T: Transport> Service<T> {
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            config: Config::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the `User-Agent` sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> String {
        self.config.user_agent_header()
    }

    /// Mail monitor operations.
    #[must_use]
    pub const fn mail_monitor(&self) -> MailMonitorService<'_, T> {
        MailMonitorService { service: self }
    }

    /// Sends one request and returns the body of a 2xx response.
    async fn execute(&self, method: Method, url: String, body: Option<Vec<u8>>) -> Result<Vec<u8>> {
        let mut request = Request::new(method, url, self.user_agent());
        if let Some(body) = body {
            request = request.with_body(ATOM_CONTENT_TYPE, body);
        }

        tracing::debug!(%method, url = %request.url, "Sending request");
        let response = self
            .transport
            .send(request)
            .await
            .map_err(Error::transport)?;
        tracing::debug!(%method, status = response.status, "Received response");

        if !response.is_success() {
            let body = String::from_utf8_lossy(&response.body).into_owned();
            tracing::warn!(%method, status = response.status, "Request rejected");
            return Err(Error::RemoteRejection {
                status: response.status,
                body,
            });
        }
        Ok(response.body)
    }
}

/// Operations on the `mail/monitor` feed.
#[derive(Debug)]
pub struct MailMonitorService<'a, T> {
    service: &'a Service<T>,
}

impl<T: Transport> MailMonitorService<'_, T> {
    /// Creates a monitor, or updates the existing one for the same source
    /// and destination accounts.
    ///
    /// Returns the monitor as stored by the service.
    ///
    /// # Errors
    ///
    /// Fails before sending anything if the record has no end date. Otherwise
    /// returns transport failures, rejected requests, and undecodable
    /// responses.
    pub async fn update(&self, monitor: &MonitorRecord) -> Result<MonitorRecord> {
        let body = encode(monitor)?;
        let response = self
            .service
            .execute(Method::Post, monitor.url(), Some(body))
            .await?;
        Ok(decode_one(&response)?)
    }

    /// Lists all monitors of a source account.
    ///
    /// # Errors
    ///
    /// Returns transport failures, rejected requests, and undecodable
    /// responses.
    pub async fn list(&self, domain: &str, source_account: &str) -> Result<Vec<MonitorRecord>> {
        let response = self
            .service
            .execute(Method::Get, locate(domain, source_account), None)
            .await?;
        Ok(decode_many(&response)?)
    }

    /// Deletes the monitor from `source_account` to `destination_account`.
    ///
    /// # Errors
    ///
    /// Returns transport failures and rejected requests.
    pub async fn disable(
        &self,
        domain: &str,
        source_account: &str,
        destination_account: &str,
    ) -> Result<()> {
        let url = locate_monitor(domain, source_account, destination_account);
        self.service.execute(Method::Delete, url, None).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::LIBRARY_USER_AGENT;
    use crate::transport::Response;
    use std::sync::Mutex;

    #[derive(Debug, thiserror::Error)]
    #[error("unreachable")]
    struct Unreachable;

    /// Answers every request with the same response and remembers the last
    /// request.
    #[derive(Debug)]
    struct FixedTransport {
        response: Response,
        last: Mutex<Option<Request>>,
    }

    impl FixedTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                response: Response::new(status, body),
                last: Mutex::new(None),
            }
        }
    }

    impl Transport for FixedTransport {
        type Error = Unreachable;

        async fn send(&self, request: Request) -> std::result::Result<Response, Unreachable> {
            *self.last.lock().unwrap() = Some(request);
            Ok(self.response.clone())
        }
    }

    #[test]
    fn test_service_user_agent() {
        let service = Service::new(FixedTransport::new(200, ""));
        assert_eq!(service.user_agent(), LIBRARY_USER_AGENT);

        let service = service.with_config(Config::builder().user_agent("foo").build());
        assert_eq!(service.user_agent(), format!("{LIBRARY_USER_AGENT} foo"));
    }

    #[test]
    fn test_from_client() {
        let service = Service::from_client(Client::new());
        assert_eq!(service.config(), &Config::default());
    }

    #[test]
    fn test_disable_sends_delete() {
        let service = Service::new(FixedTransport::new(200, ""));
        tokio_test::block_on(service.mail_monitor().disable("example.com", "abhishek", "namrata"))
            .unwrap();

        let request = service.transport().last.lock().unwrap().clone().unwrap();
        assert_eq!(request.method, Method::Delete);
        assert_eq!(
            request.url,
            locate_monitor("example.com", "abhishek", "namrata")
        );
        assert!(request.body.is_none());
        assert!(request.content_type.is_none());
    }

    #[test]
    fn test_rejection_keeps_raw_body() {
        let body = "<errors><error reason='EntityDoesNotExist'/></errors>";
        let service = Service::new(FixedTransport::new(400, body));
        let err = tokio_test::block_on(service.mail_monitor().list("example.com", "nobody"))
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), body);
    }
}
