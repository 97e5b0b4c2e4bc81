//! `reqwest`-backed transport.

use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};

use super::{Method, Request, Response, Transport};

/// Transport sending requests through a `reqwest` client.
///
/// The client is expected to be set up for the caller's credentials (for
/// example with an `Authorization` default header). A bearer token can also
/// be attached per transport with [`HttpTransport::with_bearer_token`].
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
    bearer_token: Option<String>,
}

impl HttpTransport {
    /// Creates a transport around an existing client.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self {
            client,
            bearer_token: None,
        }
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Delete => Self::DELETE,
        }
    }
}

impl Transport for HttpTransport {
    type Error = reqwest::Error;

    async fn send(&self, request: Request) -> Result<Response, Self::Error> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url.as_str())
            .header(USER_AGENT, request.user_agent);

        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(content_type) = request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(Response { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_conversion() {
        assert_eq!(reqwest::Method::from(Method::Get), reqwest::Method::GET);
        assert_eq!(reqwest::Method::from(Method::Post), reqwest::Method::POST);
        assert_eq!(
            reqwest::Method::from(Method::Delete),
            reqwest::Method::DELETE
        );
    }

    #[test]
    fn test_bearer_token() {
        let transport = HttpTransport::default().with_bearer_token("test");
        assert_eq!(transport.bearer_token.as_deref(), Some("test"));
        assert!(HttpTransport::new(Client::new()).bearer_token.is_none());
    }
}
