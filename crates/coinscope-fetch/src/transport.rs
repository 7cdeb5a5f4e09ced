//! HTTP transport for API requests.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Overall request timeout. `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
    /// Connection timeout (separate from request timeout).
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("coinscope/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// A fully routed GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute address.
    pub url: String,
    /// Query parameters, in attachment order.
    pub query: Vec<(String, String)>,
    /// Extra headers.
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Returns the first value of the named query parameter.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the value of the named header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A raw HTTP response: status and undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl HttpResponse {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failure to obtain any HTTP response.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The HTTP client failed (DNS, TLS, timeout, connection reset).
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Connection failed for a reason reported outside the HTTP client.
    #[error("{0}")]
    Connection(String),
}

/// Issues GET requests and reports status and body.
///
/// Implementations never interpret the status code; classification belongs
/// to [`ApiClient`](crate::ApiClient).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one GET request.
    ///
    /// # Errors
    ///
    /// Returns an error if no HTTP response was obtained.
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    config: ClientConfig,
}

impl ReqwestTransport {
    /// Creates a new transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client, config })
    }

    /// Creates a transport with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.get(&request.url).query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert!(config.timeout.is_none());
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("coinscope/"));
    }

    #[tokio::test]
    async fn test_transport_creation() {
        let transport = ReqwestTransport::with_defaults();
        assert!(transport.is_ok());
    }

    #[test]
    fn test_request_lookup_helpers() {
        let request = HttpRequest {
            url: "https://example.invalid/ping".to_string(),
            query: vec![("page".to_string(), "2".to_string())],
            headers: vec![("X-CG-DEMO-API-KEY".to_string(), "k".to_string())],
        };
        assert_eq!(request.query_value("page"), Some("2"));
        assert_eq!(request.query_value("per_page"), None);
        assert_eq!(request.header("x-cg-demo-api-key"), Some("k"));
    }
}
