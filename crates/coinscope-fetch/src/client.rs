//! Request executor: routing, authentication, and failure classification.

use coinscope_types::{Credentials, Endpoint, Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::schema::{ApiErrorBody, PingResponse};
use crate::transport::{
    ClientConfig, HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError,
};

/// Path and query parameters of one API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    path: String,
    query: Vec<(String, String)>,
}

impl RequestDescriptor {
    /// Creates a descriptor for the given API path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    /// Appends a query parameter if a value is present.
    #[must_use]
    pub fn param_opt<V: ToString>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    /// Returns the API path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query parameters in attachment order.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}

/// Issues API calls with a borrowed set of credentials.
///
/// Each call is a single GET: no retries, no caching. Failures are classified
/// into [`Error`] kinds by HTTP status.
#[derive(Debug, Clone)]
pub struct ApiClient<T = ReqwestTransport> {
    transport: T,
    credentials: Credentials,
}

impl ApiClient<ReqwestTransport> {
    /// Creates a client over a `reqwest` transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(
        credentials: Credentials,
        config: ClientConfig,
    ) -> std::result::Result<Self, reqwest::Error> {
        Ok(Self::new(ReqwestTransport::new(config)?, credentials))
    }

    /// Creates a client over a `reqwest` transport with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults(credentials: Credentials) -> std::result::Result<Self, reqwest::Error> {
        Self::with_config(credentials, ClientConfig::default())
    }
}

impl<T: Transport> ApiClient<T> {
    /// Creates a client over the given transport.
    #[must_use]
    pub const fn new(transport: T, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Returns the routing for the configured tier.
    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        self.credentials.endpoint()
    }

    /// Returns the credentials used for every request.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds the routed HTTP request for a descriptor.
    #[must_use]
    pub fn prepare(&self, request: &RequestDescriptor) -> HttpRequest {
        let endpoint = self.endpoint();
        let headers = self
            .credentials
            .api_key()
            .map(|key| vec![(endpoint.auth_header.to_string(), key.to_string())])
            .unwrap_or_default();

        HttpRequest {
            url: endpoint.url(request.path()),
            query: request.query().to_vec(),
            headers,
        }
    }

    /// Executes one GET and returns the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] on 401, [`Error::RateLimited`] on 429,
    /// [`Error::Api`] on any other non-2xx status, [`Error::Network`] if no
    /// response was obtained, and [`Error::InvalidResponse`] if a 2xx body is
    /// not JSON.
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<Value> {
        let http_request = self.prepare(request);
        debug!(
            path = request.path(),
            params = request.query().len(),
            tier = %self.credentials.tier,
            authenticated = self.credentials.api_key().is_some(),
            "API request"
        );

        let response = self
            .transport
            .get(&http_request)
            .await
            .map_err(network_failure)?;

        debug!(path = request.path(), status = response.status, "API response");
        classify(response)
    }

    /// Executes one GET and decodes the body into `R`.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute), plus [`Error::InvalidResponse`] if
    /// the body does not match `R`.
    pub async fn execute_as<R: DeserializeOwned>(&self, request: &RequestDescriptor) -> Result<R> {
        let value = self.execute(request).await?;
        serde_json::from_value(value).map_err(|e| {
            Error::InvalidResponse(format!("unexpected payload from {}: {e}", request.path()))
        })
    }

    /// Checks API reachability and credentials.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the `/ping` call.
    pub async fn ping(&self) -> Result<String> {
        let response: PingResponse = self.execute_as(&RequestDescriptor::new("/ping")).await?;
        Ok(response.gecko_says.unwrap_or_default())
    }
}

/// Classifies a raw response into a JSON body or an error kind.
fn classify(response: HttpResponse) -> Result<Value> {
    match response.status {
        200..=299 => serde_json::from_str(&response.body)
            .map_err(|e| Error::InvalidResponse(format!("body is not valid JSON: {e}"))),
        401 => Err(Error::Auth),
        429 => Err(Error::RateLimited),
        status => Err(Error::Api {
            status,
            message: ApiErrorBody::message(&response.body),
        }),
    }
}

fn network_failure(error: TransportError) -> Error {
    Error::Network(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockTransport, network_error, ok_json, status};
    use coinscope_types::Tier;
    use serde_json::json;

    fn client_with(creds: Credentials, transport: MockTransport) -> ApiClient<MockTransport> {
        ApiClient::new(transport, creds)
    }

    #[tokio::test]
    async fn test_success_returns_json() {
        let client = client_with(
            Credentials::anonymous(Tier::Demo),
            MockTransport::scripted(vec![ok_json(json!({"gecko_says": "(V3) To the Moon!"}))]),
        );
        let value = client.execute(&RequestDescriptor::new("/ping")).await.unwrap();
        assert_eq!(value["gecko_says"], "(V3) To the Moon!");
    }

    #[tokio::test]
    async fn test_url_and_query_order() {
        let client = client_with(
            Credentials::anonymous(Tier::Pro),
            MockTransport::scripted(vec![ok_json(json!([]))]),
        );
        let request = RequestDescriptor::new("/coins/markets")
            .param("vs_currency", "usd")
            .param("per_page", 250)
            .param_opt("category", None::<&str>)
            .param("page", 1);
        client.execute(&request).await.unwrap();

        let sent = &client.transport().requests()[0];
        assert_eq!(sent.url, "https://pro-api.coingecko.com/api/v3/coins/markets");
        let names: Vec<&str> = sent.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["vs_currency", "per_page", "page"]);
    }

    #[tokio::test]
    async fn test_auth_header_per_tier() {
        let demo = client_with(
            Credentials::new("demo-key", Tier::Demo),
            MockTransport::scripted(vec![ok_json(json!({}))]),
        );
        demo.execute(&RequestDescriptor::new("/ping")).await.unwrap();
        let sent = &demo.transport().requests()[0];
        assert_eq!(sent.header("x-cg-demo-api-key"), Some("demo-key"));
        assert_eq!(sent.header("x-cg-pro-api-key"), None);

        let pro = client_with(
            Credentials::new("pro-key", Tier::Pro),
            MockTransport::scripted(vec![ok_json(json!({}))]),
        );
        pro.execute(&RequestDescriptor::new("/ping")).await.unwrap();
        let sent = &pro.transport().requests()[0];
        assert_eq!(sent.header("x-cg-pro-api-key"), Some("pro-key"));
    }

    #[tokio::test]
    async fn test_no_key_sends_no_auth_header() {
        let client = client_with(
            Credentials::anonymous(Tier::Demo),
            MockTransport::scripted(vec![ok_json(json!({}))]),
        );
        client.execute(&RequestDescriptor::new("/ping")).await.unwrap();
        assert!(client.transport().requests()[0].headers.is_empty());
    }

    #[tokio::test]
    async fn test_failure_classification() {
        let client = client_with(
            Credentials::new("k", Tier::Demo),
            MockTransport::scripted(vec![
                status(401, r#"{"status": {"error_message": "invalid key"}}"#),
                status(429, ""),
                status(404, r#"{"error": "coin not found"}"#),
                status(500, "<html>oops</html>"),
                network_error("connection reset by peer"),
            ]),
        );
        let request = RequestDescriptor::new("/coins/nope");

        assert!(matches!(client.execute(&request).await, Err(Error::Auth)));
        assert!(matches!(client.execute(&request).await, Err(Error::RateLimited)));
        match client.execute(&request).await {
            Err(Error::Api { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message.as_deref(), Some("coin not found"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
        match client.execute(&request).await {
            Err(Error::Api { status, message }) => {
                assert_eq!(status, 500);
                assert!(message.is_none());
            }
            other => panic!("expected API error, got {other:?}"),
        }
        match client.execute(&request).await {
            Err(Error::Network(message)) => assert!(message.contains("reset")),
            other => panic!("expected network failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let client = client_with(
            Credentials::default(),
            MockTransport::scripted(vec![Ok(HttpResponse::new(200, "not json"))]),
        );
        let result = client.execute(&RequestDescriptor::new("/ping")).await;
        assert!(matches!(result, Err(Error::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_execute_as_schema_mismatch() {
        let client = client_with(
            Credentials::default(),
            MockTransport::scripted(vec![ok_json(json!({"unexpected": true}))]),
        );
        let result: Result<Vec<u32>> = client.execute_as(&RequestDescriptor::new("/x")).await;
        assert!(matches!(result, Err(Error::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_ping() {
        let client = client_with(
            Credentials::default(),
            MockTransport::scripted(vec![ok_json(json!({"gecko_says": "(V3) To the Moon!"}))]),
        );
        assert_eq!(client.ping().await.unwrap(), "(V3) To the Moon!");
    }
}
