//! In-process transport for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use coinscope_types::Credentials;
use serde_json::Value;

use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::ApiClient;

type Reply = Result<HttpResponse, TransportError>;
type Handler = Box<dyn Fn(&HttpRequest) -> Reply + Send + Sync>;

/// Transport that answers from a handler and records every request.
pub(crate) struct MockTransport {
    handler: Handler,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Answers each request with `handler`.
    pub(crate) fn new(handler: impl Fn(&HttpRequest) -> Reply + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers requests with `replies` in order, then with a connection error.
    pub(crate) fn scripted(replies: Vec<Reply>) -> Self {
        let queue = Mutex::new(VecDeque::from(replies));
        Self::new(move |_| {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Connection("no scripted reply".into())))
        })
    }

    /// Returns a copy of every request received so far.
    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        (self.handler)(request)
    }
}

pub(crate) fn ok_json(body: Value) -> Reply {
    Ok(HttpResponse::new(200, body.to_string()))
}

pub(crate) fn status(code: u16, body: &str) -> Reply {
    Ok(HttpResponse::new(code, body))
}

pub(crate) fn network_error(message: &str) -> Reply {
    Err(TransportError::Connection(message.to_string()))
}

/// Anonymous demo-tier client over `transport`.
pub(crate) fn client(transport: MockTransport) -> ApiClient<MockTransport> {
    ApiClient::new(transport, Credentials::default())
}
