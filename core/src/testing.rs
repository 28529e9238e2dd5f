//! In-memory `Transport` for unit tests.
//!
//! Responses are served in FIFO order and every request is recorded so tests
//! can assert on exactly what went over the wire. Running out of queued
//! responses is reported as a transport failure.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::Value;

use crate::error::SyncError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Default)]
struct Inner {
    responses: VecDeque<HttpResponse>,
    requests: Vec<HttpRequest>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_json(&self, status: u16, body: Value) {
        self.push(HttpResponse {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: serde_json::to_vec(&body).unwrap(),
        });
    }

    pub(crate) fn push_bytes(&self, status: u16, body: Vec<u8>) {
        self.push(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        });
    }

    fn push(&self, response: HttpResponse) {
        self.inner.borrow_mut().responses.push_back(response);
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.inner.borrow().requests.clone()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, SyncError> {
        let mut inner = self.inner.borrow_mut();
        let summary = format!("{} {}", request.method, request.url);
        inner.requests.push(request);
        inner
            .responses
            .pop_front()
            .ok_or_else(|| SyncError::Transport(format!("no response queued for {summary}")))
    }
}

/// Request body as lossy UTF-8, for substring assertions on multipart bodies.
pub(crate) fn body_text(request: &HttpRequest) -> String {
    String::from_utf8_lossy(request.body.as_deref().unwrap_or_default()).into_owned()
}
