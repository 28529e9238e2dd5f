//! Authenticated HTTP client with typed failure classification.
//!
//! # Design
//! `HttpClient` wraps a `Transport` and carries no other state. Each call is
//! split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes an `HttpResponse`; `get`, `post`, `put` and
//! `get_binary` glue the two halves around `Transport::send`.
//!
//! Any non-2xx response becomes an `ApiError`, including avatar downloads.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, SyncError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::transport::Transport;

#[derive(Clone)]
pub struct HttpClient<T> {
    transport: T,
}

impl<T> HttpClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_get(&self, url: &str, token: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: auth_headers(token),
            body: None,
        }
    }

    pub fn build_post(&self, url: &str, form: &MultipartForm, token: &str) -> HttpRequest {
        build_form_request(HttpMethod::Post, url, form, token)
    }

    pub fn build_put(&self, url: &str, form: &MultipartForm, token: &str) -> HttpRequest {
        build_form_request(HttpMethod::Put, url, form, token)
    }

    /// Unauthenticated GET for raw bytes.
    pub fn build_get_binary(&self, url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Deserialize a 2xx body into `R`; classify anything else.
    pub fn parse_json<R: DeserializeOwned>(&self, response: HttpResponse) -> Result<R, SyncError> {
        check_status(&response)?;
        serde_json::from_slice(&response.body).map_err(|e| SyncError::Deserialization(e.to_string()))
    }

    pub fn parse_binary(&self, response: HttpResponse) -> Result<Vec<u8>, SyncError> {
        check_status(&response)?;
        debug!(
            bytes = response.body.len(),
            content_type = response.header("content-type").unwrap_or("unknown"),
            "downloaded binary"
        );
        Ok(response.body)
    }
}

impl<T: Transport> HttpClient<T> {
    pub fn get<R: DeserializeOwned>(&self, url: &str, token: &str) -> Result<R, SyncError> {
        let request = self.build_get(url, token);
        self.parse_json(self.send(request)?)
    }

    pub fn post<R: DeserializeOwned>(
        &self,
        url: &str,
        form: &MultipartForm,
        token: &str,
    ) -> Result<R, SyncError> {
        let request = self.build_post(url, form, token);
        self.parse_json(self.send(request)?)
    }

    pub fn put<R: DeserializeOwned>(
        &self,
        url: &str,
        form: &MultipartForm,
        token: &str,
    ) -> Result<R, SyncError> {
        let request = self.build_put(url, form, token);
        self.parse_json(self.send(request)?)
    }

    pub fn get_binary(&self, url: &str) -> Result<Vec<u8>, SyncError> {
        let request = self.build_get_binary(url);
        self.parse_binary(self.send(request)?)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, SyncError> {
        debug!(method = %request.method, url = %request.url, "http request");
        let response = self.transport.send(request)?;
        debug!(status = response.status, "http response");
        Ok(response)
    }
}

/// `Authorization: Bearer <token>`, or nothing for an empty token.
fn auth_headers(token: &str) -> Vec<(String, String)> {
    if token.is_empty() {
        Vec::new()
    } else {
        vec![("authorization".to_string(), format!("Bearer {token}"))]
    }
}

fn build_form_request(
    method: HttpMethod,
    url: &str,
    form: &MultipartForm,
    token: &str,
) -> HttpRequest {
    let encoded = form.encode();
    let mut headers = auth_headers(token);
    headers.push(("content-type".to_string(), encoded.content_type));
    HttpRequest {
        method,
        url: url.to_string(),
        headers,
        body: Some(encoded.body),
    }
}

/// Map non-2xx responses to the matching `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::from_status(response.status, parse_error_body(&response.body)))
}

/// Error bodies are parsed as JSON when possible and kept as text otherwise.
fn parse_error_body(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}
