//! Sync a GitHub user profile into a Freshdesk contact.
//!
//! # Overview
//! Fetch the profile from GitHub, transform it into a contact payload, then
//! create or update the Freshdesk contact matched by email. One user per run,
//! one direction, no retries.
//!
//! # Design
//! - `HttpClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values; all network I/O goes through the `Transport` trait
//!   (`UreqTransport` in production).
//! - Every non-2xx response becomes an `ApiError` chosen by exact status.
//! - `GitHubClient` and `FreshdeskClient` are thin adapters over
//!   `HttpClient`; `ContactSync` composes them.
//! - Contact writes are multipart so the avatar can be uploaded as a file.

pub mod client;
pub mod config;
pub mod error;
pub mod freshdesk;
pub mod github;
pub mod http;
pub mod multipart;
pub mod sync;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::HttpClient;
pub use config::Config;
pub use error::{ApiError, ConfigError, SyncError};
pub use freshdesk::FreshdeskClient;
pub use github::GitHubClient;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use multipart::MultipartForm;
pub use sync::{ContactSync, SyncAction, SyncOutcome};
pub use transport::{Transport, UreqTransport};
pub use types::{Attachment, ContactPayload, FreshdeskContact, GitHubUser};
