//! GitHub users API.

use tracing::debug;

use crate::client::HttpClient;
use crate::error::SyncError;
use crate::transport::Transport;
use crate::types::GitHubUser;

pub const GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Clone)]
pub struct GitHubClient<T> {
    http: HttpClient<T>,
    base_url: String,
    token: String,
}

impl<T: Transport> GitHubClient<T> {
    pub fn new(http: HttpClient<T>, token: &str) -> Self {
        Self::with_base_url(http, GITHUB_API_URL, token)
    }

    pub fn with_base_url(http: HttpClient<T>, base_url: &str, token: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Fetch a user profile by login. The profile is returned as-is; callers
    /// decide which missing fields matter.
    pub fn get_user(&self, username: &str) -> Result<GitHubUser, SyncError> {
        let url = format!("{}/users/{username}", self.base_url);
        debug!(%username, "fetching GitHub user");
        self.http.get(&url, &self.token)
    }
}
