//! Credentials and endpoints, validated once at startup.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::ConfigError;
use crate::github::GITHUB_API_URL;

pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const FRESHDESK_TOKEN_VAR: &str = "FRESHDESK_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    github_token: String,
    freshdesk_api_key: String,
    github_api_url: String,
    freshdesk_base_url: Option<String>,
}

impl Config {
    /// Both credentials are required; blank values count as missing.
    pub fn new(github_token: &str, freshdesk_api_key: &str) -> Result<Self, ConfigError> {
        if github_token.trim().is_empty() {
            return Err(ConfigError::Missing(GITHUB_TOKEN_VAR));
        }
        if freshdesk_api_key.trim().is_empty() {
            return Err(ConfigError::Missing(FRESHDESK_TOKEN_VAR));
        }
        Ok(Self {
            github_token: github_token.to_string(),
            freshdesk_api_key: freshdesk_api_key.to_string(),
            github_api_url: GITHUB_API_URL.to_string(),
            freshdesk_base_url: None,
        })
    }

    pub fn with_github_api_url(mut self, url: &str) -> Self {
        self.github_api_url = url.to_string();
        self
    }

    /// Replace `https://{subdomain}.freshdesk.com` with a fixed base URL.
    pub fn with_freshdesk_base_url(mut self, url: &str) -> Self {
        self.freshdesk_base_url = Some(url.to_string());
        self
    }

    pub fn github_token(&self) -> &str {
        &self.github_token
    }

    /// The Freshdesk API key, base64-encoded for the bearer header.
    pub fn freshdesk_token(&self) -> String {
        STANDARD.encode(&self.freshdesk_api_key)
    }

    pub fn github_api_url(&self) -> &str {
        &self.github_api_url
    }

    pub fn freshdesk_base_url(&self) -> Option<&str> {
        self.freshdesk_base_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_github_token() {
        assert_eq!(
            Config::new("", "key").unwrap_err(),
            ConfigError::Missing("GITHUB_TOKEN")
        );
    }

    #[test]
    fn rejects_blank_freshdesk_key() {
        assert_eq!(
            Config::new("token", "   ").unwrap_err(),
            ConfigError::Missing("FRESHDESK_TOKEN")
        );
    }

    #[test]
    fn freshdesk_token_is_base64_of_raw_key() {
        let config = Config::new("gh", "test_freshdesk_token").unwrap();
        assert_eq!(config.freshdesk_token(), "dGVzdF9mcmVzaGRlc2tfdG9rZW4=");
        assert_eq!(config.github_token(), "gh");
    }

    #[test]
    fn endpoints_default_to_public_apis() {
        let config = Config::new("gh", "fd").unwrap();
        assert_eq!(config.github_api_url(), "https://api.github.com");
        assert_eq!(config.freshdesk_base_url(), None);

        let config = config
            .with_github_api_url("http://127.0.0.1:3000")
            .with_freshdesk_base_url("http://127.0.0.1:3000");
        assert_eq!(config.github_api_url(), "http://127.0.0.1:3000");
        assert_eq!(config.freshdesk_base_url(), Some("http://127.0.0.1:3000"));
    }
}
