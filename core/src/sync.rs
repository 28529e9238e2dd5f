//! One-shot GitHub → Freshdesk contact sync.
//!
//! # Design
//! `ContactSync::run` is a straight line: fetch the GitHub profile, require a
//! public email, build the contact payload (downloading the avatar), look the
//! contact up by the profile's email, then update the first match or create a
//! new contact. Every step is a blocking call and the first failure ends the
//! run. Nothing is written to Freshdesk before the final step, so a failed run
//! needs no cleanup.

use tracing::info;

use crate::client::HttpClient;
use crate::config::Config;
use crate::error::SyncError;
use crate::freshdesk::FreshdeskClient;
use crate::github::GitHubClient;
use crate::transport::Transport;
use crate::types::FreshdeskContact;

/// Which write the sync performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub action: SyncAction,
    pub contact: FreshdeskContact,
}

pub struct ContactSync<T> {
    github: GitHubClient<T>,
    freshdesk: FreshdeskClient<T>,
}

impl<T: Transport + Clone> ContactSync<T> {
    /// Wire both adapters to one transport using the configured endpoints.
    pub fn from_config(config: &Config, subdomain: &str, transport: T) -> Self {
        let http = HttpClient::new(transport);
        let github =
            GitHubClient::with_base_url(http.clone(), config.github_api_url(), config.github_token());
        let freshdesk = match config.freshdesk_base_url() {
            Some(base_url) => {
                FreshdeskClient::with_base_url(http, base_url, &config.freshdesk_token())
            }
            None => FreshdeskClient::new(http, subdomain, &config.freshdesk_token()),
        };
        Self::new(github, freshdesk)
    }
}

impl<T: Transport> ContactSync<T> {
    pub fn new(github: GitHubClient<T>, freshdesk: FreshdeskClient<T>) -> Self {
        Self { github, freshdesk }
    }

    pub fn freshdesk(&self) -> &FreshdeskClient<T> {
        &self.freshdesk
    }

    pub fn run(&self, username: &str) -> Result<SyncOutcome, SyncError> {
        let user = self.github.get_user(username)?;
        let email = match user.email.as_deref() {
            Some(email) if !email.is_empty() => email,
            _ => return Err(SyncError::MissingEmail),
        };

        let payload = self.freshdesk.build_payload(&user)?;

        let outcome = match self.freshdesk.find_contact_by_email(email)? {
            Some(existing) => SyncOutcome {
                action: SyncAction::Updated,
                contact: self.freshdesk.update_contact(existing.id, &payload)?,
            },
            None => SyncOutcome {
                action: SyncAction::Created,
                contact: self.freshdesk.create_contact(&payload)?,
            },
        };

        info!(
            %username,
            contact_id = outcome.contact.id,
            action = ?outcome.action,
            "contact synced"
        );
        Ok(outcome)
    }
}
