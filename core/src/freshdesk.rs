//! Freshdesk contacts API and the GitHub → contact transform.
//!
//! # Design
//! All contact endpoints live under `{base}/api/v2/contacts`, where `base` is
//! `https://{subdomain}.freshdesk.com` unless overridden. The token handed in
//! is already the base64-encoded API key and goes out verbatim as a bearer
//! token. Writes are multipart so the avatar can ride along as a file part.

use tracing::{debug, info};
use url::Url;

use crate::client::HttpClient;
use crate::error::SyncError;
use crate::transport::Transport;
use crate::types::{Attachment, ContactPayload, FreshdeskContact, GitHubUser};

#[derive(Clone)]
pub struct FreshdeskClient<T> {
    http: HttpClient<T>,
    base_url: String,
    token: String,
}

impl<T: Transport> FreshdeskClient<T> {
    pub fn new(http: HttpClient<T>, subdomain: &str, token: &str) -> Self {
        Self::with_base_url(http, &format!("https://{subdomain}.freshdesk.com"), token)
    }

    pub fn with_base_url(http: HttpClient<T>, base_url: &str, token: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Agent-facing link to a contact.
    pub fn contact_url(&self, id: u64) -> String {
        format!("{}/a/contacts/{id}", self.base_url)
    }

    fn contacts_url(&self) -> String {
        format!("{}/api/v2/contacts", self.base_url)
    }

    /// Map a GitHub profile onto a contact payload.
    ///
    /// Downloads the avatar when the profile has one, so this can fail with
    /// the same errors as any other request.
    pub fn build_payload(&self, user: &GitHubUser) -> Result<ContactPayload, SyncError> {
        let email = user
            .email
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or(SyncError::MissingEmail)?;

        let avatar = match user.avatar_url.as_deref().filter(|u| !u.is_empty()) {
            Some(avatar_url) => {
                debug!(%avatar_url, "downloading avatar");
                Some(Attachment::avatar(self.http.get_binary(avatar_url)?))
            }
            None => None,
        };

        Ok(ContactPayload {
            name: user.name.clone().unwrap_or_else(|| user.login.clone()),
            email: email.to_string(),
            unique_external_id: user.id.to_string(),
            avatar,
            twitter_id: user.twitter_username.clone().filter(|t| !t.is_empty()),
        })
    }

    /// First contact whose email matches, if any. Further matches are ignored.
    pub fn find_contact_by_email(&self, email: &str) -> Result<Option<FreshdeskContact>, SyncError> {
        Ok(self.filter_contacts_by_email(email)?.into_iter().next())
    }

    pub fn filter_contacts_by_email(&self, email: &str) -> Result<Vec<FreshdeskContact>, SyncError> {
        let url = Url::parse_with_params(&self.contacts_url(), &[("email", email)])
            .map_err(|e| SyncError::InvalidUrl(e.to_string()))?;
        let contacts: Vec<FreshdeskContact> = self.http.get(url.as_str(), &self.token)?;
        debug!(%email, matches = contacts.len(), "searched contacts");
        Ok(contacts)
    }

    pub fn create_contact(&self, payload: &ContactPayload) -> Result<FreshdeskContact, SyncError> {
        let contact: FreshdeskContact =
            self.http
                .post(&self.contacts_url(), &payload.to_form(), &self.token)?;
        info!(id = contact.id, "created Freshdesk contact");
        Ok(contact)
    }

    pub fn update_contact(
        &self,
        id: u64,
        payload: &ContactPayload,
    ) -> Result<FreshdeskContact, SyncError> {
        let url = format!("{}/{id}", self.contacts_url());
        let contact: FreshdeskContact = self.http.put(&url, &payload.to_form(), &self.token)?;
        info!(id = contact.id, "updated Freshdesk contact");
        Ok(contact)
    }
}
