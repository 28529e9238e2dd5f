//! Domain DTOs for GitHub and Freshdesk.
//!
//! # Design
//! Response types only declare the fields the sync uses; unknown JSON fields
//! are ignored and optional fields accept both `null` and absence.
//! `ContactPayload` is a typed request: its multipart encoding is a pure
//! function of the struct, and absent optional fields produce no form part.

use serde::{Deserialize, Serialize};

use crate::multipart::MultipartForm;

pub const AVATAR_FILENAME: &str = "avatar.jpg";
/// Sent for every avatar regardless of the image's real format.
pub const AVATAR_CONTENT_TYPE: &str = "image/jpeg";

/// A GitHub user profile as returned by `GET /users/{username}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubUser {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub twitter_username: Option<String>,
}

/// A Freshdesk contact as echoed back by the contacts API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FreshdeskContact {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub unique_external_id: Option<String>,
    #[serde(default)]
    pub twitter_id: Option<String>,
    #[serde(default)]
    pub avatar: Option<ContactAvatar>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactAvatar {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A file field in a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Wrap downloaded avatar bytes with the fixed avatar filename and type.
    pub fn avatar(bytes: Vec<u8>) -> Self {
        Self {
            filename: AVATAR_FILENAME.to_string(),
            content_type: AVATAR_CONTENT_TYPE.to_string(),
            bytes,
        }
    }
}

/// Request payload for creating or updating a Freshdesk contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    /// The GitHub id as a string. Informational; contacts are matched by email.
    pub unique_external_id: String,
    pub avatar: Option<Attachment>,
    pub twitter_id: Option<String>,
}

impl ContactPayload {
    pub fn to_form(&self) -> MultipartForm {
        let mut form = MultipartForm::new()
            .text("name", &self.name)
            .text("email", &self.email)
            .text("unique_external_id", &self.unique_external_id);
        if let Some(avatar) = &self.avatar {
            form = form.file(
                "avatar",
                &avatar.filename,
                &avatar.content_type,
                avatar.bytes.clone(),
            );
        }
        if let Some(twitter_id) = &self.twitter_id {
            form = form.text("twitter_id", twitter_id);
        }
        form
    }
}
