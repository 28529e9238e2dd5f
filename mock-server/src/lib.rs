//! In-memory stand-in for the GitHub users API, avatar hosting and the
//! Freshdesk contacts API.
//!
//! Only the endpoints the contact sync touches are served. Both APIs check
//! the bearer token they were seeded with and answer 401 otherwise.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub twitter_username: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Avatar {
    pub id: u64,
    pub name: String,
    pub content_type: String,
    pub size: usize,
    pub avatar_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub unique_external_id: Option<String>,
    pub twitter_id: Option<String>,
    pub avatar: Option<Avatar>,
}

#[derive(Debug, Default)]
pub struct MockState {
    github_token: String,
    freshdesk_token: String,
    users: HashMap<String, User>,
    avatars: HashMap<String, Vec<u8>>,
    pub contacts: Vec<Contact>,
    next_id: u64,
}

impl MockState {
    pub fn new(github_token: &str, freshdesk_token: &str) -> Self {
        Self {
            github_token: github_token.to_string(),
            freshdesk_token: freshdesk_token.to_string(),
            next_id: 1,
            ..Self::default()
        }
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.login.clone(), user);
        self
    }

    /// Serve `bytes` at `/avatars/{login}`.
    pub fn with_avatar(mut self, login: &str, bytes: Vec<u8>) -> Self {
        self.avatars.insert(login.to_string(), bytes);
        self
    }

    /// Seed an existing contact; its id is taken as given.
    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.next_id = self.next_id.max(contact.id + 1);
        self.contacts.push(contact);
        self
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

pub type Db = Arc<RwLock<MockState>>;

type Failure = (StatusCode, Json<Value>);

pub fn app(state: MockState) -> Router {
    router(Arc::new(RwLock::new(state)))
}

/// Build the router over a shared handle so callers can inspect state.
pub fn router(db: Db) -> Router {
    Router::new()
        .route("/users/{login}", get(get_user))
        .route("/avatars/{login}", get(get_avatar))
        .route("/api/v2/contacts", get(list_contacts).post(create_contact))
        .route("/api/v2/contacts/{id}", put(update_contact))
        .with_state(db)
}

pub async fn run(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, router(db)).await
}

fn failure(status: StatusCode, body: Value) -> Failure {
    (status, Json(body))
}

fn authorize(headers: &HeaderMap, expected: &str) -> Result<(), Failure> {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match presented {
        Some(token) if token == expected => Ok(()),
        _ => Err(failure(
            StatusCode::UNAUTHORIZED,
            json!({"code": "invalid_credentials", "message": "You have to be logged in to perform this action."}),
        )),
    }
}

async fn get_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(login): Path<String>,
) -> Result<Json<User>, Failure> {
    let state = db.read().await;
    authorize(&headers, &state.github_token).map_err(|_| {
        failure(StatusCode::UNAUTHORIZED, json!({"message": "Bad credentials"}))
    })?;
    state
        .users
        .get(&login)
        .cloned()
        .map(Json)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, json!({"message": "Not Found"})))
}

async fn get_avatar(
    State(db): State<Db>,
    Path(login): Path<String>,
) -> Result<([(header::HeaderName, &'static str); 1], Vec<u8>), StatusCode> {
    let state = db.read().await;
    let bytes = state.avatars.get(&login).cloned().ok_or(StatusCode::NOT_FOUND)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

#[derive(Deserialize)]
pub struct ContactSearch {
    pub email: Option<String>,
}

async fn list_contacts(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(search): Query<ContactSearch>,
) -> Result<Json<Vec<Contact>>, Failure> {
    let state = db.read().await;
    authorize(&headers, &state.freshdesk_token)?;
    let contacts = state
        .contacts
        .iter()
        .filter(|c| search.email.as_deref().map_or(true, |email| c.email == email))
        .cloned()
        .collect();
    Ok(Json(contacts))
}

/// Fields of a contact write; every field is optional on the wire.
#[derive(Debug, Default)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub unique_external_id: Option<String>,
    pub twitter_id: Option<String>,
    pub avatar: Option<UploadedFile>,
}

#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ContactForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, Failure> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "avatar" => {
                    let file_name = field.file_name().unwrap_or("avatar").to_string();
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field.bytes().await.map_err(bad_multipart)?.to_vec();
                    form.avatar = Some(UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
                "name" => form.name = Some(field.text().await.map_err(bad_multipart)?),
                "email" => form.email = Some(field.text().await.map_err(bad_multipart)?),
                "unique_external_id" => {
                    form.unique_external_id = Some(field.text().await.map_err(bad_multipart)?)
                }
                "twitter_id" => form.twitter_id = Some(field.text().await.map_err(bad_multipart)?),
                _ => (),
            }
        }
        Ok(form)
    }
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> Failure {
    failure(
        StatusCode::BAD_REQUEST,
        json!({"description": "Invalid multipart body", "message": err.body_text()}),
    )
}

fn validation_failed(field: &str, message: &str, code: &str) -> Value {
    json!({
        "description": "Validation failed",
        "errors": [{"field": field, "message": message, "code": code}]
    })
}

fn stored_avatar(id: u64, file: UploadedFile) -> Avatar {
    Avatar {
        id,
        avatar_url: format!("https://mock.freshdesk.local/avatars/{id}/{}", file.file_name),
        name: file.file_name,
        content_type: file.content_type,
        size: file.bytes.len(),
    }
}

async fn create_contact(
    State(db): State<Db>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Contact>), Failure> {
    authorize(&headers, &db.read().await.freshdesk_token)?;
    let form = ContactForm::from_multipart(multipart).await?;

    let mut state = db.write().await;
    let email = form.email.ok_or_else(|| {
        failure(
            StatusCode::BAD_REQUEST,
            validation_failed("email", "It should be a valid email address", "missing_field"),
        )
    })?;
    let name = form.name.ok_or_else(|| {
        failure(
            StatusCode::BAD_REQUEST,
            validation_failed("name", "It should be a non-empty string", "missing_field"),
        )
    })?;
    if state.contacts.iter().any(|c| c.email == email) {
        return Err(failure(
            StatusCode::CONFLICT,
            validation_failed("email", "It should be a unique value", "duplicate_value"),
        ));
    }

    let id = state.allocate_id();
    let avatar = form.avatar.map(|file| {
        let avatar_id = state.allocate_id();
        stored_avatar(avatar_id, file)
    });
    let contact = Contact {
        id,
        name,
        email,
        unique_external_id: form.unique_external_id,
        twitter_id: form.twitter_id,
        avatar,
    };
    state.contacts.push(contact.clone());
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn update_contact(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    multipart: Multipart,
) -> Result<Json<Contact>, Failure> {
    authorize(&headers, &db.read().await.freshdesk_token)?;
    let form = ContactForm::from_multipart(multipart).await?;

    let mut state = db.write().await;
    if !state.contacts.iter().any(|c| c.id == id) {
        return Err(failure(StatusCode::NOT_FOUND, Value::Null));
    }
    let avatar = form.avatar.map(|file| {
        let avatar_id = state.allocate_id();
        stored_avatar(avatar_id, file)
    });
    let contact = state
        .contacts
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, Value::Null))?;
    if let Some(name) = form.name {
        contact.name = name;
    }
    if let Some(email) = form.email {
        contact.email = email;
    }
    if let Some(external_id) = form.unique_external_id {
        contact.unique_external_id = Some(external_id);
    }
    if let Some(twitter_id) = form.twitter_id {
        contact.twitter_id = Some(twitter_id);
    }
    if avatar.is_some() {
        contact.avatar = avatar;
    }
    Ok(Json(contact.clone()))
}
