//! End-to-end sync against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `ContactSync` over
//! real HTTP with `UreqTransport`. The server's state handle is kept so each
//! test can check what actually landed on the Freshdesk side.

use std::sync::Arc;

use contact_sync_core::{ApiError, Config, ContactSync, SyncAction, SyncError, UreqTransport};
use mock_server::{Contact, Db, MockState, User};
use tokio::sync::RwLock;

const GITHUB_TOKEN: &str = "test_github_token";
const FRESHDESK_KEY: &str = "test_freshdesk_token";
// base64(FRESHDESK_KEY)
const FRESHDESK_BEARER: &str = "dGVzdF9mcmVzaGRlc2tfdG9rZW4=";

struct Harness {
    base_url: String,
    db: Db,
}

impl Harness {
    /// Bind first so the seeded avatar URL can point back at the server.
    fn start(seed: impl FnOnce(&str, MockState) -> MockState) -> Self {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();
        let base_url = format!("http://{addr}");

        let state = seed(&base_url, MockState::new(GITHUB_TOKEN, FRESHDESK_BEARER));
        let db: Db = Arc::new(RwLock::new(state));

        let server_db = db.clone();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                mock_server::run(listener, server_db).await
            })
            .unwrap();
        });

        Self { base_url, db }
    }

    fn contact_sync(&self, freshdesk_key: &str) -> ContactSync<UreqTransport> {
        let config = Config::new(GITHUB_TOKEN, freshdesk_key)
            .unwrap()
            .with_github_api_url(&self.base_url)
            .with_freshdesk_base_url(&self.base_url);
        ContactSync::from_config(&config, "testdomain", UreqTransport::new())
    }

    fn contacts(&self) -> Vec<Contact> {
        self.db.blocking_read().contacts.clone()
    }
}

fn testuser(base_url: &str) -> User {
    User {
        id: 12345,
        login: "testuser".to_string(),
        name: Some("Test User".to_string()),
        email: Some("testuser@example.com".to_string()),
        avatar_url: Some(format!("{base_url}/avatars/testuser")),
        twitter_username: Some("testuser".to_string()),
    }
}

#[test]
fn sync_creates_then_updates_the_same_contact() {
    let harness = Harness::start(|base_url, state| {
        state
            .with_user(testuser(base_url))
            .with_avatar("testuser", b"\x89PNG not really a jpeg".to_vec())
    });
    let sync = harness.contact_sync(FRESHDESK_KEY);

    // Step 1: first run creates the contact.
    let created = sync.run("testuser").unwrap();
    assert_eq!(created.action, SyncAction::Created);
    assert_eq!(created.contact.name.as_deref(), Some("Test User"));
    assert_eq!(created.contact.unique_external_id.as_deref(), Some("12345"));
    assert_eq!(created.contact.twitter_id.as_deref(), Some("testuser"));

    let contacts = harness.contacts();
    assert_eq!(contacts.len(), 1);
    let avatar = contacts[0].avatar.as_ref().unwrap();
    assert_eq!(avatar.name, "avatar.jpg");
    assert_eq!(avatar.content_type, "image/jpeg");
    assert_eq!(avatar.size, b"\x89PNG not really a jpeg".len());

    // Step 2: second run finds it by email and updates in place.
    let updated = sync.run("testuser").unwrap();
    assert_eq!(updated.action, SyncAction::Updated);
    assert_eq!(updated.contact.id, created.contact.id);
    assert_eq!(harness.contacts().len(), 1);

    assert_eq!(
        sync.freshdesk().contact_url(updated.contact.id),
        format!("{}/a/contacts/{}", harness.base_url, updated.contact.id)
    );
}

#[test]
fn sync_updates_existing_contact_with_matching_email() {
    let harness = Harness::start(|base_url, state| {
        let user = User {
            name: None,
            avatar_url: None,
            twitter_username: None,
            ..testuser(base_url)
        };
        state.with_user(user).with_contact(Contact {
            id: 67890,
            name: "Old Name".to_string(),
            email: "testuser@example.com".to_string(),
            unique_external_id: None,
            twitter_id: None,
            avatar: None,
        })
    });

    let outcome = harness.contact_sync(FRESHDESK_KEY).run("testuser").unwrap();
    assert_eq!(outcome.action, SyncAction::Updated);
    assert_eq!(outcome.contact.id, 67890);
    // No display name on GitHub, so the login is used.
    assert_eq!(outcome.contact.name.as_deref(), Some("testuser"));
    assert!(outcome.contact.avatar.is_none());
    assert!(outcome.contact.twitter_id.is_none());
}

#[test]
fn user_without_email_never_reaches_freshdesk() {
    let harness = Harness::start(|base_url, state| {
        state.with_user(User {
            email: None,
            ..testuser(base_url)
        })
    });

    let err = harness.contact_sync(FRESHDESK_KEY).run("testuser").unwrap_err();
    assert!(matches!(err, SyncError::MissingEmail));
    assert!(harness.contacts().is_empty());
}

#[test]
fn unknown_github_user_is_not_found() {
    let harness = Harness::start(|_, state| state);

    let err = harness.contact_sync(FRESHDESK_KEY).run("nobody").unwrap_err();
    assert!(matches!(err, SyncError::Api(ApiError::NotFound { .. })));
    assert_eq!(err.report_line(), r#"API Error (404): {"message":"Not Found"}"#);
}

#[test]
fn wrong_freshdesk_key_is_unauthorized() {
    let harness = Harness::start(|base_url, state| {
        state
            .with_user(testuser(base_url))
            .with_avatar("testuser", vec![1, 2, 3])
    });

    let err = harness.contact_sync("wrong-key").run("testuser").unwrap_err();
    assert!(matches!(err, SyncError::Api(ApiError::Unauthorized { .. })));
    assert!(harness.contacts().is_empty());
}

#[test]
fn missing_avatar_aborts_the_run() {
    // The profile points at an avatar the server does not have.
    let harness = Harness::start(|base_url, state| state.with_user(testuser(base_url)));

    let err = harness.contact_sync(FRESHDESK_KEY).run("testuser").unwrap_err();
    assert!(matches!(err, SyncError::Api(ApiError::NotFound { .. })));
    assert!(harness.contacts().is_empty());
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Config::new(GITHUB_TOKEN, FRESHDESK_KEY)
        .unwrap()
        .with_github_api_url(&format!("http://{addr}"));
    let err = ContactSync::from_config(&config, "testdomain", UreqTransport::new())
        .run("testuser")
        .unwrap_err();
    assert!(matches!(err, SyncError::Transport(_)));
    assert!(err.report_line().starts_with("Error: transport failed:"));
}
