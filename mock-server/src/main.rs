use std::sync::Arc;

use mock_server::{MockState, User};
use tokio::{net::TcpListener, sync::RwLock};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let github_token = std::env::var("MOCK_GITHUB_TOKEN").unwrap_or_else(|_| "github-token".to_string());
    // base64("freshdesk-key"), what the CLI sends for FRESHDESK_TOKEN=freshdesk-key.
    let freshdesk_token =
        std::env::var("MOCK_FRESHDESK_TOKEN").unwrap_or_else(|_| "ZnJlc2hkZXNrLWtleQ==".to_string());

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;

    let state = MockState::new(&github_token, &freshdesk_token)
        .with_user(User {
            id: 583231,
            login: "octocat".to_string(),
            name: Some("The Octocat".to_string()),
            email: Some("octocat@github.com".to_string()),
            avatar_url: Some(format!("http://{addr}/avatars/octocat")),
            twitter_username: Some("github".to_string()),
        })
        .with_avatar("octocat", vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);

    println!("listening on {addr}");
    mock_server::run(listener, Arc::new(RwLock::new(state))).await
}
