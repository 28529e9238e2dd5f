use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use contact_sync_core::{Config, ContactSync, Transport, UreqTransport};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: contact-sync <github_username> <freshdesk_subdomain>";

/// Sync a GitHub user's public profile into a Freshdesk contact.
#[derive(Debug, Parser)]
#[command(name = "contact-sync", version)]
struct Cli {
    /// GitHub username to sync.
    username: Option<String>,
    /// Freshdesk subdomain, e.g. `acme` for acme.freshdesk.com.
    subdomain: Option<String>,
    /// GitHub personal access token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,
    /// Freshdesk API key (sent base64-encoded).
    #[arg(long, env = "FRESHDESK_TOKEN", hide_env_values = true)]
    freshdesk_token: Option<String>,
    /// Override the GitHub API base URL.
    #[arg(long, env = "GITHUB_API_URL", hide = true)]
    github_api_url: Option<String>,
    /// Override `https://{subdomain}.freshdesk.com`.
    #[arg(long, env = "FRESHDESK_BASE_URL", hide = true)]
    freshdesk_base_url: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    ExitCode::from(run(cli, UreqTransport::new(), &mut io::stdout(), &mut io::stderr()))
}

/// Run one sync and write exactly one line to `out` or `err`.
///
/// Returns the process exit status: 0 on success, 1 on failure, 2 on usage.
fn run<T: Transport + Clone>(
    cli: Cli,
    transport: T,
    out: &mut impl Write,
    err: &mut impl Write,
) -> u8 {
    let (username, subdomain) = match (cli.username.as_deref(), cli.subdomain.as_deref()) {
        (Some(u), Some(s)) if !u.is_empty() && !s.is_empty() => (u, s),
        _ => {
            let _ = writeln!(err, "{USAGE}");
            return 2;
        }
    };

    let config = match Config::new(
        cli.github_token.as_deref().unwrap_or_default(),
        cli.freshdesk_token.as_deref().unwrap_or_default(),
    ) {
        Ok(config) => config,
        Err(e) => {
            let _ = writeln!(err, "Error: {e}");
            return 1;
        }
    };
    let config = match &cli.github_api_url {
        Some(url) => config.with_github_api_url(url),
        None => config,
    };
    let config = match &cli.freshdesk_base_url {
        Some(url) => config.with_freshdesk_base_url(url),
        None => config,
    };

    debug!(%username, %subdomain, "starting sync");
    let sync = ContactSync::from_config(&config, subdomain, transport);
    match sync.run(username) {
        Ok(outcome) => {
            let _ = writeln!(
                out,
                "Freshdesk contact synced successfully: {}",
                sync.freshdesk().contact_url(outcome.contact.id)
            );
            0
        }
        Err(e) => {
            let _ = writeln!(err, "{}", e.report_line());
            1
        }
    }
}
