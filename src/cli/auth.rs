//! CLI handlers for login and logout.
//!
//! Presentation only: prompts go to stderr, the token goes to stdout, and
//! the handlers map outcomes to process exit codes.

use tokio_util::sync::CancellationToken;

use crate::client::DeviceFlow;
use crate::config::{AuthorizationServer, ClientConfig};
use crate::error::AuthError;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CANCELLED: i32 = 130;

fn flow_from_env() -> Result<DeviceFlow, Box<dyn std::error::Error>> {
    let server = AuthorizationServer::from_env()?;
    Ok(DeviceFlow::new(ClientConfig::new(server)))
}

/// Handle `device-grant login [--scope]`.
pub async fn handle_login(scope: Option<&str>) -> Result<i32, Box<dyn std::error::Error>> {
    let flow = flow_from_env()?;
    let authorization = flow.request_device_authorization(scope).await?;

    eprintln!();
    eprintln!("  Sign in from another device");
    eprintln!();
    eprintln!("  Visit {}", authorization.verification_uri_complete());
    eprintln!(
        "  or go to {} and enter {}",
        authorization.verification_uri(),
        authorization.user_code()
    );
    eprintln!();
    eprintln!("  Waiting for authentication...");

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let mut poller = flow.poller(&authorization);
    match poller.run_until_cancelled(&cancel).await {
        Ok(token) => {
            println!("{}", serde_json::to_string_pretty(&token)?);
            eprintln!("  Signed in.");
            Ok(EXIT_OK)
        }
        Err(AuthError::Cancelled) => {
            eprintln!("  Cancelled.");
            Ok(EXIT_CANCELLED)
        }
        Err(e) => {
            eprintln!("  Error: {e}");
            Ok(EXIT_FAILURE)
        }
    }
}

/// Handle `device-grant logout <token>`.
pub async fn handle_logout(token: &str) -> Result<i32, Box<dyn std::error::Error>> {
    let flow = flow_from_env()?;
    match flow.revoke(token).await {
        Ok(()) => {
            eprintln!("  Token revoked.");
            Ok(EXIT_OK)
        }
        Err(e) => {
            eprintln!("  Error: {e}");
            Ok(EXIT_FAILURE)
        }
    }
}
