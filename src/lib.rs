//! device-grant: OAuth 2.0 Device Authorization Grant client
//!
//! Implements the client side of RFC 8628 for headless and terminal-bound
//! programs, plus RFC 7009 token revocation. Untyped JSON responses are
//! validated field by field into typed records, OAuth error bodies are
//! classified into a closed set of codes, and the token poller applies the
//! protocol's `slow_down` and timeout backoff rules under a fixed deadline.
//!
//! Rendering the user code, opening a browser and persisting the token are
//! left to the caller.
//!
//! # Quick Start
//!
//! ```no_run
//! use device_grant::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = AuthorizationServer::new("cl_my_client")?;
//! let flow = DeviceFlow::new(ClientConfig::new(server));
//!
//! let authorization = flow.request_device_authorization(Some("openid")).await?;
//! eprintln!(
//!     "Visit {} and enter {}",
//!     authorization.verification_uri(),
//!     authorization.user_code()
//! );
//!
//! let token = flow.poller(&authorization).run().await?;
//! flow.revoke(token.access_token()).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod oauth;
pub mod prelude;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
