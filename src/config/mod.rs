//! Configuration (layered: code > env).
//!
//! The authorization server is described by an explicit
//! [`AuthorizationServer`] value handed to every client, never by globals.

use std::time::Duration;

use bon::Builder;
use thiserror::Error;
use url::Url;

/// Production device authorization endpoint.
pub const DEFAULT_DEVICE_AUTHORIZATION_ENDPOINT: &str =
    "https://vercel.com/api/login/oauth/device-authorization";
/// Production token endpoint.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://vercel.com/api/login/oauth/token";
/// Production revocation endpoint.
pub const DEFAULT_REVOCATION_ENDPOINT: &str = "https://vercel.com/api/login/oauth/token/revoke";

/// Environment variable holding the OAuth client id.
pub const CLIENT_ID_ENV: &str = "DEVICE_GRANT_CLIENT_ID";

/// Fixed per-request timeout for all three endpoints.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Interval increase on `slow_down` (RFC 8628 §3.5).
pub const DEFAULT_SLOW_DOWN_INCREMENT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("client id is missing; set DEVICE_GRANT_CLIENT_ID")]
    MissingClientId,
    #[error("invalid {name} endpoint: {source}")]
    InvalidEndpoint {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Client registration and endpoints of one authorization server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationServer {
    client_id: String,
    device_authorization_endpoint: Url,
    token_endpoint: Url,
    revocation_endpoint: Url,
}

impl AuthorizationServer {
    /// The production server, registered as `client_id`.
    pub fn new(client_id: impl Into<String>) -> Result<Self, ConfigError> {
        Self::with_endpoints(
            client_id,
            DEFAULT_DEVICE_AUTHORIZATION_ENDPOINT,
            DEFAULT_TOKEN_ENDPOINT,
            DEFAULT_REVOCATION_ENDPOINT,
        )
    }

    /// A server at explicit endpoints (mock servers in tests).
    pub fn with_endpoints(
        client_id: impl Into<String>,
        device_authorization_endpoint: &str,
        token_endpoint: &str,
        revocation_endpoint: &str,
    ) -> Result<Self, ConfigError> {
        let client_id = client_id.into();
        if client_id.trim().is_empty() {
            return Err(ConfigError::MissingClientId);
        }
        Ok(Self {
            client_id,
            device_authorization_endpoint: parse_endpoint(
                "device authorization",
                device_authorization_endpoint,
            )?,
            token_endpoint: parse_endpoint("token", token_endpoint)?,
            revocation_endpoint: parse_endpoint("revocation", revocation_endpoint)?,
        })
    }

    /// The production server with the client id taken from
    /// `DEVICE_GRANT_CLIENT_ID` (a `.env` file is honoured).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let client_id = std::env::var(CLIENT_ID_ENV).map_err(|_| ConfigError::MissingClientId)?;
        Self::new(client_id)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn device_authorization_endpoint(&self) -> &Url {
        &self.device_authorization_endpoint
    }

    pub fn token_endpoint(&self) -> &Url {
        &self.token_endpoint
    }

    pub fn revocation_endpoint(&self) -> &Url {
        &self.revocation_endpoint
    }
}

fn parse_endpoint(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint { name, source })
}

/// Timing knobs. The defaults are the protocol values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct PollSettings {
    /// Bound on every single request.
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,
    /// Added to the poll interval on each `slow_down`.
    #[builder(default = DEFAULT_SLOW_DOWN_INCREMENT)]
    pub slow_down_increment: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            slow_down_increment: DEFAULT_SLOW_DOWN_INCREMENT,
        }
    }
}

/// Everything a device-flow client needs besides its transport and clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server: AuthorizationServer,
    pub poll: PollSettings,
}

impl ClientConfig {
    pub fn new(server: AuthorizationServer) -> Self {
        Self {
            server,
            poll: PollSettings::default(),
        }
    }

    pub fn with_poll_settings(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }
}
