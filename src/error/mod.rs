//! Error types for device-grant.
//!
//! Every operation returns its single terminal failure as an [`AuthError`].
//! Protocol cadence signals (`authorization_pending`, `slow_down`, a single
//! request timing out while polling) never reach the caller; the poller
//! absorbs them.

use chrono::{DateTime, Utc};
use strum::Display;
use thiserror::Error;

use crate::oauth::protocol::{OAuthErrorCode, OAuthProtocolError};
use crate::oauth::schema::ValidationError;

/// The authorization-server endpoint an operation talked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Endpoint {
    #[strum(serialize = "Device authorization")]
    DeviceAuthorization,
    #[strum(serialize = "Device access token")]
    Token,
    #[strum(serialize = "Revocation")]
    Revocation,
}

/// Terminal error of a device-flow operation.
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    /// The request never produced an HTTP response.
    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: TransportError,
    },

    /// A response arrived but does not satisfy the wire contract.
    #[error("{endpoint} response was invalid: {source}")]
    Validation {
        endpoint: Endpoint,
        #[source]
        source: ValidationError,
    },

    /// The server answered with a well-formed OAuth error body.
    #[error("{endpoint} request failed: {source}")]
    Protocol {
        endpoint: Endpoint,
        #[source]
        source: OAuthProtocolError,
    },

    /// The device code lifetime ran out before the user finished.
    #[error("Timed out waiting for authentication. Please try again.")]
    Timeout { deadline: DateTime<Utc> },

    #[error("Authentication was cancelled")]
    Cancelled,
}

impl AuthError {
    pub fn transport(endpoint: Endpoint, source: TransportError) -> Self {
        Self::Transport { endpoint, source }
    }

    pub fn validation(endpoint: Endpoint, source: ValidationError) -> Self {
        Self::Validation { endpoint, source }
    }

    pub fn protocol(endpoint: Endpoint, source: OAuthProtocolError) -> Self {
        Self::Protocol { endpoint, source }
    }

    /// The OAuth error code, if the server reported one.
    pub fn protocol_code(&self) -> Option<OAuthErrorCode> {
        match self {
            Self::Protocol { source, .. } => Some(source.code()),
            _ => None,
        }
    }

    /// The endpoint involved, if the failure came from a request.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Validation { endpoint, .. }
            | Self::Protocol { endpoint, .. } => Some(*endpoint),
            Self::Timeout { .. } | Self::Cancelled => None,
        }
    }

    /// Session-level timeout (not a single request timing out).
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Coarse classification of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TransportErrorKind {
    /// Connect or request timeout. The only kind polling recovers from.
    Timeout,
    Connect,
    Other,
}

/// A request failed before a response was received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Other, message)
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            TransportErrorKind::Timeout
        } else if error.is_connect() {
            TransportErrorKind::Connect
        } else {
            TransportErrorKind::Other
        };
        Self::new(kind, error.to_string())
    }
}

/// Convenience alias used throughout this crate.
pub type Result<T, E = AuthError> = std::result::Result<T, E>;
