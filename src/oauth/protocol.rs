//! OAuth error responses (RFC 6749 §5.2, RFC 8628 §3.5, RFC 7009 §2.2.1).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

use super::schema::{validate, ValidationError, ERROR_RESPONSE};

/// Error codes an authorization server may return. The set is closed:
/// anything else is a validation failure.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OAuthErrorCode {
    InvalidRequest,
    InvalidClient,
    InvalidGrant,
    UnauthorizedClient,
    UnsupportedGrantType,
    InvalidScope,
    // Device access token polling
    AuthorizationPending,
    SlowDown,
    AccessDenied,
    ExpiredToken,
    // Revocation
    UnsupportedTokenType,
}

impl OAuthErrorCode {
    /// `authorization_pending` and `slow_down` only adjust polling cadence.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::AuthorizationPending | Self::SlowDown)
    }
}

/// A schema-valid OAuth error body.
///
/// `cause` is composed once, as `error[: description][ (uri)]`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{cause}")]
pub struct OAuthProtocolError {
    code: OAuthErrorCode,
    description: Option<String>,
    uri: Option<String>,
    cause: String,
}

impl OAuthProtocolError {
    pub fn new(code: OAuthErrorCode, description: Option<String>, uri: Option<String>) -> Self {
        let mut cause = code.to_string();
        if let Some(description) = description.as_deref().filter(|d| !d.is_empty()) {
            cause.push_str(": ");
            cause.push_str(description);
        }
        if let Some(uri) = uri.as_deref().filter(|u| !u.is_empty()) {
            cause.push_str(&format!(" ({uri})"));
        }
        Self {
            code,
            description,
            uri,
            cause,
        }
    }

    pub fn code(&self) -> OAuthErrorCode {
        self.code
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn cause(&self) -> &str {
        &self.cause
    }
}

/// Turn a non-success response body into an [`OAuthProtocolError`].
///
/// Bodies that are not OAuth-shaped (or carry an unknown code) come back as
/// the [`ValidationError`] that rejected them.
pub fn classify(body: &Value) -> Result<OAuthProtocolError, ValidationError> {
    let fields = validate(body, &ERROR_RESPONSE)?;
    Ok(OAuthProtocolError::new(
        fields.error_code("error")?,
        fields.opt_str("error_description")?.map(str::to_string),
        fields.opt_str("error_uri")?.map(str::to_string),
    ))
}
