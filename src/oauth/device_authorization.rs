//! Device authorization response (RFC 8628 §3.2).

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::schema::{validate, ValidationError, ValidationFailure, DEVICE_AUTHORIZATION_RESPONSE};

/// A validated device authorization.
///
/// `expires_at` is fixed when the response is validated, from the
/// server-relative `expires_in`, and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceAuthorization {
    #[serde(skip_serializing)]
    device_code: String,
    user_code: String,
    verification_uri: Url,
    verification_uri_complete: Url,
    interval: u64,
    expires_at: DateTime<Utc>,
}

impl DeviceAuthorization {
    /// Validate a response body received at `now`.
    pub fn from_response(body: &Value, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let fields = validate(body, &DEVICE_AUTHORIZATION_RESPONSE)?;
        let expires_in = fields.number("expires_in")?;
        let expires_at = i64::try_from(expires_in)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| ValidationError::new("expires_in", ValidationFailure::OutOfRange))?;

        Ok(Self {
            device_code: fields.str("device_code")?.to_string(),
            user_code: fields.str("user_code")?.to_string(),
            verification_uri: fields.url("verification_uri")?,
            verification_uri_complete: fields.url("verification_uri_complete")?,
            interval: fields.number("interval")?,
            expires_at,
        })
    }

    /// Opaque code sent back to the token endpoint. Never shown to the user.
    pub fn device_code(&self) -> &str {
        &self.device_code
    }

    /// Code the user types at the verification URI.
    pub fn user_code(&self) -> &str {
        &self.user_code
    }

    pub fn verification_uri(&self) -> &Url {
        &self.verification_uri
    }

    /// Verification URI with the user code embedded.
    pub fn verification_uri_complete(&self) -> &Url {
        &self.verification_uri_complete
    }

    /// Minimum spacing between token requests, in seconds.
    pub fn interval(&self) -> u64 {
        self.interval
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
