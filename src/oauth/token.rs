//! Access token response (RFC 6749 §5.1).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::schema::{validate, ValidationError, TOKEN_RESPONSE};

/// A validated bearer token, as issued by the token endpoint.
///
/// Deserializing (e.g. a persisted token) runs the same validation as a
/// fresh token response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct AccessToken {
    access_token: String,
    token_type: String,
    expires_in: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
}

impl AccessToken {
    pub fn from_response(body: &Value) -> Result<Self, ValidationError> {
        let fields = validate(body, &TOKEN_RESPONSE)?;
        Ok(Self {
            access_token: fields.str("access_token")?.to_string(),
            token_type: fields.str("token_type")?.to_string(),
            expires_in: fields.number("expires_in")?,
            refresh_token: fields.opt_str("refresh_token")?.map(str::to_string),
            scope: fields.opt_str("scope")?.map(str::to_string),
        })
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Always `"Bearer"`.
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Token lifetime in seconds, as reported by the server.
    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Granted scopes, split on whitespace.
    pub fn scopes(&self) -> Vec<&str> {
        self.scope
            .as_deref()
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default()
    }
}

impl TryFrom<Value> for AccessToken {
    type Error = ValidationError;

    fn try_from(body: Value) -> Result<Self, Self::Error> {
        Self::from_response(&body)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"..")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| ".."))
            .field("scope", &self.scope)
            .finish()
    }
}
