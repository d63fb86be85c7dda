//! Token revocation (RFC 7009 §2.1).

use std::sync::Arc;

use tracing::{debug, info};

use super::transport::Transport;
use crate::config::ClientConfig;
use crate::error::{AuthError, Endpoint, Result};
use crate::oauth::protocol::classify;
use crate::util::timeout::with_timeout;

/// Revokes a previously issued token. Single attempt, no retry.
pub struct RevocationClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl RevocationClient {
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub async fn revoke(&self, token: &str) -> Result<()> {
        self.revoke_with(token, &[]).await
    }

    /// Revoke `token`, sending `extra` form fields (e.g. `token_type_hint`)
    /// verbatim alongside it.
    pub async fn revoke_with(&self, token: &str, extra: &[(&str, &str)]) -> Result<()> {
        let endpoint = self.config.server.revocation_endpoint();
        let mut form = Vec::with_capacity(extra.len() + 1);
        form.push(("token", token));
        form.extend_from_slice(extra);

        debug!(endpoint = %endpoint, "revoking token");

        let resp = with_timeout(
            self.config.poll.request_timeout,
            self.transport.post_form(endpoint, &form),
        )
        .await
        .map_err(|e| AuthError::transport(Endpoint::Revocation, e))?;

        // The body of a successful revocation carries nothing we need.
        if resp.is_success() {
            info!(status = %resp.status, "token revoked");
            return Ok(());
        }

        let invalid = |e| AuthError::validation(Endpoint::Revocation, e);
        let body = resp.json().map_err(invalid)?;
        let error = classify(&body).map_err(invalid)?;
        Err(AuthError::protocol(Endpoint::Revocation, error))
    }
}
