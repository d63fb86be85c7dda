//! Device authorization request (RFC 8628 §3.1).

use std::sync::Arc;

use tracing::{debug, info};

use super::transport::{HttpResponse, Transport};
use crate::config::ClientConfig;
use crate::error::{AuthError, Endpoint, Result};
use crate::oauth::protocol::classify;
use crate::oauth::DeviceAuthorization;
use crate::util::clock::Clock;
use crate::util::timeout::with_timeout;

/// Requests a device code / user code pair.
///
/// One request per login attempt; retrying is up to the caller.
pub struct DeviceAuthorizationClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl DeviceAuthorizationClient {
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            transport,
            clock,
        }
    }

    /// Ask the server for a device authorization, optionally scoped.
    pub async fn request_device_authorization(
        &self,
        scope: Option<&str>,
    ) -> Result<DeviceAuthorization> {
        let server = &self.config.server;
        let mut form = vec![("client_id", server.client_id())];
        if let Some(scope) = scope {
            form.push(("scope", scope));
        }

        debug!(
            endpoint = %server.device_authorization_endpoint(),
            scope = scope.unwrap_or("none"),
            "requesting device authorization"
        );

        let resp = with_timeout(
            self.config.poll.request_timeout,
            self.transport
                .post_form(server.device_authorization_endpoint(), &form),
        )
        .await
        .map_err(|e| AuthError::transport(Endpoint::DeviceAuthorization, e))?;

        let authorization = self.process_response(&resp)?;
        info!(
            user_code = authorization.user_code(),
            verification_uri = %authorization.verification_uri(),
            interval = authorization.interval(),
            expires_at = %authorization.expires_at(),
            "device authorization granted"
        );
        Ok(authorization)
    }

    fn process_response(&self, resp: &HttpResponse) -> Result<DeviceAuthorization> {
        let invalid = |e| AuthError::validation(Endpoint::DeviceAuthorization, e);
        let body = resp.json().map_err(invalid)?;

        if !resp.is_success() {
            debug!(status = %resp.status, "device authorization rejected");
            let error = classify(&body).map_err(invalid)?;
            return Err(AuthError::protocol(Endpoint::DeviceAuthorization, error));
        }

        DeviceAuthorization::from_response(&body, self.clock.now()).map_err(invalid)
    }
}
