//! Network-facing components of the device flow.
//!
//! [`DeviceFlow`] wires one [`ClientConfig`], one [`Transport`] and one
//! [`Clock`] into the three components. Each component can also be built
//! on its own.
//!
//! # Example
//! ```no_run
//! use device_grant::client::DeviceFlow;
//! use device_grant::config::{AuthorizationServer, ClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let flow = DeviceFlow::new(ClientConfig::new(AuthorizationServer::from_env()?));
//! let authorization = flow.request_device_authorization(None).await?;
//! println!(
//!     "Visit {} and enter {}",
//!     authorization.verification_uri(),
//!     authorization.user_code()
//! );
//! let token = flow.poller(&authorization).run().await?;
//! println!("signed in, token expires in {}s", token.expires_in());
//! # Ok(())
//! # }
//! ```

pub mod device_authorization;
pub mod poller;
pub mod revocation;
pub mod transport;

pub use device_authorization::DeviceAuthorizationClient;
pub use poller::{PollState, PollStatus, TokenPoller};
pub use revocation::RevocationClient;
pub use transport::{HttpResponse, ReqwestTransport, Transport};

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::oauth::DeviceAuthorization;
use crate::util::clock::{Clock, SystemClock};

/// Entry point bundling configuration, transport and clock.
#[derive(Clone)]
pub struct DeviceFlow {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for DeviceFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceFlow")
            .field("config", &self.config)
            .field("transport", &"..")
            .field("clock", &"..")
            .finish()
    }
}

impl DeviceFlow {
    /// Real HTTP and real time.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: Arc::new(ReqwestTransport::new()),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn device_authorization_client(&self) -> DeviceAuthorizationClient {
        DeviceAuthorizationClient::new(
            self.config.clone(),
            self.transport.clone(),
            self.clock.clone(),
        )
    }

    /// A fresh poller for `authorization`.
    pub fn poller(&self, authorization: &DeviceAuthorization) -> TokenPoller {
        TokenPoller::for_authorization(
            self.config.clone(),
            self.transport.clone(),
            self.clock.clone(),
            authorization,
        )
    }

    pub fn revocation_client(&self) -> RevocationClient {
        RevocationClient::new(self.config.clone(), self.transport.clone())
    }

    pub async fn request_device_authorization(
        &self,
        scope: Option<&str>,
    ) -> Result<DeviceAuthorization> {
        self.device_authorization_client()
            .request_device_authorization(scope)
            .await
    }

    pub async fn revoke(&self, token: &str) -> Result<()> {
        self.revocation_client().revoke(token).await
    }
}
