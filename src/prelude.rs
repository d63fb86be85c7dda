//! Convenience re-exports for common use.

pub use crate::client::{
    DeviceAuthorizationClient, DeviceFlow, PollStatus, RevocationClient, TokenPoller, Transport,
};
pub use crate::config::{AuthorizationServer, ClientConfig, PollSettings};
pub use crate::error::{AuthError, Endpoint, Result, TransportError, TransportErrorKind};
pub use crate::oauth::{
    AccessToken, DeviceAuthorization, OAuthErrorCode, OAuthProtocolError, ValidationError,
};
pub use crate::util::clock::{Clock, SystemClock};
