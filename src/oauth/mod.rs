//! Wire contract of the device authorization grant: response schemas,
//! typed records, and OAuth error classification.

pub mod device_authorization;
pub mod protocol;
pub mod schema;
pub mod token;

pub use device_authorization::DeviceAuthorization;
pub use protocol::{classify, OAuthErrorCode, OAuthProtocolError};
pub use schema::{ValidationError, ValidationFailure};
pub use token::AccessToken;
