//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::error::TransportError;

/// Wrap a transport future with a timeout.
///
/// An elapsed bound surfaces as a [`TransportError`] of kind
/// [`Timeout`](crate::error::TransportErrorKind::Timeout), the same kind the
/// HTTP client reports for its own timeouts.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, TransportError>>,
) -> Result<T, TransportError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::timeout(format!(
            "request timed out after {}ms",
            duration.as_millis()
        ))),
    }
}
