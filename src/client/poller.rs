//! Device access token polling (RFC 8628 §3.4–3.5).
//!
//! # State machine
//!
//! ```text
//! Waiting ──step──▶ Polling ──┬──▶ Succeeded (AccessToken)
//!                     ▲  │    ├──▶ Failed (timeout, transport, protocol, validation)
//!                     └──┘    └──▶ Cancelled
//!          authorization_pending / slow_down / request timeout
//! ```
//!
//! Each iteration: fail if the deadline has passed, sleep for the current
//! interval (never past the deadline), then send one token request bounded by the request timeout
//! (and by the time left before the deadline). The interval only grows:
//! `slow_down` adds a fixed increment, a request timeout doubles it. The
//! deadline never moves.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::transport::{HttpResponse, Transport};
use crate::config::ClientConfig;
use crate::error::{AuthError, Endpoint, Result};
use crate::oauth::protocol::{classify, OAuthErrorCode};
use crate::oauth::{AccessToken, DeviceAuthorization};
use crate::util::clock::Clock;
use crate::util::timeout::with_timeout;

const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";
const MIN_BACK_OFF: Duration = Duration::from_secs(1);

/// Where a [`TokenPoller`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    /// Constructed; no iteration has run yet.
    Waiting,
    Polling,
    Succeeded,
    Failed,
    Cancelled,
}

impl PollStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

/// Mutable cadence of one polling session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    interval: Duration,
    deadline: DateTime<Utc>,
}

impl PollState {
    pub fn new(interval: Duration, deadline: DateTime<Utc>) -> Self {
        Self { interval, deadline }
    }

    /// Current spacing between token requests.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn interval_ms(&self) -> u128 {
        self.interval.as_millis()
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// `slow_down`: additive increase.
    pub fn slow_down(&mut self, increment: Duration) {
        self.interval = self.interval.saturating_add(increment);
    }

    /// Request timeout: double the interval, starting from at least one
    /// second.
    pub fn back_off(&mut self) {
        self.interval = self.interval.max(MIN_BACK_OFF).saturating_mul(2);
    }

    /// Time left before the deadline, or `None` once it has been reached.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        if now >= self.deadline {
            return None;
        }
        (self.deadline - now).to_std().ok()
    }
}

/// Polls the token endpoint until the user finishes authorizing.
///
/// Owns its [`PollState`] exclusively; one poller per login attempt.
pub struct TokenPoller {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    device_code: String,
    state: PollState,
    status: PollStatus,
    requests_sent: u32,
    outcome: Option<Result<AccessToken>>,
}

impl TokenPoller {
    /// `interval_secs` is the server-declared minimum spacing; `deadline`
    /// is the device code's absolute expiry.
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
        device_code: impl Into<String>,
        interval_secs: u64,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            config,
            transport,
            clock,
            device_code: device_code.into(),
            state: PollState::new(Duration::from_secs(interval_secs), deadline),
            status: PollStatus::Waiting,
            requests_sent: 0,
            outcome: None,
        }
    }

    pub fn for_authorization(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
        authorization: &DeviceAuthorization,
    ) -> Self {
        Self::new(
            config,
            transport,
            clock,
            authorization.device_code(),
            authorization.interval(),
            authorization.expires_at(),
        )
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub fn status(&self) -> PollStatus {
        self.status
    }

    /// Token requests issued so far.
    pub fn requests_sent(&self) -> u32 {
        self.requests_sent
    }

    /// Poll until a terminal outcome.
    pub async fn run(&mut self) -> Result<AccessToken> {
        loop {
            if let ControlFlow::Break(outcome) = self.step().await {
                return outcome;
            }
        }
    }

    /// Poll until a terminal outcome or until `cancel` fires.
    ///
    /// Cancellation drops the in-flight sleep or request and leaves the
    /// poller in [`PollStatus::Cancelled`].
    pub async fn run_until_cancelled(&mut self, cancel: &CancellationToken) -> Result<AccessToken> {
        loop {
            if let Some(outcome) = &self.outcome {
                return outcome.clone();
            }
            if cancel.is_cancelled() {
                return self.cancel();
            }

            let flow = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                flow = self.step() => Some(flow),
            };

            match flow {
                None => return self.cancel(),
                Some(ControlFlow::Break(outcome)) => return outcome,
                Some(ControlFlow::Continue(())) => {}
            }
        }
    }

    /// Run exactly one iteration of the polling loop.
    ///
    /// After a terminal transition every call returns the same outcome
    /// without touching the network.
    pub async fn step(&mut self) -> ControlFlow<Result<AccessToken>> {
        if let Some(outcome) = &self.outcome {
            return ControlFlow::Break(outcome.clone());
        }
        self.status = PollStatus::Polling;

        let Some(remaining) = self.state.remaining(self.clock.now()) else {
            return self.finish(Err(self.timed_out()));
        };

        self.clock.sleep(self.state.interval().min(remaining)).await;

        let Some(remaining) = self.state.remaining(self.clock.now()) else {
            return self.finish(Err(self.timed_out()));
        };
        let request_timeout = self.config.poll.request_timeout.min(remaining);

        let server = &self.config.server;
        let form = [
            ("client_id", server.client_id()),
            ("grant_type", DEVICE_CODE_GRANT_TYPE),
            ("device_code", self.device_code.as_str()),
        ];
        self.requests_sent += 1;
        debug!(
            endpoint = %server.token_endpoint(),
            attempt = self.requests_sent,
            "requesting device access token"
        );

        let sent = with_timeout(
            request_timeout,
            self.transport.post_form(server.token_endpoint(), &form),
        )
        .await;

        match sent {
            Ok(resp) => self.handle_response(&resp),
            Err(e) if e.is_timeout() => {
                self.state.back_off();
                debug!(
                    interval_ms = self.state.interval_ms() as u64,
                    "token request timed out, slowing down"
                );
                ControlFlow::Continue(())
            }
            Err(e) => self.finish(Err(AuthError::transport(Endpoint::Token, e))),
        }
    }

    fn handle_response(&mut self, resp: &HttpResponse) -> ControlFlow<Result<AccessToken>> {
        let invalid = |e| AuthError::validation(Endpoint::Token, e);
        let body = match resp.json() {
            Ok(body) => body,
            Err(e) => return self.finish(Err(invalid(e))),
        };

        if resp.is_success() {
            let outcome = AccessToken::from_response(&body).map_err(invalid);
            return self.finish(outcome);
        }

        let error = match classify(&body) {
            Ok(error) => error,
            Err(e) => return self.finish(Err(invalid(e))),
        };

        match error.code() {
            OAuthErrorCode::AuthorizationPending => {
                debug!(
                    interval_ms = self.state.interval_ms() as u64,
                    "authorization pending"
                );
                ControlFlow::Continue(())
            }
            OAuthErrorCode::SlowDown => {
                self.state.slow_down(self.config.poll.slow_down_increment);
                debug!(
                    interval_ms = self.state.interval_ms() as u64,
                    "authorization server asked to slow down"
                );
                ControlFlow::Continue(())
            }
            _ => self.finish(Err(AuthError::protocol(Endpoint::Token, error))),
        }
    }

    fn timed_out(&self) -> AuthError {
        AuthError::Timeout {
            deadline: self.state.deadline(),
        }
    }

    fn cancel(&mut self) -> Result<AccessToken> {
        debug!(requests = self.requests_sent, "polling cancelled");
        self.status = PollStatus::Cancelled;
        self.outcome = Some(Err(AuthError::Cancelled));
        Err(AuthError::Cancelled)
    }

    fn finish(&mut self, outcome: Result<AccessToken>) -> ControlFlow<Result<AccessToken>> {
        match &outcome {
            Ok(token) => {
                self.status = PollStatus::Succeeded;
                info!(
                    requests = self.requests_sent,
                    scope = token.scope().unwrap_or(""),
                    "device authorization completed"
                );
            }
            Err(e) => {
                self.status = PollStatus::Failed;
                warn!(requests = self.requests_sent, error = %e, "polling failed");
            }
        }
        self.outcome = Some(outcome.clone());
        ControlFlow::Break(outcome)
    }
}
