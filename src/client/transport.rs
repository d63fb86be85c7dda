//! HTTP transport used by the device-flow clients.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use crate::error::TransportError;
use crate::oauth::schema::{parse_object, ValidationError};

/// A received HTTP response. The body is kept as text; callers decide
/// whether it needs to be JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Any 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parse the body as a JSON object.
    pub fn json(&self) -> Result<Value, ValidationError> {
        parse_object(&self.body)
    }
}

/// Sends `application/x-www-form-urlencoded` POST requests.
///
/// Implementations report failures structurally: a timeout must come back
/// as a [`TransportError`] whose kind is `Timeout`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_form(
        &self,
        url: &Url,
        form: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_form(
        &self,
        url: &Url,
        form: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError> {
        let resp = self
            .client
            .post(url.clone())
            .header("Accept", "application/json")
            .form(form)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        Ok(HttpResponse { status, body })
    }
}
