#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use device_grant::client::{HttpResponse, Transport};
use device_grant::config::{AuthorizationServer, ClientConfig};
use device_grant::error::TransportError;
use device_grant::util::clock::ManualClock;
use reqwest::StatusCode;
use serde_json::{json, Value};
use url::Url;
use wiremock::MockServer;

pub const CLIENT_ID: &str = "cl_test";

/// A recorded outgoing request.
#[derive(Debug, Clone)]
pub struct SentRequest {
    pub url: String,
    pub form: Vec<(String, String)>,
}

impl SentRequest {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// What the scripted transport does for one request.
pub enum Scripted {
    Respond(Result<HttpResponse, TransportError>),
    /// Never completes.
    Hang,
    /// Run a hook, then never complete.
    HangAfter(Box<dyn Fn() + Send + Sync>),
}

/// In-memory transport that replays a fixed script and records requests.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    sent: Mutex<Vec<SentRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, step: Scripted) -> &Self {
        self.script.lock().expect("script lock poisoned").push_back(step);
        self
    }

    pub fn respond(&self, status: u16, body: Value) -> &Self {
        self.push(Scripted::Respond(Ok(HttpResponse::new(
            StatusCode::from_u16(status).expect("status"),
            body.to_string(),
        ))))
    }

    pub fn respond_raw(&self, status: u16, body: &str) -> &Self {
        self.push(Scripted::Respond(Ok(HttpResponse::new(
            StatusCode::from_u16(status).expect("status"),
            body,
        ))))
    }

    pub fn fail(&self, error: TransportError) -> &Self {
        self.push(Scripted::Respond(Err(error)))
    }

    pub fn oauth_error(&self, code: &str) -> &Self {
        self.respond(400, json!({ "error": code }))
    }

    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().expect("sent lock poisoned").clone()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().expect("script lock poisoned").len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_form(
        &self,
        url: &Url,
        form: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError> {
        self.sent.lock().expect("sent lock poisoned").push(SentRequest {
            url: url.to_string(),
            form: form
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        let step = self
            .script
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .expect("no scripted response left");
        match step {
            Scripted::Respond(result) => result,
            Scripted::Hang => std::future::pending().await,
            Scripted::HangAfter(hook) => {
                hook();
                std::future::pending().await
            }
        }
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(start_time()))
}

pub fn offline_config() -> ClientConfig {
    ClientConfig::new(
        AuthorizationServer::with_endpoints(
            CLIENT_ID,
            "https://auth.test/device",
            "https://auth.test/token",
            "https://auth.test/revoke",
        )
        .expect("config"),
    )
}

pub fn mock_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(
        AuthorizationServer::with_endpoints(
            CLIENT_ID,
            &format!("{}/oauth/device-authorization", server.uri()),
            &format!("{}/oauth/token", server.uri()),
            &format!("{}/oauth/token/revoke", server.uri()),
        )
        .expect("config"),
    )
}

/// Endpoints on a loopback port nothing is listening on.
pub fn unreachable_config() -> ClientConfig {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("bind ephemeral port")
        .port();
    let base = format!("http://127.0.0.1:{port}");
    ClientConfig::new(
        AuthorizationServer::with_endpoints(
            CLIENT_ID,
            &format!("{base}/device"),
            &format!("{base}/token"),
            &format!("{base}/revoke"),
        )
        .expect("config"),
    )
}

pub fn device_authorization_body() -> Value {
    json!({
        "device_code": "dc_4f1c2a",
        "user_code": "WDJB-MJHT",
        "verification_uri": "https://auth.test/device",
        "verification_uri_complete": "https://auth.test/device?user_code=WDJB-MJHT",
        "expires_in": 1800,
        "interval": 5
    })
}

pub fn token_body() -> Value {
    json!({
        "access_token": "at_9b7e",
        "token_type": "Bearer",
        "expires_in": 3600,
        "refresh_token": "rt_51aa",
        "scope": "openid offline_access"
    })
}
