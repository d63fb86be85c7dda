//! The whole flow through [`DeviceFlow`]: authorize, poll, revoke.

mod auth_support;

use std::sync::Arc;
use std::time::Duration;

use device_grant::prelude::*;
use device_grant::util::clock::ManualClock;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_support::{
    device_authorization_body, manual_clock, mock_config, offline_config, token_body,
    ScriptedTransport,
};

fn flow(config: ClientConfig, clock: &Arc<ManualClock>) -> DeviceFlow {
    DeviceFlow::new(config).with_clock(clock.clone())
}

#[tokio::test]
async fn login_and_logout_against_mock_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/device-authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_authorization_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "slow_down"
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token/revoke"))
        .and(body_string_contains("token=at_9b7e"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let clock = manual_clock();
    let flow = flow(mock_config(&server), &clock);

    let authorization = flow
        .request_device_authorization(Some("openid"))
        .await
        .expect("device authorization");
    let mut poller = flow.poller(&authorization);
    assert_eq!(poller.state().deadline(), authorization.expires_at());

    let token = poller
        .run_until_cancelled(&CancellationToken::new())
        .await
        .expect("token");
    assert_eq!(token.access_token(), "at_9b7e");
    assert_eq!(token.scopes(), vec!["openid", "offline_access"]);
    assert_eq!(
        clock.sleeps(),
        vec![Duration::from_secs(5), Duration::from_secs(10)]
    );

    flow.revoke(token.access_token()).await.expect("revoked");
}

#[tokio::test]
async fn serialized_authorization_hides_device_code() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.respond(200, device_authorization_body());
    let clock = manual_clock();
    let flow = flow(offline_config(), &clock).with_transport(transport.clone());

    let authorization = flow
        .request_device_authorization(None)
        .await
        .expect("device authorization");
    let value = serde_json::to_value(&authorization).expect("serialize");

    assert!(value.get("device_code").is_none());
    assert_eq!(value["user_code"], "WDJB-MJHT");
    assert_eq!(value["expires_at"], "2024-06-01T12:30:00Z");
}

#[tokio::test]
async fn token_debug_output_is_redacted() {
    let transport = Arc::new(ScriptedTransport::new());
    transport
        .respond(200, device_authorization_body())
        .respond(200, token_body());
    let clock = manual_clock();
    let flow = flow(offline_config(), &clock).with_transport(transport.clone());

    let authorization = flow
        .request_device_authorization(None)
        .await
        .expect("device authorization");
    let token = flow.poller(&authorization).run().await.expect("token");

    let debug = format!("{token:?}");
    assert!(!debug.contains("at_9b7e"));
    assert!(!debug.contains("rt_51aa"));
    assert_eq!(transport.sent()[1].field("device_code"), Some("dc_4f1c2a"));
}
