mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{
    API_KEY, MockClient, OfflineClient, StalledClient, TimeoutClient, config, json_response,
};
use http::{HeaderName, HeaderValue};
use keystone_api::{GetProjectConfig, VerifyCustomToken};
use keystone_common::locale::LanguageCode;
use keystone_common::rpc::RpcExt;
use keystone_common::error::TransportError;
use keystone_common::{AuthErrorKind, ErrorCategory, RequestConfiguration};

#[tokio::test]
async fn shared_headers_are_attached() {
    let client = MockClient::default();
    client
        .push(json_response(200, serde_json::json!({})))
        .await;

    let config = RequestConfiguration::new()
        .api_key(API_KEY)
        .client_version("iOS/FirebaseSDK/11.0.0")
        .language_code(LanguageCode::new("en-GB").unwrap())
        .app_id("1:1234567890:ios:abcdef")
        .extra_headers(vec![(
            HeaderName::from_static("x-ios-bundle-identifier"),
            HeaderValue::from_static("com.example.app"),
        )])
        .build();
    client
        .rpc(&config)
        .header(
            HeaderName::from_static("x-firebase-appcheck"),
            HeaderValue::from_static("APP_CHECK"),
        )
        .send(&GetProjectConfig)
        .await
        .unwrap();

    let log = client.take_log().await;
    let headers = log[0].headers();
    assert_eq!(headers["x-client-version"], "iOS/FirebaseSDK/11.0.0");
    assert_eq!(headers["x-firebase-locale"], "en-GB");
    assert_eq!(headers["x-firebase-gmpid"], "1:1234567890:ios:abcdef");
    assert_eq!(headers["x-ios-bundle-identifier"], "com.example.app");
    assert_eq!(headers["x-firebase-appcheck"], "APP_CHECK");
}

#[tokio::test]
async fn transport_failure_is_network_failure() {
    let config = config();
    let client = OfflineClient;
    let err = client
        .rpc(&config)
        .send(&GetProjectConfig)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::NetworkFailure);
    assert_eq!(err.kind().category(), ErrorCategory::Transport);
    assert_eq!(err.status(), None);
    let source = err.source_err().unwrap();
    let transport = source.downcast_ref::<TransportError>().unwrap();
    let TransportError::Other(inner) = transport else {
        panic!("foreign errors are boxed, got {transport:?}");
    };
    assert!(inner.downcast_ref::<std::io::Error>().is_some());
}

#[tokio::test]
async fn transport_classification_is_kept() {
    let config = config();
    let client = TimeoutClient;
    let err = client
        .rpc(&config)
        .send(&GetProjectConfig)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::NetworkFailure);
    assert_eq!(err.endpoint(), Some("getProjectConfig"));
    let source = err.source_err().unwrap();
    assert!(matches!(
        source.downcast_ref::<TransportError>(),
        Some(TransportError::Timeout)
    ));
}

#[tokio::test]
async fn non_json_failure_is_malformed() {
    let client = MockClient::default();
    client
        .push(
            http::Response::builder()
                .status(503)
                .body(b"<html>Service Unavailable</html>".to_vec())
                .unwrap(),
        )
        .await;

    let config = config();
    let err = client
        .rpc(&config)
        .send(&GetProjectConfig)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::MalformedResponse);
    assert_eq!(err.kind().category(), ErrorCategory::Transport);
    assert_eq!(err.status(), Some(http::StatusCode::SERVICE_UNAVAILABLE));
}

#[tokio::test]
async fn callback_fires_once() {
    let client = MockClient::default();
    client
        .push(json_response(
            200,
            serde_json::json!({"projectId": "21141651616"}),
        ))
        .await;

    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let config = config();
    client
        .rpc(&config)
        .send_with_callback(&GetProjectConfig, move |result| {
            seen.fetch_add(1, Ordering::SeqCst);
            assert_eq!(result.unwrap().project_id.as_deref(), Some("21141651616"));
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cancel_in_flight_call() {
    let config = config();
    let request = VerifyCustomToken::new().token("test token").build();
    let client = StalledClient;
    let (call, handle) = client.rpc(&config).send_cancellable(&request);

    assert!(!handle.is_cancelled());
    handle.cancel();
    assert!(handle.is_cancelled());

    let err = call.await.unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::Cancelled);
    assert_eq!(err.endpoint(), Some("verifyCustomToken"));
}

#[tokio::test]
async fn cancel_from_another_task() {
    let config = config();
    let request = VerifyCustomToken::new().token("test token").build();
    let client = StalledClient;
    let (call, handle) = client.rpc(&config).send_cancellable(&request);

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        handle.cancel();
    });

    let err = call.await.unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::Cancelled);
    canceller.await.unwrap();
}

#[tokio::test]
async fn late_cancel_is_ignored() {
    let client = MockClient::default();
    client
        .push(json_response(200, serde_json::json!({"idToken": "ID_TOKEN"})))
        .await;

    let config = config();
    let request = VerifyCustomToken::new().token("test token").build();
    let (call, handle) = client.rpc(&config).send_cancellable(&request);

    let out = call.await.unwrap();
    handle.cancel();
    assert_eq!(out.id_token.as_deref(), Some("ID_TOKEN"));
    assert_eq!(client.take_log().await.len(), 1);
}
