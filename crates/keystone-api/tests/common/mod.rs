#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use http::Response as HttpResponse;
use keystone_common::RequestConfiguration;
use keystone_common::error::TransportError;
use keystone_common::http_client::HttpClient;
use tokio::sync::Mutex;

pub const API_KEY: &str = "APIKey";

#[derive(Clone, Default)]
pub struct MockClient {
    // Queue of HTTP responses to pop for each send_http call
    queue: Arc<Mutex<VecDeque<HttpResponse<Vec<u8>>>>>,
    // Capture requests for assertions
    log: Arc<Mutex<Vec<http::Request<Vec<u8>>>>>,
}

impl MockClient {
    pub async fn push(&self, resp: HttpResponse<Vec<u8>>) {
        self.queue.lock().await.push_back(resp);
    }

    pub async fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push(json_response(status, body)).await;
    }

    pub async fn take_log(&self) -> Vec<http::Request<Vec<u8>>> {
        std::mem::take(&mut *self.log.lock().await)
    }
}

impl HttpClient for MockClient {
    type Error = std::convert::Infallible;

    fn send_http(
        &self,
        request: http::Request<Vec<u8>>,
    ) -> impl core::future::Future<
        Output = core::result::Result<http::Response<Vec<u8>>, Self::Error>,
    > + Send {
        let log = self.log.clone();
        let queue = self.queue.clone();
        async move {
            log.lock().await.push(request);
            Ok(queue.lock().await.pop_front().expect("no queued response"))
        }
    }
}

/// Transport whose connection always fails.
#[derive(Clone, Default)]
pub struct OfflineClient;

impl HttpClient for OfflineClient {
    type Error = std::io::Error;

    fn send_http(
        &self,
        _request: http::Request<Vec<u8>>,
    ) -> impl core::future::Future<
        Output = core::result::Result<http::Response<Vec<u8>>, Self::Error>,
    > + Send {
        async {
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "offline",
            ))
        }
    }
}

/// Transport that reports its own classified timeout.
#[derive(Clone, Default)]
pub struct TimeoutClient;

impl HttpClient for TimeoutClient {
    type Error = TransportError;

    fn send_http(
        &self,
        _request: http::Request<Vec<u8>>,
    ) -> impl core::future::Future<
        Output = core::result::Result<http::Response<Vec<u8>>, Self::Error>,
    > + Send {
        async { Err(TransportError::Timeout) }
    }
}

/// Transport that never answers.
#[derive(Clone, Default)]
pub struct StalledClient;

impl HttpClient for StalledClient {
    type Error = std::convert::Infallible;

    fn send_http(
        &self,
        _request: http::Request<Vec<u8>>,
    ) -> impl core::future::Future<
        Output = core::result::Result<http::Response<Vec<u8>>, Self::Error>,
    > + Send {
        std::future::pending()
    }
}

pub fn json_response(status: u16, body: serde_json::Value) -> HttpResponse<Vec<u8>> {
    HttpResponse::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(serde_json::to_vec(&body).unwrap())
        .unwrap()
}

pub fn error_response(message: &str) -> HttpResponse<Vec<u8>> {
    json_response(
        400,
        serde_json::json!({
            "error": {
                "code": 400,
                "message": message,
                "errors": [{"domain": "global", "reason": "invalid", "message": message}]
            }
        }),
    )
}

pub fn config() -> RequestConfiguration {
    RequestConfiguration::new().api_key(API_KEY).build()
}

pub fn tenant_config(tenant: &str) -> RequestConfiguration {
    RequestConfiguration::new()
        .api_key(API_KEY)
        .tenant_id(tenant)
        .build()
}

pub fn body_json(request: &http::Request<Vec<u8>>) -> serde_json::Value {
    serde_json::from_slice(request.body()).unwrap()
}
