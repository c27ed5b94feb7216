//! # Stateless RPC dispatch and request/response mapping
//!
//! Mapping overview:
//! - Building: the URL comes from the operation's [`Service`] (or the emulator
//!   / host override in [`RequestConfiguration`]), with the API key as the
//!   `key` query parameter unless the operation authenticates with a bearer
//!   token. Shared body fields (`tenantId`) and headers are injected here, not
//!   by the operation.
//! - Success (2xx): the body must be a JSON object; it is handed to the
//!   operation's [`RpcResp::decode_output`]. Any failure there is
//!   [`UnexpectedServerResponse`](crate::AuthErrorKind::UnexpectedServerResponse)
//!   with the [`DecodeError`] as its source.
//! - Failure (non-2xx): the error signal is extracted and normalized through
//!   [`crate::normalize`]. A body with no recognizable error is
//!   [`MalformedResponse`](crate::AuthErrorKind::MalformedResponse).
//! - No response at all: [`NetworkFailure`](crate::AuthErrorKind::NetworkFailure).

use std::future::Future;

use futures::future::{AbortHandle, Aborted, abortable};
use http::{
    HeaderName, HeaderValue, Request,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use crate::AuthorizationToken;
use crate::config::RequestConfiguration;
use crate::error::{AuthError, DecodeError, EncodeError, RpcResult, TransportError};
use crate::http_client::HttpClient;
use crate::normalize::{ServerErrorSignal, normalize};
use crate::value::WireValue;

/// Body key the tenant id is injected under
pub const TENANT_ID_KEY: &str = "tenantId";

/// HTTP method of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcMethod {
    /// Read-only operation, no body (HTTP GET)
    Get,
    /// Operation with a JSON body (HTTP POST)
    Post,
}

impl RpcMethod {
    /// Get the HTTP method string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }

    /// Returns true if this method carries a request body
    pub const fn has_body(&self) -> bool {
        matches!(self, Self::Post)
    }
}

impl From<RpcMethod> for http::Method {
    fn from(value: RpcMethod) -> Self {
        match value {
            RpcMethod::Get => http::Method::GET,
            RpcMethod::Post => http::Method::POST,
        }
    }
}

/// Backend service an operation lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// The v3 relying-party API
    IdentityToolkit,
    /// The v2 API used for multi-factor and tenant-aware operations
    IdentityPlatform,
}

impl Service {
    /// Production host
    pub const fn host(self) -> &'static str {
        match self {
            Self::IdentityToolkit => "www.googleapis.com",
            Self::IdentityPlatform => "identitytoolkit.googleapis.com",
        }
    }

    /// Staging host, used by operations that set [`RpcRequest::STAGING`]
    pub const fn staging_host(self) -> &'static str {
        match self {
            Self::IdentityToolkit => "staging-www.sandbox.googleapis.com",
            Self::IdentityPlatform => "staging-identitytoolkit.sandbox.googleapis.com",
        }
    }

    /// Path prefix endpoints are appended to (no trailing slash)
    pub const fn path_prefix(self) -> &'static str {
        match self {
            Self::IdentityToolkit => "/identitytoolkit/v3/relyingparty",
            Self::IdentityPlatform => "/v2",
        }
    }
}

/// Trait for RPC request types
///
/// Implemented on the request value itself. The associated constants describe
/// where and how the operation is dispatched; `encode_body` produces the
/// operation's own fields only.
pub trait RpcRequest: Serialize {
    /// Endpoint path relative to the service prefix, e.g. `verifyCustomToken`
    const ENDPOINT: &'static str;

    /// HTTP method
    const METHOD: RpcMethod = RpcMethod::Post;

    /// Service hosting the endpoint
    const SERVICE: Service = Service::IdentityToolkit;

    /// Target the staging host instead of production
    const STAGING: bool = false;

    /// Authenticate with a bearer token instead of the API key
    const REQUIRES_AUTHORIZATION: bool = false;

    /// Inject the configured tenant id into the body
    const TENANT_SCOPED: bool = true;

    /// Response type returned from the call (marker struct)
    type Response: RpcResp;

    /// Encode the request body.
    ///
    /// Default implementation goes through serde; absent fields must be
    /// skipped by the type's `skip_serializing_if` attributes.
    fn encode_body(&self) -> Result<WireValue, EncodeError> {
        Ok(WireValue::from_serialize(self)?)
    }
}

/// Trait for RPC response types
pub trait RpcResp {
    /// Endpoint path, mirroring the request side
    const ENDPOINT: &'static str;

    /// Typed success output
    type Output: DeserializeOwned;

    /// Decode the success body, which is always a JSON object.
    ///
    /// Default implementation deserializes via serde. Override for derived fields.
    fn decode_output(body: WireValue) -> Result<Self::Output, DecodeError> {
        Ok(body.deserialize_into()?)
    }
}

/// Typed output of request `R`
pub type RpcOutput<R> = <<R as RpcRequest>::Response as RpcResp>::Output;

/// Per-request options for RPC calls.
#[derive(Debug, Default, Clone)]
pub struct CallOptions {
    /// Authorization to apply; required by operations that set
    /// [`RpcRequest::REQUIRES_AUTHORIZATION`].
    pub auth: Option<AuthorizationToken>,
    /// Extra headers to attach to this request.
    pub extra_headers: Vec<(HeaderName, HeaderValue)>,
}

/// HTTP headers the dispatcher sets
pub enum Header {
    /// Content-Type header
    ContentType,
    /// Authorization header
    Authorization,
    /// `X-Client-Version` header, identifying the SDK build
    ClientVersion,
    /// `X-Firebase-Locale` header, used by the backend to localize messages
    Locale,
    /// `X-Firebase-GMPID` header, the app id
    AppId,
}

impl From<Header> for HeaderName {
    fn from(value: Header) -> Self {
        match value {
            Header::ContentType => CONTENT_TYPE,
            Header::Authorization => AUTHORIZATION,
            Header::ClientVersion => HeaderName::from_static("x-client-version"),
            Header::Locale => HeaderName::from_static("x-firebase-locale"),
            Header::AppId => HeaderName::from_static("x-firebase-gmpid"),
        }
    }
}

/// Extension for stateless RPC calls on any `HttpClient`.
///
/// Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use keystone_common::RequestConfiguration;
/// use keystone_common::rpc::RpcExt;
///
/// let http = reqwest::Client::new();
/// let config = RequestConfiguration::new().api_key("APIKey").build();
/// let call = http.rpc(&config);
/// // let output = call.send(&request).await?;
/// # Ok(())
/// # }
/// ```
pub trait RpcExt: HttpClient {
    /// Start building an RPC call with the given configuration.
    fn rpc<'a>(&'a self, config: &'a RequestConfiguration) -> RpcCall<'a, Self>
    where
        Self: Sized,
    {
        RpcCall {
            client: self,
            config,
            opts: CallOptions::default(),
        }
    }
}

impl<T: HttpClient> RpcExt for T {}

/// Stateless RPC call builder.
pub struct RpcCall<'a, C: HttpClient> {
    pub(crate) client: &'a C,
    pub(crate) config: &'a RequestConfiguration,
    pub(crate) opts: CallOptions,
}

impl<'a, C: HttpClient> RpcCall<'a, C> {
    /// Apply Authorization to this call.
    pub fn auth(mut self, token: AuthorizationToken) -> Self {
        self.opts.auth = Some(token);
        self
    }
    /// Add an extra header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.opts.extra_headers.push((name, value));
        self
    }
    /// Replace the builder's options entirely.
    pub fn with_options(mut self, opts: CallOptions) -> Self {
        self.opts = opts;
        self
    }

    /// Send the given typed request and decode its output.
    ///
    /// The transport is invoked exactly once. Every outcome, including
    /// transport and decode failures, resolves to a single [`AuthError`].
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self, request), fields(endpoint = R::ENDPOINT)))]
    pub async fn send<R>(self, request: &R) -> RpcResult<RpcOutput<R>>
    where
        R: RpcRequest,
    {
        let http_request = build_http_request(self.config, request, &self.opts)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(uri = %http_request.uri(), method = R::METHOD.as_str(), "sending request");

        let http_response = self
            .client
            .send_http(http_request)
            .await
            .map_err(|e| {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, "transport failed");
                AuthError::from(TransportError::from_client_error(e)).with_endpoint(R::ENDPOINT)
            })?;

        process_response::<R::Response>(http_response)
    }

    /// Send the request and hand the outcome to `callback`, exactly once.
    pub async fn send_with_callback<R, F>(self, request: &R, callback: F)
    where
        R: RpcRequest,
        F: FnOnce(RpcResult<RpcOutput<R>>),
    {
        callback(self.send(request).await)
    }

    /// Send the request with a handle that can cancel it.
    ///
    /// Cancelling drops the in-flight transport future and resolves the call
    /// to [`AuthErrorKind::Cancelled`](crate::AuthErrorKind::Cancelled). Once
    /// the call has resolved, cancelling has no effect.
    pub fn send_cancellable<R>(
        self,
        request: &R,
    ) -> (impl Future<Output = RpcResult<RpcOutput<R>>>, CancelHandle)
    where
        R: RpcRequest,
    {
        let (call, handle) = abortable(self.send(request));
        let call = async move {
            match call.await {
                Ok(outcome) => outcome,
                Err(Aborted) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(endpoint = R::ENDPOINT, "call cancelled");
                    Err(AuthError::cancelled().with_endpoint(R::ENDPOINT))
                }
            }
        };
        (call, CancelHandle(handle))
    }
}

/// Cancels a call started with [`RpcCall::send_cancellable`].
#[derive(Debug, Clone)]
pub struct CancelHandle(AbortHandle);

impl CancelHandle {
    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.abort();
    }

    /// Returns true once [`cancel`](Self::cancel) has been called
    pub fn is_cancelled(&self) -> bool {
        self.0.is_aborted()
    }
}

/// Build the full URL for request type `R`, including the `key` parameter.
pub fn request_url<R>(config: &RequestConfiguration) -> RpcResult<Url>
where
    R: RpcRequest,
{
    let service = R::SERVICE;
    let mut url = if let Some(emulator) = &config.emulator_host {
        // The emulator proxies by production host name, regardless of staging
        Url::parse(&format!(
            "http://{emulator}/{}{}/{}",
            service.host(),
            service.path_prefix(),
            R::ENDPOINT
        ))
    } else if let Some(base) = config.host_override(service) {
        let mut url = base.clone();
        let mut path = url.path().trim_end_matches('/').to_owned();
        path.push_str(service.path_prefix());
        path.push('/');
        path.push_str(R::ENDPOINT);
        url.set_path(&path);
        url.set_query(None);
        Ok(url)
    } else {
        let host = if R::STAGING {
            service.staging_host()
        } else {
            service.host()
        };
        Url::parse(&format!(
            "https://{host}{}/{}",
            service.path_prefix(),
            R::ENDPOINT
        ))
    }
    .map_err(|e| {
        AuthError::internal(format!("could not build URL for {}", R::ENDPOINT))
            .with_source(e)
            .with_endpoint(R::ENDPOINT)
    })?;

    if !R::REQUIRES_AUTHORIZATION {
        url.query_pairs_mut().append_pair("key", &config.api_key);
    }
    Ok(url)
}

fn header_value(text: &str, what: &str) -> RpcResult<HeaderValue> {
    HeaderValue::from_str(text)
        .map_err(|e| AuthError::internal(format!("invalid {what} header value")).with_source(e))
}

/// Build an HTTP request for an RPC call given configuration and options
pub fn build_http_request<R>(
    config: &RequestConfiguration,
    req: &R,
    opts: &CallOptions,
) -> RpcResult<Request<Vec<u8>>>
where
    R: RpcRequest,
{
    let url = request_url::<R>(config)?;

    let mut builder = Request::builder()
        .method(http::Method::from(R::METHOD))
        .uri(url.as_str());

    if R::METHOD.has_body() {
        builder = builder.header(Header::ContentType, "application/json");
    }

    if let Some(version) = &config.client_version {
        builder = builder.header(Header::ClientVersion, header_value(version, "client version")?);
    }
    if let Some(locale) = &config.language_code {
        builder = builder.header(Header::Locale, header_value(locale.as_str(), "locale")?);
    }
    if let Some(app_id) = &config.app_id {
        builder = builder.header(Header::AppId, header_value(app_id, "app id")?);
    }

    match &opts.auth {
        Some(AuthorizationToken::Bearer(token)) => {
            let hv = header_value(&format!("Bearer {token}"), "authorization")?;
            builder = builder.header(Header::Authorization, hv);
        }
        None if R::REQUIRES_AUTHORIZATION => {
            return Err(AuthError::internal(format!(
                "{} requires a bearer token but none was supplied",
                R::ENDPOINT
            ))
            .with_endpoint(R::ENDPOINT));
        }
        None => {}
    }

    for (name, value) in config.extra_headers.iter().chain(&opts.extra_headers) {
        builder = builder.header(name, value);
    }

    let body = if R::METHOD.has_body() {
        let mut body = req
            .encode_body()?
            .into_object()
            .map_err(|other| EncodeError::NotAnObject(other.wire_type()))?;
        if R::TENANT_SCOPED {
            if let Some(tenant) = &config.tenant_id {
                body.insert(TENANT_ID_KEY, tenant.clone());
            }
        }
        WireValue::Object(body)
            .to_vec()
            .map_err(EncodeError::from)?
    } else {
        Vec::new()
    };

    builder.body(body).map_err(|e| {
        AuthError::internal("could not assemble HTTP request")
            .with_source(TransportError::InvalidRequest(e.to_string()))
            .with_endpoint(R::ENDPOINT)
    })
}

/// Process the HTTP response from the server into a typed output statelessly.
///
/// Exposed to make things more easily pluggable
pub fn process_response<Resp>(http_response: http::Response<Vec<u8>>) -> RpcResult<Resp::Output>
where
    Resp: RpcResp,
{
    let status = http_response.status();
    let body = http_response.into_body();
    let parsed = WireValue::from_slice(&body);

    if status.is_success() {
        let outcome = parsed
            .map_err(DecodeError::from)
            .and_then(|value| match value {
                WireValue::Object(_) => Resp::decode_output(value),
                other => Err(DecodeError::NotAnObject(other.wire_type())),
            });
        return match outcome {
            Ok(output) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(status = %status, endpoint = Resp::ENDPOINT, "call succeeded");
                Ok(output)
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, endpoint = Resp::ENDPOINT, "could not decode success body");
                Err(AuthError::undecodable(e)
                    .with_status(status)
                    .with_endpoint(Resp::ENDPOINT))
            }
        };
    }

    let signal = parsed.ok().as_ref().and_then(ServerErrorSignal::extract);
    let err = match signal {
        Some(signal) => normalize(&signal),
        None => AuthError::malformed(),
    }
    .with_status(status)
    .with_endpoint(Resp::ENDPOINT);

    #[cfg(feature = "tracing")]
    tracing::debug!(status = %status, kind = ?err.kind(), endpoint = Resp::ENDPOINT, "call failed");

    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthErrorKind;
    use crate::locale::LanguageCode;
    use serde::{Deserialize, Serialize};
    use smol_str::SmolStr;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct EchoRequest {
        player_id: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        display_name: Option<&'static str>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct EchoOutput {
        local_id: Option<String>,
    }

    struct EchoResponse;

    impl RpcResp for EchoResponse {
        const ENDPOINT: &'static str = "echo";
        type Output = EchoOutput;
    }

    impl RpcRequest for EchoRequest {
        const ENDPOINT: &'static str = "echo";
        type Response = EchoResponse;
    }

    #[derive(Serialize)]
    struct StagingRequest {}

    impl RpcRequest for StagingRequest {
        const ENDPOINT: &'static str = "echo";
        const STAGING: bool = true;
        const TENANT_SCOPED: bool = false;
        type Response = EchoResponse;
    }

    #[derive(Serialize)]
    struct PlatformRequest {}

    impl RpcRequest for PlatformRequest {
        const ENDPOINT: &'static str = "accounts/mfaSignIn:start";
        const SERVICE: Service = Service::IdentityPlatform;
        type Response = EchoResponse;
    }

    #[derive(Serialize)]
    struct AuthorizedRequest {}

    impl RpcRequest for AuthorizedRequest {
        const ENDPOINT: &'static str = "echo";
        const REQUIRES_AUTHORIZATION: bool = true;
        type Response = EchoResponse;
    }

    #[derive(Serialize)]
    struct ReadRequest {}

    impl RpcRequest for ReadRequest {
        const ENDPOINT: &'static str = "echo";
        const METHOD: RpcMethod = RpcMethod::Get;
        type Response = EchoResponse;
    }

    #[derive(Serialize)]
    struct ListRequest {}

    impl RpcRequest for ListRequest {
        const ENDPOINT: &'static str = "echo";
        type Response = EchoResponse;

        fn encode_body(&self) -> Result<WireValue, EncodeError> {
            Ok(WireValue::from(vec![WireValue::from(1i64)]))
        }
    }

    fn config() -> RequestConfiguration {
        RequestConfiguration::new().api_key("APIKey").build()
    }

    fn echo() -> EchoRequest {
        EchoRequest {
            player_id: "p1",
            display_name: None,
        }
    }

    fn body_of(req: &Request<Vec<u8>>) -> serde_json::Value {
        serde_json::from_slice(req.body()).unwrap()
    }

    fn response(status: u16, body: &str) -> http::Response<Vec<u8>> {
        http::Response::builder()
            .status(status)
            .body(body.as_bytes().to_vec())
            .unwrap()
    }

    #[test]
    fn identity_toolkit_url() {
        let url = request_url::<EchoRequest>(&config()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/identitytoolkit/v3/relyingparty/echo?key=APIKey"
        );
    }

    #[test]
    fn staging_url() {
        let url = request_url::<StagingRequest>(&config()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://staging-www.sandbox.googleapis.com/identitytoolkit/v3/relyingparty/echo?key=APIKey"
        );
    }

    #[test]
    fn identity_platform_url() {
        let url = request_url::<PlatformRequest>(&config()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://identitytoolkit.googleapis.com/v2/accounts/mfaSignIn:start?key=APIKey"
        );
    }

    #[test]
    fn emulator_url_keeps_production_host_in_path() {
        let config = RequestConfiguration::new()
            .api_key("APIKey")
            .emulator_host("127.0.0.1:9099")
            .build();
        let url = request_url::<StagingRequest>(&config).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9099/www.googleapis.com/identitytoolkit/v3/relyingparty/echo?key=APIKey"
        );
        let url = request_url::<PlatformRequest>(&config).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9099/identitytoolkit.googleapis.com/v2/accounts/mfaSignIn:start?key=APIKey"
        );
    }

    #[test]
    fn host_override_replaces_origin() {
        let config = RequestConfiguration::new()
            .api_key("APIKey")
            .identity_toolkit_host(Url::parse("https://proxy.example.test/auth/").unwrap())
            .build();
        let url = request_url::<EchoRequest>(&config).unwrap();
        assert_eq!(
            url.as_str(),
            "https://proxy.example.test/auth/identitytoolkit/v3/relyingparty/echo?key=APIKey"
        );
        // Only the overridden service moves
        let url = request_url::<PlatformRequest>(&config).unwrap();
        assert_eq!(url.host_str(), Some("identitytoolkit.googleapis.com"));
    }

    #[test]
    fn post_body_and_shared_headers() {
        let config = RequestConfiguration::new()
            .api_key("APIKey")
            .client_version("keystone/0.3.0")
            .language_code(LanguageCode::new("de").unwrap())
            .app_id("1:123:ios:abc")
            .extra_headers(vec![(
                HeaderName::from_static("x-extra"),
                HeaderValue::from_static("config"),
            )])
            .build();
        let opts = CallOptions {
            auth: None,
            extra_headers: vec![(
                HeaderName::from_static("x-call"),
                HeaderValue::from_static("call"),
            )],
        };
        let req = build_http_request(&config, &echo(), &opts).unwrap();

        assert_eq!(req.method(), http::Method::POST);
        let headers = req.headers();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers["x-client-version"], "keystone/0.3.0");
        assert_eq!(headers["x-firebase-locale"], "de");
        assert_eq!(headers["x-firebase-gmpid"], "1:123:ios:abc");
        assert_eq!(headers["x-extra"], "config");
        assert_eq!(headers["x-call"], "call");
        assert!(!headers.contains_key(AUTHORIZATION));

        assert_eq!(body_of(&req), serde_json::json!({"playerId": "p1"}));
        assert_eq!(req.body().as_slice(), br#"{"playerId":"p1"}"#);
    }

    #[test]
    fn tenant_is_injected_only_when_scoped() {
        let config = RequestConfiguration::new()
            .api_key("APIKey")
            .tenant_id("tenant-a")
            .build();

        let req = build_http_request(&config, &echo(), &CallOptions::default()).unwrap();
        assert_eq!(
            body_of(&req),
            serde_json::json!({"playerId": "p1", "tenantId": "tenant-a"})
        );

        let req = build_http_request(&config, &StagingRequest {}, &CallOptions::default()).unwrap();
        assert!(body_of(&req).get(TENANT_ID_KEY).is_none());
    }

    #[test]
    fn get_has_no_body() {
        let config = RequestConfiguration::new()
            .api_key("APIKey")
            .tenant_id("tenant-a")
            .build();
        let req = build_http_request(&config, &ReadRequest {}, &CallOptions::default()).unwrap();
        assert_eq!(req.method(), http::Method::GET);
        assert!(req.body().is_empty());
        assert!(!req.headers().contains_key(CONTENT_TYPE));
    }

    #[test]
    fn bearer_replaces_api_key() {
        let opts = CallOptions {
            auth: Some(AuthorizationToken::Bearer(SmolStr::new("ID_TOKEN"))),
            extra_headers: vec![],
        };
        let req = build_http_request(&config(), &AuthorizedRequest {}, &opts).unwrap();
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer ID_TOKEN");
        assert_eq!(req.uri().query(), None);
    }

    #[test]
    fn missing_bearer_is_internal_error() {
        let err = build_http_request(&config(), &AuthorizedRequest {}, &CallOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), AuthErrorKind::InternalError);
        assert_eq!(err.endpoint(), Some("echo"));
        assert_eq!(err.detail(), None);
        assert!(err.help_text().is_some_and(|h| h.contains("bearer token")));
    }

    #[test]
    fn non_object_body_is_internal_error() {
        let err = build_http_request(&config(), &ListRequest {}, &CallOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), AuthErrorKind::InternalError);
    }

    #[test]
    fn success_decodes() {
        let out = process_response::<EchoResponse>(response(200, r#"{"localId":"u1"}"#)).unwrap();
        assert_eq!(
            out,
            EchoOutput {
                local_id: Some("u1".into())
            }
        );
    }

    #[test]
    fn success_with_bad_body_is_unexpected() {
        for body in ["not json", "[1,2]", r#""text""#, r#"{"localId": 5}"#] {
            let err = process_response::<EchoResponse>(response(200, body)).unwrap_err();
            assert_eq!(err.kind(), AuthErrorKind::UnexpectedServerResponse, "body {body}");
            assert_eq!(err.status(), Some(http::StatusCode::OK));
            assert_eq!(err.raw_code(), None);
            let source = err.source_err().expect("decode error kept as source");
            assert!(source.downcast_ref::<DecodeError>().is_some());
        }
    }

    #[test]
    fn failure_is_normalized() {
        let err = process_response::<EchoResponse>(response(
            400,
            r#"{"error":{"code":400,"message":"USER_DISABLED : gone"}}"#,
        ))
        .unwrap_err();
        assert_eq!(err.kind(), AuthErrorKind::UserDisabled);
        assert_eq!(err.detail(), Some("gone"));
        assert_eq!(err.status(), Some(http::StatusCode::BAD_REQUEST));
        assert_eq!(err.endpoint(), Some("echo"));
    }

    #[test]
    fn failure_without_signal_is_malformed() {
        for body in ["", "<html>bad gateway</html>", r#"{"nope":true}"#] {
            let err = process_response::<EchoResponse>(response(502, body)).unwrap_err();
            assert_eq!(err.kind(), AuthErrorKind::MalformedResponse);
            assert_eq!(err.detail(), None);
            assert_eq!(err.status(), Some(http::StatusCode::BAD_GATEWAY));
        }
    }
}
