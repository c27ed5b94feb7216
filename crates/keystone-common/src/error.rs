//! Error types for RPC client operations
//!
//! Every call ends in either a typed output or exactly one [`AuthError`]. The
//! lower layers ([`TransportError`], [`EncodeError`], [`DecodeError`]) are kept
//! as the `source` of the resolved error for diagnostics.

use http::StatusCode;
use smol_str::SmolStr;

use crate::value::{ConversionError, WireType};

/// Boxed error used as the source of a resolved [`AuthError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for RPC operations
pub type RpcResult<T> = std::result::Result<T, AuthError>;

/// Transport-level errors that occur during HTTP communication
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum TransportError {
    /// Failed to establish connection to server
    #[error("Connection error: {0}")]
    Connect(String),

    /// Request timed out
    #[error("Request timeout")]
    Timeout,

    /// Request construction failed (malformed URI, headers, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Other transport error
    #[error("Transport error: {0}")]
    Other(BoxError),
}

impl TransportError {
    /// Wrap an error reported by an [`HttpClient`](crate::http_client::HttpClient).
    ///
    /// A client that already reports `TransportError` keeps its classification;
    /// anything else becomes [`TransportError::Other`].
    pub fn from_client_error<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let boxed: BoxError = Box::new(e);
        match boxed.downcast::<TransportError>() {
            Ok(transport) => *transport,
            Err(other) => Self::Other(other),
        }
    }
}

#[cfg(feature = "reqwest-client")]
impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_builder() || e.is_request() {
            Self::InvalidRequest(e.to_string())
        } else {
            Self::Other(Box::new(e))
        }
    }
}

/// Error type for encoding request bodies
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum EncodeError {
    /// Failed to serialize the request into a wire value
    #[error("Failed to serialize request: {0}")]
    Json(
        #[from]
        #[source]
        serde_json::Error,
    ),
    /// Request bodies must be JSON objects so shared fields can be injected
    #[error("request body must be an object, found {0}")]
    #[diagnostic(code(keystone_common::encode::not_an_object))]
    NotAnObject(WireType),
}

/// Response deserialization errors
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum DecodeError {
    /// Body was not valid JSON, or did not match the expected schema
    #[error("Failed to deserialize JSON: {0}")]
    Json(
        #[from]
        #[source]
        serde_json::Error,
    ),
    /// A field was present but could not be converted
    #[error("invalid field `{field}`: {source}")]
    #[diagnostic(code(keystone_common::decode::invalid_field))]
    InvalidField {
        /// Wire name of the field
        field: &'static str,
        /// What went wrong
        #[source]
        source: ConversionError,
    },
    /// Success bodies must be JSON objects
    #[error("expected an object body, found {0}")]
    #[diagnostic(code(keystone_common::decode::not_an_object))]
    NotAnObject(WireType),
}

/// Broad grouping of [`AuthErrorKind`]s.
///
/// Lets callers tell a library or project misconfiguration apart from an
/// error the end user can correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The supplied credential or token was rejected
    Credential,
    /// The account is in a state that prevents the operation
    Account,
    /// Multi-factor sign-in state problems
    MultiFactor,
    /// Caller or project misconfiguration; not user-correctable
    Configuration,
    /// The backend answered with something we do not recognize
    Server,
    /// No usable exchange with the backend took place
    Transport,
}

/// Closed set of normalized error outcomes.
///
/// Backend codes reach these only through the table in
/// [`crate::normalize::SERVER_ERROR_CODES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum AuthErrorKind {
    /// The supplied token or credential is malformed or expired
    #[error("invalid credential")]
    InvalidCredential,
    /// The credential is valid but belongs to a different project or audience
    #[error("credential mismatch")]
    CredentialMismatch,
    /// Library or request misconfiguration (e.g. the API key was never sent)
    #[error("internal error")]
    InternalError,
    /// The configured API key was rejected
    #[error("invalid API key")]
    InvalidApiKey,
    /// The app is not authorized to use this project
    #[error("app not authorized")]
    AppNotAuthorized,
    /// The user's ID token is invalid
    #[error("invalid user token")]
    InvalidUserToken,
    /// The user's ID token has expired
    #[error("user token expired")]
    UserTokenExpired,
    /// The account has been disabled
    #[error("user disabled")]
    UserDisabled,
    /// No account matches the credential
    #[error("user not found")]
    UserNotFound,
    /// The operation needs a fresh sign-in
    #[error("requires recent login")]
    RequiresRecentLogin,
    /// The sign-in method is disabled for this project
    #[error("operation not allowed")]
    OperationNotAllowed,
    /// Too many attempts; the backend is throttling this client
    #[error("too many requests")]
    TooManyRequests,
    /// A project quota was exceeded
    #[error("quota exceeded")]
    QuotaExceeded,
    /// The multi-factor pending credential was not supplied
    #[error("missing multi-factor session")]
    MissingMultiFactorSession,
    /// The multi-factor pending credential is invalid or expired
    #[error("invalid multi-factor session")]
    InvalidMultiFactorSession,
    /// The multi-factor enrollment id was not supplied
    #[error("missing multi-factor info")]
    MissingMultiFactorInfo,
    /// The multi-factor enrollment id does not exist
    #[error("multi-factor info not found")]
    MultiFactorInfoNotFound,
    /// The phone number is malformed
    #[error("invalid phone number")]
    InvalidPhoneNumber,
    /// The phone number was not supplied
    #[error("missing phone number")]
    MissingPhoneNumber,
    /// The captcha response was rejected
    #[error("captcha check failed")]
    CaptchaCheckFailed,
    /// The app verification credential was rejected
    #[error("invalid app credential")]
    InvalidAppCredential,
    /// The app verification credential was not supplied
    #[error("missing app credential")]
    MissingAppCredential,
    /// The tenant of the credential differs from the configured tenant
    #[error("tenant id mismatch")]
    TenantIdMismatch,
    /// The operation is not supported for tenants
    #[error("unsupported tenant operation")]
    UnsupportedTenantOperation,
    /// The backend returned an error code we do not recognize, or a success
    /// body that does not decode into the operation's output
    #[error("unexpected server response")]
    UnexpectedServerResponse,
    /// A failed response carried no recognizable error body
    #[error("malformed response")]
    MalformedResponse,
    /// The transport could not complete the exchange
    #[error("network failure")]
    NetworkFailure,
    /// The call was cancelled before it completed
    #[error("cancelled")]
    Cancelled,
}

impl AuthErrorKind {
    /// Every kind, for exhaustive table checks.
    pub const ALL: &'static [AuthErrorKind] = &[
        AuthErrorKind::InvalidCredential,
        AuthErrorKind::CredentialMismatch,
        AuthErrorKind::InternalError,
        AuthErrorKind::InvalidApiKey,
        AuthErrorKind::AppNotAuthorized,
        AuthErrorKind::InvalidUserToken,
        AuthErrorKind::UserTokenExpired,
        AuthErrorKind::UserDisabled,
        AuthErrorKind::UserNotFound,
        AuthErrorKind::RequiresRecentLogin,
        AuthErrorKind::OperationNotAllowed,
        AuthErrorKind::TooManyRequests,
        AuthErrorKind::QuotaExceeded,
        AuthErrorKind::MissingMultiFactorSession,
        AuthErrorKind::InvalidMultiFactorSession,
        AuthErrorKind::MissingMultiFactorInfo,
        AuthErrorKind::MultiFactorInfoNotFound,
        AuthErrorKind::InvalidPhoneNumber,
        AuthErrorKind::MissingPhoneNumber,
        AuthErrorKind::CaptchaCheckFailed,
        AuthErrorKind::InvalidAppCredential,
        AuthErrorKind::MissingAppCredential,
        AuthErrorKind::TenantIdMismatch,
        AuthErrorKind::UnsupportedTenantOperation,
        AuthErrorKind::UnexpectedServerResponse,
        AuthErrorKind::MalformedResponse,
        AuthErrorKind::NetworkFailure,
        AuthErrorKind::Cancelled,
    ];

    /// The category this kind belongs to
    pub const fn category(self) -> ErrorCategory {
        use AuthErrorKind::*;
        match self {
            InvalidCredential | CredentialMismatch | InvalidUserToken | UserTokenExpired
            | InvalidPhoneNumber | MissingPhoneNumber | CaptchaCheckFailed
            | InvalidAppCredential | MissingAppCredential => ErrorCategory::Credential,
            UserDisabled | UserNotFound | RequiresRecentLogin | TooManyRequests
            | TenantIdMismatch => ErrorCategory::Account,
            MissingMultiFactorSession
            | InvalidMultiFactorSession
            | MissingMultiFactorInfo
            | MultiFactorInfoNotFound => ErrorCategory::MultiFactor,
            InternalError | InvalidApiKey | AppNotAuthorized | OperationNotAllowed
            | QuotaExceeded | UnsupportedTenantOperation => ErrorCategory::Configuration,
            UnexpectedServerResponse => ErrorCategory::Server,
            MalformedResponse | NetworkFailure | Cancelled => ErrorCategory::Transport,
        }
    }

    /// True when the failure is attributable to the app or library setup
    /// rather than to anything the end user supplied.
    pub const fn is_configuration_error(self) -> bool {
        matches!(self.category(), ErrorCategory::Configuration)
    }
}

/// A resolved RPC failure: a machine-checkable kind plus the server's detail text.
///
/// `detail` distinguishes "no detail" (`None`, the backend message had no
/// colon) from "empty detail" (`Some("")`, a colon with nothing after it).
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("{kind}{}", fmt_detail(.detail))]
#[diagnostic(code(keystone_common::auth))]
pub struct AuthError {
    kind: AuthErrorKind,
    detail: Option<SmolStr>,
    raw_code: Option<SmolStr>,
    status: Option<StatusCode>,
    endpoint: Option<&'static str>,
    #[source]
    source: Option<BoxError>,
    #[help]
    help: Option<SmolStr>,
}

fn fmt_detail(detail: &Option<SmolStr>) -> String {
    match detail {
        Some(d) if !d.is_empty() => format!(": {d}"),
        _ => String::new(),
    }
}

impl AuthError {
    /// Create a new error with the given kind
    pub fn new(kind: AuthErrorKind) -> Self {
        Self {
            kind,
            detail: None,
            raw_code: None,
            status: None,
            endpoint: None,
            source: None,
            help: None,
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    /// Get the detail text, if the backend provided any
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Get the raw backend code, kept for diagnostics
    pub fn raw_code(&self) -> Option<&str> {
        self.raw_code.as_deref()
    }

    /// Get the HTTP status of the failed response, if one was received
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Get the endpoint path of the failed call, if known
    pub fn endpoint(&self) -> Option<&'static str> {
        self.endpoint
    }

    /// Get the source error if present
    pub fn source_err(&self) -> Option<&BoxError> {
        self.source.as_ref()
    }

    /// Add detail text to this error
    pub fn with_detail(mut self, detail: impl Into<SmolStr>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add the raw backend code to this error
    pub fn with_raw_code(mut self, code: impl Into<SmolStr>) -> Self {
        self.raw_code = Some(code.into());
        self
    }

    /// Add the HTTP status to this error
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Add the endpoint path to this error
    pub fn with_endpoint(mut self, endpoint: &'static str) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Attach an underlying error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Add help text to this error
    pub fn with_help(mut self, help: impl Into<SmolStr>) -> Self {
        self.help = Some(help.into());
        self
    }

    // Constructors for the kinds that never come from the code table

    /// The transport failed before any HTTP response arrived
    pub fn network(source: TransportError) -> Self {
        Self::new(AuthErrorKind::NetworkFailure)
            .with_source(source)
            .with_help("check connectivity; the request may or may not have reached the backend")
    }

    /// A success body did not decode into the expected output
    pub fn undecodable(source: DecodeError) -> Self {
        Self::new(AuthErrorKind::UnexpectedServerResponse)
            .with_source(source)
            .with_help("the backend reported success but the body did not have the expected shape")
    }

    /// A failed response had no error body we could read
    pub fn malformed() -> Self {
        Self::new(AuthErrorKind::MalformedResponse)
            .with_help("non-success response without a recognizable error body")
    }

    /// The call was cancelled by the caller
    pub fn cancelled() -> Self {
        Self::new(AuthErrorKind::Cancelled)
    }

    /// A library-side mistake that should never reach end users.
    ///
    /// The message goes to `help`; `detail` is reserved for backend text.
    pub fn internal(help: impl Into<SmolStr>) -> Self {
        Self::new(AuthErrorKind::InternalError).with_help(help)
    }

    /// Get the help text, if any
    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

impl From<TransportError> for AuthError {
    fn from(e: TransportError) -> Self {
        Self::network(e)
    }
}

impl From<DecodeError> for AuthError {
    fn from(e: DecodeError) -> Self {
        Self::undecodable(e)
    }
}

impl From<EncodeError> for AuthError {
    fn from(e: EncodeError) -> Self {
        Self::new(AuthErrorKind::InternalError)
            .with_source(e)
            .with_help("request descriptors must encode to a JSON object")
    }
}
