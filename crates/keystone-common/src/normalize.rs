//! Backend error normalization
//!
//! Failed responses carry a message of the form `CODE[: DETAIL]`. The code is
//! looked up in [`SERVER_ERROR_CODES`]; the detail, when present, is kept
//! verbatim (trimmed) on the resulting [`AuthError`].
//!
//! Only the first colon separates code from detail, so
//! `"INVALID_CUSTOM_TOKEN : see https://example"` has the detail
//! `"see https://example"`.

use std::collections::HashMap;
use std::sync::LazyLock;

use smol_str::SmolStr;

use crate::error::{AuthError, AuthErrorKind};
use crate::value::WireValue;

/// Every backend code this client recognizes, and the kind it resolves to.
///
/// Codes not listed here resolve to [`AuthErrorKind::UnexpectedServerResponse`].
pub static SERVER_ERROR_CODES: &[(&str, AuthErrorKind)] = &[
    ("INVALID_CUSTOM_TOKEN", AuthErrorKind::InvalidCredential),
    ("INVALID_IDP_RESPONSE", AuthErrorKind::InvalidCredential),
    ("CREDENTIAL_MISMATCH", AuthErrorKind::CredentialMismatch),
    // The key is supplied by this library, so a missing one is our bug
    ("MISSING_API_KEY", AuthErrorKind::InternalError),
    ("INVALID_API_KEY", AuthErrorKind::InvalidApiKey),
    ("APP_NOT_AUTHORIZED", AuthErrorKind::AppNotAuthorized),
    ("INVALID_ID_TOKEN", AuthErrorKind::InvalidUserToken),
    ("TOKEN_EXPIRED", AuthErrorKind::UserTokenExpired),
    ("USER_DISABLED", AuthErrorKind::UserDisabled),
    ("USER_NOT_FOUND", AuthErrorKind::UserNotFound),
    ("CREDENTIAL_TOO_OLD_LOGIN_AGAIN", AuthErrorKind::RequiresRecentLogin),
    ("OPERATION_NOT_ALLOWED", AuthErrorKind::OperationNotAllowed),
    ("PASSWORD_LOGIN_DISABLED", AuthErrorKind::OperationNotAllowed),
    ("ADMIN_ONLY_OPERATION", AuthErrorKind::OperationNotAllowed),
    ("TOO_MANY_ATTEMPTS_TRY_LATER", AuthErrorKind::TooManyRequests),
    ("QUOTA_EXCEEDED", AuthErrorKind::QuotaExceeded),
    (
        "MISSING_MFA_PENDING_CREDENTIAL",
        AuthErrorKind::MissingMultiFactorSession,
    ),
    (
        "INVALID_MFA_PENDING_CREDENTIAL",
        AuthErrorKind::InvalidMultiFactorSession,
    ),
    ("MISSING_MFA_ENROLLMENT_ID", AuthErrorKind::MissingMultiFactorInfo),
    ("MFA_ENROLLMENT_NOT_FOUND", AuthErrorKind::MultiFactorInfoNotFound),
    ("INVALID_PHONE_NUMBER", AuthErrorKind::InvalidPhoneNumber),
    ("MISSING_PHONE_NUMBER", AuthErrorKind::MissingPhoneNumber),
    ("CAPTCHA_CHECK_FAILED", AuthErrorKind::CaptchaCheckFailed),
    ("INVALID_APP_CREDENTIAL", AuthErrorKind::InvalidAppCredential),
    ("MISSING_APP_CREDENTIAL", AuthErrorKind::MissingAppCredential),
    ("TENANT_ID_MISMATCH", AuthErrorKind::TenantIdMismatch),
    (
        "UNSUPPORTED_TENANT_OPERATION",
        AuthErrorKind::UnsupportedTenantOperation,
    ),
];

static CODE_INDEX: LazyLock<HashMap<&'static str, AuthErrorKind>> =
    LazyLock::new(|| SERVER_ERROR_CODES.iter().copied().collect());

/// Look a backend code up in the table.
pub fn lookup(code: &str) -> Option<AuthErrorKind> {
    CODE_INDEX.get(code).copied()
}

/// Split a backend message into its code and optional detail.
///
/// ```
/// use keystone_common::normalize::split_message;
///
/// assert_eq!(split_message("CODE : Detail"), ("CODE", Some("Detail")));
/// assert_eq!(split_message("CODE:"), ("CODE", Some("")));
/// assert_eq!(split_message("CODE"), ("CODE", None));
/// ```
pub fn split_message(message: &str) -> (&str, Option<&str>) {
    match message.split_once(':') {
        Some((code, detail)) => (code.trim(), Some(detail.trim())),
        None => (message.trim(), None),
    }
}

/// The error payload pulled out of a failed response body.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerErrorSignal {
    /// Raw `CODE[: DETAIL]` text
    pub message: SmolStr,
    /// Structured entries from `error.errors`, if the backend sent any
    pub errors: Vec<WireValue>,
}

impl ServerErrorSignal {
    /// Extract the signal from a failed response body.
    ///
    /// Accepted shapes, in order:
    /// - `{"error": {"message": "...", "errors": [...]}}`
    /// - `{"error": {"errors": [{"message": "..."}]}}` (first entry wins)
    /// - `{"error": "..."}`
    ///
    /// Returns `None` for anything else.
    pub fn extract(body: &WireValue) -> Option<Self> {
        let error = body.get("error")?;

        if let Some(message) = error.as_str() {
            return Some(Self {
                message: SmolStr::new(message),
                errors: Vec::new(),
            });
        }

        let errors: Vec<WireValue> = error
            .get("errors")
            .and_then(WireValue::as_array)
            .map(|a| a.iter().cloned().collect())
            .unwrap_or_default();

        let message = error
            .get("message")
            .and_then(WireValue::as_str)
            .or_else(|| {
                errors
                    .first()
                    .and_then(|e| e.get("message"))
                    .and_then(WireValue::as_str)
            })
            .map(SmolStr::new)?;

        Some(Self { message, errors })
    }

    /// The code part of the message
    pub fn code(&self) -> &str {
        split_message(&self.message).0
    }

    /// The detail part of the message, if it had one
    pub fn detail(&self) -> Option<&str> {
        split_message(&self.message).1
    }
}

/// Resolve a backend signal into exactly one [`AuthError`]. Never panics.
pub fn normalize(signal: &ServerErrorSignal) -> AuthError {
    let (code, detail) = split_message(&signal.message);

    let err = match lookup(code) {
        Some(kind) => AuthError::new(kind),
        None => {
            #[cfg(feature = "tracing")]
            tracing::warn!(code, "unrecognized backend error code");
            AuthError::new(AuthErrorKind::UnexpectedServerResponse)
                .with_help("the backend sent an error code this client does not know")
        }
    }
    .with_raw_code(code);

    match detail {
        Some(detail) => err.with_detail(detail),
        None => err,
    }
}
