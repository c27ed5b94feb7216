//! Common types for the keystone identity toolkit client

#![warn(missing_docs)]
pub use smol_str;
pub use url;

/// URL-safe, unpadded base64 used for signature and salt fields.
pub mod base64url;
/// Per-call request configuration.
pub mod config;
pub mod error;
/// HTTP client abstraction used by keystone crates.
pub mod http_client;
/// Locale tags sent with every request.
pub mod locale;
pub mod normalize;
pub mod rpc;
/// Dynamically-shaped wire values for request and response bodies.
pub mod value;

pub use config::RequestConfiguration;
pub use error::{AuthError, AuthErrorKind, ErrorCategory, RpcResult};
pub use value::WireValue;

/// Authorization token types for RPC requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationToken {
    /// Bearer token (the user's ID token)
    Bearer(smol_str::SmolStr),
}
