//! Multi-factor sign-in operations (identity platform service).

/// `accounts/mfaSignIn:start`: issue a second-factor challenge.
pub mod start;
