//! Typed operations for the identity toolkit backend.
//!
//! Each module holds one endpoint: the request type (which implements
//! [`RpcRequest`](keystone_common::rpc::RpcRequest)), a response marker, and
//! the typed output. Dispatch them with
//! [`RpcExt`](keystone_common::rpc::RpcExt):
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use keystone_api::verify_custom_token::VerifyCustomToken;
//! use keystone_common::RequestConfiguration;
//! use keystone_common::rpc::RpcExt;
//!
//! let http = reqwest::Client::new();
//! let config = RequestConfiguration::new().api_key("APIKey").build();
//! let request = VerifyCustomToken::new().token("custom token").build();
//! let output = http.rpc(&config).send(&request).await?;
//! println!("{:?}", output.id_token);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod expiry;

pub mod get_project_config;
pub mod mfa_sign_in;
pub mod sign_in_with_game_center;
pub mod verify_custom_token;

pub use get_project_config::GetProjectConfig;
pub use mfa_sign_in::start::StartMfaSignIn;
pub use sign_in_with_game_center::SignInWithGameCenter;
pub use verify_custom_token::VerifyCustomToken;

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

pub(crate) fn is_zero(value: &u64) -> bool {
    *value == 0
}
