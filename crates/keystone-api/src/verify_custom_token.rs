//! `verifyCustomToken`: exchange a custom token minted by the app's own
//! server for an ID token and refresh token.

use chrono::{DateTime, Utc};
use keystone_common::error::DecodeError;
use keystone_common::rpc::{RpcRequest, RpcResp};
use keystone_common::value::WireValue;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Endpoint path
pub const ENDPOINT: &str = "verifyCustomToken";

/// Sign in with a custom token.
///
/// `returnSecureToken` defaults to `true` and is omitted from the body when
/// `false`. The configured tenant id is added by the dispatcher.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct VerifyCustomToken {
    /// The custom token to verify
    #[builder(into)]
    pub token: SmolStr,
    /// Whether the backend should return an ID and refresh token
    #[serde(default, skip_serializing_if = "crate::is_false")]
    #[builder(default = true)]
    pub return_secure_token: bool,
}

/// Response marker for [`VerifyCustomToken`]
pub struct VerifyCustomTokenResponse;

/// Tokens issued for a verified custom token
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCustomTokenOutput {
    /// ID token for the signed-in user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<SmolStr>,
    /// Refresh token for the signed-in user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<SmolStr>,
    /// Approximate time the ID token expires, from the relative `expiresIn`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether this sign-in created the account
    #[serde(default)]
    pub is_new_user: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOutput {
    id_token: Option<SmolStr>,
    refresh_token: Option<SmolStr>,
    expires_in: Option<WireValue>,
    #[serde(default)]
    is_new_user: bool,
}

impl RpcRequest for VerifyCustomToken {
    const ENDPOINT: &'static str = ENDPOINT;
    type Response = VerifyCustomTokenResponse;
}

impl RpcResp for VerifyCustomTokenResponse {
    const ENDPOINT: &'static str = ENDPOINT;
    type Output = VerifyCustomTokenOutput;

    fn decode_output(body: WireValue) -> Result<Self::Output, DecodeError> {
        let raw: RawOutput = body.deserialize_into()?;
        Ok(VerifyCustomTokenOutput {
            expires_at: crate::expiry::expires_at("expiresIn", raw.expires_in.as_ref())?,
            id_token: raw.id_token,
            refresh_token: raw.refresh_token,
            is_new_user: raw.is_new_user,
        })
    }
}
