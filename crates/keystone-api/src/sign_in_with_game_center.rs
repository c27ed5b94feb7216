//! `signInWithGameCenter`: sign in (or link) with a Game Center identity
//! verification signature.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use keystone_common::error::DecodeError;
use keystone_common::rpc::{RpcRequest, RpcResp};
use keystone_common::value::WireValue;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use url::Url;

/// Endpoint path
pub const ENDPOINT: &str = "signInWithGameCenter";

/// Sign in with a Game Center player.
///
/// `signature` and `salt` are opaque platform data, sent as unpadded
/// base64url. A zero `timestamp` is treated as unset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct SignInWithGameCenter {
    /// The player id to verify
    #[builder(into)]
    pub player_id: SmolStr,
    /// URL of the public key that verifies `signature`
    pub public_key_url: Url,
    /// Verification signature generated by Game Center
    #[serde(with = "keystone_common::base64url")]
    #[builder(into)]
    pub signature: Bytes,
    /// Random salt mixed into the signed hash
    #[serde(with = "keystone_common::base64url")]
    #[builder(into)]
    pub salt: Bytes,
    /// When the signature was created
    #[serde(default, skip_serializing_if = "crate::is_zero")]
    #[builder(default)]
    pub timestamp: u64,
    /// Team-scoped player id
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub team_player_id: Option<SmolStr>,
    /// Game-scoped player id
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub game_player_id: Option<SmolStr>,
    /// Access token of the signed-in user, when linking rather than signing in
    #[serde(rename = "idToken", skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub access_token: Option<SmolStr>,
    /// Display name of the local player
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub display_name: Option<SmolStr>,
}

/// Response marker for [`SignInWithGameCenter`]
pub struct SignInWithGameCenterResponse;

/// The signed-in Game Center user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignInWithGameCenterOutput {
    /// ID token for the signed-in user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<SmolStr>,
    /// Refresh token for the signed-in user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<SmolStr>,
    /// User id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_id: Option<SmolStr>,
    /// Verified player id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<SmolStr>,
    /// Verified team-scoped player id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_player_id: Option<SmolStr>,
    /// Verified game-scoped player id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_player_id: Option<SmolStr>,
    /// Approximate time the ID token expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether this sign-in created the account
    #[serde(default)]
    pub is_new_user: bool,
    /// Display name stored on the account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<SmolStr>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOutput {
    id_token: Option<SmolStr>,
    refresh_token: Option<SmolStr>,
    local_id: Option<SmolStr>,
    player_id: Option<SmolStr>,
    team_player_id: Option<SmolStr>,
    game_player_id: Option<SmolStr>,
    expires_in: Option<WireValue>,
    #[serde(default)]
    is_new_user: bool,
    display_name: Option<SmolStr>,
}

impl RpcRequest for SignInWithGameCenter {
    const ENDPOINT: &'static str = ENDPOINT;
    // Game Center identities are project-wide
    const TENANT_SCOPED: bool = false;
    type Response = SignInWithGameCenterResponse;
}

impl RpcResp for SignInWithGameCenterResponse {
    const ENDPOINT: &'static str = ENDPOINT;
    type Output = SignInWithGameCenterOutput;

    fn decode_output(body: WireValue) -> Result<Self::Output, DecodeError> {
        let raw: RawOutput = body.deserialize_into()?;
        Ok(SignInWithGameCenterOutput {
            expires_at: crate::expiry::expires_at("expiresIn", raw.expires_in.as_ref())?,
            id_token: raw.id_token,
            refresh_token: raw.refresh_token,
            local_id: raw.local_id,
            player_id: raw.player_id,
            team_player_id: raw.team_player_id,
            game_player_id: raw.game_player_id,
            is_new_user: raw.is_new_user,
            display_name: raw.display_name,
        })
    }
}
