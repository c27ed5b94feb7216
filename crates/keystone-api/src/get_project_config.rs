//! `getProjectConfig`: read the project's public configuration.

use keystone_common::rpc::{RpcMethod, RpcRequest, RpcResp};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Endpoint path
pub const ENDPOINT: &str = "getProjectConfig";

/// Fetch the project id and the domains allowed to host sign-in flows.
///
/// Read-only: sent as a GET without a body.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetProjectConfig;

/// Response marker for [`GetProjectConfig`]
pub struct GetProjectConfigResponse;

/// Public project configuration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GetProjectConfigOutput {
    /// Numeric project id, as text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<SmolStr>,
    /// Authorized domains, in backend order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_domains: Option<Vec<SmolStr>>,
}

impl RpcRequest for GetProjectConfig {
    const ENDPOINT: &'static str = ENDPOINT;
    const METHOD: RpcMethod = RpcMethod::Get;
    type Response = GetProjectConfigResponse;
}

impl RpcResp for GetProjectConfigResponse {
    const ENDPOINT: &'static str = ENDPOINT;
    type Output = GetProjectConfigOutput;
}
