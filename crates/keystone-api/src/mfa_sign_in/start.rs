use keystone_common::rpc::{RpcRequest, RpcResp, Service};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Endpoint path
pub const ENDPOINT: &str = "accounts/mfaSignIn:start";

/// Start the second-factor step of a sign-in that returned a pending credential.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct StartMfaSignIn {
    /// Pending credential from the first-factor sign-in
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub mfa_pending_credential: Option<SmolStr>,
    /// Enrollment to challenge
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub mfa_enrollment_id: Option<SmolStr>,
    /// Phone verification parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_sign_in_info: Option<StartMfaPhoneRequestInfo>,
}

/// Phone second-factor challenge parameters
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct StartMfaPhoneRequestInfo {
    /// Phone number in E.164 form
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub phone_number: Option<SmolStr>,
    /// App verification receipt
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub ios_receipt: Option<SmolStr>,
    /// App verification secret
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub ios_secret: Option<SmolStr>,
    /// reCAPTCHA token
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub recaptcha_token: Option<SmolStr>,
    /// reCAPTCHA Enterprise response
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub captcha_response: Option<SmolStr>,
    /// Client type reported with `captcha_response`
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub client_type: Option<SmolStr>,
    /// reCAPTCHA version reported with `captcha_response`
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub recaptcha_version: Option<SmolStr>,
}

/// Response marker for [`StartMfaSignIn`]
pub struct StartMfaSignInResponse;

/// Challenge issued for the second factor
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StartMfaSignInOutput {
    /// Phone challenge details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_response_info: Option<StartMfaPhoneResponseInfo>,
}

/// Phone challenge details
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StartMfaPhoneResponseInfo {
    /// Session to complete the challenge with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_info: Option<SmolStr>,
}

impl RpcRequest for StartMfaSignIn {
    const ENDPOINT: &'static str = ENDPOINT;
    const SERVICE: Service = Service::IdentityPlatform;
    type Response = StartMfaSignInResponse;
}

impl RpcResp for StartMfaSignInResponse {
    const ENDPOINT: &'static str = ENDPOINT;
    type Output = StartMfaSignInOutput;
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystone_common::value::WireValue;

    #[test]
    fn empty_request_encodes_empty_object() {
        let body = StartMfaSignIn::default().encode_body().unwrap();
        assert!(body.as_object().unwrap().is_empty());
    }

    #[test]
    fn nested_phone_info() {
        let req = StartMfaSignIn::new()
            .mfa_pending_credential("PENDING")
            .mfa_enrollment_id("ENROLLMENT")
            .phone_sign_in_info(
                StartMfaPhoneRequestInfo::new()
                    .phone_number("+15555550100")
                    .recaptcha_token("RECAPTCHA")
                    .build(),
            )
            .build();
        let body = req.encode_body().unwrap();
        assert_eq!(
            serde_json::Value::from(body.clone()),
            serde_json::json!({
                "mfaPendingCredential": "PENDING",
                "mfaEnrollmentId": "ENROLLMENT",
                "phoneSignInInfo": {
                    "phoneNumber": "+15555550100",
                    "recaptchaToken": "RECAPTCHA",
                },
            })
        );
        let back: StartMfaSignIn = body.deserialize_into().unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn decode_session_info() {
        let out = StartMfaSignInResponse::decode_output(WireValue::from(serde_json::json!({
            "phoneResponseInfo": {"sessionInfo": "SESSION"}
        })))
        .unwrap();
        assert_eq!(
            out.phone_response_info.and_then(|p| p.session_info).as_deref(),
            Some("SESSION")
        );

        let out = StartMfaSignInResponse::decode_output(WireValue::from(serde_json::json!({})))
            .unwrap();
        assert_eq!(out, StartMfaSignInOutput::default());
    }
}
