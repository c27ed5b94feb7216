//! The backend expects binary fields (signatures, salts) as base64url text
//! using the `-`/`_` alphabet with the trailing `=` padding stripped.

use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serializer, de::Error};

/// Encode bytes as unpadded base64url.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded base64url text.
///
/// Padded input is accepted as well, since some servers echo values back with
/// padding attached.
pub fn decode(text: &str) -> Result<Bytes, base64::DecodeError> {
    let trimmed = text.trim_end_matches('=');
    BASE64_URL_SAFE_NO_PAD
        .decode(trimmed)
        .map(Bytes::from_owner)
}

/// `#[serde(with = "keystone_common::base64url")]` helper for byte fields.
pub fn serialize<S>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&encode(bytes))
}

/// `#[serde(with = "keystone_common::base64url")]` helper for byte fields.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Bytes, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    decode(&text).map_err(D::Error::custom)
}
