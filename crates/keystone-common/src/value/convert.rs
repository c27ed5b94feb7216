use crate::value::{Array, Object, WireType, WireValue};
use bytes::Bytes;
use indexmap::IndexMap;
use serde::{Serialize, de::DeserializeOwned};
use smol_str::SmolStr;

/// Error used for converting from and into [`WireValue`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
#[non_exhaustive]
pub enum ConversionError {
    /// The value had a different shape than expected.
    #[error("kind error: expected {expected} but found {found}")]
    WrongType {
        /// The expected shape.
        expected: WireType,
        /// The actual shape.
        found: WireType,
    },
    /// A numeric field (number or decimal string) could not be read.
    #[error("invalid number: {value:?}")]
    InvalidNumber {
        /// The offending text
        value: SmolStr,
    },
    /// A binary field was not valid base64url.
    #[error("invalid base64url bytes: {message}")]
    InvalidBytes {
        /// Description of what was invalid
        message: SmolStr,
    },
}

impl WireValue {
    /// Parse JSON text into a wire value.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Render this value as JSON text.
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Convert any serializable value into a wire value.
    ///
    /// Field order follows the serializer (declaration order for derived structs).
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(WireValue::from)
    }

    /// Deserialize a typed value out of this wire value.
    pub fn deserialize_into<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(serde_json::Value::from(self))
    }
}

impl From<serde_json::Value> for WireValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => WireValue::Null,
            serde_json::Value::Bool(b) => WireValue::Boolean(b),
            serde_json::Value::Number(n) => WireValue::Number(n),
            serde_json::Value::String(s) => WireValue::String(SmolStr::from(s)),
            serde_json::Value::Array(items) => {
                WireValue::Array(Array(items.into_iter().map(WireValue::from).collect()))
            }
            serde_json::Value::Object(map) => WireValue::Object(Object(
                map.into_iter()
                    .map(|(k, v)| (SmolStr::from(k), WireValue::from(v)))
                    .collect(),
            )),
        }
    }
}

impl From<WireValue> for serde_json::Value {
    fn from(value: WireValue) -> Self {
        match value {
            WireValue::Null => serde_json::Value::Null,
            WireValue::Boolean(b) => serde_json::Value::Bool(b),
            WireValue::Number(n) => serde_json::Value::Number(n),
            WireValue::String(s) => serde_json::Value::String(s.to_string()),
            WireValue::Bytes(b) => serde_json::Value::String(crate::base64url::encode(&b)),
            WireValue::Array(Array(items)) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            WireValue::Object(Object(map)) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for WireValue {
    fn from(value: bool) -> Self {
        WireValue::Boolean(value)
    }
}

impl From<i64> for WireValue {
    fn from(value: i64) -> Self {
        WireValue::Number(value.into())
    }
}

impl From<u64> for WireValue {
    fn from(value: u64) -> Self {
        WireValue::Number(value.into())
    }
}

impl From<&str> for WireValue {
    fn from(value: &str) -> Self {
        WireValue::String(SmolStr::new(value))
    }
}

impl From<String> for WireValue {
    fn from(value: String) -> Self {
        WireValue::String(SmolStr::from(value))
    }
}

impl From<SmolStr> for WireValue {
    fn from(value: SmolStr) -> Self {
        WireValue::String(value)
    }
}

impl From<Bytes> for WireValue {
    fn from(value: Bytes) -> Self {
        WireValue::Bytes(value)
    }
}

impl From<Vec<WireValue>> for WireValue {
    fn from(value: Vec<WireValue>) -> Self {
        WireValue::Array(Array(value))
    }
}

impl From<Object> for WireValue {
    fn from(value: Object) -> Self {
        WireValue::Object(value)
    }
}

impl From<Vec<WireValue>> for Array {
    fn from(value: Vec<WireValue>) -> Self {
        Array(value)
    }
}

impl From<IndexMap<SmolStr, WireValue>> for Object {
    fn from(value: IndexMap<SmolStr, WireValue>) -> Self {
        Object(value)
    }
}

impl<K, V> FromIterator<(K, V)> for Object
where
    K: Into<SmolStr>,
    V: Into<WireValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Object(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl TryFrom<WireValue> for String {
    type Error = ConversionError;

    fn try_from(value: WireValue) -> Result<Self, Self::Error> {
        match value {
            WireValue::String(s) => Ok(s.to_string()),
            other => Err(ConversionError::WrongType {
                expected: WireType::String,
                found: other.wire_type(),
            }),
        }
    }
}

impl TryFrom<WireValue> for Object {
    type Error = ConversionError;

    fn try_from(value: WireValue) -> Result<Self, Self::Error> {
        value.into_object().map_err(|other| ConversionError::WrongType {
            expected: WireType::Object,
            found: other.wire_type(),
        })
    }
}
