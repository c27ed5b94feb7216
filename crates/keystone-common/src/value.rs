use bytes::Bytes;
use indexmap::IndexMap;
use smol_str::SmolStr;

/// Conversions to and from serde_json and typed values
pub mod convert;
/// Serde implementations
pub mod serde_impl;


pub use convert::ConversionError;

/// A dynamically-shaped JSON value used for every request and response body.
///
/// Objects keep the insertion order of their keys, so an encoded request body
/// serializes in the order its descriptor declared the fields.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    /// JSON `null`
    Null,
    /// JSON boolean
    Boolean(bool),
    /// JSON number (integer or float)
    Number(serde_json::Number),
    /// JSON string
    String(SmolStr),
    /// Binary payload, written to the wire as unpadded base64url text
    Bytes(Bytes),
    /// JSON array
    Array(Array),
    /// JSON object
    Object(Object),
}

/// Array of wire values, order preserved as received.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array(pub Vec<WireValue>);

/// Object of wire values, keys unique, insertion order preserved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object(pub IndexMap<SmolStr, WireValue>);

/// The shape of a wire value, used in conversion and decode errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// `null`
    Null,
    /// boolean
    Boolean,
    /// number
    Number,
    /// string
    String,
    /// bytes
    Bytes,
    /// array
    Array,
    /// object
    Object,
}

impl std::fmt::Display for WireType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            WireType::Null => "null",
            WireType::Boolean => "boolean",
            WireType::Number => "number",
            WireType::String => "string",
            WireType::Bytes => "bytes",
            WireType::Array => "array",
            WireType::Object => "object",
        })
    }
}

impl WireValue {
    /// Get the shape of this value
    pub fn wire_type(&self) -> WireType {
        match self {
            WireValue::Null => WireType::Null,
            WireValue::Boolean(_) => WireType::Boolean,
            WireValue::Number(_) => WireType::Number,
            WireValue::String(_) => WireType::String,
            WireValue::Bytes(_) => WireType::Bytes,
            WireValue::Array(_) => WireType::Array,
            WireValue::Object(_) => WireType::Object,
        }
    }

    /// Wrap a binary payload
    pub fn bytes(bytes: impl Into<Bytes>) -> Self {
        WireValue::Bytes(bytes.into())
    }

    /// Returns true for `null`
    pub fn is_null(&self) -> bool {
        matches!(self, WireValue::Null)
    }

    /// Get as a string slice if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            WireValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get as a boolean if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            WireValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as an i64 if this is a number that fits
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            WireValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Get as an array if this is one
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            WireValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as an object if this is one
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            WireValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Take the object out of this value, or hand the value back unchanged.
    pub fn into_object(self) -> Result<Object, WireValue> {
        match self {
            WireValue::Object(o) => Ok(o),
            other => Err(other),
        }
    }

    /// Look up a key if this is an object
    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.as_object().and_then(|o| o.get(key))
    }

    /// Read a finite number that may arrive either as a JSON number or as
    /// decimal text (the backend sends durations as strings).
    ///
    /// The string form must parse in full; `"12x"` is an error, not `12`.
    /// `NaN` and infinities are rejected in either form.
    pub fn to_f64(&self) -> Result<f64, ConversionError> {
        let parsed = match self {
            WireValue::Number(n) => n.as_f64(),
            WireValue::String(s) => s.trim().parse::<f64>().ok(),
            other => {
                return Err(ConversionError::WrongType {
                    expected: WireType::Number,
                    found: other.wire_type(),
                });
            }
        };
        parsed
            .filter(|n| n.is_finite())
            .ok_or_else(|| ConversionError::InvalidNumber {
                value: match self {
                    WireValue::String(s) => s.clone(),
                    other => SmolStr::new(other.to_string()),
                },
            })
    }

    /// Read binary data, decoding base64url text if the value arrived as a string.
    pub fn to_bytes(&self) -> Result<Bytes, ConversionError> {
        match self {
            WireValue::Bytes(b) => Ok(b.clone()),
            WireValue::String(s) => {
                crate::base64url::decode(s).map_err(|e| ConversionError::InvalidBytes {
                    message: SmolStr::new(e.to_string()),
                })
            }
            other => Err(ConversionError::WrongType {
                expected: WireType::Bytes,
                found: other.wire_type(),
            }),
        }
    }
}

impl Array {
    /// Number of elements
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no elements
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the elements in order
    pub fn iter(&self) -> std::slice::Iter<'_, WireValue> {
        self.0.iter()
    }

    /// Get an element by index
    pub fn get(&self, index: usize) -> Option<&WireValue> {
        self.0.get(index)
    }
}

impl Object {
    /// Create an empty object
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key, replacing the value in place if the key already exists.
    pub fn insert(&mut self, key: impl Into<SmolStr>, value: impl Into<WireValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a key
    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.0.get(key)
    }

    /// Returns true if the key is present (even if its value is `null`)
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Remove a key, keeping the order of the remaining keys
    pub fn remove(&mut self, key: &str) -> Option<WireValue> {
        self.0.shift_remove(key)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no keys
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> indexmap::map::Iter<'_, SmolStr, WireValue> {
        self.0.iter()
    }

    /// Iterate over keys in insertion order
    pub fn keys(&self) -> indexmap::map::Keys<'_, SmolStr, WireValue> {
        self.0.keys()
    }
}

impl std::fmt::Display for WireValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(std::fmt::Error),
        }
    }
}
