use serde::{Deserialize, Deserializer, Serialize, de::Error};
use smol_str::{SmolStr, ToSmolStr};
use std::fmt;
use std::{ops::Deref, str::FromStr};

/// An IETF language tag, sent to the backend so it can localize error details.
///
/// Uses langtag crate for validation, but is stored as a SmolStr for size/avoiding allocations
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Hash)]
#[serde(transparent)]
#[repr(transparent)]
pub struct LanguageCode(SmolStr);

impl LanguageCode {
    /// Parses an IETF language tag from the given string.
    pub fn new<T>(lang: &T) -> Result<Self, langtag::InvalidLangTag<&T>>
    where
        T: AsRef<str> + ?Sized,
    {
        let tag = langtag::LangTag::new(lang)?;
        Ok(LanguageCode(SmolStr::new(tag.as_str())))
    }

    /// Parses an IETF language tag from a static string.
    pub fn new_static(
        lang: &'static str,
    ) -> Result<Self, langtag::InvalidLangTag<&'static str>> {
        langtag::LangTag::new(lang)?;
        Ok(LanguageCode(SmolStr::new_static(lang)))
    }

    /// Returns the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for LanguageCode {
    type Err = SmolStr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).map_err(|e| e.0.to_smolstr())
    }
}

impl<'de> Deserialize<'de> for LanguageCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: SmolStr = Deserialize::deserialize(deserializer)?;
        Self::new(value.as_str()).map_err(D::Error::custom)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<LanguageCode> for SmolStr {
    fn from(value: LanguageCode) -> Self {
        value.0
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for LanguageCode {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}
