//! Identifiers linking the trade API to the world-boundaries dataset.
//!
//! The trade API names countries with opaque string codes while the
//! boundaries dataset keys its features by integer ids. The two only line up
//! through an explicit, validated parse.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Stable integer identifier of a feature in the world-boundaries dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(pub u32);

impl FeatureId {
    /// Parses a decimal feature id such as `"840"` or `"040"`.
    ///
    /// Only ASCII digits are accepted; signs, whitespace inside the number,
    /// fractions and empty strings are rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.trim();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(FeatureId)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Country identifier used by the trade API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interprets this code as a boundaries feature id.
    pub fn feature_id(&self) -> Result<FeatureId, ResolutionError> {
        FeatureId::parse(&self.0).ok_or_else(|| ResolutionError::NotNumeric(self.clone()))
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CountryCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

// The API serializes codes as strings, but numeric JSON is accepted too.
impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawCode {
            Text(String),
            Number(u64),
        }

        Ok(match RawCode::deserialize(deserializer)? {
            RawCode::Text(text) => CountryCode(text),
            RawCode::Number(number) => CountryCode(number.to_string()),
        })
    }
}

/// Why a country code could not be tied to a boundary feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The code is not a decimal feature id.
    NotNumeric(CountryCode),
    /// The code parsed, but no feature carries that id.
    NoFeature(CountryCode, FeatureId),
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotNumeric(code) => write!(f, "country code {:?} is not a numeric id", code.0),
            Self::NoFeature(code, id) => {
                write!(f, "country code {} has no boundary feature (id {})", code, id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_id_parse() {
        assert_eq!(FeatureId::parse("840"), Some(FeatureId(840)));
        assert_eq!(FeatureId::parse("040"), Some(FeatureId(40)));
        assert_eq!(FeatureId::parse(" 36 "), Some(FeatureId(36)));
        assert_eq!(FeatureId::parse(""), None);
        assert_eq!(FeatureId::parse("-99"), None);
        assert_eq!(FeatureId::parse("12a"), None);
        assert_eq!(FeatureId::parse("1.5"), None);
    }

    #[test]
    fn test_non_numeric_code_is_resolution_failure() {
        let code = CountryCode::new("USA");
        assert_eq!(
            code.feature_id(),
            Err(ResolutionError::NotNumeric(CountryCode::new("USA")))
        );
    }

    #[test]
    fn test_code_deserializes_from_string_or_number() {
        let text: CountryCode = serde_json::from_str("\"124\"").unwrap();
        let number: CountryCode = serde_json::from_str("124").unwrap();
        assert_eq!(text, number);
        assert_eq!(text.feature_id(), Ok(FeatureId(124)));
    }
}
