//! Validated search inputs: the postal code and the radius

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::LocatorError;

/// Meters per statute mile used for the radius conversion
pub const METERS_PER_MILE: f64 = 1609.34;

pub const INVALID_POSTAL_CODE: &str = "Please enter a valid 5-digit ZIP code.";
pub const INVALID_RADIUS: &str = "Please choose a valid search radius.";

/// A five digit US postal code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Trim and validate a raw postal code
    pub fn parse(raw: &str) -> crate::Result<Self> {
        let trimmed = raw.trim();
        if trimmed.len() == 5 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(LocatorError::validation(INVALID_POSTAL_CODE))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PostalCode {
    type Error = LocatorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> Self {
        code.0
    }
}

/// Search radius in miles
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SearchRadius(f64);

impl SearchRadius {
    pub fn from_miles(miles: f64) -> crate::Result<Self> {
        if miles.is_finite() && miles > 0.0 {
            Ok(Self(miles))
        } else {
            Err(LocatorError::validation(INVALID_RADIUS))
        }
    }

    #[must_use]
    pub fn miles(&self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn meters(&self) -> f64 {
        self.0 * METERS_PER_MILE
    }
}

impl fmt::Display for SearchRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("90210")]
    #[case("00501")]
    #[case("  10001 ")]
    fn test_valid_postal_codes(#[case] raw: &str) {
        let code = PostalCode::parse(raw).unwrap();
        assert_eq!(code.as_str(), raw.trim());
    }

    #[rstest]
    #[case("")]
    #[case("9021")]
    #[case("902101")]
    #[case("9021a")]
    #[case("90210-1234")]
    #[case("９０２１０")]
    fn test_invalid_postal_codes(#[case] raw: &str) {
        let err = PostalCode::parse(raw).unwrap_err();
        assert!(matches!(err, LocatorError::Validation { .. }));
        assert_eq!(err.to_string(), INVALID_POSTAL_CODE);
    }

    #[test]
    fn test_radius_conversion() {
        let radius = SearchRadius::from_miles(5.0).unwrap();
        assert!((radius.meters() - 8046.7).abs() < 1e-9);
    }

    #[test]
    fn test_radius_displays_like_input() {
        assert_eq!(SearchRadius::from_miles(5.0).unwrap().to_string(), "5");
        assert_eq!(SearchRadius::from_miles(2.5).unwrap().to_string(), "2.5");
    }

    #[rstest]
    #[case(0.0)]
    #[case(-3.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_invalid_radius(#[case] miles: f64) {
        assert!(SearchRadius::from_miles(miles).is_err());
    }

    #[test]
    fn test_postal_code_deserialize_validates() {
        let ok: PostalCode = serde_json::from_str("\"90210\"").unwrap();
        assert_eq!(ok.as_str(), "90210");
        assert!(serde_json::from_str::<PostalCode>("\"abc\"").is_err());
    }
}
