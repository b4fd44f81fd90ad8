//! The `Country` value object.

use std::fmt;
use std::str::FromStr;

use reminders_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A two-letter alphabetic country code, normalized to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Country(String);

impl Country {
    /// Parses and normalizes a country code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCountry` embedding `code` unless it
    /// consists of exactly two ASCII letters.
    pub fn new(code: &str) -> Result<Self, DomainError> {
        let mut chars = code.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(first), Some(second), None)
                if first.is_ascii_alphabetic() && second.is_ascii_alphabetic() =>
            {
                Ok(Self(code.to_ascii_uppercase()))
            }
            _ => Err(DomainError::InvalidCountry(code.to_owned())),
        }
    }

    /// Returns the upper-case code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }

    /// France, the country of reminders nobody configured otherwise.
    #[must_use]
    pub fn france() -> Self {
        Self("FR".to_owned())
    }
}

impl FromStr for Country {
    type Err = DomainError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Self::new(code)
    }
}

impl TryFrom<String> for Country {
    type Error = DomainError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::new(&code)
    }
}

impl From<Country> for String {
    fn from(country: Country) -> Self {
        country.0
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lower_case_code_is_normalized() {
        assert_eq!(Country::new("fr").unwrap().code(), "FR");
        assert_eq!(Country::new("iT").unwrap().code(), "IT");
    }

    #[test]
    fn test_invalid_codes_are_rejected_with_input_in_message() {
        for code in ["F", "FRA", "F1", "", "é1", "ÉS"] {
            let err = Country::new(code).unwrap_err();

            assert!(matches!(err, DomainError::InvalidCountry(ref value) if value == code));
            assert!(err.to_string().contains(&format!("'{code}'")));
        }
    }

    #[test]
    fn test_deserialization_validates_code() {
        let country: Country = serde_json::from_str("\"de\"").unwrap();
        assert_eq!(country.code(), "DE");

        assert!(serde_json::from_str::<Country>("\"DEU\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_two_letter_codes_are_accepted(code in "[a-zA-Z]{2}") {
            let country = Country::new(&code).unwrap();

            prop_assert_eq!(country.code(), code.to_ascii_uppercase());
        }

        #[test]
        fn prop_codes_of_other_lengths_are_rejected(code in "[A-Z]{3,6}|[A-Z]?") {
            prop_assert!(Country::new(&code).is_err());
        }
    }
}
