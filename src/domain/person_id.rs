use std::{fmt, ops::Deref, str::FromStr};

/// A validated ten-character person identifier.
///
/// Format:
/// - characters 1-2 are digits in the range `2-9`
/// - characters 3-8 contain at least two characters that are neither letters
///   nor digits
/// - characters 9-10 are uppercase letters (`A-Z`)
///
/// Example: `56s_d%&fAB`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonId(String);

/// Number of non-alphanumeric characters required in the middle segment.
const MIN_SPECIAL: usize = 2;

impl PersonId {
    /// Required length in characters.
    pub const LEN: usize = 10;

    /// Creates a new `PersonId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidPersonId`] describing the first rule the string
    /// breaks. Rules are checked in the order length, prefix, suffix, middle.
    pub fn new(s: String) -> Result<Self, InvalidPersonId> {
        let chars: Vec<char> = s.chars().collect();

        if chars.len() != Self::LEN {
            return Err(InvalidPersonId::Length {
                id: s,
                len: chars.len(),
            });
        }

        if !chars[..2].iter().all(|c| ('2'..='9').contains(c)) {
            return Err(InvalidPersonId::Prefix(s));
        }

        if !chars[8..].iter().all(char::is_ascii_uppercase) {
            return Err(InvalidPersonId::Suffix(s));
        }

        let special = chars[2..8].iter().filter(|c| !c.is_alphanumeric()).count();
        if special < MIN_SPECIAL {
            return Err(InvalidPersonId::Special { id: s, found: special });
        }

        Ok(Self(s))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier starts with an even digit.
    ///
    /// Identifiers with an even leading digit may not be reassigned.
    #[must_use]
    pub fn has_even_lead(&self) -> bool {
        starts_with_even_digit(&self.0)
    }
}

/// Checks the leading character of a (possibly unvalidated) identifier.
pub(crate) fn starts_with_even_digit(id: &str) -> bool {
    id.chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .is_some_and(|d| d % 2 == 0)
}

impl TryFrom<String> for PersonId {
    type Error = InvalidPersonId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for PersonId {
    type Error = InvalidPersonId;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl FromStr for PersonId {
    type Err = InvalidPersonId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for PersonId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for PersonId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur when validating a person ID.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidPersonId {
    /// Wrong number of characters.
    #[error("Invalid person ID '{id}': expected 10 characters, got {len}")]
    Length {
        /// The rejected identifier.
        id: String,
        /// Its length in characters.
        len: usize,
    },

    /// The first two characters are not digits in the range 2-9.
    #[error("Invalid person ID '{0}': first two characters must be digits 2-9")]
    Prefix(String),

    /// The last two characters are not uppercase letters.
    #[error("Invalid person ID '{0}': last two characters must be uppercase letters (A-Z)")]
    Suffix(String),

    /// Too few special characters in positions 3-8.
    #[error(
        "Invalid person ID '{id}': characters 3-8 must contain at least two special \
         characters, found {found}"
    )]
    Special {
        /// The rejected identifier.
        id: String,
        /// Number of special characters found.
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("56s_d%&fAB"; "example")]
    #[test_case("23_-Sf9aAB"; "two specials")]
    #[test_case("99!@#$%^ZZ"; "all specials")]
    #[test_case("22ab-_cdXY"; "lowest prefix digits")]
    #[test_case("34é!ü?xyQR"; "unicode letters are alphanumeric")]
    fn accepts_valid(id: &str) {
        assert_eq!(PersonId::try_from(id).unwrap().as_str(), id);
    }

    #[test_case(""; "empty")]
    #[test_case("23_-Sf9AB"; "nine characters")]
    #[test_case("23_-Sf9aABC"; "eleven characters")]
    fn rejects_wrong_length(id: &str) {
        assert!(matches!(
            PersonId::try_from(id),
            Err(InvalidPersonId::Length { .. })
        ));
    }

    #[test_case("13_-Sf9aAB"; "digit one")]
    #[test_case("20_-Sf9aAB"; "digit zero")]
    #[test_case("a3_-Sf9aAB"; "letter")]
    fn rejects_bad_prefix(id: &str) {
        assert!(matches!(
            PersonId::try_from(id),
            Err(InvalidPersonId::Prefix(_))
        ));
    }

    #[test_case("23_-Sf9aAb"; "lowercase")]
    #[test_case("23_-Sf9aA1"; "digit")]
    #[test_case("23_-Sf9aÄB"; "non ascii uppercase")]
    fn rejects_bad_suffix(id: &str) {
        assert!(matches!(
            PersonId::try_from(id),
            Err(InvalidPersonId::Suffix(_))
        ));
    }

    #[test_case("23abcdefAB", 0; "none")]
    #[test_case("23a_cdefAB", 1; "one")]
    fn rejects_too_few_specials(id: &str, expected: usize) {
        assert_eq!(
            PersonId::try_from(id),
            Err(InvalidPersonId::Special {
                id: id.to_string(),
                found: expected,
            })
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 10 characters, 12 bytes
        let id = "23é_ü-abAB";
        assert_eq!(id.chars().count(), 10);
        assert!(PersonId::try_from(id).is_ok());
    }

    #[test_case("35_-Sf9aAB", false; "odd")]
    #[test_case("48_-Sf9aAB", true; "even")]
    fn even_lead(id: &str, expected: bool) {
        assert_eq!(PersonId::try_from(id).unwrap().has_even_lead(), expected);
    }

    #[test]
    fn error_display() {
        let error = PersonId::try_from("123").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid person ID '123': expected 10 characters, got 3"
        );
    }
}
