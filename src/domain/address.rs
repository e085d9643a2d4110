use std::{fmt, str::FromStr};

/// The only state addresses may be located in.
pub const REQUIRED_STATE: &str = "Victoria";

/// A validated postal address.
///
/// Format: `{street number}|{street}|{city}|{state}|{country}`, with every
/// component non-empty and the state equal to `Victoria`.
///
/// The original text is kept verbatim so that comparisons against stored
/// addresses are exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address(String);

impl Address {
    /// Number of pipe-separated components.
    pub const COMPONENTS: usize = 5;

    /// Creates a new `Address` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string does not split into exactly five
    /// non-empty components, or if the state (trimmed) is not `Victoria`.
    pub fn new(s: String) -> Result<Self, InvalidAddress> {
        let parts: Vec<&str> = s.split('|').collect();

        if parts.len() != Self::COMPONENTS {
            return Err(InvalidAddress::Components {
                address: s.clone(),
                found: parts.len(),
            });
        }

        if let Some(index) = parts.iter().position(|p| p.is_empty()) {
            return Err(InvalidAddress::EmptyComponent {
                address: s.clone(),
                index,
            });
        }

        let state = parts[3].trim();
        if state != REQUIRED_STATE {
            return Err(InvalidAddress::State(state.to_string()));
        }

        Ok(Self(s))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn component(&self, index: usize) -> &str {
        self.0.split('|').nth(index).unwrap_or_default()
    }

    /// The street number component.
    #[must_use]
    pub fn street_number(&self) -> &str {
        self.component(0)
    }

    /// The street component.
    #[must_use]
    pub fn street(&self) -> &str {
        self.component(1)
    }

    /// The city component.
    #[must_use]
    pub fn city(&self) -> &str {
        self.component(2)
    }

    /// The state component, untrimmed.
    #[must_use]
    pub fn state(&self) -> &str {
        self.component(3)
    }

    /// The country component.
    #[must_use]
    pub fn country(&self) -> &str {
        self.component(4)
    }
}

impl FromStr for Address {
    type Err = InvalidAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<&str> for Address {
    type Error = InvalidAddress;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur when validating an address.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidAddress {
    /// Wrong number of pipe-separated components.
    #[error(
        "Invalid address '{address}': expected 5 components \
         (number|street|city|state|country), got {found}"
    )]
    Components {
        /// The rejected address.
        address: String,
        /// Number of components found.
        found: usize,
    },

    /// One of the components is empty.
    #[error("Invalid address '{address}': component {index} is empty")]
    EmptyComponent {
        /// The rejected address.
        address: String,
        /// Zero-based index of the empty component.
        index: usize,
    },

    /// The state is not Victoria.
    #[error("Invalid address: state must be '{REQUIRED_STATE}', got '{0}'")]
    State(String),
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn accepts_victorian_address() {
        let address = Address::try_from("32|Highland Street|Melbourne|Victoria|Australia").unwrap();
        assert_eq!(address.street_number(), "32");
        assert_eq!(address.street(), "Highland Street");
        assert_eq!(address.city(), "Melbourne");
        assert_eq!(address.state(), "Victoria");
        assert_eq!(address.country(), "Australia");
    }

    #[test]
    fn state_is_trimmed_but_text_is_kept() {
        let raw = "32|Highland Street|Melbourne| Victoria |Australia";
        let address = Address::try_from(raw).unwrap();
        assert_eq!(address.as_str(), raw);
        assert_eq!(address.state(), " Victoria ");
    }

    #[test_case("32|Highland Street|Sydney|NSW|Australia", "NSW"; "other state")]
    #[test_case("32|Highland Street|Melbourne|victoria|Australia", "victoria"; "case sensitive")]
    #[test_case("32|Highland Street|Melbourne|VIC|Australia", "VIC"; "abbreviation")]
    #[test_case("32|Highland Street|Melbourne|   |Australia", ""; "blank")]
    fn rejects_state(address: &str, state: &str) {
        assert_eq!(
            Address::try_from(address),
            Err(InvalidAddress::State(state.to_string()))
        );
    }

    #[test_case("32|Highland Street Melbourne|Victoria|Australia", 4; "four")]
    #[test_case("32|Highland Street|Melbourne|Victoria|Australia|3000", 6; "six")]
    #[test_case("", 1; "empty")]
    fn rejects_component_count(address: &str, found: usize) {
        assert_eq!(
            Address::try_from(address),
            Err(InvalidAddress::Components {
                address: address.to_string(),
                found,
            })
        );
    }

    #[test_case("|Highland Street|Melbourne|Victoria|Australia", 0; "number")]
    #[test_case("32|Highland Street|Melbourne|Victoria|", 4; "country")]
    fn rejects_empty_component(address: &str, index: usize) {
        assert_eq!(
            Address::try_from(address),
            Err(InvalidAddress::EmptyComponent {
                address: address.to_string(),
                index,
            })
        );
    }
}
