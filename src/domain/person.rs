use std::fmt;

use crate::domain::{
    address::{Address, InvalidAddress},
    date::{CalendarDate, InvalidDate},
    person_id::{InvalidPersonId, PersonId},
};

/// A first or last name.
///
/// Free text, except that it may not contain the record delimiter (`|`) or a
/// line break, either of which would corrupt the line-oriented store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(String);

impl Name {
    /// Creates a new `Name`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidName`] if the string contains `|`, `\n` or `\r`.
    pub fn new(s: String) -> Result<Self, InvalidName> {
        if s.contains(['|', '\n', '\r']) {
            return Err(InvalidName(s));
        }
        Ok(Self(s))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Name {
    type Error = InvalidName;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a name contains the delimiter or a line break.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid name '{0}': must not contain '|' or line breaks")]
pub struct InvalidName(String);

/// Any field-format failure.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Malformed person ID.
    #[error(transparent)]
    PersonId(#[from] InvalidPersonId),

    /// Malformed address.
    #[error(transparent)]
    Address(#[from] InvalidAddress),

    /// Malformed or impossible date.
    #[error(transparent)]
    Date(#[from] InvalidDate),

    /// Name containing a forbidden character.
    #[error(transparent)]
    Name(#[from] InvalidName),
}

/// The personal details that can be changed after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Details {
    /// Given name.
    pub first_name: Name,
    /// Family name.
    pub last_name: Name,
    /// Postal address.
    pub address: Address,
    /// Date of birth.
    pub birthdate: CalendarDate,
}

impl Details {
    /// Validates raw strings into a set of details.
    ///
    /// Checks run in the order address, birthdate, first name, last name.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn parse(
        first_name: &str,
        last_name: &str,
        address: &str,
        birthdate: &str,
    ) -> Result<Self, ValidationError> {
        let address: Address = address.parse()?;
        let birthdate: CalendarDate = birthdate.parse()?;
        Ok(Self {
            first_name: Name::try_from(first_name)?,
            last_name: Name::try_from(last_name)?,
            address,
            birthdate,
        })
    }
}

/// A validated person, ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    /// Unique identifier.
    pub id: PersonId,
    /// Everything else.
    pub details: Details,
}

impl Person {
    /// Validates raw strings into a person.
    ///
    /// The person ID is checked first, then the details as in
    /// [`Details::parse`].
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn parse(
        id: &str,
        first_name: &str,
        last_name: &str,
        address: &str,
        birthdate: &str,
    ) -> Result<Self, ValidationError> {
        let id: PersonId = id.parse()?;
        let details = Details::parse(first_name, last_name, address, birthdate)?;
        Ok(Self { id, details })
    }
}

/// A requested update to a stored person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changes {
    /// The replacement details. Unchanged fields must repeat the stored value.
    pub details: Details,
    /// A new identifier, if the person is being reassigned one.
    pub new_id: Option<PersonId>,
}

impl Changes {
    /// Changes that keep the current identifier.
    #[must_use]
    pub const fn new(details: Details) -> Self {
        Self {
            details,
            new_id: None,
        }
    }

    /// Also reassign the identifier.
    #[must_use]
    pub fn with_id(mut self, id: PersonId) -> Self {
        self.new_id = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    const ADDRESS: &str = "32|Highland Street|Melbourne|Victoria|Australia";

    #[test]
    fn parses_valid_person() {
        let person = Person::parse("56s_d%&fAB", "Jane", "Citizen", ADDRESS, "15-11-1990").unwrap();
        assert_eq!(person.id.as_str(), "56s_d%&fAB");
        assert_eq!(person.details.first_name.as_str(), "Jane");
        assert_eq!(person.details.birthdate.to_string(), "15-11-1990");
    }

    #[test]
    fn names_may_be_empty() {
        assert!(Details::parse("", "", ADDRESS, "15-11-1990").is_ok());
    }

    #[test_case("Ja|ne"; "pipe")]
    #[test_case("Ja\nne"; "newline")]
    #[test_case("Jane\r"; "carriage return")]
    fn rejects_bad_name(name: &str) {
        assert!(matches!(
            Details::parse(name, "Citizen", ADDRESS, "15-11-1990"),
            Err(ValidationError::Name(_))
        ));
    }

    #[test]
    fn id_is_checked_before_address() {
        let error = Person::parse("bad", "Jane", "Citizen", "nowhere", "15-11-1990").unwrap_err();
        assert!(matches!(error, ValidationError::PersonId(_)));
    }

    #[test]
    fn address_is_checked_before_birthdate() {
        let error = Person::parse("56s_d%&fAB", "Jane", "Citizen", "nowhere", "bad").unwrap_err();
        assert!(matches!(error, ValidationError::Address(_)));
    }

    #[test]
    fn birthdate_is_checked_before_names() {
        let error = Person::parse("56s_d%&fAB", "Ja|ne", "Citizen", ADDRESS, "bad").unwrap_err();
        assert!(matches!(error, ValidationError::Date(_)));
    }
}
