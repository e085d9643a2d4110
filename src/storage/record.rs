//! Encoding of records as pipe-delimited lines.
//!
//! A person line is `id|first|last|address|birthdate`. The address itself
//! contains four pipes, so a line is split on every pipe and reassembled: the
//! first three pieces and the last piece are fields, and everything between
//! them is the address. Stored values are kept as raw text; they are only
//! compared, never re-validated, when read back.

use std::fmt;

use serde::Serialize;

use crate::domain::{DemeritPoints, Offence, Person, PersonId};

/// The field delimiter.
pub const DELIMITER: char = '|';

/// A person as stored, field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Stored identifier.
    pub id: String,
    /// Stored first name.
    pub first_name: String,
    /// Stored last name.
    pub last_name: String,
    /// Stored address.
    pub address: String,
    /// Stored birthdate.
    pub birthdate: String,
}

impl Record {
    /// Decodes a line, returning `None` if it has fewer than five fields.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let pieces: Vec<&str> = line.split(DELIMITER).collect();
        let [id, first_name, last_name, address @ .., birthdate] = pieces.as_slice() else {
            return None;
        };
        if address.is_empty() {
            return None;
        }

        Some(Self {
            id: (*id).to_string(),
            first_name: (*first_name).to_string(),
            last_name: (*last_name).to_string(),
            address: address.join("|"),
            birthdate: (*birthdate).to_string(),
        })
    }
}

impl From<&Person> for Record {
    fn from(person: &Person) -> Self {
        let details = &person.details;
        Self {
            id: person.id.to_string(),
            first_name: details.first_name.to_string(),
            last_name: details.last_name.to_string(),
            address: details.address.to_string(),
            birthdate: details.birthdate.to_string(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}",
            self.id, self.first_name, self.last_name, self.address, self.birthdate
        )
    }
}

/// One line of the demerit ledger: `id|DD-MM-YYYY|points`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffenceLine {
    /// Who committed the offence.
    pub id: String,
    /// What was recorded.
    pub offence: Offence,
}

impl OffenceLine {
    /// Builds a line for `id`.
    #[must_use]
    pub fn new(id: &PersonId, offence: Offence) -> Self {
        Self {
            id: id.to_string(),
            offence,
        }
    }

    /// Decodes a line, returning `None` if it is malformed.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split(DELIMITER);
        let (Some(id), Some(date), Some(points), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return None;
        };

        Some(Self {
            id: id.to_string(),
            offence: Offence {
                date: date.parse().ok()?,
                points: points.parse::<DemeritPoints>().ok()?,
            },
        })
    }
}

impl fmt::Display for OffenceLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}",
            self.id, self.offence.date, self.offence.points
        )
    }
}
