//! Domain models for the person registry.
//!
//! This module contains the validated field types (person IDs, addresses,
//! dates, names), the demerit point rules, and configuration.

/// Person identifier validation.
pub mod person_id;
pub use person_id::{InvalidPersonId, PersonId};

/// Postal address validation.
pub mod address;
pub use address::{Address, InvalidAddress};

/// Strict `DD-MM-YYYY` dates and age arithmetic.
pub mod date;
pub use date::{CalendarDate, InvalidDate, age_in_years};

/// People and the changes that can be made to them.
pub mod person;
pub use person::{Changes, Details, InvalidName, Name, Person, ValidationError};

pub mod demerit;
pub use demerit::{DemeritPoints, InvalidPoints, Offence, Standing};

mod config;
pub use config::Config;
