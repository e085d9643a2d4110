//! Plain-text Personal Records Registry
//!
//! People are stored one per line in a pipe-delimited text file, with their
//! demerit points kept in a second file alongside.

pub mod domain;
pub use domain::{
    Address, CalendarDate, Changes, Config, DemeritPoints, Details, Offence, Person, PersonId,
    Standing,
};

/// Line-oriented storage and the registry operations built on it.
pub mod storage;
pub use storage::{Ledger, LineFile, MemoryLedger, Outcome, Profile, Record, Registry};
