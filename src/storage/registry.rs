//! The person registry.
//!
//! [`Registry`] validates people, appends them to a person ledger, applies
//! vetted updates by rewriting that ledger, and records demerit points in a
//! second ledger.
//!
//! Every operation comes in two forms. The `Result` form (`insert`, `update`,
//! `record_offence`) reports exactly why an operation was refused. The
//! boolean form (`add_person`, `update_personal_details`,
//! `add_demerit_points`) accepts raw strings and only says whether it worked;
//! the reason is logged.

use std::{collections::BTreeMap, fmt, io, path::Path};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    domain::{
        CalendarDate, Changes, Config, Details, InvalidDate, InvalidPersonId, InvalidPoints,
        Offence, Person, PersonId, Standing, ValidationError, age_in_years,
        demerit::{self, DemeritPoints},
        person_id::starts_with_even_digit,
    },
    storage::{
        ledger::{Ledger, LineFile},
        record::{OffenceLine, Record},
    },
};

/// People younger than this may not change their address.
pub const MINOR_AGE: i64 = 18;

/// A store of people and their demerit points.
#[derive(Debug)]
pub struct Registry<L = LineFile> {
    people: L,
    demerits: L,
    clock: fn() -> DateTime<Utc>,
}

impl Registry<LineFile> {
    /// Opens the registry rooted at `root`, reading `registry.toml` if present.
    #[must_use]
    pub fn open(root: &Path) -> Self {
        let config = Config::load_or_default(root);
        Self::with_config(root, &config)
    }

    /// Opens the registry rooted at `root` using the given configuration.
    #[must_use]
    pub fn with_config(root: &Path, config: &Config) -> Self {
        Self::new(
            LineFile::new(config.people_path(root)),
            LineFile::new(config.demerits_path(root)),
        )
    }
}

impl<L: Ledger> Registry<L> {
    /// A registry over the given person and demerit ledgers.
    pub fn new(people: L, demerits: L) -> Self {
        Self {
            people,
            demerits,
            clock: Utc::now,
        }
    }

    /// Replaces the source of the current time, used for age calculations.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// The person ledger.
    pub const fn people(&self) -> &L {
        &self.people
    }

    /// The demerit ledger.
    pub const fn demerits(&self) -> &L {
        &self.demerits
    }

    /// Every well-formed record, in storage order.
    ///
    /// # Errors
    ///
    /// Returns an error if the person ledger cannot be read.
    pub fn records(&self) -> io::Result<Vec<Record>> {
        Ok(self
            .people
            .read_lines()?
            .iter()
            .filter_map(|line| {
                let record = Record::parse(line);
                if record.is_none() {
                    tracing::debug!("Skipping malformed line: {line}");
                }
                record
            })
            .collect())
    }

    /// The stored record for `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the person ledger cannot be read.
    pub fn find(&self, id: &PersonId) -> io::Result<Option<Record>> {
        Ok(self
            .records()?
            .into_iter()
            .find(|record| record.id == id.as_str()))
    }

    /// Appends a validated person.
    ///
    /// # Errors
    ///
    /// Fails if a person with the same ID is already stored, or if the ledger
    /// cannot be read or written.
    pub fn insert(&mut self, person: &Person) -> Result<(), AddPersonError> {
        if self.find(&person.id)?.is_some() {
            return Err(AddPersonError::Duplicate(person.id.clone()));
        }

        self.people.append_line(&Record::from(person).to_string())?;
        tracing::info!("Added person {}", person.id);
        Ok(())
    }

    /// Validates and appends a person given as raw strings.
    ///
    /// Validation runs in the order person ID, address, birthdate, names. On
    /// any failure nothing is written and `false` is returned.
    pub fn add_person(
        &mut self,
        id: &str,
        first_name: &str,
        last_name: &str,
        address: &str,
        birthdate: &str,
    ) -> bool {
        let result = Person::parse(id, first_name, last_name, address, birthdate)
            .map_err(AddPersonError::from)
            .and_then(|person| self.insert(&person));
        succeeded("add person", id, result)
    }

    /// Applies `changes` to the person stored under `target`.
    ///
    /// The changes are checked against the currently stored values:
    ///
    /// 1. someone under 18 may not change address (an unreadable stored
    ///    birthdate counts as under 18)
    /// 2. a birthdate change may not be combined with any other change
    /// 3. an ID starting with an even digit may not be reassigned
    ///
    /// The ledger is rewritten only if every check passes. When the ID is
    /// reassigned, demerit points follow the person to the new ID; if they
    /// cannot be moved, the person ledger is restored.
    ///
    /// # Errors
    ///
    /// Fails with [`UpdateError::NotFound`] if no stored record has the ID,
    /// with [`UpdateError::Veto`] if a rule rejects the change, and with an I/O
    /// error if a ledger cannot be read or replaced.
    pub fn update(&mut self, target: &PersonId, changes: &Changes) -> Result<(), UpdateError> {
        let lines = self.people.read_lines()?;
        let new_id = changes.new_id.as_ref().unwrap_or(target);
        let reassigned = new_id != target;
        let id_taken = reassigned
            && lines
                .iter()
                .filter_map(|line| Record::parse(line))
                .any(|record| record.id == new_id.as_str());

        let replacement = Record {
            id: new_id.to_string(),
            first_name: changes.details.first_name.to_string(),
            last_name: changes.details.last_name.to_string(),
            address: changes.details.address.to_string(),
            birthdate: changes.details.birthdate.to_string(),
        }
        .to_string();

        let now = (self.clock)();
        let mut matched = false;
        let mut rewritten = Vec::with_capacity(lines.len());

        for line in &lines {
            match Record::parse(line) {
                Some(current) if current.id == target.as_str() => {
                    check_vetoes(&current, changes, now)?;
                    matched = true;
                    rewritten.push(replacement.clone());
                }
                Some(_) => rewritten.push(line.clone()),
                None => {
                    tracing::debug!("Passing through malformed line: {line}");
                    rewritten.push(line.clone());
                }
            }
        }

        if !matched {
            return Err(UpdateError::NotFound(target.clone()));
        }
        if id_taken {
            return Err(Veto::IdTaken(new_id.clone()).into());
        }

        self.people.replace_lines(&rewritten)?;
        tracing::info!("Updated person {target}");

        if reassigned {
            if let Err(e) = self.rekey_offences(target, new_id) {
                // Keep the person and their points under the same ID.
                if let Err(restore) = self.people.replace_lines(&lines) {
                    tracing::warn!("Failed to restore person {target}: {restore}");
                }
                return Err(UpdateError::Demerits(e));
            }
            tracing::info!("Reassigned {target} to {new_id}");
        }

        Ok(())
    }

    /// Validates and applies new details given as raw strings.
    ///
    /// Returns `false` if any value is malformed, no record matches
    /// `target`, a rule vetoes the change, or the store cannot be rewritten.
    pub fn update_personal_details(
        &mut self,
        target: &str,
        first_name: &str,
        last_name: &str,
        address: &str,
        birthdate: &str,
    ) -> bool {
        let result = parse_update(target, first_name, last_name, address, birthdate)
            .and_then(|(id, changes)| self.update(&id, &changes));
        succeeded("update person", target, result)
    }

    /// The offences recorded against `id`, in the order they were recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the demerit ledger cannot be read.
    pub fn offences(&self, id: &PersonId) -> io::Result<Vec<Offence>> {
        self.offences_of(id.as_str())
    }

    fn offences_of(&self, id: &str) -> io::Result<Vec<Offence>> {
        Ok(self
            .demerits
            .read_lines()?
            .iter()
            .filter_map(|line| OffenceLine::parse(line))
            .filter(|entry| entry.id == id)
            .map(|entry| entry.offence)
            .collect())
    }

    fn age_of(&self, record: &Record) -> Option<i64> {
        let birthdate: CalendarDate = record.birthdate.parse().ok()?;
        Some(age_in_years(birthdate, (self.clock)()))
    }

    fn standing_of(&self, record: &Record) -> io::Result<Standing> {
        let offences = self.offences_of(&record.id)?;
        Ok(demerit::assess(&offences, self.age_of(record)))
    }

    /// Records an offence and reassesses suspension.
    ///
    /// # Errors
    ///
    /// Fails if `id` is not stored, or if a ledger cannot be read or written.
    pub fn record_offence(
        &mut self,
        id: &PersonId,
        offence: Offence,
    ) -> Result<Standing, DemeritError> {
        let record = self
            .find(id)?
            .ok_or_else(|| DemeritError::UnknownPerson(id.clone()))?;

        self.demerits
            .append_line(&OffenceLine::new(id, offence).to_string())?;
        tracing::info!(
            "Recorded {} demerit points against {id} on {}",
            offence.points,
            offence.date
        );

        let standing = self.standing_of(&record)?;
        if standing.suspended {
            tracing::info!(
                "{id} is suspended: {} points in two years exceeds {}",
                standing.window_total,
                standing.limit
            );
        }
        Ok(standing)
    }

    /// Validates and records an offence given as raw values.
    ///
    /// `offence_date` must be `DD-MM-YYYY` and `points` a whole number from 1
    /// to 6. Nothing is stored unless every check passes.
    pub fn add_demerit_points(&mut self, id: &str, offence_date: &str, points: i64) -> Outcome {
        let result = parse_offence(id, offence_date, points)
            .and_then(|(id, offence)| self.record_offence(&id, offence));
        if succeeded("add demerit points", id, result) {
            Outcome::Success
        } else {
            Outcome::Failed
        }
    }

    /// The stored record for `id` with its demerit points and suspension.
    ///
    /// # Errors
    ///
    /// Returns an error if a ledger cannot be read.
    pub fn profile(&self, id: &PersonId) -> io::Result<Option<Profile>> {
        let Some(record) = self.find(id)? else {
            return Ok(None);
        };
        let offences = self.offences_of(&record.id)?;
        let standing = demerit::assess(&offences, self.age_of(&record));

        Ok(Some(Profile {
            demerit_points: demerit::points_by_date(&offences),
            standing,
            record,
        }))
    }

    fn rekey_offences(&mut self, from: &PersonId, to: &PersonId) -> io::Result<()> {
        let lines = self.demerits.read_lines()?;
        let mut changed = false;

        let rekeyed: Vec<String> = lines
            .into_iter()
            .map(|line| match OffenceLine::parse(&line) {
                Some(mut entry) if entry.id == from.as_str() => {
                    changed = true;
                    entry.id = to.to_string();
                    entry.to_string()
                }
                _ => line,
            })
            .collect();

        if changed {
            self.demerits.replace_lines(&rekeyed)?;
        }
        Ok(())
    }
}

fn check_vetoes(current: &Record, changes: &Changes, now: DateTime<Utc>) -> Result<(), Veto> {
    let details = &changes.details;

    let address_changed = current.address != details.address.as_str();
    let birthdate_changed = current.birthdate != details.birthdate.to_string();
    let name_changed = current.first_name != details.first_name.as_str()
        || current.last_name != details.last_name.as_str();
    let id_changed = changes
        .new_id
        .as_ref()
        .is_some_and(|id| id.as_str() != current.id);

    let age = current
        .birthdate
        .parse::<CalendarDate>()
        .ok()
        .map(|birthdate| age_in_years(birthdate, now));

    if address_changed && age.is_none_or(|age| age < MINOR_AGE) {
        return Err(Veto::MinorAddress { age });
    }

    if birthdate_changed && (name_changed || address_changed || id_changed) {
        return Err(Veto::BirthdateNotAlone);
    }

    if id_changed && starts_with_even_digit(&current.id) {
        return Err(Veto::EvenId(current.id.clone()));
    }

    Ok(())
}

fn parse_update(
    target: &str,
    first_name: &str,
    last_name: &str,
    address: &str,
    birthdate: &str,
) -> Result<(PersonId, Changes), UpdateError> {
    let id: PersonId = target.parse().map_err(ValidationError::from)?;
    let details = Details::parse(first_name, last_name, address, birthdate)?;
    Ok((id, Changes::new(details)))
}

fn parse_offence(
    id: &str,
    offence_date: &str,
    points: i64,
) -> Result<(PersonId, Offence), DemeritError> {
    let id: PersonId = id.parse()?;
    let date: CalendarDate = offence_date.parse()?;
    let points = DemeritPoints::try_from(points)?;
    Ok((id, Offence { date, points }))
}

/// Collapses a result to a boolean, logging the reason for a failure.
fn succeeded<T, E: fmt::Display>(operation: &str, id: &str, result: Result<T, E>) -> bool {
    match result {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Failed to {operation} '{id}': {e}");
            false
        }
    }
}

/// A person's record, demerit points and suspension status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    /// The stored fields.
    #[serde(flatten)]
    pub record: Record,
    /// Points per offence date.
    pub demerit_points: BTreeMap<CalendarDate, u32>,
    /// Suspension assessment.
    pub standing: Standing,
}

impl Profile {
    /// Whether the person's licence is suspended.
    #[must_use]
    pub const fn is_suspended(&self) -> bool {
        self.standing.suspended
    }
}

/// The outcome of [`Registry::add_demerit_points`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The points were recorded.
    Success,
    /// The points were rejected; nothing was stored.
    Failed,
}

impl Outcome {
    /// Whether the operation succeeded.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// A business rule that rejected an update.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Veto {
    /// Someone under 18 tried to change address.
    #[error("address cannot be changed for a person under 18 (age {})", display_age(.age))]
    MinorAddress {
        /// Age from the stored birthdate, if it could be read.
        age: Option<i64>,
    },

    /// The birthdate changed together with another field.
    #[error("birthdate cannot be changed together with any other detail")]
    BirthdateNotAlone,

    /// The stored ID starts with an even digit and cannot be reassigned.
    #[error("person ID '{0}' starts with an even digit and cannot be changed")]
    EvenId(String),

    /// The new ID already belongs to someone else.
    #[error("person ID '{0}' is already in use")]
    IdTaken(PersonId),
}

fn display_age(age: &Option<i64>) -> String {
    age.map_or_else(|| "unknown".to_string(), |age| age.to_string())
}

/// Errors from [`Registry::insert`].
#[derive(Debug, thiserror::Error)]
pub enum AddPersonError {
    /// A field is malformed.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The ID is already stored.
    #[error("person {0} already exists")]
    Duplicate(PersonId),

    /// The ledger could not be read or written.
    #[error("failed to add person: {0}")]
    Io(#[from] io::Error),
}

/// Errors from [`Registry::update`].
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// A new value is malformed.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// No stored record has the ID.
    #[error("person {0} not found")]
    NotFound(PersonId),

    /// A business rule rejected the change.
    #[error("update rejected: {0}")]
    Veto(#[from] Veto),

    /// The person ledger could not be read or replaced.
    #[error("failed to update person: {0}")]
    Io(#[from] io::Error),

    /// The demerit points could not be moved to the new ID. The person ledger
    /// is put back as it was.
    #[error("failed to move demerit points to the new ID: {0}")]
    Demerits(io::Error),
}

/// Errors from [`Registry::record_offence`].
#[derive(Debug, thiserror::Error)]
pub enum DemeritError {
    /// Malformed person ID.
    #[error(transparent)]
    PersonId(#[from] InvalidPersonId),

    /// Malformed offence date.
    #[error(transparent)]
    Date(#[from] InvalidDate),

    /// Points out of range.
    #[error(transparent)]
    Points(#[from] InvalidPoints),

    /// No stored record has the ID.
    #[error("person {0} not found")]
    UnknownPerson(PersonId),

    /// A ledger could not be read or written.
    #[error("failed to record demerit points: {0}")]
    Io(#[from] io::Error),
}
