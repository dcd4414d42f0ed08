//! Bookable slot value objects.
//!
//! A slot is one `(date, time)` unit of a doctor's schedule. Dates use the
//! `D_M_YYYY` key the booking frontend sends (for example `10_5_2024`); they
//! are validated against the calendar and normalised without zero padding so
//! `01_05_2024` and `1_5_2024` name the same ledger entry.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::DoctorId;

/// Maximum accepted length of a slot time label.
pub const SLOT_TIME_MAX: usize = 16;

/// Validation errors raised by slot constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValidationError {
    /// The date key was not `D_M_YYYY`.
    MalformedDate { value: String },
    /// The date key named a day that does not exist.
    ImpossibleDate { value: String },
    /// The time label was blank.
    EmptyTime,
    /// The time label exceeded [`SLOT_TIME_MAX`] characters.
    TimeTooLong { max: usize },
}

impl fmt::Display for SlotValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedDate { value } => {
                write!(f, "slot date `{value}` must use the D_M_YYYY format")
            }
            Self::ImpossibleDate { value } => {
                write!(f, "slot date `{value}` is not a calendar date")
            }
            Self::EmptyTime => write!(f, "slot time must not be empty"),
            Self::TimeTooLong { max } => write!(f, "slot time must be at most {max} characters"),
        }
    }
}

impl std::error::Error for SlotValidationError {}

/// Calendar day of a slot, keyed as `D_M_YYYY`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotDate(String);

impl SlotDate {
    /// Parse and normalise a `D_M_YYYY` key.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SlotValidationError> {
        let raw = raw.as_ref().trim();
        let malformed = || SlotValidationError::MalformedDate {
            value: raw.to_owned(),
        };

        let mut parts = raw.split('_');
        let (Some(day), Some(month), Some(year), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        let day: u32 = day.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        let year: i32 = year.parse().map_err(|_| malformed())?;
        if !(1000..=9999).contains(&year) {
            return Err(malformed());
        }

        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            SlotValidationError::ImpossibleDate {
                value: raw.to_owned(),
            }
        })?;
        Ok(Self::from_naive(date))
    }

    /// Build the key for a calendar date.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(format!("{}_{}_{}", date.day(), date.month(), date.year()))
    }

    /// The normalised key.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SlotDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SlotDate> for String {
    fn from(value: SlotDate) -> Self {
        value.0
    }
}

impl TryFrom<String> for SlotDate {
    type Error = SlotValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Time-of-day label of a slot, e.g. `10:00` or `10:30 AM`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotTime(String);

impl SlotTime {
    /// Validate a time label; surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SlotValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SlotValidationError::EmptyTime);
        }
        if trimmed.chars().count() > SLOT_TIME_MAX {
            return Err(SlotValidationError::TimeTooLong { max: SLOT_TIME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The label as stored in the ledger.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SlotTime> for String {
    fn from(value: SlotTime) -> Self {
        value.0
    }
}

impl TryFrom<String> for SlotTime {
    type Error = SlotValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One bookable `(date, time)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Calendar date.
    pub date: SlotDate,
    /// Time of day.
    pub time: SlotTime,
}

impl Slot {
    /// Pair a date with a time.
    pub fn new(date: SlotDate, time: SlotTime) -> Self {
        Self { date, time }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}

/// Ledger key: a slot in one doctor's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    /// Doctor whose calendar is keyed.
    pub doctor_id: DoctorId,
    /// Booked date and time.
    pub slot: Slot,
}

impl SlotKey {
    /// Key a slot by its doctor.
    pub fn new(doctor_id: DoctorId, slot: Slot) -> Self {
        Self { doctor_id, slot }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.doctor_id, self.slot)
    }
}
