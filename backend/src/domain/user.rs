//! Patient data captured into appointments.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Address, UserId};

/// Patient profile as embedded into an appointment.
///
/// Credentials never reach this type; repositories project them away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    /// Identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Profile image URL.
    pub image: String,
    /// Postal address.
    pub address: Address,
    /// Self-reported gender.
    pub gender: String,
    /// Date of birth, when given.
    pub dob: Option<NaiveDate>,
}
