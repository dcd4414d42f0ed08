//! Doctor records and the snapshot embedded into appointments.
//!
//! Occupied slots are not part of [`Doctor`]; they live behind the slot
//! ledger port, so profile writes never race with bookings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Amount, DoctorId};

/// Two-line postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// First address line.
    pub line1: String,
    /// Second address line.
    pub line2: String,
}

/// Doctor record as held by the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctor {
    /// Identifier.
    pub id: DoctorId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Profile image URL.
    pub image: String,
    /// Medical speciality.
    pub speciality: String,
    /// Qualification.
    pub degree: String,
    /// Free-text experience, e.g. `4 Years`.
    pub experience: String,
    /// Short biography.
    pub about: String,
    /// Consultation fee in major units.
    pub fees: Amount,
    /// Postal address.
    pub address: Address,
    /// Whether the doctor accepts new bookings.
    pub available: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Doctor {
    /// Immutable copy stored inside an appointment at booking time.
    pub fn snapshot(&self) -> DoctorSnapshot {
        DoctorSnapshot {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
            speciality: self.speciality.clone(),
            degree: self.degree.clone(),
            experience: self.experience.clone(),
            about: self.about.clone(),
            fees: self.fees,
            address: self.address.clone(),
        }
    }

    /// Public directory entry; omits the contact email.
    pub fn listing(&self) -> DoctorListing {
        DoctorListing {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            speciality: self.speciality.clone(),
            degree: self.degree.clone(),
            experience: self.experience.clone(),
            about: self.about.clone(),
            fees: self.fees,
            address: self.address.clone(),
            available: self.available,
        }
    }
}

/// Doctor data captured when an appointment is booked.
///
/// Never re-read for current doctor state; it records what the patient saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSnapshot {
    /// Identifier.
    pub id: DoctorId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Profile image URL.
    pub image: String,
    /// Medical speciality.
    pub speciality: String,
    /// Qualification.
    pub degree: String,
    /// Free-text experience, e.g. `4 Years`.
    pub experience: String,
    /// Short biography.
    pub about: String,
    /// Consultation fee in major units.
    pub fees: Amount,
    /// Postal address.
    pub address: Address,
}

/// Doctor entry exposed by the public directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorListing {
    /// Identifier.
    pub id: DoctorId,
    /// Display name.
    pub name: String,
    /// Profile image URL.
    pub image: String,
    /// Medical speciality.
    pub speciality: String,
    /// Qualification.
    pub degree: String,
    /// Free-text experience, e.g. `4 Years`.
    pub experience: String,
    /// Short biography.
    pub about: String,
    /// Consultation fee in major units.
    pub fees: Amount,
    /// Postal address.
    pub address: Address,
    /// Whether the doctor accepts new bookings.
    pub available: bool,
}
