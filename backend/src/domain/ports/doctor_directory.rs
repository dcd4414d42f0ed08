//! Driving port for the public doctor directory and availability switches.

use async_trait::async_trait;

use crate::domain::{DoctorId, DoctorListing, Error, Principal, SlotDate, SlotTime};

/// Flip one doctor's availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeAvailabilityRequest {
    /// Doctor to update.
    pub doctor_id: DoctorId,
    /// Must be the doctor themself or an admin.
    pub requester: Principal,
}

/// Availability after the flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeAvailabilityResponse {
    /// Doctor updated.
    pub doctor_id: DoctorId,
    /// New availability.
    pub available: bool,
}

/// Domain use-case port for directory reads and availability toggles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    async fn list_doctors(&self) -> Result<Vec<DoctorListing>, Error>;

    /// Times already taken for `doctor_id` on `date`.
    async fn booked_slots(
        &self,
        doctor_id: DoctorId,
        date: SlotDate,
    ) -> Result<Vec<SlotTime>, Error>;

    async fn change_availability(
        &self,
        request: ChangeAvailabilityRequest,
    ) -> Result<ChangeAvailabilityResponse, Error>;
}
