//! Port for the slot ledger: the set of occupied `(doctor, date, time)` keys.
//!
//! Both operations must be atomic against the backing store. Adapters never
//! read-modify-write a copy of a doctor's schedule.

use async_trait::async_trait;

use crate::domain::{AppointmentId, DoctorId, SlotDate, SlotKey, SlotTime};

use super::define_port_error;

define_port_error! {
    /// Errors raised by slot ledger adapters.
    pub enum SlotLedgerError {
        /// Ledger connection could not be established.
        Connection { message: String } =>
            "slot ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "slot ledger query failed: {message}",
    }
}

/// Result of [`SlotLedger::reserve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// The key was free and now belongs to the holder.
    Reserved,
    /// Another appointment holds the key.
    AlreadyBooked,
}

/// Result of [`SlotLedger::release`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The holder's reservation was removed.
    Released,
    /// The key was free or held by another appointment; nothing changed.
    NotHeld,
}

/// Port for atomically claiming and freeing slots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlotLedger: Send + Sync {
    /// Claim `key` for `holder` if nobody holds it.
    async fn reserve(
        &self,
        key: &SlotKey,
        holder: &AppointmentId,
    ) -> Result<ReserveOutcome, SlotLedgerError>;

    /// Free `key` only when `holder` is the appointment holding it.
    async fn release(
        &self,
        key: &SlotKey,
        holder: &AppointmentId,
    ) -> Result<ReleaseOutcome, SlotLedgerError>;

    /// Occupied times for one doctor and date, in reservation order.
    async fn occupied_times(
        &self,
        doctor_id: &DoctorId,
        date: &SlotDate,
    ) -> Result<Vec<SlotTime>, SlotLedgerError>;
}

/// Fixture ledger that accepts every reservation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSlotLedger;

#[async_trait]
impl SlotLedger for FixtureSlotLedger {
    async fn reserve(
        &self,
        _key: &SlotKey,
        _holder: &AppointmentId,
    ) -> Result<ReserveOutcome, SlotLedgerError> {
        Ok(ReserveOutcome::Reserved)
    }

    async fn release(
        &self,
        _key: &SlotKey,
        _holder: &AppointmentId,
    ) -> Result<ReleaseOutcome, SlotLedgerError> {
        Ok(ReleaseOutcome::NotHeld)
    }

    async fn occupied_times(
        &self,
        _doctor_id: &DoctorId,
        _date: &SlotDate,
    ) -> Result<Vec<SlotTime>, SlotLedgerError> {
        Ok(Vec::new())
    }
}
