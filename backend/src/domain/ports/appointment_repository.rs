//! Port for appointment records.
//!
//! Flag writes are single-field conditional updates so concurrent writers of
//! different flags never overwrite each other.

use async_trait::async_trait;

use crate::domain::{Appointment, AppointmentId, DoctorId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by appointment repository adapters.
    pub enum AppointmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "appointment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "appointment repository query failed: {message}",
    }
}

/// Result of setting one lifecycle flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagUpdate {
    /// This call flipped the flag from `false` to `true`.
    Applied,
    /// The flag was already set; nothing changed.
    AlreadySet,
    /// No appointment has the given id.
    Missing,
}

/// Port for writing and reading appointments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Persist a freshly booked appointment.
    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError>;

    /// Find an appointment by id.
    async fn find_by_id(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError>;

    /// List a patient's appointments in insertion order.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError>;

    /// List a doctor's appointments in insertion order.
    async fn list_for_doctor(
        &self,
        doctor_id: &DoctorId,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError>;

    /// List every appointment in insertion order.
    async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentRepositoryError>;

    /// Set `cancelled`.
    async fn mark_cancelled(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<FlagUpdate, AppointmentRepositoryError>;

    /// Set `payment`.
    async fn mark_paid(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<FlagUpdate, AppointmentRepositoryError>;

    /// Set `completed`.
    async fn mark_completed(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<FlagUpdate, AppointmentRepositoryError>;
}

/// Fixture implementation for tests that do not exercise appointment storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAppointmentRepository;

#[async_trait]
impl AppointmentRepository for FixtureAppointmentRepository {
    async fn insert(&self, _appointment: &Appointment) -> Result<(), AppointmentRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _appointment_id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        Ok(None)
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_for_doctor(
        &self,
        _doctor_id: &DoctorId,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        Ok(Vec::new())
    }

    async fn mark_cancelled(
        &self,
        _appointment_id: &AppointmentId,
    ) -> Result<FlagUpdate, AppointmentRepositoryError> {
        Ok(FlagUpdate::Missing)
    }

    async fn mark_paid(
        &self,
        _appointment_id: &AppointmentId,
    ) -> Result<FlagUpdate, AppointmentRepositoryError> {
        Ok(FlagUpdate::Missing)
    }

    async fn mark_completed(
        &self,
        _appointment_id: &AppointmentId,
    ) -> Result<FlagUpdate, AppointmentRepositoryError> {
        Ok(FlagUpdate::Missing)
    }
}
