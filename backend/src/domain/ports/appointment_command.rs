//! Driving port for appointment mutations: booking, cancellation, completion.

use async_trait::async_trait;

use crate::domain::{Appointment, AppointmentId, DoctorId, Error, Slot, UserId};

/// Request to book a slot with a doctor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookAppointmentRequest {
    /// Patient booking the slot.
    pub user_id: UserId,
    /// Doctor the slot belongs to.
    pub doctor_id: DoctorId,
    /// Booked date and time.
    pub slot: Slot,
}

/// Newly booked appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookAppointmentResponse {
    /// The stored appointment.
    pub appointment: Appointment,
}

/// Who is asking for a cancellation; decides the ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Canceller {
    /// Must be the patient who booked.
    Patient(UserId),
    /// Must be the appointment's doctor.
    Doctor(DoctorId),
    /// No ownership check.
    Admin,
}

/// Cancel one appointment on behalf of `canceller`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelAppointmentRequest {
    /// Appointment concerned.
    pub appointment_id: AppointmentId,
    /// Who is cancelling; drives the ownership check.
    pub canceller: Canceller,
}

/// Outcome of a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelAppointmentResponse {
    /// Appointment concerned.
    pub appointment_id: AppointmentId,
    /// `false` when the appointment was already cancelled.
    pub newly_cancelled: bool,
}

/// Mark an appointment done on behalf of its doctor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompleteAppointmentRequest {
    /// Appointment concerned.
    pub appointment_id: AppointmentId,
    /// Doctor completing the appointment; must own it.
    pub doctor_id: DoctorId,
}

/// Outcome of a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompleteAppointmentResponse {
    /// Appointment concerned.
    pub appointment_id: AppointmentId,
    /// `false` when the appointment was already completed.
    pub newly_completed: bool,
}

/// Domain use-case port for appointment mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentCommand: Send + Sync {
    async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<BookAppointmentResponse, Error>;

    async fn cancel_appointment(
        &self,
        request: CancelAppointmentRequest,
    ) -> Result<CancelAppointmentResponse, Error>;

    async fn complete_appointment(
        &self,
        request: CompleteAppointmentRequest,
    ) -> Result<CompleteAppointmentResponse, Error>;
}
