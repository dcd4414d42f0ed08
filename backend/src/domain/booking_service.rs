//! Booking, cancellation, and completion of appointments.
//!
//! The slot ledger is the source of truth for occupancy. A booking reserves
//! its key before the appointment row is written, and compensates with a
//! holder-scoped release when that write fails and no row was stored.
//! Every cancellation call releases the key it holds, so a retry after a
//! failed release still frees the slot.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    AppointmentCommand, AppointmentRepository, AppointmentRepositoryError,
    BookAppointmentRequest, BookAppointmentResponse, CancelAppointmentRequest,
    CancelAppointmentResponse, Canceller, CompleteAppointmentRequest,
    CompleteAppointmentResponse, DoctorRepository, DoctorRepositoryError, FlagUpdate,
    ReleaseOutcome, ReserveOutcome, SlotLedger, SlotLedgerError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{Appointment, AppointmentDraft, AppointmentId, Error, SlotKey};

pub(crate) fn map_doctor_error(error: DoctorRepositoryError) -> Error {
    match error {
        DoctorRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("doctor repository unavailable: {message}"))
        }
        DoctorRepositoryError::Query { message } => {
            Error::internal(format!("doctor repository error: {message}"))
        }
    }
}

pub(crate) fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

pub(crate) fn map_appointment_error(error: AppointmentRepositoryError) -> Error {
    match error {
        AppointmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("appointment repository unavailable: {message}"))
        }
        AppointmentRepositoryError::Query { message } => {
            Error::internal(format!("appointment repository error: {message}"))
        }
    }
}

pub(crate) fn map_ledger_error(error: SlotLedgerError) -> Error {
    match error {
        SlotLedgerError::Connection { message } => {
            Error::service_unavailable(format!("slot ledger unavailable: {message}"))
        }
        SlotLedgerError::Query { message } => {
            Error::internal(format!("slot ledger error: {message}"))
        }
    }
}

/// Conflict carrying a stable machine-readable reason in `details.code`.
pub(crate) fn conflict(code: &str, message: impl Into<String>) -> Error {
    Error::conflict(message).with_details(json!({ "code": code }))
}

pub(crate) fn appointment_not_found(appointment_id: &AppointmentId) -> Error {
    Error::not_found(format!("appointment {appointment_id} not found"))
}

/// Appointment service implementing [`AppointmentCommand`].
#[derive(Clone)]
pub struct BookingService<D, U, A, L> {
    doctors: Arc<D>,
    users: Arc<U>,
    appointments: Arc<A>,
    ledger: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<D, U, A, L> BookingService<D, U, A, L> {
    /// Create the service over its driven ports.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// use clinic_backend::domain::BookingService;
    /// use clinic_backend::domain::ports::{
    ///     FixtureAppointmentRepository, FixtureDoctorRepository, FixtureSlotLedger,
    ///     FixtureUserRepository,
    /// };
    ///
    /// let _service = BookingService::new(
    ///     Arc::new(FixtureDoctorRepository),
    ///     Arc::new(FixtureUserRepository),
    ///     Arc::new(FixtureAppointmentRepository),
    ///     Arc::new(FixtureSlotLedger),
    ///     Arc::new(DefaultClock),
    /// );
    /// ```
    pub fn new(
        doctors: Arc<D>,
        users: Arc<U>,
        appointments: Arc<A>,
        ledger: Arc<L>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            doctors,
            users,
            appointments,
            ledger,
            clock,
        }
    }
}

impl<D, U, A, L> BookingService<D, U, A, L>
where
    A: AppointmentRepository,
    L: SlotLedger,
{
    async fn load(&self, appointment_id: &AppointmentId) -> Result<Appointment, Error> {
        self.appointments
            .find_by_id(appointment_id)
            .await
            .map_err(map_appointment_error)?
            .ok_or_else(|| appointment_not_found(appointment_id))
    }

    async fn release(
        &self,
        key: &SlotKey,
        holder: &AppointmentId,
    ) -> Result<ReleaseOutcome, Error> {
        self.ledger
            .release(key, holder)
            .await
            .map_err(map_ledger_error)
    }

    /// Undo a reservation whose appointment write reported failure.
    ///
    /// A failed write may still have committed, so the appointment is read
    /// back first: a stored row keeps its slot. When the read also fails the
    /// reservation is kept.
    async fn compensate(&self, appointment: &Appointment) -> Option<Appointment> {
        let key = appointment.slot_key();
        let holder = appointment.id();
        match self.appointments.find_by_id(&holder).await {
            Ok(Some(stored)) => {
                warn!(
                    slot = %key,
                    appointment_id = %holder,
                    "appointment write reported failure but the row exists; keeping slot"
                );
                return Some(stored);
            }
            Ok(None) => {}
            Err(err) => {
                error!(
                    slot = %key,
                    appointment_id = %holder,
                    error = %err,
                    "appointment write state unknown; slot left reserved"
                );
                return None;
            }
        }
        if let Err(err) = self.ledger.release(&key, &holder).await {
            error!(
                slot = %key,
                appointment_id = %holder,
                error = %err,
                "compensating slot release failed; ledger row is orphaned"
            );
        }
        None
    }
}

fn check_cancel_ownership(appointment: &Appointment, canceller: &Canceller) -> Result<(), Error> {
    let allowed = match canceller {
        Canceller::Patient(user_id) => appointment.is_booked_by(user_id),
        Canceller::Doctor(doctor_id) => appointment.is_with(doctor_id),
        Canceller::Admin => true,
    };
    if allowed {
        Ok(())
    } else {
        Err(Error::forbidden(format!(
            "appointment {} does not belong to the requester",
            appointment.id()
        )))
    }
}

#[async_trait]
impl<D, U, A, L> AppointmentCommand for BookingService<D, U, A, L>
where
    D: DoctorRepository,
    U: UserRepository,
    A: AppointmentRepository,
    L: SlotLedger,
{
    async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<BookAppointmentResponse, Error> {
        let BookAppointmentRequest {
            user_id,
            doctor_id,
            slot,
        } = request;

        let doctor = self
            .doctors
            .find_by_id(&doctor_id)
            .await
            .map_err(map_doctor_error)?
            .ok_or_else(|| Error::not_found(format!("doctor {doctor_id} not found")))?;
        if !doctor.available {
            return Err(conflict(
                "doctor_unavailable",
                format!("doctor {doctor_id} is not available"),
            ));
        }

        let user_snapshot = self
            .users
            .find_snapshot(&user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))?;

        let appointment = Appointment::book(AppointmentDraft {
            id: AppointmentId::random(),
            user_id,
            doctor_id,
            slot,
            user_snapshot,
            doctor_snapshot: doctor.snapshot(),
            amount: doctor.fees,
            created_at: self.clock.utc(),
        })
        .map_err(|err| Error::internal(format!("appointment assembly failed: {err}")))?;
        let key = appointment.slot_key();

        match self
            .ledger
            .reserve(&key, &appointment.id())
            .await
            .map_err(map_ledger_error)?
        {
            ReserveOutcome::Reserved => {}
            ReserveOutcome::AlreadyBooked => {
                debug!(slot = %key, "slot already booked");
                return Err(conflict(
                    "slot_already_booked",
                    format!("slot {} is already booked", appointment.slot()),
                ));
            }
        }

        if let Err(err) = self.appointments.insert(&appointment).await {
            warn!(
                slot = %key,
                appointment_id = %appointment.id(),
                error = %err,
                "appointment write failed; compensating"
            );
            match self.compensate(&appointment).await {
                Some(stored) => return Ok(BookAppointmentResponse { appointment: stored }),
                None => {
                    return Err(Error::service_unavailable(format!(
                        "appointment could not be stored: {err}"
                    )));
                }
            }
        }

        info!(
            appointment_id = %appointment.id(),
            doctor_id = %doctor_id,
            date = %appointment.slot().date,
            time = %appointment.slot().time,
            "appointment booked"
        );
        Ok(BookAppointmentResponse { appointment })
    }

    async fn cancel_appointment(
        &self,
        request: CancelAppointmentRequest,
    ) -> Result<CancelAppointmentResponse, Error> {
        let appointment = self.load(&request.appointment_id).await?;
        check_cancel_ownership(&appointment, &request.canceller)?;

        let update = self
            .appointments
            .mark_cancelled(&appointment.id())
            .await
            .map_err(map_appointment_error)?;
        let newly_cancelled = match update {
            FlagUpdate::Applied => true,
            FlagUpdate::AlreadySet => false,
            FlagUpdate::Missing => return Err(appointment_not_found(&appointment.id())),
        };

        // Re-cancellations release too: an earlier attempt may have set the
        // flag and then failed to free the slot. Release is holder-scoped, so
        // a slot someone else has since booked is never touched.
        let key = appointment.slot_key();
        let released = self.release(&key, &appointment.id()).await?;
        match (newly_cancelled, released) {
            (true, ReleaseOutcome::Released) => {
                info!(
                    appointment_id = %appointment.id(),
                    canceller = ?request.canceller,
                    "appointment cancelled"
                );
            }
            (true, ReleaseOutcome::NotHeld) => {
                warn!(
                    slot = %key,
                    appointment_id = %appointment.id(),
                    "slot was not held by this appointment; release skipped"
                );
            }
            (false, ReleaseOutcome::Released) => {
                info!(
                    slot = %key,
                    appointment_id = %appointment.id(),
                    "released slot left behind by an earlier cancellation"
                );
            }
            (false, ReleaseOutcome::NotHeld) => {
                debug!(appointment_id = %appointment.id(), "appointment already cancelled");
            }
        }

        Ok(CancelAppointmentResponse {
            appointment_id: appointment.id(),
            newly_cancelled,
        })
    }

    async fn complete_appointment(
        &self,
        request: CompleteAppointmentRequest,
    ) -> Result<CompleteAppointmentResponse, Error> {
        let appointment = self.load(&request.appointment_id).await?;
        if !appointment.is_with(&request.doctor_id) {
            return Err(Error::forbidden(format!(
                "appointment {} belongs to another doctor",
                appointment.id()
            )));
        }
        if appointment.is_cancelled() {
            return Err(conflict(
                "appointment_cancelled",
                format!("appointment {} is cancelled", appointment.id()),
            ));
        }

        let update = self
            .appointments
            .mark_completed(&appointment.id())
            .await
            .map_err(map_appointment_error)?;
        let newly_completed = match update {
            FlagUpdate::Applied => true,
            FlagUpdate::AlreadySet => false,
            FlagUpdate::Missing => return Err(appointment_not_found(&appointment.id())),
        };

        info!(appointment_id = %appointment.id(), "appointment completed");
        Ok(CompleteAppointmentResponse {
            appointment_id: appointment.id(),
            newly_completed,
        })
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
