//! Payment reconciliation against the external provider.
//!
//! Only the `payment` flag is written here. Slot occupancy and the
//! `cancelled` flag are never consulted after initiation and never changed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::booking_service::{appointment_not_found, conflict, map_appointment_error};
use crate::domain::ports::{
    AppointmentRepository, ConfirmPaymentRequest, ConfirmPaymentResponse, FlagUpdate,
    InitiatePaymentRequest, InitiatePaymentResponse, PaymentCommand, PaymentGateway,
    PaymentGatewayError, PaymentOutcome, TransactionRequest, TransactionStatus,
};
use crate::domain::{Appointment, AppointmentId, Error, UserId};

/// URL the provider redirects the patient to after checkout.
///
/// # Examples
/// ```
/// use clinic_backend::domain::{AppointmentId, callback_url};
///
/// let id = AppointmentId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap();
/// assert_eq!(
///     callback_url("http://localhost:5173/", &id),
///     "http://localhost:5173/paystack/verify?appointmentId=3fa85f64-5717-4562-b3fc-2c963f66afa6",
/// );
/// ```
pub fn callback_url(client_base_url: &str, appointment_id: &AppointmentId) -> String {
    format!(
        "{}/paystack/verify?appointmentId={appointment_id}",
        client_base_url.trim_end_matches('/')
    )
}

fn map_gateway_error(error: PaymentGatewayError) -> Error {
    warn!(error = %error, "payment gateway call failed");
    match error {
        PaymentGatewayError::Unconfigured => {
            Error::service_unavailable("payments are not configured")
        }
        PaymentGatewayError::Timeout { message } => Error::service_unavailable(format!(
            "payment status unknown, retry confirmation: {message}"
        )),
        PaymentGatewayError::Transport { message }
        | PaymentGatewayError::Rejected { message }
        | PaymentGatewayError::Decode { message } => {
            Error::service_unavailable(format!("payment gateway unavailable: {message}"))
        }
    }
}

/// Payment service implementing [`PaymentCommand`].
#[derive(Clone)]
pub struct PaymentService<A, G: ?Sized> {
    appointments: Arc<A>,
    gateway: Arc<G>,
    client_base_url: String,
}

impl<A, G: ?Sized> PaymentService<A, G> {
    /// Build the service; `client_base_url` prefixes the checkout callback.
    pub fn new(appointments: Arc<A>, gateway: Arc<G>, client_base_url: impl Into<String>) -> Self {
        Self {
            appointments,
            gateway,
            client_base_url: client_base_url.into(),
        }
    }
}

impl<A, G: ?Sized> PaymentService<A, G>
where
    A: AppointmentRepository,
{
    async fn load_owned(
        &self,
        appointment_id: &AppointmentId,
        user_id: &UserId,
    ) -> Result<Appointment, Error> {
        let appointment = self
            .appointments
            .find_by_id(appointment_id)
            .await
            .map_err(map_appointment_error)?
            .ok_or_else(|| appointment_not_found(appointment_id))?;
        if !appointment.is_booked_by(user_id) {
            return Err(Error::forbidden(format!(
                "appointment {appointment_id} does not belong to the requester"
            )));
        }
        Ok(appointment)
    }
}

#[async_trait]
impl<A, G> PaymentCommand for PaymentService<A, G>
where
    A: AppointmentRepository,
    G: PaymentGateway + ?Sized,
{
    async fn initiate_payment(
        &self,
        request: InitiatePaymentRequest,
    ) -> Result<InitiatePaymentResponse, Error> {
        let appointment = self
            .appointments
            .find_by_id(&request.appointment_id)
            .await
            .map_err(map_appointment_error)?
            .ok_or_else(|| appointment_not_found(&request.appointment_id))?;
        if appointment.is_cancelled() {
            return Err(conflict(
                "appointment_cancelled",
                format!("appointment {} is cancelled", appointment.id()),
            ));
        }
        if !appointment.is_booked_by(&request.user_id) {
            return Err(Error::forbidden(format!(
                "appointment {} does not belong to the requester",
                appointment.id()
            )));
        }

        let amount_minor_units = appointment.amount().to_minor_units().ok_or_else(|| {
            Error::internal(format!(
                "amount {} overflows minor units",
                appointment.amount()
            ))
        })?;
        let transaction = self
            .gateway
            .create_transaction(&TransactionRequest {
                appointment_id: appointment.id(),
                email: appointment.user_snapshot().email.clone(),
                amount_minor_units,
                callback_url: callback_url(&self.client_base_url, &appointment.id()),
            })
            .await
            .map_err(map_gateway_error)?;

        info!(
            appointment_id = %appointment.id(),
            reference = %transaction.reference,
            "payment initiated"
        );
        Ok(InitiatePaymentResponse {
            authorization_url: transaction.authorization_url,
            reference: transaction.reference,
        })
    }

    async fn confirm_payment(
        &self,
        request: ConfirmPaymentRequest,
    ) -> Result<ConfirmPaymentResponse, Error> {
        let reference = request.reference.trim();
        if reference.is_empty() {
            return Err(Error::invalid_request("payment reference must not be empty"));
        }
        let appointment = self
            .load_owned(&request.appointment_id, &request.user_id)
            .await?;

        let verified = self
            .gateway
            .verify_transaction(reference)
            .await
            .map_err(map_gateway_error)?;
        match verified.appointment_id {
            Some(paid_for) if paid_for == appointment.id() => {}
            Some(_) => {
                return Err(Error::invalid_request(format!(
                    "payment reference {reference} belongs to another appointment"
                )));
            }
            None => {
                return Err(Error::invalid_request(format!(
                    "payment reference {reference} carries no appointment metadata"
                )));
            }
        }

        let outcome = match verified.status {
            TransactionStatus::Success => {
                let expected = appointment.amount().to_minor_units();
                if expected.is_none() || verified.amount_minor_units != expected {
                    warn!(
                        appointment_id = %appointment.id(),
                        reference,
                        charged = ?verified.amount_minor_units,
                        expected = ?expected,
                        "payment amount does not match the appointment"
                    );
                    return Err(Error::invalid_request(format!(
                        "payment reference {reference} was not for the appointment amount"
                    )));
                }
                match self
                    .appointments
                    .mark_paid(&appointment.id())
                    .await
                    .map_err(map_appointment_error)?
                {
                    FlagUpdate::Applied | FlagUpdate::AlreadySet => PaymentOutcome::Paid,
                    FlagUpdate::Missing => return Err(appointment_not_found(&appointment.id())),
                }
            }
            TransactionStatus::Failed => PaymentOutcome::Failed,
            TransactionStatus::Pending => PaymentOutcome::Pending,
        };

        info!(
            appointment_id = %appointment.id(),
            reference,
            outcome = ?outcome,
            "payment confirmation processed"
        );
        Ok(ConfirmPaymentResponse {
            appointment_id: appointment.id(),
            outcome,
        })
    }
}

#[cfg(test)]
#[path = "payment_service_tests.rs"]
mod tests;
