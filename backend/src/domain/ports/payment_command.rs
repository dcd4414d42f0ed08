//! Driving port for payment reconciliation.
//!
//! Payment never touches the slot ledger; it only sets the `payment` flag.

use async_trait::async_trait;

use crate::domain::{AppointmentId, Error, UserId};

/// Start an online payment for one appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitiatePaymentRequest {
    /// Appointment concerned.
    pub appointment_id: AppointmentId,
    /// Requesting patient; must own the appointment.
    pub user_id: UserId,
}

/// Where to send the patient to pay, plus the provider reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatePaymentResponse {
    /// Checkout URL the patient is redirected to.
    pub authorization_url: String,
    /// Provider transaction reference.
    pub reference: String,
}

/// Reconcile a provider reference against an appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPaymentRequest {
    /// Provider transaction reference.
    pub reference: String,
    /// Appointment concerned.
    pub appointment_id: AppointmentId,
    /// Requesting patient; must own the appointment.
    pub user_id: UserId,
}

/// What the provider reported for a confirmation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Provider confirmed success; `payment` is set.
    Paid,
    /// Provider reported failure; nothing changed.
    Failed,
    /// Provider has not settled yet; nothing changed, retry later.
    Pending,
}

/// Result of a confirmation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmPaymentResponse {
    /// Appointment concerned.
    pub appointment_id: AppointmentId,
    /// What the provider reported.
    pub outcome: PaymentOutcome,
}

/// Domain use-case port for payments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentCommand: Send + Sync {
    async fn initiate_payment(
        &self,
        request: InitiatePaymentRequest,
    ) -> Result<InitiatePaymentResponse, Error>;

    async fn confirm_payment(
        &self,
        request: ConfirmPaymentRequest,
    ) -> Result<ConfirmPaymentResponse, Error>;
}
