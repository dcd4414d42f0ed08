//! Port for the external payment provider.

use async_trait::async_trait;

use crate::domain::AppointmentId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment gateway adapters.
    pub enum PaymentGatewayError {
        /// No gateway credentials are configured.
        Unconfigured =>
            "payment gateway is not configured",
        /// The provider did not answer within the configured bound.
        Timeout { message: String } =>
            "payment gateway timed out: {message}",
        /// The request never produced an HTTP response.
        Transport { message: String } =>
            "payment gateway transport failed: {message}",
        /// The provider answered with a non-success status.
        Rejected { message: String } =>
            "payment gateway rejected the request: {message}",
        /// The provider response could not be decoded.
        Decode { message: String } =>
            "payment gateway response could not be decoded: {message}",
    }
}

/// Payment intent parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    /// Appointment echoed back in the intent metadata.
    pub appointment_id: AppointmentId,
    /// Payer email.
    pub email: String,
    /// Amount in minor units.
    pub amount_minor_units: u64,
    /// Where the provider sends the patient after checkout.
    pub callback_url: String,
}

/// Intent created by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedTransaction {
    /// Checkout URL the patient is redirected to.
    pub authorization_url: String,
    /// Provider transaction reference.
    pub reference: String,
}

/// Provider-reported transaction status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Charged in full.
    Success,
    /// Failed, abandoned or reversed.
    Failed,
    /// Not settled yet.
    Pending,
}

/// Verification result for one transaction reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedTransaction {
    /// Provider-reported status.
    pub status: TransactionStatus,
    /// Appointment id echoed back from the intent metadata, when present.
    pub appointment_id: Option<AppointmentId>,
    /// Amount charged in minor units, when the provider reports one.
    pub amount_minor_units: Option<u64>,
}

/// Port for creating and verifying payment transactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent and return the redirect URL.
    async fn create_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<AuthorizedTransaction, PaymentGatewayError>;

    /// Look up the status of a transaction by provider reference.
    async fn verify_transaction(
        &self,
        reference: &str,
    ) -> Result<VerifiedTransaction, PaymentGatewayError>;
}

/// Gateway used when no provider credentials are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredPaymentGateway;

#[async_trait]
impl PaymentGateway for UnconfiguredPaymentGateway {
    async fn create_transaction(
        &self,
        _request: &TransactionRequest,
    ) -> Result<AuthorizedTransaction, PaymentGatewayError> {
        Err(PaymentGatewayError::unconfigured())
    }

    async fn verify_transaction(
        &self,
        _reference: &str,
    ) -> Result<VerifiedTransaction, PaymentGatewayError> {
        Err(PaymentGatewayError::unconfigured())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn unconfigured_gateway_refuses_every_call() {
        let gateway = UnconfiguredPaymentGateway;
        let request = TransactionRequest {
            appointment_id: AppointmentId::random(),
            email: "ada@example.com".to_owned(),
            amount_minor_units: 50_000,
            callback_url: "http://localhost/cb".to_owned(),
        };

        let create = gateway.create_transaction(&request).await;
        let verify = gateway.verify_transaction("ref").await;

        assert_eq!(create, Err(PaymentGatewayError::Unconfigured));
        assert_eq!(verify, Err(PaymentGatewayError::Unconfigured));
    }
}
