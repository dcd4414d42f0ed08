//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod appointment_command;
mod appointment_query;
mod appointment_repository;
mod doctor_directory;
mod doctor_repository;
mod login_service;
mod payment_command;
mod payment_gateway;
mod slot_ledger;
mod token_verifier;
mod user_repository;

#[cfg(test)]
pub use appointment_command::MockAppointmentCommand;
pub use appointment_command::{
    AppointmentCommand, BookAppointmentRequest, BookAppointmentResponse, CancelAppointmentRequest,
    CancelAppointmentResponse, Canceller, CompleteAppointmentRequest, CompleteAppointmentResponse,
};
pub use appointment_query::AppointmentQuery;
#[cfg(test)]
pub use appointment_query::MockAppointmentQuery;
#[cfg(test)]
pub use appointment_repository::MockAppointmentRepository;
pub use appointment_repository::{
    AppointmentRepository, AppointmentRepositoryError, FixtureAppointmentRepository, FlagUpdate,
};
#[cfg(test)]
pub use doctor_directory::MockDoctorDirectory;
pub use doctor_directory::{
    ChangeAvailabilityRequest, ChangeAvailabilityResponse, DoctorDirectory,
};
#[cfg(test)]
pub use doctor_repository::MockDoctorRepository;
pub use doctor_repository::{DoctorRepository, DoctorRepositoryError, FixtureDoctorRepository};
pub use login_service::AdminLogin;
#[cfg(test)]
pub use login_service::MockAdminLogin;
#[cfg(test)]
pub use payment_command::MockPaymentCommand;
pub use payment_command::{
    ConfirmPaymentRequest, ConfirmPaymentResponse, InitiatePaymentRequest,
    InitiatePaymentResponse, PaymentCommand, PaymentOutcome,
};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{
    AuthorizedTransaction, PaymentGateway, PaymentGatewayError, TransactionRequest,
    TransactionStatus, UnconfiguredPaymentGateway, VerifiedTransaction,
};
#[cfg(test)]
pub use slot_ledger::MockSlotLedger;
pub use slot_ledger::{
    FixtureSlotLedger, ReleaseOutcome, ReserveOutcome, SlotLedger, SlotLedgerError,
};
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
pub use token_verifier::{TokenError, TokenVerifier};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
