//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only ever see
//! driving ports, so each handler can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AdminLogin, AppointmentCommand, AppointmentQuery, DoctorDirectory, PaymentCommand,
    TokenVerifier,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Booking, cancellation and completion.
    pub appointments: Arc<dyn AppointmentCommand>,
    /// Appointment listings and dashboards.
    pub appointment_queries: Arc<dyn AppointmentQuery>,
    /// Online payment.
    pub payments: Arc<dyn PaymentCommand>,
    /// Doctor directory and availability.
    pub directory: Arc<dyn DoctorDirectory>,
    /// Admin credential check.
    pub admin_login: Arc<dyn AdminLogin>,
    /// Bearer token verification.
    pub tokens: Arc<dyn TokenVerifier>,
}
