//! Driving port for appointment reads and dashboards.

use async_trait::async_trait;

use crate::domain::{AdminDashboard, Appointment, DoctorDashboard, DoctorId, Error, UserId};

/// Domain use-case port for appointment listings and reports.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentQuery: Send + Sync {
    /// A patient's appointments, in insertion order.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Appointment>, Error>;

    /// A doctor's appointments, in insertion order.
    async fn list_for_doctor(&self, doctor_id: DoctorId) -> Result<Vec<Appointment>, Error>;

    /// Every appointment, in insertion order.
    async fn list_all(&self) -> Result<Vec<Appointment>, Error>;

    async fn doctor_dashboard(&self, doctor_id: DoctorId) -> Result<DoctorDashboard, Error>;

    async fn admin_dashboard(&self) -> Result<AdminDashboard, Error>;
}
