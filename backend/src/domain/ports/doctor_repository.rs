//! Port for doctor records.

use async_trait::async_trait;

use crate::domain::{Doctor, DoctorId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by doctor repository adapters.
    pub enum DoctorRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "doctor repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "doctor repository query failed: {message}",
    }
}

/// Port for reading doctors and flipping their availability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Find a doctor by id.
    async fn find_by_id(&self, doctor_id: &DoctorId)
    -> Result<Option<Doctor>, DoctorRepositoryError>;

    /// List every doctor in creation order.
    async fn list(&self) -> Result<Vec<Doctor>, DoctorRepositoryError>;

    /// Atomically negate `available`, returning the new value or `None` when
    /// the doctor does not exist.
    async fn toggle_availability(
        &self,
        doctor_id: &DoctorId,
    ) -> Result<Option<bool>, DoctorRepositoryError>;

    /// Number of registered doctors.
    async fn count(&self) -> Result<u64, DoctorRepositoryError>;
}

/// Fixture implementation for tests that do not exercise doctor storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDoctorRepository;

#[async_trait]
impl DoctorRepository for FixtureDoctorRepository {
    async fn find_by_id(
        &self,
        _doctor_id: &DoctorId,
    ) -> Result<Option<Doctor>, DoctorRepositoryError> {
        Ok(None)
    }

    async fn list(&self) -> Result<Vec<Doctor>, DoctorRepositoryError> {
        Ok(Vec::new())
    }

    async fn toggle_availability(
        &self,
        _doctor_id: &DoctorId,
    ) -> Result<Option<bool>, DoctorRepositoryError> {
        Ok(None)
    }

    async fn count(&self) -> Result<u64, DoctorRepositoryError> {
        Ok(0)
    }
}
