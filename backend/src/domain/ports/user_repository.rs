//! Port for reading patient data needed by bookings and reports.

use async_trait::async_trait;

use crate::domain::{UserId, UserSnapshot};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
    }
}

/// Port for patient lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Load the credential-free snapshot of a patient.
    async fn find_snapshot(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserSnapshot>, UserRepositoryError>;

    /// Number of registered patients.
    async fn count(&self) -> Result<u64, UserRepositoryError>;
}

/// Fixture implementation for tests that do not exercise user storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_snapshot(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<UserSnapshot>, UserRepositoryError> {
        Ok(None)
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        Ok(0)
    }
}
