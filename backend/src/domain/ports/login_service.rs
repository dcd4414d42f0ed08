//! Driving port for administrator login.
//!
//! Inbound adapters call it to exchange credentials for a bearer token
//! without importing the token signer.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials};

/// Domain use-case port for admin authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminLogin: Send + Sync {
    /// Validate credentials and return a freshly issued admin token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<String, Error>;
}
