//! HTTP inbound adapter exposing the booking REST endpoints.

pub mod admin;
pub mod auth;
pub mod doctor_portal;
pub mod doctors;
pub mod dto;
pub mod error;
pub mod health;
pub mod patients;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub(crate) mod validation;

pub use error::ApiResult;
