//! Payment provider adapters.
//!
//! A thin HTTP implementation of the `PaymentGateway` port against the
//! Paystack transaction API.

mod dto;
mod paystack;

pub use paystack::PaystackGateway;
