//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories and slot ledger using Diesel
//! - **memory**: mutex-guarded in-process store for development and tests
//! - **payment**: Paystack-compatible HTTP gateway
//! - **auth**: SHA-256 signed bearer tokens
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod auth;
pub mod memory;
pub mod payment;
pub mod persistence;
