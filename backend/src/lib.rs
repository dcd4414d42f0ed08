//! Clinic appointment booking backend.
//!
//! The crate is laid out hexagonally: [`domain`] owns the booking rules and
//! ports, [`inbound`] adapts HTTP onto the driving ports, and [`outbound`]
//! implements the driven ports over PostgreSQL, memory, Paystack, and signed
//! bearer tokens.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
