//! Domain primitives, aggregates, ports, and the services behind them.
//!
//! Purpose: keep the booking rules (no double-booking, slot release on
//! cancellation, payment reconciliation) independent of transport and
//! storage. Inbound adapters call driving ports; services depend only on
//! driven ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Identifiers, slots, and amounts: validated value objects.
//! - Doctor / Appointment / dashboards: entities and read models.
//! - `*Service`: driving-port implementations.

pub mod admin_login_service;
pub mod amount;
pub mod appointment;
pub mod appointment_query_service;
pub mod auth;
pub mod booking_service;
pub mod doctor;
pub mod doctor_directory_service;
pub mod error;
pub mod ids;
pub mod payment_service;
pub mod ports;
pub mod reporting;
pub mod slot;
pub mod trace_id;
pub mod user;

pub use self::admin_login_service::AdminLoginService;
pub use self::amount::{Amount, MINOR_UNITS_PER_UNIT};
pub use self::appointment::{
    Appointment, AppointmentDraft, AppointmentFlags, AppointmentValidationError, LifecycleFlag,
};
pub use self::appointment_query_service::AppointmentQueryService;
pub use self::auth::{LoginCredentials, LoginValidationError, Principal, constant_time_eq};
pub use self::booking_service::BookingService;
pub use self::doctor::{Address, Doctor, DoctorListing, DoctorSnapshot};
pub use self::doctor_directory_service::DoctorDirectoryService;
pub use self::error::{Error, ErrorCode};
pub use self::ids::{AppointmentId, DoctorId, IdValidationError, UserId};
pub use self::payment_service::{PaymentService, callback_url};
pub use self::reporting::{AdminDashboard, DoctorDashboard, LATEST_APPOINTMENTS};
pub use self::slot::{
    SLOT_TIME_MAX, Slot, SlotDate, SlotKey, SlotTime, SlotValidationError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::UserSnapshot;
