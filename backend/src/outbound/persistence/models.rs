//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{appointments, doctors, slot_reservations, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = doctors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DoctorRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: i64,
    pub address_line1: String,
    pub address_line2: String,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

/// Patient projection without credential columns.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserSnapshotRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub image: String,
    pub address_line1: String,
    pub address_line2: String,
    pub gender: String,
    pub dob: Option<NaiveDate>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AppointmentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub doctor_id: Uuid,
    pub slot_date: String,
    pub slot_time: String,
    pub user_snapshot: serde_json::Value,
    pub doctor_snapshot: serde_json::Value,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
    pub cancelled: bool,
    pub payment: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = appointments)]
pub(crate) struct NewAppointmentRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub doctor_id: Uuid,
    pub slot_date: &'a str,
    pub slot_time: &'a str,
    pub user_snapshot: &'a serde_json::Value,
    pub doctor_snapshot: &'a serde_json::Value,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
    pub cancelled: bool,
    pub payment: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = slot_reservations)]
pub(crate) struct NewSlotReservationRow<'a> {
    pub doctor_id: Uuid,
    pub slot_date: &'a str,
    pub slot_time: &'a str,
    pub appointment_id: Uuid,
}
