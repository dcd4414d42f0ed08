//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations`. Credential columns
//! (`password_hash`) exist in the database but are not mapped, so no query
//! in this crate can select them.

diesel::table! {
    /// Doctor profiles and the availability switch.
    doctors (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        image -> Varchar,
        speciality -> Varchar,
        degree -> Varchar,
        experience -> Varchar,
        about -> Text,
        /// Consultation fee in whole currency units.
        fees -> Int8,
        address_line1 -> Varchar,
        address_line2 -> Varchar,
        available -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registered patients.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        phone -> Varchar,
        image -> Varchar,
        address_line1 -> Varchar,
        address_line2 -> Varchar,
        gender -> Varchar,
        dob -> Nullable<Date>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Booked appointments; never deleted.
    appointments (id) {
        id -> Uuid,
        /// Insertion order, used for listings and "latest" reports.
        seq -> Int8,
        user_id -> Uuid,
        doctor_id -> Uuid,
        slot_date -> Varchar,
        slot_time -> Varchar,
        user_snapshot -> Jsonb,
        doctor_snapshot -> Jsonb,
        amount -> Int8,
        created_at -> Timestamptz,
        cancelled -> Bool,
        payment -> Bool,
        completed -> Bool,
    }
}

diesel::table! {
    /// Slot ledger: one row per occupied `(doctor, date, time)`.
    slot_reservations (doctor_id, slot_date, slot_time) {
        doctor_id -> Uuid,
        slot_date -> Varchar,
        slot_time -> Varchar,
        /// Appointment holding the slot.
        appointment_id -> Uuid,
        seq -> Int8,
    }
}

diesel::joinable!(appointments -> doctors (doctor_id));
diesel::joinable!(appointments -> users (user_id));
diesel::joinable!(slot_reservations -> doctors (doctor_id));

diesel::allow_tables_to_appear_in_same_query!(appointments, doctors, slot_reservations, users);
