//! PostgreSQL-backed `SlotLedger`.
//!
//! The `(doctor_id, slot_date, slot_time)` primary key makes `reserve` a
//! single `INSERT ... ON CONFLICT DO NOTHING`: of N concurrent reservations
//! for one key exactly one inserts a row. `release` deletes only the row held
//! by the given appointment.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{ReleaseOutcome, ReserveOutcome, SlotLedger, SlotLedgerError};
use crate::domain::{AppointmentId, DoctorId, SlotDate, SlotKey, SlotTime};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewSlotReservationRow;
use super::pool::{DbPool, PoolError};
use super::schema::slot_reservations;

/// Diesel-backed implementation of the slot ledger port.
#[derive(Clone)]
pub struct DieselSlotLedger {
    pool: DbPool,
}

impl DieselSlotLedger {
    /// Ledger over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SlotLedgerError {
    map_basic_pool_error(error, |message| SlotLedgerError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> SlotLedgerError {
    map_basic_diesel_error(error, SlotLedgerError::query, SlotLedgerError::connection)
}

#[async_trait]
impl SlotLedger for DieselSlotLedger {
    async fn reserve(
        &self,
        key: &SlotKey,
        holder: &AppointmentId,
    ) -> Result<ReserveOutcome, SlotLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewSlotReservationRow {
            doctor_id: *key.doctor_id.as_uuid(),
            slot_date: key.slot.date.as_str(),
            slot_time: key.slot.time.as_str(),
            appointment_id: *holder.as_uuid(),
        };

        let inserted = diesel::insert_into(slot_reservations::table)
            .values(&row)
            .on_conflict((
                slot_reservations::doctor_id,
                slot_reservations::slot_date,
                slot_reservations::slot_time,
            ))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(slot = %key, inserted, "slot reservation attempted");
        Ok(if inserted == 1 {
            ReserveOutcome::Reserved
        } else {
            ReserveOutcome::AlreadyBooked
        })
    }

    async fn release(
        &self,
        key: &SlotKey,
        holder: &AppointmentId,
    ) -> Result<ReleaseOutcome, SlotLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(
            slot_reservations::table.filter(
                slot_reservations::doctor_id
                    .eq(key.doctor_id.as_uuid())
                    .and(slot_reservations::slot_date.eq(key.slot.date.as_str()))
                    .and(slot_reservations::slot_time.eq(key.slot.time.as_str()))
                    .and(slot_reservations::appointment_id.eq(holder.as_uuid())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(if deleted == 1 {
            ReleaseOutcome::Released
        } else {
            ReleaseOutcome::NotHeld
        })
    }

    async fn occupied_times(
        &self,
        doctor_id: &DoctorId,
        date: &SlotDate,
    ) -> Result<Vec<SlotTime>, SlotLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let times: Vec<String> = slot_reservations::table
            .filter(
                slot_reservations::doctor_id
                    .eq(doctor_id.as_uuid())
                    .and(slot_reservations::slot_date.eq(date.as_str())),
            )
            .order(slot_reservations::seq.asc())
            .select(slot_reservations::slot_time)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        times
            .into_iter()
            .map(|time| {
                SlotTime::new(&time)
                    .map_err(|err| SlotLedgerError::query(format!("decode slot_time: {err}")))
            })
            .collect()
    }
}
