//! PostgreSQL-backed `AppointmentRepository`.
//!
//! Snapshots are stored as JSONB. Flag writes are conditional single-column
//! updates (`SET cancelled = true WHERE id = $1 AND NOT cancelled`), so the
//! affected-row count tells the caller whether it performed the transition.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AppointmentRepository, AppointmentRepositoryError, FlagUpdate};
use crate::domain::{
    Amount, Appointment, AppointmentDraft, AppointmentFlags, AppointmentId, DoctorId,
    DoctorSnapshot, LifecycleFlag, Slot, SlotDate, SlotTime, UserId, UserSnapshot,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AppointmentRow, NewAppointmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::appointments;

/// Diesel-backed implementation of the appointment repository port.
#[derive(Clone)]
pub struct DieselAppointmentRepository {
    pool: DbPool,
}

impl DieselAppointmentRepository {
    /// Repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AppointmentRepositoryError {
    map_basic_pool_error(error, |message| {
        AppointmentRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> AppointmentRepositoryError {
    map_basic_diesel_error(
        error,
        AppointmentRepositoryError::query,
        AppointmentRepositoryError::connection,
    )
}

fn decode_error(field: &str, err: impl std::fmt::Display) -> AppointmentRepositoryError {
    AppointmentRepositoryError::query(format!("decode {field}: {err}"))
}

fn row_to_appointment(row: AppointmentRow) -> Result<Appointment, AppointmentRepositoryError> {
    let AppointmentRow {
        id,
        user_id,
        doctor_id,
        slot_date,
        slot_time,
        user_snapshot,
        doctor_snapshot,
        amount,
        created_at,
        cancelled,
        payment,
        completed,
    } = row;

    let date = SlotDate::new(&slot_date).map_err(|err| decode_error("slot_date", err))?;
    let time = SlotTime::new(&slot_time).map_err(|err| decode_error("slot_time", err))?;
    let user_snapshot: UserSnapshot =
        serde_json::from_value(user_snapshot).map_err(|err| decode_error("user_snapshot", err))?;
    let doctor_snapshot: DoctorSnapshot = serde_json::from_value(doctor_snapshot)
        .map_err(|err| decode_error("doctor_snapshot", err))?;
    let amount = u64::try_from(amount).map_err(|err| decode_error("amount", err))?;

    Appointment::restore(
        AppointmentDraft {
            id: AppointmentId::from_uuid(id),
            user_id: UserId::from_uuid(user_id),
            doctor_id: DoctorId::from_uuid(doctor_id),
            slot: Slot::new(date, time),
            user_snapshot,
            doctor_snapshot,
            amount: Amount::new(amount),
            created_at,
        },
        AppointmentFlags {
            cancelled,
            payment,
            completed,
        },
    )
    .map_err(|err| AppointmentRepositoryError::query(err.to_string()))
}

fn rows_to_appointments(
    rows: Vec<AppointmentRow>,
) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
    rows.into_iter().map(row_to_appointment).collect()
}

impl DieselAppointmentRepository {
    async fn set_flag(
        &self,
        appointment_id: &AppointmentId,
        flag: LifecycleFlag,
    ) -> Result<FlagUpdate, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let target = appointments::table.filter(appointments::id.eq(appointment_id.as_uuid()));

        let updated = match flag {
            LifecycleFlag::Cancelled => {
                diesel::update(target.filter(appointments::cancelled.eq(false)))
                    .set(appointments::cancelled.eq(true))
                    .execute(&mut conn)
                    .await
            }
            LifecycleFlag::Payment => {
                diesel::update(target.filter(appointments::payment.eq(false)))
                    .set(appointments::payment.eq(true))
                    .execute(&mut conn)
                    .await
            }
            LifecycleFlag::Completed => {
                diesel::update(target.filter(appointments::completed.eq(false)))
                    .set(appointments::completed.eq(true))
                    .execute(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;
        if updated > 0 {
            return Ok(FlagUpdate::Applied);
        }

        // Rows are never deleted, so existence cannot change between the two
        // statements.
        let exists: bool = diesel::select(diesel::dsl::exists(
            appointments::table.filter(appointments::id.eq(appointment_id.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(if exists {
            FlagUpdate::AlreadySet
        } else {
            FlagUpdate::Missing
        })
    }
}

#[async_trait]
impl AppointmentRepository for DieselAppointmentRepository {
    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError> {
        let user_snapshot = serde_json::to_value(appointment.user_snapshot()).map_err(|err| {
            AppointmentRepositoryError::query(format!("serialise user snapshot: {err}"))
        })?;
        let doctor_snapshot = serde_json::to_value(appointment.doctor_snapshot()).map_err(|err| {
            AppointmentRepositoryError::query(format!("serialise doctor snapshot: {err}"))
        })?;
        let amount = i64::try_from(appointment.amount().units()).map_err(|_| {
            AppointmentRepositoryError::query(format!(
                "amount {} exceeds storage range",
                appointment.amount()
            ))
        })?;
        let flags = appointment.flags();

        let new_row = NewAppointmentRow {
            id: *appointment.id().as_uuid(),
            user_id: *appointment.user_id().as_uuid(),
            doctor_id: *appointment.doctor_id().as_uuid(),
            slot_date: appointment.slot().date.as_str(),
            slot_time: appointment.slot().time.as_str(),
            user_snapshot: &user_snapshot,
            doctor_snapshot: &doctor_snapshot,
            amount,
            created_at: appointment.created_at(),
            cancelled: flags.cancelled,
            payment: flags.payment,
            completed: flags.completed,
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(appointments::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = appointments::table
            .filter(appointments::id.eq(appointment_id.as_uuid()))
            .select(AppointmentRow::as_select())
            .first::<AppointmentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_appointment).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<AppointmentRow> = appointments::table
            .filter(appointments::user_id.eq(user_id.as_uuid()))
            .order(appointments::seq.asc())
            .select(AppointmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_appointments(rows)
    }

    async fn list_for_doctor(
        &self,
        doctor_id: &DoctorId,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<AppointmentRow> = appointments::table
            .filter(appointments::doctor_id.eq(doctor_id.as_uuid()))
            .order(appointments::seq.asc())
            .select(AppointmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_appointments(rows)
    }

    async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<AppointmentRow> = appointments::table
            .order(appointments::seq.asc())
            .select(AppointmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_appointments(rows)
    }

    async fn mark_cancelled(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<FlagUpdate, AppointmentRepositoryError> {
        self.set_flag(appointment_id, LifecycleFlag::Cancelled).await
    }

    async fn mark_paid(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<FlagUpdate, AppointmentRepositoryError> {
        self.set_flag(appointment_id, LifecycleFlag::Payment).await
    }

    async fn mark_completed(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<FlagUpdate, AppointmentRepositoryError> {
        self.set_flag(appointment_id, LifecycleFlag::Completed).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion edge cases.

    use chrono::Utc;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;
    use crate::domain::appointment::test_support::{doctor_snapshot, user_snapshot};

    #[fixture]
    fn valid_row() -> AppointmentRow {
        let user_id = UserId::random();
        let doctor_id = DoctorId::random();
        AppointmentRow {
            id: Uuid::new_v4(),
            user_id: *user_id.as_uuid(),
            doctor_id: *doctor_id.as_uuid(),
            slot_date: "10_5_2024".to_owned(),
            slot_time: "10:00".to_owned(),
            user_snapshot: serde_json::to_value(user_snapshot(user_id)).expect("json"),
            doctor_snapshot: serde_json::to_value(doctor_snapshot(doctor_id, Amount::new(500)))
                .expect("json"),
            amount: 500,
            created_at: Utc::now(),
            cancelled: true,
            payment: true,
            completed: false,
        }
    }

    #[rstest]
    fn row_converts_with_independent_flags(valid_row: AppointmentRow) {
        let appointment = row_to_appointment(valid_row).expect("valid row");

        assert!(appointment.is_cancelled());
        assert!(appointment.is_paid());
        assert!(!appointment.is_completed());
        assert_eq!(appointment.amount(), Amount::new(500));
    }

    #[rstest]
    #[case::bad_date("slot_date")]
    #[case::bad_snapshot("user_snapshot")]
    #[case::foreign_snapshot("doctor_id")]
    fn corrupt_rows_map_to_query_errors(mut valid_row: AppointmentRow, #[case] field: &str) {
        match field {
            "slot_date" => valid_row.slot_date = "31_2_2024".to_owned(),
            "user_snapshot" => valid_row.user_snapshot = serde_json::json!({ "id": 1 }),
            _ => valid_row.doctor_id = Uuid::new_v4(),
        }

        let err = row_to_appointment(valid_row).expect_err("corrupt row");
        assert!(matches!(err, AppointmentRepositoryError::Query { .. }));
    }
}
