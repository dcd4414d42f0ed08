//! PostgreSQL-backed `DoctorRepository`.

use async_trait::async_trait;
use diesel::dsl::not;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DoctorRepository, DoctorRepositoryError};
use crate::domain::{Address, Amount, Doctor, DoctorId};

use super::diesel_basic_error_mapping::{count_to_u64, map_basic_diesel_error, map_basic_pool_error};
use super::models::DoctorRow;
use super::pool::{DbPool, PoolError};
use super::schema::doctors;

/// Diesel-backed implementation of the doctor repository port.
#[derive(Clone)]
pub struct DieselDoctorRepository {
    pool: DbPool,
}

impl DieselDoctorRepository {
    /// Repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DoctorRepositoryError {
    map_basic_pool_error(error, |message| DoctorRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> DoctorRepositoryError {
    map_basic_diesel_error(
        error,
        DoctorRepositoryError::query,
        DoctorRepositoryError::connection,
    )
}

fn row_to_doctor(row: DoctorRow) -> Result<Doctor, DoctorRepositoryError> {
    let fees = u64::try_from(row.fees)
        .map_err(|_| DoctorRepositoryError::query(format!("negative fee for doctor {}", row.id)))?;
    Ok(Doctor {
        id: DoctorId::from_uuid(row.id),
        name: row.name,
        email: row.email,
        image: row.image,
        speciality: row.speciality,
        degree: row.degree,
        experience: row.experience,
        about: row.about,
        fees: Amount::new(fees),
        address: Address {
            line1: row.address_line1,
            line2: row.address_line2,
        },
        available: row.available,
        created_at: row.created_at,
    })
}

#[async_trait]
impl DoctorRepository for DieselDoctorRepository {
    async fn find_by_id(
        &self,
        doctor_id: &DoctorId,
    ) -> Result<Option<Doctor>, DoctorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = doctors::table
            .find(*doctor_id.as_uuid())
            .select(DoctorRow::as_select())
            .first::<DoctorRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_doctor).transpose()
    }

    async fn list(&self) -> Result<Vec<Doctor>, DoctorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DoctorRow> = doctors::table
            .order((doctors::created_at.asc(), doctors::id.asc()))
            .select(DoctorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_doctor).collect()
    }

    async fn toggle_availability(
        &self,
        doctor_id: &DoctorId,
    ) -> Result<Option<bool>, DoctorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(doctors::table.find(*doctor_id.as_uuid()))
            .set(doctors::available.eq(not(doctors::available)))
            .returning(doctors::available)
            .get_result::<bool>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn count(&self) -> Result<u64, DoctorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = doctors::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        count_to_u64(count, DoctorRepositoryError::query)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion edge cases.

    use chrono::Utc;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;

    #[fixture]
    fn row() -> DoctorRow {
        DoctorRow {
            id: Uuid::new_v4(),
            name: "Dr. Grace".to_owned(),
            email: "grace@example.com".to_owned(),
            image: String::new(),
            speciality: "Dermatologist".to_owned(),
            degree: "MBBS".to_owned(),
            experience: "2 Years".to_owned(),
            about: String::new(),
            fees: 500,
            address_line1: "1 Main St".to_owned(),
            address_line2: "Ikeja".to_owned(),
            available: true,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn converts_row_into_doctor(row: DoctorRow) {
        let id = row.id;
        let doctor = row_to_doctor(row).expect("valid row");

        assert_eq!(doctor.id, DoctorId::from_uuid(id));
        assert_eq!(doctor.fees, Amount::new(500));
        assert_eq!(doctor.address.line2, "Ikeja");
    }

    #[rstest]
    fn rejects_negative_fee(mut row: DoctorRow) {
        row.fees = -1;
        let err = row_to_doctor(row).expect_err("negative fee");
        assert!(matches!(err, DoctorRepositoryError::Query { .. }));
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, DoctorRepositoryError::Connection { .. }));
    }
}
