//! PostgreSQL-backed `UserRepository`.
//!
//! Reads only the credential-free projection defined by `UserSnapshotRow`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Address, UserId, UserSnapshot};

use super::diesel_basic_error_mapping::{count_to_u64, map_basic_diesel_error, map_basic_pool_error};
use super::models::UserSnapshotRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, |message| UserRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

impl From<UserSnapshotRow> for UserSnapshot {
    fn from(row: UserSnapshotRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            image: row.image,
            address: Address {
                line1: row.address_line1,
                line2: row.address_line2,
            },
            gender: row.gender,
            dob: row.dob,
        }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_snapshot(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserSnapshot>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .find(*user_id.as_uuid())
            .select(UserSnapshotRow::as_select())
            .first::<UserSnapshotRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(UserSnapshot::from))
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        count_to_u64(count, UserRepositoryError::query)
    }
}
