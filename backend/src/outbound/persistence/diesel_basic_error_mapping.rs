//! Diesel and pool error mapping shared by every repository.
//!
//! All clinic ports expose the same `Connection` / `Query` pair, so each
//! repository passes its two constructors and gets a consistent mapping.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool error into the port's connection variant.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.into_message())
}

/// Map Diesel errors into query or connection variants.
///
/// Database messages are logged at DEBUG and replaced with a fixed string so
/// SQL details never reach API responses.
pub fn map_basic_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            query("unique constraint violated")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query("referenced record does not exist")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        DieselError::DeserializationError(_) | DieselError::SerializationError(_) => {
            query("database value could not be converted")
        }
        _ => query("database error"),
    }
}

/// Convert a non-negative database count into `u64`.
pub fn count_to_u64<E, Q>(count: i64, query: Q) -> Result<u64, E>
where
    Q: FnOnce(String) -> E,
{
    u64::try_from(count).map_err(|_| query(format!("negative row count {count}")))
}
