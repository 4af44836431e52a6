//! Translation of pool and Diesel failures into repository errors.

use tracing::debug;

use crate::domain::ports::MenRepositoryError;

use super::pool::PoolError;

/// Map pool errors to connection failures.
pub(crate) fn map_pool_error(error: PoolError) -> MenRepositoryError {
    debug!(%error, "pool checkout failed");
    MenRepositoryError::connection(error.message())
}

/// Map Diesel errors to query or connection failures.
///
/// Database messages are logged at debug level and replaced with a generic
/// description so SQL details stay inside the process.
pub(crate) fn map_diesel_error(error: diesel::result::Error) -> MenRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => MenRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => MenRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            MenRepositoryError::connection("database connection error")
        }
        _ => MenRepositoryError::query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn not_found_maps_to_query_error() {
        let mapped = map_diesel_error(diesel::result::Error::NotFound);
        assert_eq!(mapped, MenRepositoryError::query("record not found"));
    }

    #[rstest]
    fn rollback_maps_to_generic_query_error() {
        let mapped = map_diesel_error(diesel::result::Error::RollbackTransaction);
        assert_eq!(mapped, MenRepositoryError::query("database error"));
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("timed out waiting"));
        assert_eq!(mapped, MenRepositoryError::connection("timed out waiting"));
    }
}
