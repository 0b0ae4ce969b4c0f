//! Error mapping shared by the Diesel adapters.

use tracing::debug;

use crate::domain::ports::StoreError;
use crate::domain::{Error, ReconcileError};

use super::pool::PoolError;

/// Map a pool failure to a connection error.
pub(crate) fn map_pool_error(error: PoolError) -> StoreError {
    let message = error.into_message();
    debug!(%message, "connection checkout failed");
    StoreError::connection(message)
}

/// Map a Diesel failure, keeping the driver message.
pub(crate) fn map_diesel_error(error: diesel::result::Error, operation: &str) -> StoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    let message = error.to_string();
    debug!(%message, %operation, "diesel operation failed");
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => StoreError::connection(message),
        _ => StoreError::query(message),
    }
}

/// Error type for reconciler transactions.
///
/// Diesel's transaction API needs an error it can build from
/// `diesel::result::Error` (commit and rollback failures); the reconciler
/// itself reports [`ReconcileError`].
#[derive(Debug)]
pub(crate) enum TxError {
    Reconcile(ReconcileError),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

impl From<ReconcileError> for TxError {
    fn from(value: ReconcileError) -> Self {
        Self::Reconcile(value)
    }
}

impl From<StoreError> for TxError {
    fn from(value: StoreError) -> Self {
        Self::Reconcile(ReconcileError::Store(value))
    }
}

impl From<TxError> for Error {
    fn from(value: TxError) -> Self {
        match value {
            TxError::Reconcile(err) => err.into(),
            TxError::Diesel(err) => map_diesel_error(err, "transaction").into(),
        }
    }
}
