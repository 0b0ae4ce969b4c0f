//! Failures reported by inventory store adapters.

use super::define_port_error;
use crate::domain::Error;

define_port_error! {
    /// Errors raised by store adapters (PostgreSQL or in-memory).
    pub enum StoreError {
        /// The store could not be reached (pool checkout, closed connection).
        Connection { message: String } => "store connection failed: {message}",
        /// A statement failed.
        Query { message: String } => "store query failed: {message}",
    }
}

impl From<StoreError> for Error {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Connection { message } => Error::service_unavailable(message),
            StoreError::Query { message } => Error::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(StoreError::connection("pool timed out"), ErrorCode::ServiceUnavailable, "pool timed out")]
    #[case(StoreError::query("syntax error at or near"), ErrorCode::InternalError, "syntax error at or near")]
    fn maps_to_domain_error_verbatim(
        #[case] error: StoreError,
        #[case] code: ErrorCode,
        #[case] message: &str,
    ) {
        let mapped = Error::from(error);
        assert_eq!(mapped.code(), code);
        assert_eq!(mapped.message(), message);
    }
}
