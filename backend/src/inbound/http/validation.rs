//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies deserialise into `Option` fields so a missing field is
//! reported with its name instead of as a generic JSON error.

use serde_json::json;

use crate::domain::{AssignmentValidationError, Error, KeyValidationError, UserValidationError};

const MISSING_FIELDS: &str = "Missing required fields";
const INVALID_INPUT: &str = "Invalid input data";

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    BlankField,
    NegativeValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::BlankField => "blank_field",
            ErrorCode::NegativeValue => "negative_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn field_error(message: &str, field: &str, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

/// A required key or user field was absent.
pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(MISSING_FIELDS, field.as_str(), ErrorCode::MissingField)
}

/// A required assignment field was absent.
pub(crate) fn missing_input_error(field: FieldName) -> Error {
    field_error(INVALID_INPUT, field.as_str(), ErrorCode::MissingField)
}

/// Unwrap a required body field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn map_key_validation_error(err: KeyValidationError) -> Error {
    match err {
        KeyValidationError::BlankField { field } => {
            field_error(MISSING_FIELDS, field, ErrorCode::BlankField)
        }
        KeyValidationError::NegativeTotal { .. } => {
            field_error(INVALID_INPUT, "total_no_of_key", ErrorCode::NegativeValue)
        }
    }
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    match err {
        UserValidationError::BlankName => field_error(MISSING_FIELDS, "name", ErrorCode::BlankField),
    }
}

pub(crate) fn map_assignment_validation_error(err: AssignmentValidationError) -> Error {
    match err {
        AssignmentValidationError::NegativeQuantity { .. } => {
            field_error(INVALID_INPUT, "quantity", ErrorCode::NegativeValue)
        }
    }
}
