//! Physical key catalogue entries.

use serde::Serialize;
use utoipa::ToSchema;

/// Store-assigned key identifier.
pub type KeyId = i32;

/// Validation errors returned by [`KeyDraft::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyValidationError {
    /// A required text column was blank once trimmed.
    #[error("{field} must not be blank")]
    BlankField { field: &'static str },
    /// The stock count was negative.
    #[error("total_no_of_key must not be negative (got {total})")]
    NegativeTotal { total: i32 },
}

impl KeyValidationError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::BlankField { field } => field,
            Self::NegativeTotal { .. } => "total_no_of_key",
        }
    }
}

/// Unsaved key attributes.
///
/// ## Invariants
/// - `key_type`, `zone`, `usage` and `keyname` are non-blank.
/// - `total_no_of_key` is non-negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDraft {
    key_type: String,
    zone: String,
    usage: String,
    keyname: String,
    keydescription: String,
    keytag: String,
    total_no_of_key: i32,
}

/// Raw inputs for [`KeyDraft::try_new`].
#[derive(Debug, Clone, Default)]
pub struct KeyDraftParts {
    pub key_type: String,
    pub zone: String,
    pub usage: String,
    pub keyname: String,
    pub keydescription: String,
    pub keytag: String,
    pub total_no_of_key: i32,
}

fn non_blank(value: String, field: &'static str) -> Result<String, KeyValidationError> {
    if value.trim().is_empty() {
        Err(KeyValidationError::BlankField { field })
    } else {
        Ok(value)
    }
}

impl KeyDraft {
    /// Validate raw inputs.
    ///
    /// # Examples
    /// ```
    /// use key_inventory::domain::{KeyDraft, KeyDraftParts};
    ///
    /// let draft = KeyDraft::try_new(KeyDraftParts {
    ///     key_type: "Master".into(),
    ///     zone: "A".into(),
    ///     usage: "Office".into(),
    ///     keyname: "Front door".into(),
    ///     total_no_of_key: 5,
    ///     ..KeyDraftParts::default()
    /// })
    /// .unwrap();
    /// assert_eq!(draft.total_no_of_key(), 5);
    /// assert_eq!(draft.keytag(), "");
    /// ```
    pub fn try_new(parts: KeyDraftParts) -> Result<Self, KeyValidationError> {
        if parts.total_no_of_key < 0 {
            return Err(KeyValidationError::NegativeTotal {
                total: parts.total_no_of_key,
            });
        }
        Ok(Self {
            key_type: non_blank(parts.key_type, "type")?,
            zone: non_blank(parts.zone, "zone")?,
            usage: non_blank(parts.usage, "usage")?,
            keyname: non_blank(parts.keyname, "keyname")?,
            keydescription: parts.keydescription,
            keytag: parts.keytag,
            total_no_of_key: parts.total_no_of_key,
        })
    }

    pub fn key_type(&self) -> &str {
        &self.key_type
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn keyname(&self) -> &str {
        &self.keyname
    }

    pub fn keydescription(&self) -> &str {
        &self.keydescription
    }

    pub fn keytag(&self) -> &str {
        &self.keytag
    }

    pub fn total_no_of_key(&self) -> i32 {
        self.total_no_of_key
    }

    /// Attach a store-assigned identifier.
    pub fn into_key(self, id: KeyId) -> Key {
        Key {
            id,
            key_type: self.key_type,
            zone: self.zone,
            usage: self.usage,
            keyname: self.keyname,
            keydescription: self.keydescription,
            keytag: self.keytag,
            total_no_of_key: self.total_no_of_key,
        }
    }
}

/// A stocked key.
///
/// Serialised with the store's column names; `key_type` travels as `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Key {
    pub id: KeyId,
    #[serde(rename = "type")]
    pub key_type: String,
    pub zone: String,
    pub usage: String,
    pub keyname: String,
    pub keydescription: String,
    pub keytag: String,
    /// Authoritative stock count.
    pub total_no_of_key: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn parts() -> KeyDraftParts {
        KeyDraftParts {
            key_type: "Master".into(),
            zone: "North".into(),
            usage: "Plant room".into(),
            keyname: "K-101".into(),
            keydescription: "brass".into(),
            keytag: "red".into(),
            total_no_of_key: 5,
        }
    }

    #[rstest]
    #[case::type_field(KeyDraftParts { key_type: " ".into(), ..parts() }, "type")]
    #[case::zone(KeyDraftParts { zone: String::new(), ..parts() }, "zone")]
    #[case::usage(KeyDraftParts { usage: "\t".into(), ..parts() }, "usage")]
    #[case::keyname(KeyDraftParts { keyname: String::new(), ..parts() }, "keyname")]
    fn rejects_blank_required_text(#[case] input: KeyDraftParts, #[case] field: &str) {
        let err = KeyDraft::try_new(input).expect_err("blank field must fail");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn rejects_negative_total() {
        let err = KeyDraft::try_new(KeyDraftParts {
            total_no_of_key: -1,
            ..parts()
        })
        .expect_err("negative total must fail");
        assert_eq!(err, KeyValidationError::NegativeTotal { total: -1 });
        assert_eq!(err.field(), "total_no_of_key");
    }

    #[rstest]
    #[case(KeyValidationError::BlankField { field: "zone" }, "zone must not be blank")]
    #[case(
        KeyValidationError::NegativeTotal { total: -3 },
        "total_no_of_key must not be negative (got -3)"
    )]
    fn validation_errors_render_their_field(
        #[case] err: KeyValidationError,
        #[case] expected: &str,
    ) {
        assert_eq!(err.to_string(), expected);
        let source: &dyn std::error::Error = &err;
        assert!(source.source().is_none());
    }

    #[rstest]
    fn zero_stock_is_allowed() {
        let draft = KeyDraft::try_new(KeyDraftParts {
            total_no_of_key: 0,
            ..parts()
        })
        .expect("zero stock is valid");
        assert_eq!(draft.total_no_of_key(), 0);
    }

    #[rstest]
    fn key_serialises_type_column() {
        let key = KeyDraft::try_new(parts()).expect("valid draft").into_key(7);
        let value = serde_json::to_value(&key).expect("key serialises");
        assert_eq!(
            value,
            json!({
                "id": 7,
                "type": "Master",
                "zone": "North",
                "usage": "Plant room",
                "keyname": "K-101",
                "keydescription": "brass",
                "keytag": "red",
                "total_no_of_key": 5,
            })
        );
    }
}
