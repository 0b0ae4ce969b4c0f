//! Key holders.

use serde::Serialize;
use utoipa::ToSchema;

/// Store-assigned user identifier.
pub type UserId = i32;

/// Validation errors returned by [`UserDraft::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("name must not be blank")]
    BlankName,
}

/// Unsaved user attributes.
///
/// ## Invariants
/// - `name` is non-blank; `division` and `ministry` may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    name: String,
    division: String,
    ministry: String,
}

impl UserDraft {
    pub fn try_new(
        name: impl Into<String>,
        division: impl Into<String>,
        ministry: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::BlankName);
        }
        Ok(Self {
            name,
            division: division.into(),
            ministry: ministry.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn division(&self) -> &str {
        &self.division
    }

    pub fn ministry(&self) -> &str {
        &self.ministry
    }

    /// Attach a store-assigned identifier.
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            division: self.division,
            ministry: self.ministry,
        }
    }
}

/// A person (or the reserved spare holder) who can hold keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub division: String,
    pub ministry: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_names_are_rejected(#[case] name: &str) {
        assert_eq!(
            UserDraft::try_new(name, "Ops", "Works"),
            Err(UserValidationError::BlankName)
        );
    }

    #[rstest]
    fn optional_columns_may_be_empty() {
        let user = UserDraft::try_new("Ada", "", "")
            .expect("valid draft")
            .into_user(3);
        assert_eq!(user.name, "Ada");
        assert!(user.division.is_empty());
        assert!(user.ministry.is_empty());
    }
}
