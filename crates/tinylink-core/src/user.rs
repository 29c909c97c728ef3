use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Length of every user identifier.
pub const USER_ID_LENGTH: usize = 6;

/// A validated user identifier.
///
/// User ids are exactly 6 ASCII alphanumeric characters and are stored
/// lowercased, so `User01` and `user01` name the same principal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Creates a `UserId` after lowercasing and validating the input.
    pub fn parse(id: impl AsRef<str>) -> Result<Self, CoreError> {
        let id = id.as_ref();
        if id.len() != USER_ID_LENGTH {
            return Err(CoreError::InvalidUserId(format!(
                "length must be exactly {}, got {}",
                USER_ID_LENGTH,
                id.len()
            )));
        }

        if !id.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidUserId(format!(
                "must contain only alphanumeric characters: '{}'",
                id
            )));
        }

        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Creates a `UserId` without validation.
    ///
    /// Use this only for ids read back from the durable store.
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the lowercased user id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids() {
        assert!(UserId::parse("abc123").is_ok());
        assert!(UserId::parse("000000").is_ok());
    }

    #[test]
    fn lowercases_input() {
        let id = UserId::parse("AbC123").unwrap();
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn wrong_length() {
        assert!(UserId::parse("abc12").is_err());
        assert!(UserId::parse("abc1234").is_err());
        assert!(UserId::parse("").is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(UserId::parse("abc-12").is_err());
        assert!(UserId::parse("abc 12").is_err());
        assert!(UserId::parse("abcé1").is_err());
    }
}
