//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for an intake chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(Uuid);

impl ChatId {
    /// Creates a new random ChatId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a ChatId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ChatId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChatId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identifier of a registered account.
///
/// Kept as an opaque string so it can travel in the JWT `sub` claim unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Generates a fresh random UserId for a new account.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_id_generates_unique_values() {
        let a = ChatId::new();
        let b = ChatId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn chat_id_parses_from_string() {
        let id = ChatId::new();
        let parsed: ChatId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn chat_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<ChatId>().is_err());
    }

    #[test]
    fn chat_id_serializes_transparently() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&ChatId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }

    #[test]
    fn user_id_rejects_empty() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("   ").is_err());
    }

    #[test]
    fn user_id_keeps_value() {
        let id = UserId::new("user-123").unwrap();
        assert_eq!(id.as_str(), "user-123");
        assert_eq!(id.to_string(), "user-123");
    }

    #[test]
    fn generated_user_ids_differ() {
        assert_ne!(UserId::generate(), UserId::generate());
    }
}
