//! Email address value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// A syntactically plausible email address, stored lowercased and trimmed.
///
/// Only the shape `local@domain.tld` is checked; deliverability is not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let email = raw.as_ref().trim().to_lowercase();

        if email.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }

        let (local, domain) = email
            .split_once('@')
            .ok_or_else(|| ValidationError::invalid_format("email", "missing @ symbol"))?;

        if local.is_empty() || domain.contains('@') {
            return Err(ValidationError::invalid_format("email", "malformed address"));
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(ValidationError::invalid_format("email", "invalid domain"));
        }
        if email.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format("email", "contains whitespace"));
        }

        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let email = Email::new("  Alice@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "alice", "@example.com", "alice@", "alice@example", "a@b@c.com", "al ice@x.com"] {
            assert!(Email::new(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn deserializes_with_validation() {
        let ok: Email = serde_json::from_str("\"bob@example.org\"").unwrap();
        assert_eq!(ok.as_str(), "bob@example.org");
        assert!(serde_json::from_str::<Email>("\"nope\"").is_err());
    }
}
