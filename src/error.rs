use crate::index::types::PersonId;
use std::fmt;
use thiserror::Error;

/// Kind of stored object, used to report which lookup failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Person,
    Group,
    PhoneNumber,
    EmailAddress,
    Address,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectKind::Person => "Person",
            ObjectKind::Group => "Group",
            ObjectKind::PhoneNumber => "PhoneNumber",
            ObjectKind::EmailAddress => "EmailAddress",
            ObjectKind::Address => "Address",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ContactBookError {
    #[error("No such object of type {kind} found for id={id}")]
    NotFound { kind: ObjectKind, id: i64 },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The name index and the store disagree. Only a warm start repairs this.
    #[error("Name index drift: token {token:?} has no entry for person {id}")]
    IndexDrift { token: String, id: PersonId },
    #[error("Stored id {0} does not fit a person id")]
    IdOutOfRange(i64),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ContactBookError {
    pub fn not_found(kind: ObjectKind, id: impl Into<i64>) -> Self {
        ContactBookError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ContactBookError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, ContactBookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ContactBookError::not_found(ObjectKind::Group, 7);
        assert_eq!(err.to_string(), "No such object of type Group found for id=7");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_drift_is_not_not_found() {
        let err = ContactBookError::IndexDrift {
            token: "abc".to_string(),
            id: 3,
        };
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("\"abc\""));
    }
}
