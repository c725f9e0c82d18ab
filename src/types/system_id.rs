// ABOUTME: Validated system identifier for managed nodes.
// ABOUTME: Rejects empty identifiers and characters the managed system never issues.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SystemIdError {
    #[error("system ID cannot be empty")]
    Empty,

    #[error("system ID exceeds maximum length of 64 characters")]
    TooLong,

    #[error("invalid character in system ID: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(String);

impl SystemId {
    pub fn new(value: &str) -> Result<Self, SystemIdError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SystemIdError::Empty);
        }

        if trimmed.len() > 64 {
            return Err(SystemIdError::TooLong);
        }

        for c in trimmed.chars() {
            if !c.is_ascii_alphanumeric() && c != '-' && c != '_' {
                return Err(SystemIdError::InvalidChar(c));
            }
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SystemId {
    type Err = SystemIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for SystemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SystemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SystemId::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_generated_ids() {
        assert_eq!(SystemId::new("4y3h7n").unwrap().as_str(), "4y3h7n");
        assert_eq!(SystemId::new("  node-01 ").unwrap().as_str(), "node-01");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(SystemId::new("   "), Err(SystemIdError::Empty)));
    }

    #[test]
    fn rejects_path_separators() {
        assert!(matches!(
            SystemId::new("abc/def"),
            Err(SystemIdError::InvalidChar('/'))
        ));
    }

    #[test]
    fn rejects_overlong() {
        let long = "a".repeat(65);
        assert!(matches!(SystemId::new(&long), Err(SystemIdError::TooLong)));
    }
}
