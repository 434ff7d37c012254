use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Typed Call-ID header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(pub String);

impl CallId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CallId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.chars().any(|c| c.is_whitespace()) {
            return Err(Error::InvalidHeader(format!("Bad Call-ID: {s:?}")));
        }
        Ok(CallId(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_id() {
        let id = CallId::from_str("a84b4c76e66710@pc33.atlanta.com").unwrap();
        assert_eq!(id.as_str(), "a84b4c76e66710@pc33.atlanta.com");
        assert!(CallId::from_str("").is_err());
        assert!(CallId::from_str("a b").is_err());
    }
}
