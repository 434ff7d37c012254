use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Typed Require header: a list of option tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Require(pub Vec<String>);

impl Require {
    pub fn new(tags: Vec<String>) -> Self {
        Self(tags)
    }

    pub fn single(tag: impl Into<String>) -> Self {
        Self(vec![tag.into()])
    }

    /// Whether the given option tag is present (case-insensitive).
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Whether this header requires reliable provisional responses.
    pub fn requires_100rel(&self) -> bool {
        self.contains("100rel")
    }
}

impl fmt::Display for Require {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

impl FromStr for Require {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tags: Vec<String> = s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
        if tags.is_empty() {
            return Err(Error::InvalidHeader(format!("Empty Require: {s:?}")));
        }
        Ok(Require(tags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        let r = Require::from_str("100rel, timer").unwrap();
        assert!(r.requires_100rel());
        assert!(r.contains("TIMER"));
        assert_eq!(r.to_string(), "100rel, timer");
        assert!(Require::from_str(" ").is_err());
    }
}
