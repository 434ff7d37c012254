use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Typed Expires header (delta-seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Expires(pub u32);

impl Expires {
    pub fn new(seconds: u32) -> Self {
        Self(seconds)
    }
}

impl fmt::Display for Expires {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Expires {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse()
            .map(Expires)
            .map_err(|_| Error::InvalidHeader(format!("Bad Expires: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires() {
        assert_eq!(Expires::from_str("3600").unwrap(), Expires(3600));
        assert_eq!(Expires(0).to_string(), "0");
        assert!(Expires::from_str("soon").is_err());
    }
}
