use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Typed Max-Forwards header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaxForwards(pub u8);

impl MaxForwards {
    pub fn new(hops: u8) -> Self {
        Self(hops)
    }

    /// The RFC 3261 recommended initial value.
    pub fn default_hops() -> Self {
        Self(70)
    }
}

impl fmt::Display for MaxForwards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MaxForwards {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse()
            .map(MaxForwards)
            .map_err(|_| Error::InvalidHeader(format!("Bad Max-Forwards: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_forwards() {
        assert_eq!(MaxForwards::from_str("70").unwrap(), MaxForwards(70));
        assert_eq!(MaxForwards::default_hops().to_string(), "70");
        assert!(MaxForwards::from_str("300").is_err());
    }
}
