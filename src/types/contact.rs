use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::address::Address;
use crate::types::param::Param;

/// One Contact header element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact(pub Address);

impl Contact {
    pub fn new(address: Address) -> Self {
        Self(address)
    }

    /// Gets the expires parameter value, if present.
    pub fn expires(&self) -> Option<u32> {
        self.0.params.iter().find_map(|p| match p {
            Param::Expires(val) => Some(*val),
            _ => None,
        })
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Contact {
    type Err = crate::error::Error;
    fn from_str(s: &str) -> Result<Self> {
        Address::from_str(s).map(Contact)
    }
}

impl Deref for Contact {
    type Target = Address;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Contact {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
