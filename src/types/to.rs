use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::address::Address;

/// Typed To header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct To(pub Address);

impl To {
    /// Creates a new To header.
    pub fn new(address: Address) -> Self {
        Self(address)
    }

    /// Gets the tag parameter value.
    pub fn tag(&self) -> Option<&str> {
        self.0.tag()
    }

    /// Sets or replaces the tag parameter.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.0.set_tag(tag)
    }
}

impl fmt::Display for To {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for To {
    type Err = crate::error::Error;
    fn from_str(s: &str) -> Result<Self> {
        Address::from_str(s).map(To)
    }
}

impl Deref for To {
    type Target = Address;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for To {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
