use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::address::Address;

/// One Record-Route header element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRoute(pub Address);

impl RecordRoute {
    pub fn new(address: Address) -> Self {
        Self(address)
    }
}

impl fmt::Display for RecordRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordRoute {
    type Err = crate::error::Error;
    fn from_str(s: &str) -> Result<Self> {
        Address::from_str(s).map(RecordRoute)
    }
}

impl Deref for RecordRoute {
    type Target = Address;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for RecordRoute {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
