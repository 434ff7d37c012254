use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// SIP protocol version, as defined in RFC 3261.
///
/// Appears in the first line of both requests and responses. Currently
/// "SIP/2.0" is the only version in use, but other versions are supported
/// for forward compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    /// Major version (currently 2)
    pub major: u8,
    /// Minor version (currently 0)
    pub minor: u8,
}

impl Version {
    /// Create a new SIP version with the given major and minor versions.
    pub fn new(major: u8, minor: u8) -> Self {
        Version { major, minor }
    }

    /// Creates the standard SIP version (2.0).
    pub fn sip_2_0() -> Self {
        Version { major: 2, minor: 0 }
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::sip_2_0()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SIP/{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s.strip_prefix("SIP/").ok_or(Error::InvalidVersion)?;
        let (major, minor) = rest.split_once('.').ok_or(Error::InvalidVersion)?;
        let major = major.parse().map_err(|_| Error::InvalidVersion)?;
        let minor = minor.parse().map_err(|_| Error::InvalidVersion)?;
        Ok(Version { major, minor })
    }
}
