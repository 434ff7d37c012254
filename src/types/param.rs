use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A header or address parameter (;key or ;key=value).
///
/// Parameters that carry protocol meaning get their own variant; anything
/// else rides `Other`. Keys compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Param {
    /// The `branch` parameter, used in Via headers.
    Branch(String),
    /// The `tag` parameter, used in From/To headers for dialog identification.
    Tag(String),
    /// The `expires` parameter, used in Contact headers.
    Expires(u32),
    /// The `received` parameter, used in Via headers.
    Received(String),
    /// The `maddr` parameter, used in Via headers.
    Maddr(String),
    /// The `ttl` parameter, used in Via headers.
    Ttl(u8),
    /// The `lr` flag parameter (loose routing), used in Route headers.
    Lr,
    /// The `transport` parameter.
    Transport(String),
    /// Generic parameter as key with optional value.
    Other(String, Option<String>),
}

impl Param {
    /// The parameter key in lower case.
    pub fn key(&self) -> &str {
        match self {
            Param::Branch(_) => "branch",
            Param::Tag(_) => "tag",
            Param::Expires(_) => "expires",
            Param::Received(_) => "received",
            Param::Maddr(_) => "maddr",
            Param::Ttl(_) => "ttl",
            Param::Lr => "lr",
            Param::Transport(_) => "transport",
            Param::Other(k, _) => k,
        }
    }

    /// Whether this parameter's key matches (case-insensitive).
    pub fn is(&self, key: &str) -> bool {
        self.key().eq_ignore_ascii_case(key)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Branch(val) => write!(f, "branch={}", val),
            Param::Tag(val) => write!(f, "tag={}", val),
            Param::Expires(val) => write!(f, "expires={}", val),
            Param::Received(val) => write!(f, "received={}", val),
            Param::Maddr(val) => write!(f, "maddr={}", val),
            Param::Ttl(val) => write!(f, "ttl={}", val),
            Param::Lr => write!(f, "lr"),
            Param::Transport(val) => write!(f, "transport={}", val),
            Param::Other(key, Some(val)) => write!(f, "{}={}", key, val),
            Param::Other(key, None) => write!(f, "{}", key),
        }
    }
}

impl FromStr for Param {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidHeader("empty parameter".to_string()));
        }
        let (key, value) = match s.split_once('=') {
            Some((k, v)) => (k.trim(), Some(v.trim())),
            None => (s, None),
        };
        Ok(match (key.to_ascii_lowercase().as_str(), value) {
            ("branch", Some(v)) => Param::Branch(v.to_string()),
            ("tag", Some(v)) => Param::Tag(v.to_string()),
            ("expires", Some(v)) => match v.parse() {
                Ok(n) => Param::Expires(n),
                Err(_) => Param::Other(key.to_string(), Some(v.to_string())),
            },
            ("received", Some(v)) => Param::Received(v.to_string()),
            ("maddr", Some(v)) => Param::Maddr(v.to_string()),
            ("ttl", Some(v)) => match v.parse() {
                Ok(n) => Param::Ttl(n),
                Err(_) => Param::Other(key.to_string(), Some(v.to_string())),
            },
            ("lr", None) => Param::Lr,
            ("transport", Some(v)) => Param::Transport(v.to_string()),
            _ => Param::Other(key.to_string(), value.map(String::from)),
        })
    }
}

/// Parses a `;`-separated parameter list (input starts after the first `;`).
pub fn parse_params(s: &str) -> Result<Vec<Param>> {
    s.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(Param::from_str)
        .collect()
}

/// Renders parameters with leading semicolons.
pub fn fmt_params(f: &mut fmt::Formatter<'_>, params: &[Param]) -> fmt::Result {
    for param in params {
        write!(f, ";{}", param)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_params() {
        assert_eq!(Param::from_str("branch=z9hG4bK776asdhds").unwrap(),
            Param::Branch("z9hG4bK776asdhds".to_string()));
        assert_eq!(Param::from_str("tag=1928301774").unwrap(),
            Param::Tag("1928301774".to_string()));
        assert_eq!(Param::from_str("lr").unwrap(), Param::Lr);
        assert_eq!(Param::from_str("expires=3600").unwrap(), Param::Expires(3600));
    }

    #[test]
    fn test_other_param() {
        let p = Param::from_str("x-custom=abc").unwrap();
        assert_eq!(p, Param::Other("x-custom".to_string(), Some("abc".to_string())));
        assert_eq!(p.to_string(), "x-custom=abc");
        assert!(p.is("X-Custom"));
    }

    #[test]
    fn test_parse_params_list() {
        let params = parse_params("branch=abc;received=192.0.2.1;rport").unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params[0], Param::Branch("abc".to_string()));
        assert_eq!(params[2], Param::Other("rport".to_string(), None));
    }
}
