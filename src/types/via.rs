use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::param::{fmt_params, parse_params, Param};

/// A single Via hop: sent-protocol, sent-by, and parameters.
///
/// A message may carry several Via headers; each value of this type is one
/// hop. The topmost hop's branch parameter identifies the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Via {
    /// Sent-protocol, e.g. "SIP/2.0/UDP"
    pub sent_protocol: String,
    /// Host part of sent-by
    pub host: String,
    /// Optional port part of sent-by
    pub port: Option<u16>,
    /// Via parameters (branch, received, rport, ...)
    pub params: Vec<Param>,
}

impl Via {
    /// Creates a Via hop for the given transport.
    pub fn new(transport: impl Into<String>, host: impl Into<String>, port: Option<u16>) -> Self {
        Via {
            sent_protocol: format!("SIP/2.0/{}", transport.into().to_uppercase()),
            host: host.into(),
            port,
            params: Vec::new(),
        }
    }

    /// Renders the sent-by portion, "host" or "host:port".
    pub fn sent_by(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    /// Gets the branch parameter value.
    pub fn branch(&self) -> Option<&str> {
        self.params.iter().find_map(|p| match p {
            Param::Branch(b) => Some(b.as_str()),
            _ => None,
        })
    }

    /// Sets or replaces the branch parameter.
    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.params.retain(|p| !matches!(p, Param::Branch(_)));
        self.params.push(Param::Branch(branch.into()));
    }

    /// Removes the branch parameter.
    pub fn clear_branch(&mut self) {
        self.params.retain(|p| !matches!(p, Param::Branch(_)));
    }

    /// Builder-style branch setter.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.set_branch(branch);
        self
    }
}

impl fmt::Display for Via {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.sent_protocol, self.sent_by())?;
        fmt_params(f, &self.params)
    }
}

impl FromStr for Via {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (protocol, rest) = s
            .split_once(|c: char| c.is_whitespace())
            .ok_or_else(|| Error::InvalidHeader(format!("Malformed Via: {s}")))?;

        if !protocol.to_ascii_uppercase().starts_with("SIP/") {
            return Err(Error::InvalidHeader(format!("Bad Via protocol: {protocol}")));
        }

        let rest = rest.trim();
        let (sent_by, params) = match rest.find(';') {
            Some(i) => (rest[..i].trim(), parse_params(&rest[i + 1..])?),
            None => (rest, Vec::new()),
        };

        if sent_by.is_empty() {
            return Err(Error::InvalidHeader(format!("Via missing sent-by: {s}")));
        }

        // IPv6 hosts keep their brackets; only split a port outside them
        let (host, port) = match sent_by.rfind(':') {
            Some(i) if !sent_by[i..].contains(']') => {
                let port = sent_by[i + 1..]
                    .parse()
                    .map_err(|_| Error::InvalidHeader(format!("Bad Via port: {sent_by}")))?;
                (sent_by[..i].to_string(), Some(port))
            }
            _ => (sent_by.to_string(), None),
        };

        Ok(Via {
            sent_protocol: protocol.to_string(),
            host,
            port,
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_via() {
        let via = Via::from_str("SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776asdhds").unwrap();
        assert_eq!(via.sent_protocol, "SIP/2.0/UDP");
        assert_eq!(via.host, "pc33.atlanta.com");
        assert_eq!(via.port, None);
        assert_eq!(via.branch(), Some("z9hG4bK776asdhds"));
    }

    #[test]
    fn test_via_with_port() {
        let via = Via::from_str("SIP/2.0/TCP proxy.example.com:5061;branch=z9hG4bKabc").unwrap();
        assert_eq!(via.port, Some(5061));
        assert_eq!(via.sent_by(), "proxy.example.com:5061");
    }

    #[test]
    fn test_via_display() {
        let via = Via::new("udp", "pc33.atlanta.com", None).with_branch("z9hG4bK776");
        assert_eq!(via.to_string(), "SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776");
    }

    #[test]
    fn test_clear_branch() {
        let mut via = Via::new("udp", "host.example.com", Some(5060)).with_branch("z9hG4bKxyz");
        via.clear_branch();
        assert_eq!(via.branch(), None);
        assert_eq!(via.to_string(), "SIP/2.0/UDP host.example.com:5060");
    }

    #[test]
    fn test_invalid_via() {
        assert!(Via::from_str("garbage").is_err());
        assert!(Via::from_str("HTTP/1.1 host").is_err());
    }
}
