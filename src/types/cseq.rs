use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::method::Method;

/// Typed CSeq header: sequence number plus method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CSeq {
    pub seq: u32,
    pub method: Method,
}

impl CSeq {
    /// Creates a new CSeq header.
    pub fn new(seq: u32, method: Method) -> Self {
        Self { seq, method }
    }

    /// Returns a copy with the method rewritten, keeping the sequence
    /// number. Used by ACK and CANCEL derivation.
    pub fn with_method(&self, method: Method) -> Self {
        Self {
            seq: self.seq,
            method,
        }
    }
}

impl fmt::Display for CSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.seq, self.method)
    }
}

impl FromStr for CSeq {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split_whitespace();
        let seq = parts
            .next()
            .ok_or_else(|| Error::InvalidHeader(format!("Empty CSeq: {s}")))?
            .parse()
            .map_err(|_| Error::InvalidHeader(format!("Bad CSeq number: {s}")))?;
        let method = parts
            .next()
            .ok_or_else(|| Error::InvalidHeader(format!("CSeq missing method: {s}")))?
            .parse()?;
        if parts.next().is_some() {
            return Err(Error::InvalidHeader(format!("Trailing CSeq input: {s}")));
        }
        Ok(CSeq { seq, method })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cseq_round_trip() {
        let cseq = CSeq::from_str("314159 INVITE").unwrap();
        assert_eq!(cseq.seq, 314159);
        assert_eq!(cseq.method, Method::Invite);
        assert_eq!(cseq.to_string(), "314159 INVITE");
    }

    #[test]
    fn test_with_method() {
        let cseq = CSeq::new(1, Method::Invite);
        let ack = cseq.with_method(Method::Ack);
        assert_eq!(ack.seq, 1);
        assert_eq!(ack.to_string(), "1 ACK");
    }

    #[test]
    fn test_invalid_cseq() {
        assert!(CSeq::from_str("INVITE").is_err());
        assert!(CSeq::from_str("12").is_err());
        assert!(CSeq::from_str("1 INVITE extra").is_err());
    }
}
