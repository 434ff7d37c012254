use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// SIP request methods as defined in RFC 3261 and common extensions.
///
/// Methods unknown to this enum are preserved verbatim in the
/// `Extension` variant so that non-standard methods round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// INVITE: initiates a session
    Invite,
    /// ACK: acknowledges a final response to INVITE
    Ack,
    /// BYE: terminates a session
    Bye,
    /// CANCEL: cancels a pending request
    Cancel,
    /// REGISTER: registers contact information
    Register,
    /// OPTIONS: queries capabilities
    Options,
    /// SUBSCRIBE: requests event notification (RFC 6665)
    Subscribe,
    /// NOTIFY: delivers an event notification (RFC 6665)
    Notify,
    /// PUBLISH: publishes event state (RFC 3903)
    Publish,
    /// REFER: asks the recipient to issue a request (RFC 3515)
    Refer,
    /// INFO: mid-session information (RFC 6086)
    Info,
    /// MESSAGE: instant message (RFC 3428)
    Message,
    /// UPDATE: modifies session state (RFC 3311)
    Update,
    /// PRACK: acknowledges a reliable provisional response (RFC 3262)
    Prack,
    /// A non-standard method, stored verbatim
    Extension(String),
}

impl Method {
    /// Returns the canonical (upper-case) name of the method.
    pub fn as_str(&self) -> &str {
        match self {
            Method::Invite => "INVITE",
            Method::Ack => "ACK",
            Method::Bye => "BYE",
            Method::Cancel => "CANCEL",
            Method::Register => "REGISTER",
            Method::Options => "OPTIONS",
            Method::Subscribe => "SUBSCRIBE",
            Method::Notify => "NOTIFY",
            Method::Publish => "PUBLISH",
            Method::Refer => "REFER",
            Method::Info => "INFO",
            Method::Message => "MESSAGE",
            Method::Update => "UPDATE",
            Method::Prack => "PRACK",
            Method::Extension(s) => s,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "INVITE" => Ok(Method::Invite),
            "ACK" => Ok(Method::Ack),
            "BYE" => Ok(Method::Bye),
            "CANCEL" => Ok(Method::Cancel),
            "REGISTER" => Ok(Method::Register),
            "OPTIONS" => Ok(Method::Options),
            "SUBSCRIBE" => Ok(Method::Subscribe),
            "NOTIFY" => Ok(Method::Notify),
            "PUBLISH" => Ok(Method::Publish),
            "REFER" => Ok(Method::Refer),
            "INFO" => Ok(Method::Info),
            "MESSAGE" => Ok(Method::Message),
            "UPDATE" => Ok(Method::Update),
            "PRACK" => Ok(Method::Prack),
            _ => {
                // Method names are tokens; reject anything with whitespace
                // or an empty string rather than storing garbage.
                if s.is_empty() || s.chars().any(|c| c.is_whitespace()) {
                    Err(Error::InvalidMethod)
                } else {
                    Ok(Method::Extension(s.to_string()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_round_trip() {
        assert_eq!(Method::from_str("INVITE").unwrap(), Method::Invite);
        assert_eq!(Method::Invite.to_string(), "INVITE");
        assert_eq!(Method::from_str("PRACK").unwrap(), Method::Prack);
    }

    #[test]
    fn test_extension_method() {
        let m = Method::from_str("FOO").unwrap();
        assert!(matches!(m, Method::Extension(ref s) if s == "FOO"));
        assert_eq!(m.to_string(), "FOO");
    }

    #[test]
    fn test_invalid_method() {
        assert!(Method::from_str("").is_err());
        assert!(Method::from_str("IN VITE").is_err());
    }
}
