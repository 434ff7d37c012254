use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Canonical SIP header names.
///
/// Parsing accepts the RFC 3261 compact forms (f, t, v, i, m, l, c, s, k)
/// and is case-insensitive. Extension headers land in `Other`, normalized
/// to lower case so that lookups and the name index behave consistently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaderName {
    /// From (compact: f)
    From,
    /// To (compact: t)
    To,
    /// Via (compact: v)
    Via,
    /// Call-ID (compact: i)
    CallId,
    /// CSeq
    CSeq,
    /// Contact (compact: m)
    Contact,
    /// Content-Length (compact: l)
    ContentLength,
    /// Content-Type (compact: c)
    ContentType,
    /// Max-Forwards
    MaxForwards,
    /// Expires
    Expires,
    /// Min-Expires
    MinExpires,
    /// Require
    Require,
    /// Proxy-Require
    ProxyRequire,
    /// Route
    Route,
    /// Record-Route
    RecordRoute,
    /// Supported (compact: k)
    Supported,
    /// Unsupported
    Unsupported,
    /// Allow
    Allow,
    /// Accept
    Accept,
    /// Accept-Encoding
    AcceptEncoding,
    /// Accept-Language
    AcceptLanguage,
    /// Warning
    Warning,
    /// Call-Info
    CallInfo,
    /// Alert-Info
    AlertInfo,
    /// Error-Info
    ErrorInfo,
    /// In-Reply-To
    InReplyTo,
    /// Timestamp
    Timestamp,
    /// Proxy-Authorization
    ProxyAuthorization,
    /// Subject (compact: s)
    Subject,
    /// User-Agent
    UserAgent,
    /// Server
    Server,
    /// Organization
    Organization,
    /// Priority
    Priority,
    /// Event
    Event,
    /// Any other header, name stored in lower case
    Other(String),
}

impl HeaderName {
    /// Returns the canonical (long-form) name.
    pub fn as_str(&self) -> &str {
        match self {
            HeaderName::From => "From",
            HeaderName::To => "To",
            HeaderName::Via => "Via",
            HeaderName::CallId => "Call-ID",
            HeaderName::CSeq => "CSeq",
            HeaderName::Contact => "Contact",
            HeaderName::ContentLength => "Content-Length",
            HeaderName::ContentType => "Content-Type",
            HeaderName::MaxForwards => "Max-Forwards",
            HeaderName::Expires => "Expires",
            HeaderName::MinExpires => "Min-Expires",
            HeaderName::Require => "Require",
            HeaderName::ProxyRequire => "Proxy-Require",
            HeaderName::Route => "Route",
            HeaderName::RecordRoute => "Record-Route",
            HeaderName::Supported => "Supported",
            HeaderName::Unsupported => "Unsupported",
            HeaderName::Allow => "Allow",
            HeaderName::Accept => "Accept",
            HeaderName::AcceptEncoding => "Accept-Encoding",
            HeaderName::AcceptLanguage => "Accept-Language",
            HeaderName::Warning => "Warning",
            HeaderName::CallInfo => "Call-Info",
            HeaderName::AlertInfo => "Alert-Info",
            HeaderName::ErrorInfo => "Error-Info",
            HeaderName::InReplyTo => "In-Reply-To",
            HeaderName::Timestamp => "Timestamp",
            HeaderName::ProxyAuthorization => "Proxy-Authorization",
            HeaderName::Subject => "Subject",
            HeaderName::UserAgent => "User-Agent",
            HeaderName::Server => "Server",
            HeaderName::Organization => "Organization",
            HeaderName::Priority => "Priority",
            HeaderName::Event => "Event",
            HeaderName::Other(name) => name,
        }
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeaderName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidHeader("empty header name".to_string()));
        }
        Ok(match s.to_ascii_lowercase().as_str() {
            "from" | "f" => HeaderName::From,
            "to" | "t" => HeaderName::To,
            "via" | "v" => HeaderName::Via,
            "call-id" | "i" => HeaderName::CallId,
            "cseq" => HeaderName::CSeq,
            "contact" | "m" => HeaderName::Contact,
            "content-length" | "l" => HeaderName::ContentLength,
            "content-type" | "c" => HeaderName::ContentType,
            "max-forwards" => HeaderName::MaxForwards,
            "expires" => HeaderName::Expires,
            "min-expires" => HeaderName::MinExpires,
            "require" => HeaderName::Require,
            "proxy-require" => HeaderName::ProxyRequire,
            "route" => HeaderName::Route,
            "record-route" => HeaderName::RecordRoute,
            "supported" | "k" => HeaderName::Supported,
            "unsupported" => HeaderName::Unsupported,
            "allow" => HeaderName::Allow,
            "accept" => HeaderName::Accept,
            "accept-encoding" => HeaderName::AcceptEncoding,
            "accept-language" => HeaderName::AcceptLanguage,
            "warning" => HeaderName::Warning,
            "call-info" => HeaderName::CallInfo,
            "alert-info" => HeaderName::AlertInfo,
            "error-info" => HeaderName::ErrorInfo,
            "in-reply-to" => HeaderName::InReplyTo,
            "timestamp" => HeaderName::Timestamp,
            "proxy-authorization" => HeaderName::ProxyAuthorization,
            "subject" | "s" => HeaderName::Subject,
            "user-agent" => HeaderName::UserAgent,
            "server" => HeaderName::Server,
            "organization" => HeaderName::Organization,
            "priority" => HeaderName::Priority,
            "event" => HeaderName::Event,
            other => {
                if other.chars().any(|c| c.is_whitespace()) {
                    return Err(Error::InvalidHeader(format!("Bad header name: {s:?}")));
                }
                HeaderName::Other(other.to_string())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_forms() {
        assert_eq!(HeaderName::from_str("f").unwrap(), HeaderName::From);
        assert_eq!(HeaderName::from_str("v").unwrap(), HeaderName::Via);
        assert_eq!(HeaderName::from_str("i").unwrap(), HeaderName::CallId);
        assert_eq!(HeaderName::from_str("l").unwrap(), HeaderName::ContentLength);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(HeaderName::from_str("CALL-ID").unwrap(), HeaderName::CallId);
        assert_eq!(HeaderName::from_str("cseq").unwrap(), HeaderName::CSeq);
    }

    #[test]
    fn test_extension_normalized() {
        let name = HeaderName::from_str("X-Custom").unwrap();
        assert_eq!(name, HeaderName::Other("x-custom".to_string()));
        // two spellings of the same extension name compare equal
        assert_eq!(name, HeaderName::from_str("x-CUSTOM").unwrap());
    }

    #[test]
    fn test_invalid_name() {
        assert!(HeaderName::from_str("").is_err());
        assert!(HeaderName::from_str("bad name").is_err());
    }
}
