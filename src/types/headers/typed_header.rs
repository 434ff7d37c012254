use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::types::call_id::CallId;
use crate::types::contact::Contact;
use crate::types::content_length::ContentLength;
use crate::types::content_type::ContentType;
use crate::types::cseq::CSeq;
use crate::types::expires::Expires;
use crate::types::from::From as FromHeader;
use crate::types::headers::header_name::HeaderName;
use crate::types::max_forwards::MaxForwards;
use crate::types::record_route::RecordRoute;
use crate::types::require::Require;
use crate::types::route::Route;
use crate::types::to::To;
use crate::types::via::Via;

/// A header value tagged with its kind.
///
/// The enum discriminant is the header's kind: code that needs to know
/// what a header is matches on the variant instead of downcasting. Headers
/// without a dedicated value type ride `Other` with their raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedHeader {
    From(FromHeader),
    To(To),
    Via(Via),
    CallId(CallId),
    CSeq(CSeq),
    Contact(Contact),
    ContentLength(ContentLength),
    ContentType(ContentType),
    MaxForwards(MaxForwards),
    Expires(Expires),
    Require(Require),
    ProxyRequire(Require),
    Route(Route),
    RecordRoute(RecordRoute),
    /// Any other header, raw value preserved verbatim
    Other(HeaderName, String),
}

impl TypedHeader {
    /// The name this header renders under.
    pub fn name(&self) -> HeaderName {
        match self {
            TypedHeader::From(_) => HeaderName::From,
            TypedHeader::To(_) => HeaderName::To,
            TypedHeader::Via(_) => HeaderName::Via,
            TypedHeader::CallId(_) => HeaderName::CallId,
            TypedHeader::CSeq(_) => HeaderName::CSeq,
            TypedHeader::Contact(_) => HeaderName::Contact,
            TypedHeader::ContentLength(_) => HeaderName::ContentLength,
            TypedHeader::ContentType(_) => HeaderName::ContentType,
            TypedHeader::MaxForwards(_) => HeaderName::MaxForwards,
            TypedHeader::Expires(_) => HeaderName::Expires,
            TypedHeader::Require(_) => HeaderName::Require,
            TypedHeader::ProxyRequire(_) => HeaderName::ProxyRequire,
            TypedHeader::Route(_) => HeaderName::Route,
            TypedHeader::RecordRoute(_) => HeaderName::RecordRoute,
            TypedHeader::Other(name, _) => name.clone(),
        }
    }

    /// Parses a raw header value under the given name into its typed form.
    ///
    /// Names without a dedicated type become `Other`. A value that fails
    /// its type's grammar is an error; the message parser quarantines such
    /// lines rather than aborting.
    pub fn from_raw(name: HeaderName, value: &str) -> Result<Self> {
        let value = value.trim();
        Ok(match name {
            HeaderName::From => TypedHeader::From(FromHeader::from_str(value)?),
            HeaderName::To => TypedHeader::To(To::from_str(value)?),
            HeaderName::Via => TypedHeader::Via(Via::from_str(value)?),
            HeaderName::CallId => TypedHeader::CallId(CallId::from_str(value)?),
            HeaderName::CSeq => TypedHeader::CSeq(CSeq::from_str(value)?),
            HeaderName::Contact => TypedHeader::Contact(Contact::from_str(value)?),
            HeaderName::ContentLength => {
                TypedHeader::ContentLength(ContentLength::from_str(value)?)
            }
            HeaderName::ContentType => TypedHeader::ContentType(ContentType::from_str(value)?),
            HeaderName::MaxForwards => TypedHeader::MaxForwards(MaxForwards::from_str(value)?),
            HeaderName::Expires => TypedHeader::Expires(Expires::from_str(value)?),
            HeaderName::Require => TypedHeader::Require(Require::from_str(value)?),
            HeaderName::ProxyRequire => TypedHeader::ProxyRequire(Require::from_str(value)?),
            HeaderName::Route => TypedHeader::Route(Route::from_str(value)?),
            HeaderName::RecordRoute => TypedHeader::RecordRoute(RecordRoute::from_str(value)?),
            other => TypedHeader::Other(other, value.to_string()),
        })
    }

    /// Renders just the value part (without the "Name: " prefix).
    pub fn value_string(&self) -> String {
        match self {
            TypedHeader::From(h) => h.to_string(),
            TypedHeader::To(h) => h.to_string(),
            TypedHeader::Via(h) => h.to_string(),
            TypedHeader::CallId(h) => h.to_string(),
            TypedHeader::CSeq(h) => h.to_string(),
            TypedHeader::Contact(h) => h.to_string(),
            TypedHeader::ContentLength(h) => h.to_string(),
            TypedHeader::ContentType(h) => h.to_string(),
            TypedHeader::MaxForwards(h) => h.to_string(),
            TypedHeader::Expires(h) => h.to_string(),
            TypedHeader::Require(h) => h.to_string(),
            TypedHeader::ProxyRequire(h) => h.to_string(),
            TypedHeader::Route(h) => h.to_string(),
            TypedHeader::RecordRoute(h) => h.to_string(),
            TypedHeader::Other(_, v) => v.clone(),
        }
    }
}

impl fmt::Display for TypedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.value_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_typed() {
        let h = TypedHeader::from_raw(HeaderName::CSeq, "1 INVITE").unwrap();
        assert!(matches!(h, TypedHeader::CSeq(_)));
        assert_eq!(h.name(), HeaderName::CSeq);
        assert_eq!(h.to_string(), "CSeq: 1 INVITE");
    }

    #[test]
    fn test_from_raw_other() {
        let name = HeaderName::Other("x-asterisk-info".to_string());
        let h = TypedHeader::from_raw(name.clone(), "foo bar").unwrap();
        assert_eq!(h.name(), name);
        assert_eq!(h.value_string(), "foo bar");
    }

    #[test]
    fn test_from_raw_rejects_bad_value() {
        assert!(TypedHeader::from_raw(HeaderName::CSeq, "not a cseq").is_err());
        assert!(TypedHeader::from_raw(HeaderName::ContentLength, "many").is_err());
    }
}
