use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use bytes::Bytes;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::body::Body;
use crate::types::content_length::ContentLength;
use crate::types::content_type::ContentType;
use crate::types::from::From as FromHeader;
use crate::types::headers::{HeaderName, TypedHeader};
use crate::types::method::Method;
use crate::types::sip_message::{EncodedMessage, HeaderEntry, SipMessage};
use crate::types::sip_response::Response;
use crate::types::status::StatusCode;
use crate::types::to::To;
use crate::types::uri::Uri;
use crate::types::version::Version;

/// The first line of a request: method, request URI, and version.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestLine {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
}

impl RequestLine {
    pub fn new(method: Method, uri: Uri) -> Self {
        RequestLine {
            method,
            uri,
            version: Version::sip_2_0(),
        }
    }
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.method, self.uri, self.version)
    }
}

impl FromStr for RequestLine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split_whitespace();
        let method = parts
            .next()
            .ok_or_else(|| Error::InvalidFormat(format!("Empty request line: {s:?}")))?
            .parse()?;
        let uri = parts
            .next()
            .ok_or_else(|| Error::InvalidFormat(format!("Request line missing URI: {s}")))?
            .parse()?;
        let version = parts
            .next()
            .ok_or_else(|| Error::InvalidFormat(format!("Request line missing version: {s}")))?
            .parse()?;
        if parts.next().is_some() {
            return Err(Error::InvalidFormat(format!("Trailing request line input: {s}")));
        }
        Ok(RequestLine { method, uri, version })
    }
}

/// A SIP request: request line plus the shared message core.
///
/// Dereferences to [`SipMessage`] for header and body access. Derivation
/// methods build CANCEL, ACK, BYE and responses from an existing request;
/// everything carried into the derived message is a deep clone, the source
/// is never touched.
#[derive(Debug, Clone)]
pub struct Request {
    pub line: RequestLine,
    core: SipMessage,
}

impl Request {
    /// Creates an empty request for the given method and target.
    pub fn new(method: Method, uri: Uri) -> Self {
        Request {
            line: RequestLine::new(method, uri),
            core: SipMessage::new(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.line.method
    }

    pub fn uri(&self) -> &Uri {
        &self.line.uri
    }

    /// Builder-style header attach (append, no replace).
    pub fn with_header(mut self, header: TypedHeader) -> Result<Self> {
        self.core.attach(header, false, false)?;
        Ok(self)
    }

    /// Builder-style body setter.
    pub fn with_body(mut self, body: Body, content_type: ContentType) -> Result<Self> {
        self.core.set_content(body, content_type)?;
        Ok(self)
    }

    /// Validates the mandatory header set: From, To, CSeq, Call-ID and Via
    /// must be present and the CSeq method must match the request line.
    pub fn check_headers(&self) -> Result<()> {
        for name in [
            HeaderName::From,
            HeaderName::To,
            HeaderName::CSeq,
            HeaderName::CallId,
            HeaderName::Via,
        ] {
            if !self.core.has_header(&name) {
                return Err(Error::MissingHeader(name));
            }
        }
        let cseq = self
            .core
            .cseq()
            .ok_or(Error::MissingHeader(HeaderName::CSeq))?;
        if cseq.method != self.line.method {
            return Err(Error::InvalidFormat(format!(
                "CSeq method {} does not match request method {}",
                cseq.method, self.line.method
            )));
        }
        Ok(())
    }

    /// Renders the request as text. See [`EncodedMessage`] for the lossy
    /// raw-body case.
    pub fn encode(&self) -> EncodedMessage {
        let mut text = format!("{}\r\n", self.line);
        let body_omitted = self.core.encode_trailing_into(&mut text);
        EncodedMessage { text, body_omitted }
    }

    /// Renders the request byte-exactly, with a computed Content-Length.
    pub fn encode_bytes(&self) -> Bytes {
        self.core.encode_bytes_with(&self.line.to_string())
    }

    /// Builds a response to this request.
    ///
    /// Carries From, To, Via, Call-ID, Record-Route, CSeq, Expires and
    /// Timestamp; Require comes along only when it demands reliable
    /// provisional responses (100rel). PUBLISH and REGISTER never get
    /// Record-Route in their responses.
    pub fn create_response(&self, status: StatusCode, reason: Option<&str>) -> Result<Response> {
        debug!(method = %self.line.method, status = status.as_u16(), "create response");
        let mut response = Response::new(status, reason);
        for entry in self.core.headers() {
            match entry.name() {
                HeaderName::From
                | HeaderName::To
                | HeaderName::Via
                | HeaderName::CallId
                | HeaderName::RecordRoute
                | HeaderName::CSeq
                | HeaderName::Expires
                | HeaderName::Timestamp => {
                    response.carry(entry.clone())?;
                }
                HeaderName::Require => {
                    if requires_100rel(entry) {
                        response.carry(entry.clone())?;
                    }
                }
                _ => {}
            }
        }
        if matches!(self.line.method, Method::Publish | Method::Register) {
            response.remove_header(&HeaderName::RecordRoute);
        }
        Ok(response)
    }

    /// Builds the CANCEL for this request.
    ///
    /// CANCEL matches the transaction it cancels, so only the top Via is
    /// carried and its branch is preserved. The CSeq keeps its number with
    /// the method forced to CANCEL.
    pub fn create_cancel_request(&self) -> Result<Request> {
        let mut cancel = Request::new(Method::Cancel, self.line.uri.clone());

        let via = self
            .core
            .top_via()
            .ok_or(Error::MissingHeader(HeaderName::Via))?;
        cancel.core.attach(TypedHeader::Via(via.clone()), false, false)?;

        let from = self
            .core
            .from()
            .ok_or(Error::MissingHeader(HeaderName::From))?;
        cancel
            .core
            .attach(TypedHeader::From(from.clone()), false, false)?;

        let to = self.core.to().ok_or(Error::MissingHeader(HeaderName::To))?;
        cancel.core.attach(TypedHeader::To(to.clone()), false, false)?;

        let call_id = self
            .core
            .call_id()
            .ok_or(Error::MissingHeader(HeaderName::CallId))?;
        cancel
            .core
            .attach(TypedHeader::CallId(call_id.clone()), false, false)?;

        let cseq = self
            .core
            .cseq()
            .ok_or(Error::MissingHeader(HeaderName::CSeq))?;
        cancel.core.attach(
            TypedHeader::CSeq(cseq.with_method(Method::Cancel)),
            false,
            false,
        )?;

        if let Some(route) = self.core.header(&HeaderName::Route) {
            cancel.core.carry(route.clone())?;
        }
        if let Some(max_forwards) = self.core.header(&HeaderName::MaxForwards) {
            cancel.core.carry(max_forwards.clone())?;
        }

        Ok(cancel)
    }

    /// Builds the ACK for this request's transaction.
    ///
    /// Route, Proxy-Authorization and Content-Type are dropped, an existing
    /// Content-Length is zeroed, and the CSeq method becomes ACK. When the
    /// response's To (carrying the remote tag) is supplied it replaces the
    /// request's To.
    pub fn create_ack_request(&self, response_to: Option<&To>) -> Result<Request> {
        let mut ack = Request::new(Method::Ack, self.line.uri.clone());
        for entry in self.core.headers() {
            match entry.name() {
                HeaderName::Route
                | HeaderName::ProxyAuthorization
                | HeaderName::ContentType => {}
                HeaderName::ContentLength => {
                    ack.core
                        .attach(TypedHeader::ContentLength(ContentLength(0)), false, false)?;
                }
                HeaderName::CSeq => {
                    if let Some(cseq) = self.core.cseq() {
                        ack.core.attach(
                            TypedHeader::CSeq(cseq.with_method(Method::Ack)),
                            false,
                            false,
                        )?;
                    }
                }
                HeaderName::To => {
                    let to = match response_to {
                        Some(to) => to.clone(),
                        None => self
                            .core
                            .to()
                            .ok_or(Error::MissingHeader(HeaderName::To))?
                            .clone(),
                    };
                    ack.core.attach(TypedHeader::To(to), false, false)?;
                }
                _ => ack.core.carry(entry.clone())?,
            }
        }
        Ok(ack)
    }

    /// Generic in-dialog derivation underpinning BYE and out-of-transaction
    /// ACK.
    ///
    /// Contact, Route, Record-Route and Content-Type do not carry over; an
    /// existing Content-Length is zeroed; the CSeq number is kept with the
    /// new method; only the top Via survives, with its branch stripped so
    /// the new request starts its own transaction. With `switch_headers`
    /// the From and To addresses trade places; either way both lose their
    /// tags.
    pub fn create_request(&self, line: RequestLine, switch_headers: bool) -> Result<Request> {
        debug!(from_method = %self.line.method, to_method = %line.method, switch_headers, "derive request");
        let mut req = Request {
            line,
            core: SipMessage::new(),
        };
        for entry in self.core.headers() {
            match entry.name() {
                HeaderName::Contact
                | HeaderName::Route
                | HeaderName::RecordRoute
                | HeaderName::ContentType => {}
                HeaderName::ContentLength => {
                    req.core
                        .attach(TypedHeader::ContentLength(ContentLength(0)), false, false)?;
                }
                HeaderName::CSeq => {
                    if let Some(cseq) = self.core.cseq() {
                        req.core.attach(
                            TypedHeader::CSeq(cseq.with_method(req.line.method.clone())),
                            false,
                            false,
                        )?;
                    }
                }
                HeaderName::Via => {
                    if let Some(top) = self.core.top_via() {
                        let mut via = top.clone();
                        via.clear_branch();
                        req.core.attach(TypedHeader::Via(via), false, false)?;
                    }
                }
                HeaderName::From => {
                    let source = if switch_headers {
                        self.core
                            .to()
                            .ok_or(Error::MissingHeader(HeaderName::To))?
                            .0
                            .clone()
                    } else {
                        self.core
                            .from()
                            .ok_or(Error::MissingHeader(HeaderName::From))?
                            .0
                            .clone()
                    };
                    let mut addr = source;
                    addr.clear_tag();
                    req.core
                        .attach(TypedHeader::From(FromHeader::new(addr)), false, false)?;
                }
                HeaderName::To => {
                    let source = if switch_headers {
                        self.core
                            .from()
                            .ok_or(Error::MissingHeader(HeaderName::From))?
                            .0
                            .clone()
                    } else {
                        self.core
                            .to()
                            .ok_or(Error::MissingHeader(HeaderName::To))?
                            .0
                            .clone()
                    };
                    let mut addr = source;
                    addr.clear_tag();
                    req.core.attach(TypedHeader::To(To::new(addr)), false, false)?;
                }
                _ => req.core.carry(entry.clone())?,
            }
        }
        Ok(req)
    }

    /// Derives a BYE, optionally swapping the dialog endpoints.
    pub fn create_bye_request(&self, switch_headers: bool) -> Result<Request> {
        self.create_request(
            RequestLine::new(Method::Bye, self.line.uri.clone()),
            switch_headers,
        )
    }

    /// Derives an ACK through the generic path (fresh transaction, unlike
    /// [`create_ack_request`](Self::create_ack_request)).
    pub fn create_generic_ack_request(&self, switch_headers: bool) -> Result<Request> {
        self.create_request(
            RequestLine::new(Method::Ack, self.line.uri.clone()),
            switch_headers,
        )
    }
}

fn requires_100rel(entry: &HeaderEntry) -> bool {
    let check = |h: &TypedHeader| matches!(h, TypedHeader::Require(r) if r.requires_100rel());
    match entry {
        HeaderEntry::Single(h) => check(h),
        HeaderEntry::List(l) => l.iter().any(check),
    }
}

impl Deref for Request {
    type Target = SipMessage;
    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl DerefMut for Request {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.core
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode().text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_line_round_trip() {
        let line = RequestLine::from_str("INVITE sip:bob@biloxi.com SIP/2.0").unwrap();
        assert_eq!(line.method, Method::Invite);
        assert_eq!(line.uri.host, "biloxi.com");
        assert_eq!(line.to_string(), "INVITE sip:bob@biloxi.com SIP/2.0");
    }

    #[test]
    fn test_request_line_rejects_garbage() {
        assert!(RequestLine::from_str("INVITE").is_err());
        assert!(RequestLine::from_str("INVITE sip:a@b").is_err());
        assert!(RequestLine::from_str("INVITE sip:a@b SIP/2.0 extra").is_err());
    }
}
