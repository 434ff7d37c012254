use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::types::body::Body;
use crate::types::content_type::ContentType;
use crate::types::headers::TypedHeader;
use crate::types::sip_message::{EncodedMessage, SipMessage};
use crate::types::status::StatusCode;
use crate::types::version::Version;

/// The first line of a response: version, status code, reason phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub version: Version,
    pub status: StatusCode,
    pub reason: String,
}

impl StatusLine {
    /// Creates a status line; with no reason given the code's canonical
    /// phrase is used.
    pub fn new(status: StatusCode, reason: Option<&str>) -> Self {
        StatusLine {
            version: Version::sip_2_0(),
            status,
            reason: reason
                .map(String::from)
                .unwrap_or_else(|| status.reason_phrase().to_string()),
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.version, self.status, self.reason)
    }
}

impl FromStr for StatusLine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (version, rest) = s
            .split_once(' ')
            .ok_or_else(|| Error::InvalidFormat(format!("Bad status line: {s}")))?;
        let version = version.parse()?;
        let (code, reason) = match rest.trim().split_once(' ') {
            Some((code, reason)) => (code, reason.trim()),
            None => (rest.trim(), ""),
        };
        let code: u16 = code
            .parse()
            .map_err(|_| Error::InvalidFormat(format!("Bad status code: {code}")))?;
        let status = StatusCode::from_u16(code)?;
        Ok(StatusLine {
            version,
            status,
            reason: reason.to_string(),
        })
    }
}

/// A SIP response: status line plus the shared message core.
///
/// Dereferences to [`SipMessage`] for header and body access.
#[derive(Debug, Clone)]
pub struct Response {
    pub line: StatusLine,
    core: SipMessage,
}

impl Response {
    /// Creates an empty response with the given status.
    pub fn new(status: StatusCode, reason: Option<&str>) -> Self {
        Response {
            line: StatusLine::new(status, reason),
            core: SipMessage::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.line.status
    }

    pub fn reason(&self) -> &str {
        &self.line.reason
    }

    pub fn is_provisional(&self) -> bool {
        self.line.status.is_provisional()
    }

    pub fn is_success(&self) -> bool {
        self.line.status.is_success()
    }

    pub fn is_final(&self) -> bool {
        self.line.status.is_final()
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

    /// Renders the response as text. See [`EncodedMessage`] for the lossy
    /// raw-body case.
    pub fn encode(&self) -> EncodedMessage {
        let mut text = format!("{}\r\n", self.line);
        let body_omitted = self.core.encode_trailing_into(&mut text);
        EncodedMessage { text, body_omitted }
    }

    /// Renders the response byte-exactly, with a computed Content-Length.
    pub fn encode_bytes(&self) -> Bytes {
        self.core.encode_bytes_with(&self.line.to_string())
    }
}

impl Deref for Response {
    type Target = SipMessage;
    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl DerefMut for Response {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.core
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode().text)
    }
}
