use std::fmt;

use bytes::Bytes;

/// An opaque structured body that knows how to render itself to text.
///
/// Application bodies (an SDP session description, a pidf document) attach
/// through this trait instead of being pre-rendered, so the message keeps
/// the structured form until encode time.
pub trait ContentObject: fmt::Debug + Send + Sync {
    /// Renders the body to its textual wire form.
    fn render(&self) -> String;

    /// Clones the object behind the trait.
    fn clone_object(&self) -> Box<dyn ContentObject>;
}

impl ContentObject for String {
    fn render(&self) -> String {
        self.clone()
    }

    fn clone_object(&self) -> Box<dyn ContentObject> {
        Box::new(self.clone())
    }
}

/// Message body payload.
///
/// The three variants are mutually exclusive by construction; a message
/// holds at most one `Body`.
#[derive(Debug)]
pub enum Body {
    /// Textual content, encoded to bytes via the Content-Type charset.
    Text(String),
    /// Pre-encoded binary content, emitted verbatim.
    Raw(Bytes),
    /// Structured content rendered lazily at encode time.
    Object(Box<dyn ContentObject>),
}

impl Body {
    /// Creates a textual body.
    pub fn text(s: impl Into<String>) -> Self {
        Body::Text(s.into())
    }

    /// Creates a raw binary body.
    pub fn raw(bytes: impl Into<Bytes>) -> Self {
        Body::Raw(bytes.into())
    }

    /// Creates an opaque structured body.
    pub fn object(obj: impl ContentObject + 'static) -> Self {
        Body::Object(Box::new(obj))
    }

    /// The textual form of this body, when it has one. Raw bodies only
    /// have a textual form if they decode as UTF-8.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Body::Text(s) => Some(s.clone()),
            Body::Raw(b) => std::str::from_utf8(b).ok().map(String::from),
            Body::Object(o) => Some(o.render()),
        }
    }

    /// The character count of the textual form, or the byte count for raw
    /// bodies. This is the length a message reports when asked to sync an
    /// existing Content-Length against a newly set body.
    pub fn nominal_len(&self) -> usize {
        match self {
            Body::Text(s) => s.chars().count(),
            Body::Raw(b) => b.len(),
            Body::Object(o) => o.render().chars().count(),
        }
    }

    /// Derives the byte form using the given charset (from Content-Type).
    /// Raw bodies are returned untouched.
    pub fn to_bytes(&self, charset: Option<&str>) -> Bytes {
        match self {
            Body::Raw(b) => b.clone(),
            Body::Text(s) => encode_text(s, charset),
            Body::Object(o) => encode_text(&o.render(), charset),
        }
    }
}

impl Clone for Body {
    fn clone(&self) -> Self {
        match self {
            Body::Text(s) => Body::Text(s.clone()),
            Body::Raw(b) => Body::Raw(b.clone()),
            Body::Object(o) => Body::Object(o.clone_object()),
        }
    }
}

impl PartialEq for Body {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Body::Raw(a), Body::Raw(b)) => a == b,
            (a, b) => a.as_text() == b.as_text(),
        }
    }
}

/// Encodes text per the named charset. UTF-8 is the default; ISO-8859-1
/// and US-ASCII map unrepresentable characters to '?'. Unknown charsets
/// fall back to UTF-8.
fn encode_text(text: &str, charset: Option<&str>) -> Bytes {
    let charset = charset.unwrap_or("utf-8");
    if charset.eq_ignore_ascii_case("iso-8859-1") || charset.eq_ignore_ascii_case("latin1") {
        let out: Vec<u8> = text
            .chars()
            .map(|c| if (c as u32) <= 0xFF { c as u8 } else { b'?' })
            .collect();
        Bytes::from(out)
    } else if charset.eq_ignore_ascii_case("us-ascii") || charset.eq_ignore_ascii_case("ascii") {
        let out: Vec<u8> = text
            .chars()
            .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
            .collect();
        Bytes::from(out)
    } else {
        Bytes::copy_from_slice(text.as_bytes())
    }
}
