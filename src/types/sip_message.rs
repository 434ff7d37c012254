use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use md5::{Digest, Md5};
use tracing::trace;

use crate::error::{Error, Result};
use crate::types::body::Body;
use crate::types::call_id::CallId;
use crate::types::content_length::ContentLength;
use crate::types::content_type::ContentType;
use crate::types::cseq::CSeq;
use crate::types::from::From as FromHeader;
use crate::types::headers::{HeaderList, HeaderName, HeaderRegistry, TypedHeader};
use crate::types::to::To;
use crate::types::via::Via;

/// The RFC 3261 branch prefix marking a globally unique transaction id.
pub const MAGIC_COOKIE: &str = "z9hG4bK";

/// One slot in a message's header sequence: either a single-valued header
/// or a list of same-named values.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderEntry {
    Single(TypedHeader),
    List(HeaderList),
}

impl HeaderEntry {
    /// The name this entry is indexed and rendered under.
    pub fn name(&self) -> HeaderName {
        match self {
            HeaderEntry::Single(h) => h.name(),
            HeaderEntry::List(l) => l.name().clone(),
        }
    }

    /// The first (or only) value in this entry.
    pub fn first(&self) -> Option<&TypedHeader> {
        match self {
            HeaderEntry::Single(h) => Some(h),
            HeaderEntry::List(l) => l.first(),
        }
    }

    /// How many values this entry holds.
    pub fn len(&self) -> usize {
        match self {
            HeaderEntry::Single(_) => 1,
            HeaderEntry::List(l) => l.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for HeaderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderEntry::Single(h) => writeln!(f, "{}", h),
            HeaderEntry::List(l) => write!(f, "{}", l),
        }
    }
}

/// Result of a textual encode.
///
/// `body_omitted` is set when the message has a raw body that does not
/// decode as UTF-8; the text then carries headers only and the caller must
/// use [`SipMessage::encode_bytes_with`] for a faithful rendition.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedMessage {
    pub text: String,
    pub body_omitted: bool,
}

/// The header sequence, body, and identity logic shared by requests and
/// responses.
///
/// Headers live in a `Vec` in wire order with a name index alongside. The
/// two structures are kept in lockstep: every entry's name maps to its
/// position, and nothing else is in the index.
#[derive(Debug, Clone, Default)]
pub struct SipMessage {
    entries: Vec<HeaderEntry>,
    index: HashMap<HeaderName, usize>,
    unrecognized: Vec<String>,
    body: Option<Body>,
}

impl SipMessage {
    pub fn new() -> Self {
        SipMessage::default()
    }

    /// The header entries in wire order.
    pub fn headers(&self) -> &[HeaderEntry] {
        &self.entries
    }

    /// Looks up the entry stored under a name.
    pub fn header(&self, name: &HeaderName) -> Option<&HeaderEntry> {
        self.index.get(name).map(|&pos| &self.entries[pos])
    }

    pub fn has_header(&self, name: &HeaderName) -> bool {
        self.index.contains_key(name)
    }

    /// Attaches one header value.
    ///
    /// List-capable kinds are wrapped in a fresh list before installation.
    /// With `replace` any existing entry under the name is removed first
    /// and the new one installed at the front (`at_top`) or the back.
    /// Without `replace`, a second value for a singleton kind is an error,
    /// while list entries merge (prepending when `at_top`).
    pub fn attach(&mut self, header: TypedHeader, replace: bool, at_top: bool) -> Result<()> {
        let name = header.name();
        let entry = if HeaderRegistry::global().is_list_capable(&name) {
            HeaderEntry::List(HeaderList::singleton(header))
        } else {
            HeaderEntry::Single(header)
        };
        self.attach_entry(entry, replace, at_top)
    }

    /// Attaches a whole list of values at once. Lists pass through without
    /// re-wrapping, so this also installs lists under kinds the registry
    /// does not know as list-capable (derivations never need that, but the
    /// parser's comma-splitting path does for extension headers).
    pub fn attach_list(&mut self, list: HeaderList, replace: bool, at_top: bool) -> Result<()> {
        if list.is_empty() {
            return Ok(());
        }
        self.attach_entry(HeaderEntry::List(list), replace, at_top)
    }

    /// Installs a cloned entry during message derivation, appending at the
    /// back without position games.
    pub(crate) fn carry(&mut self, entry: HeaderEntry) -> Result<()> {
        match entry {
            HeaderEntry::Single(h) => self.attach(h, false, false),
            HeaderEntry::List(l) => self.attach_list(l, false, false),
        }
    }

    fn attach_entry(&mut self, entry: HeaderEntry, replace: bool, at_top: bool) -> Result<()> {
        let name = entry.name();
        trace!(header = %name, replace, at_top, "attach");

        if replace {
            self.remove_header(&name);
            self.install(entry, at_top);
            return Ok(());
        }

        match self.index.get(&name) {
            None => {
                self.install(entry, at_top);
                Ok(())
            }
            Some(&pos) => match (&self.entries[pos], entry) {
                (HeaderEntry::List(existing), HeaderEntry::List(incoming)) => {
                    // merge in place, entry keeps its position
                    let merged = existing.concatenate(&incoming, at_top);
                    self.entries[pos] = HeaderEntry::List(merged);
                    Ok(())
                }
                _ => Err(Error::DuplicateHeader(name)),
            },
        }
    }

    fn install(&mut self, entry: HeaderEntry, at_top: bool) {
        let name = entry.name();
        if at_top {
            self.entries.insert(0, entry);
            self.rebuild_index();
        } else {
            self.index.insert(name, self.entries.len());
            self.entries.push(entry);
        }
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (pos, entry) in self.entries.iter().enumerate() {
            self.index.insert(entry.name(), pos);
        }
    }

    /// Removes the whole entry under a name, if present.
    pub fn remove_header(&mut self, name: &HeaderName) {
        if let Some(pos) = self.index.remove(name) {
            trace!(header = %name, "remove");
            self.entries.remove(pos);
            self.rebuild_index();
        }
    }

    /// Removes one value from the entry under a name: the first element of
    /// a list when `top`, otherwise the last. A singleton entry is removed
    /// whole either way, and a list emptied by the removal is dropped.
    pub fn remove_header_end(&mut self, name: &HeaderName, top: bool) {
        let Some(&pos) = self.index.get(name) else {
            return;
        };
        let emptied = match &mut self.entries[pos] {
            HeaderEntry::Single(_) => true,
            HeaderEntry::List(list) => {
                if top {
                    list.remove_first();
                } else {
                    list.remove_last();
                }
                list.is_empty()
            }
        };
        if emptied {
            self.remove_header(name);
        }
    }

    /// Stores a line the parser could not make sense of. Quarantined lines
    /// are kept for inspection but never rendered.
    pub fn quarantine(&mut self, line: impl Into<String>) {
        let line = line.into();
        trace!(%line, "quarantined unparseable header line");
        self.unrecognized.push(line);
    }

    /// Header lines that failed to parse, verbatim.
    pub fn unrecognized(&self) -> &[String] {
        &self.unrecognized
    }

    // Fast accessors for the hot headers. These are plain index lookups;
    // nothing is cached.

    pub fn from(&self) -> Option<&FromHeader> {
        match self.header(&HeaderName::From)? {
            HeaderEntry::Single(TypedHeader::From(f)) => Some(f),
            _ => None,
        }
    }

    pub fn to(&self) -> Option<&To> {
        match self.header(&HeaderName::To)? {
            HeaderEntry::Single(TypedHeader::To(t)) => Some(t),
            _ => None,
        }
    }

    pub fn cseq(&self) -> Option<&CSeq> {
        match self.header(&HeaderName::CSeq)? {
            HeaderEntry::Single(TypedHeader::CSeq(c)) => Some(c),
            _ => None,
        }
    }

    pub fn call_id(&self) -> Option<&CallId> {
        match self.header(&HeaderName::CallId)? {
            HeaderEntry::Single(TypedHeader::CallId(c)) => Some(c),
            _ => None,
        }
    }

    pub fn content_length(&self) -> Option<ContentLength> {
        match self.header(&HeaderName::ContentLength)? {
            HeaderEntry::Single(TypedHeader::ContentLength(c)) => Some(*c),
            _ => None,
        }
    }

    pub fn content_type(&self) -> Option<&ContentType> {
        match self.header(&HeaderName::ContentType)? {
            HeaderEntry::Single(TypedHeader::ContentType(c)) => Some(c),
            _ => None,
        }
    }

    /// The topmost Via hop.
    pub fn top_via(&self) -> Option<&Via> {
        match self.header(&HeaderName::Via)?.first()? {
            TypedHeader::Via(v) => Some(v),
            _ => None,
        }
    }

    /// All Via hops in order.
    pub fn vias(&self) -> Vec<&Via> {
        match self.header(&HeaderName::Via) {
            Some(HeaderEntry::List(list)) => list
                .iter()
                .filter_map(|h| match h {
                    TypedHeader::Via(v) => Some(v),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    // Body handling

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    pub fn set_body(&mut self, body: Option<Body>) {
        self.body = body;
    }

    /// Sets the body together with its Content-Type. An existing
    /// Content-Length is resynced to the new body's nominal length; if no
    /// Content-Length is present none is added (encode_bytes computes the
    /// exact value regardless).
    pub fn set_content(&mut self, body: Body, content_type: ContentType) -> Result<()> {
        self.attach(TypedHeader::ContentType(content_type), true, false)?;
        if self.content_length().is_some() {
            let len = body.nominal_len() as u32;
            self.attach(TypedHeader::ContentLength(ContentLength(len)), true, false)?;
        }
        self.body = Some(body);
        Ok(())
    }

    /// The body as bytes, derived through the Content-Type charset.
    pub fn raw_body(&self) -> Option<Bytes> {
        let charset = self.content_type().and_then(|ct| ct.charset());
        self.body.as_ref().map(|b| b.to_bytes(charset))
    }

    // Encoding

    /// Renders headers followed by the blank separator line and the body
    /// into `out`. Returns true when a raw body had to be left out because
    /// it does not decode as UTF-8.
    pub(crate) fn encode_trailing_into(&self, out: &mut String) -> bool {
        // Content-Length always renders last, wherever it sits in the
        // sequence.
        let mut content_length = None;
        for entry in &self.entries {
            if entry.name() == HeaderName::ContentLength {
                content_length = Some(entry);
                continue;
            }
            out.push_str(&entry_lines(entry));
        }
        if let Some(entry) = content_length {
            out.push_str(&entry_lines(entry));
        }
        out.push_str("\r\n");

        let mut body_omitted = false;
        match &self.body {
            None => {}
            Some(Body::Text(s)) => out.push_str(s),
            Some(Body::Object(o)) => out.push_str(&o.render()),
            Some(Body::Raw(b)) => match std::str::from_utf8(b) {
                Ok(s) => out.push_str(s),
                Err(_) => body_omitted = true,
            },
        }
        body_omitted
    }

    /// Renders a byte-exact form: headers with a computed Content-Length
    /// (replacing any stored one), the separator, then the body bytes.
    pub(crate) fn encode_bytes_with(&self, first_line: &str) -> Bytes {
        let body = self.raw_body().unwrap_or_default();

        let mut head = String::new();
        head.push_str(first_line);
        head.push_str("\r\n");
        for entry in &self.entries {
            if entry.name() == HeaderName::ContentLength {
                continue;
            }
            head.push_str(&entry_lines(entry));
        }
        head.push_str(&format!("Content-Length: {}\r\n", body.len()));
        head.push_str("\r\n");

        let mut out = Vec::with_capacity(head.len() + body.len());
        out.extend_from_slice(head.as_bytes());
        out.extend_from_slice(&body);
        Bytes::from(out)
    }

    // Identity derivation

    /// Derives the transaction identifier.
    ///
    /// When the top Via carries an RFC 3261 branch (magic cookie prefix)
    /// the lower-cased branch is the id. Otherwise the RFC 2543 key is
    /// assembled from From, To, Call-ID, CSeq and the top Via sent-by
    /// (with an explicit :5060 when no port is given), lower-cased, and
    /// digested with MD5; digests of 32 or more hex chars keep only the
    /// last 31.
    pub fn transaction_id(&self) -> Result<String> {
        let via = self.top_via();

        if let Some(branch) = via.and_then(Via::branch) {
            // get() instead of slicing: a multi-byte char at the prefix
            // boundary must take the legacy path, not panic.
            let prefix = branch.get(..MAGIC_COOKIE.len());
            if prefix.map_or(false, |p| p.eq_ignore_ascii_case(MAGIC_COOKIE)) {
                return Ok(branch.to_ascii_lowercase());
            }
        }

        let from = self
            .from()
            .ok_or(Error::MissingHeader(HeaderName::From))?;
        let to = self.to().ok_or(Error::MissingHeader(HeaderName::To))?;
        let call_id = self
            .call_id()
            .ok_or(Error::MissingHeader(HeaderName::CallId))?;
        let cseq = self
            .cseq()
            .ok_or(Error::MissingHeader(HeaderName::CSeq))?;

        let mut key = String::new();
        key.push_str(&from.uri.user_at_host_port());
        key.push(':');
        if let Some(tag) = from.tag() {
            key.push_str(tag);
            key.push(':');
        }
        key.push_str(&to.uri.user_at_host_port());
        key.push(':');
        key.push_str(call_id.as_str());
        key.push(':');
        key.push_str(&cseq.seq.to_string());
        key.push(':');
        key.push_str(cseq.method.as_str());
        if let Some(via) = via {
            key.push(':');
            key.push_str(&via.sent_by());
            if via.port.is_none() {
                key.push_str(":5060");
            }
        }

        let digest = Md5::digest(key.to_ascii_lowercase().as_bytes());
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        Ok(if hex.len() >= 32 {
            hex[hex.len() - 31..].to_string()
        } else {
            hex
        })
    }

    /// Derives the dialog identifier: Call-ID plus the local/remote tags.
    ///
    /// For a client (`is_server` false) the From tag comes first, for a
    /// server the To tag does, so peers derive the same id for the same
    /// dialog. Tags absent from the message are simply skipped.
    pub fn dialog_id(&self, is_server: bool) -> Result<String> {
        let to_tag = self.to().and_then(|t| t.tag()).map(String::from);
        self.dialog_id_inner(is_server, to_tag.as_deref())
    }

    /// Like [`dialog_id`](Self::dialog_id), but with the To tag supplied by
    /// the caller (used when forming the id before the tag is attached to
    /// the message).
    pub fn dialog_id_with_tag(&self, is_server: bool, to_tag: &str) -> Result<String> {
        self.dialog_id_inner(is_server, Some(to_tag))
    }

    fn dialog_id_inner(&self, is_server: bool, to_tag: Option<&str>) -> Result<String> {
        let call_id = self
            .call_id()
            .ok_or(Error::MissingHeader(HeaderName::CallId))?;
        let from_tag = self.from().and_then(|f| f.tag());

        let mut id = call_id.as_str().to_string();
        let (first, second) = if is_server {
            (to_tag, from_tag)
        } else {
            (from_tag, to_tag)
        };
        if let Some(tag) = first {
            id.push(':');
            id.push_str(tag);
        }
        if let Some(tag) = second {
            id.push(':');
            id.push_str(tag);
        }
        Ok(id.to_ascii_lowercase())
    }
}

fn entry_lines(entry: &HeaderEntry) -> String {
    let mut s = String::new();
    match entry {
        HeaderEntry::Single(h) => {
            s.push_str(&h.to_string());
            s.push_str("\r\n");
        }
        HeaderEntry::List(list) => {
            for item in list {
                s.push_str(&item.to_string());
                s.push_str("\r\n");
            }
        }
    }
    s
}
