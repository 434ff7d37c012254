//! The SIP message model: typed header values, the message core, and the
//! request/response types built on it.

pub mod address;
pub mod body;
pub mod call_id;
pub mod contact;
pub mod content_length;
pub mod content_type;
pub mod cseq;
pub mod expires;
pub mod from;
pub mod headers;
pub mod max_forwards;
pub mod message;
pub mod method;
pub mod param;
pub mod record_route;
pub mod require;
pub mod route;
pub mod sip_message;
pub mod sip_request;
pub mod sip_response;
pub mod status;
pub mod to;
pub mod uri;
pub mod version;
pub mod via;

pub use address::Address;
pub use body::{Body, ContentObject};
pub use call_id::CallId;
pub use contact::Contact;
pub use content_length::ContentLength;
pub use content_type::ContentType;
pub use cseq::CSeq;
pub use expires::Expires;
pub use from::From;
pub use headers::{HeaderList, HeaderName, HeaderRegistry, TypedHeader};
pub use max_forwards::MaxForwards;
pub use message::Message;
pub use method::Method;
pub use param::Param;
pub use record_route::RecordRoute;
pub use require::Require;
pub use route::Route;
pub use sip_message::{EncodedMessage, HeaderEntry, SipMessage, MAGIC_COOKIE};
pub use sip_request::{Request, RequestLine};
pub use sip_response::{Response, StatusLine};
pub use status::StatusCode;
pub use to::To;
pub use uri::{Scheme, Uri};
pub use version::Version;
pub use via::Via;
