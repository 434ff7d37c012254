//! In-memory SIP message model.
//!
//! This crate models RFC 3261 requests and responses: typed header values,
//! an ordered header sequence with a name index, list headers, bodies with
//! charset-aware byte derivation, and the identifier/derivation logic that
//! transaction and dialog layers build on (transaction ids, dialog ids,
//! CANCEL/ACK/BYE/response construction).
//!
//! # Examples
//!
//! ```
//! use sip_msg_core::prelude::*;
//!
//! let text = "INVITE sip:bob@biloxi.com SIP/2.0\r\n\
//!     Via: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776asdhds\r\n\
//!     To: Bob <sip:bob@biloxi.com>\r\n\
//!     From: Alice <sip:alice@atlanta.com>;tag=1928301774\r\n\
//!     Call-ID: a84b4c76e66710@pc33.atlanta.com\r\n\
//!     CSeq: 314159 INVITE\r\n\
//!     \r\n";
//!
//! let message = parse_message(text).unwrap();
//! let request = message.as_request().unwrap();
//! assert_eq!(request.transaction_id().unwrap(), "z9hg4bk776asdhds");
//!
//! let ringing = request.create_response(StatusCode::Ringing, None).unwrap();
//! assert!(ringing.encode().text.starts_with("SIP/2.0 180 Ringing"));
//! ```

pub mod error;
pub mod parser;
pub mod types;

pub use error::{Error, Result};
pub use parser::parse_message;
pub use types::{
    Address, Body, CallId, Contact, ContentLength, ContentObject, ContentType, CSeq,
    EncodedMessage, Expires, HeaderEntry, HeaderList, HeaderName, HeaderRegistry, MaxForwards,
    Message, Method, Param, RecordRoute, Request, RequestLine, Require, Response, Route, Scheme,
    SipMessage, StatusCode, StatusLine, To, TypedHeader, Uri, Version, Via, MAGIC_COOKIE,
};

/// Everything needed to work with the message model.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::parser::parse_message;
    pub use crate::types::from::From;
    pub use crate::types::{
        Address, Body, CallId, Contact, ContentLength, ContentObject, ContentType, CSeq,
        EncodedMessage, Expires, HeaderEntry, HeaderList, HeaderName, HeaderRegistry, MaxForwards,
        Message, Method, Param, RecordRoute, Request, RequestLine, Require, Response, Route,
        Scheme, SipMessage, StatusCode, StatusLine, To, TypedHeader, Uri, Version, Via,
        MAGIC_COOKIE,
    };
}
