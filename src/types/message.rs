use std::fmt;
use std::ops::Deref;

use bytes::Bytes;

use crate::types::sip_message::{EncodedMessage, SipMessage};
use crate::types::sip_request::Request;
use crate::types::sip_response::Response;

/// Either kind of SIP message.
#[derive(Debug, Clone)]
pub enum Message {
    Request(Request),
    Response(Response),
}

impl Message {
    pub fn is_request(&self) -> bool {
        matches!(self, Message::Request(_))
    }

    pub fn is_response(&self) -> bool {
        matches!(self, Message::Response(_))
    }

    pub fn as_request(&self) -> Option<&Request> {
        match self {
            Message::Request(r) => Some(r),
            Message::Response(_) => None,
        }
    }

    pub fn as_response(&self) -> Option<&Response> {
        match self {
            Message::Request(_) => None,
            Message::Response(r) => Some(r),
        }
    }

    pub fn encode(&self) -> EncodedMessage {
        match self {
            Message::Request(r) => r.encode(),
            Message::Response(r) => r.encode(),
        }
    }

    pub fn encode_bytes(&self) -> Bytes {
        match self {
            Message::Request(r) => r.encode_bytes(),
            Message::Response(r) => r.encode_bytes(),
        }
    }
}

impl Deref for Message {
    type Target = SipMessage;
    fn deref(&self) -> &Self::Target {
        match self {
            Message::Request(r) => r,
            Message::Response(r) => r,
        }
    }
}

impl From<Request> for Message {
    fn from(request: Request) -> Self {
        Message::Request(request)
    }
}

impl From<Response> for Message {
    fn from(response: Response) -> Self {
        Message::Response(response)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode().text)
    }
}
