use thiserror::Error;

use crate::types::headers::HeaderName;

/// A type alias for handling `Result`s with `Error`
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in SIP message handling
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid SIP method
    #[error("Invalid SIP method")]
    InvalidMethod,

    /// Invalid SIP header syntax
    #[error("Invalid SIP header: {0}")]
    InvalidHeader(String),

    /// Invalid SIP URI
    #[error("Invalid SIP URI: {0}")]
    InvalidUri(String),

    /// Invalid SIP version
    #[error("Invalid SIP version")]
    InvalidVersion,

    /// Invalid status code
    #[error("Invalid status code: {0}")]
    InvalidStatusCode(u16),

    /// Invalid message format
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    /// A second singleton header was attached without replace
    #[error("Duplicate singleton header: {0}")]
    DuplicateHeader(HeaderName),

    /// A mandatory header is missing
    #[error("Missing mandatory header: {0}")]
    MissingHeader(HeaderName),
}
