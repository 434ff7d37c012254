use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Typed Content-Type header: media type plus parameters.
///
/// The charset parameter drives byte derivation of textual bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentType {
    /// Top-level media type, e.g. "application"
    pub media_type: String,
    /// Subtype, e.g. "sdp"
    pub sub_type: String,
    /// Media parameters (charset, boundary, ...), in order
    pub parameters: Vec<(String, String)>,
}

impl ContentType {
    /// Creates a Content-Type with no parameters.
    pub fn new(media_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        ContentType {
            media_type: media_type.into(),
            sub_type: sub_type.into(),
            parameters: Vec::new(),
        }
    }

    /// "application/sdp"
    pub fn application_sdp() -> Self {
        ContentType::new("application", "sdp")
    }

    /// "text/plain"
    pub fn text_plain() -> Self {
        ContentType::new("text", "plain")
    }

    /// Adds a media parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((key.into(), value.into()));
        self
    }

    /// Looks up a parameter by key (case-insensitive).
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// The charset parameter, if present.
    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.media_type, self.sub_type)?;
        for (key, value) in &self.parameters {
            write!(f, ";{}={}", key, value)?;
        }
        Ok(())
    }
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(';');
        let media = parts
            .next()
            .ok_or_else(|| Error::InvalidHeader(format!("Empty Content-Type: {s}")))?;
        let (media_type, sub_type) = media
            .trim()
            .split_once('/')
            .ok_or_else(|| Error::InvalidHeader(format!("Bad media type: {media}")))?;
        if media_type.is_empty() || sub_type.is_empty() {
            return Err(Error::InvalidHeader(format!("Bad media type: {media}")));
        }

        let mut parameters = Vec::new();
        for param in parts {
            let param = param.trim();
            if param.is_empty() {
                continue;
            }
            let (key, value) = param
                .split_once('=')
                .ok_or_else(|| Error::InvalidHeader(format!("Bad media parameter: {param}")))?;
            parameters.push((
                key.trim().to_string(),
                value.trim().trim_matches('"').to_string(),
            ));
        }

        Ok(ContentType {
            media_type: media_type.trim().to_string(),
            sub_type: sub_type.trim().to_string(),
            parameters,
        })
    }
}
