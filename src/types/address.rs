use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::param::{fmt_params, parse_params, Param};
use crate::types::uri::Uri;

/// A SIP name-addr: optional display name, URI, and trailing parameters.
///
/// This is the value shape shared by From, To, Contact, Route and
/// Record-Route headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub display_name: Option<String>,
    pub uri: Uri,
    pub params: Vec<Param>,
}

// Display names need quoting unless they are a single token.
fn needs_quoting(display_name: &str) -> bool {
    display_name.chars().any(|c| {
        !c.is_alphanumeric()
            && !matches!(c, '-' | '.' | '!' | '%' | '*' | '_' | '+' | '`' | '\'' | '~')
    })
}

impl Address {
    /// Creates a new address; an empty or blank display name becomes None.
    pub fn new(display_name: Option<impl Into<String>>, uri: Uri) -> Self {
        let display_name = display_name
            .map(|s| s.into())
            .filter(|s: &String| !s.trim().is_empty());
        Address {
            display_name,
            uri,
            params: Vec::new(),
        }
    }

    /// Creates an address with no display name.
    pub fn from_uri(uri: Uri) -> Self {
        Address::new(None::<String>, uri)
    }

    /// Gets the tag parameter value.
    pub fn tag(&self) -> Option<&str> {
        self.params.iter().find_map(|p| match p {
            Param::Tag(tag) => Some(tag.as_str()),
            _ => None,
        })
    }

    /// Sets or replaces the tag parameter.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.params.retain(|p| !matches!(p, Param::Tag(_)));
        self.params.push(Param::Tag(tag.into()));
    }

    /// Removes the tag parameter if present.
    pub fn clear_tag(&mut self) {
        self.params.retain(|p| !matches!(p, Param::Tag(_)));
    }

    /// Gets a parameter value by key (case-insensitive).
    /// `Some(None)` means a flag parameter without a value.
    pub fn param(&self, key: &str) -> Option<Option<String>> {
        self.params.iter().find(|p| p.is(key)).map(|p| match p {
            Param::Lr => None,
            Param::Other(_, v) => v.clone(),
            other => other.to_string().split_once('=').map(|(_, v)| v.to_string()),
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.display_name {
            let name = name.trim();
            if !name.is_empty() {
                if needs_quoting(name) {
                    write!(f, "\"{}\" ", name.replace('"', "\\\""))?;
                } else {
                    write!(f, "{} ", name)?;
                }
            }
        }
        write!(f, "<{}>", self.uri)?;
        fmt_params(f, &self.params)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        // name-addr form: [display-name] <uri> [;params]
        if let Some(open) = s.find('<') {
            let close = s[open..]
                .find('>')
                .map(|i| open + i)
                .ok_or_else(|| Error::InvalidHeader(format!("Unclosed angle bracket: {s}")))?;

            let display = s[..open].trim();
            let display_name = if display.is_empty() {
                None
            } else if display.starts_with('"') && display.ends_with('"') && display.len() >= 2 {
                Some(display[1..display.len() - 1].replace("\\\"", "\""))
            } else {
                Some(display.to_string())
            };

            let uri = Uri::from_str(&s[open + 1..close])?;
            let rest = s[close + 1..].trim();
            let params = match rest.strip_prefix(';') {
                Some(p) => parse_params(p)?,
                None if rest.is_empty() => Vec::new(),
                None => {
                    return Err(Error::InvalidHeader(format!(
                        "Unexpected text after address: {rest}"
                    )))
                }
            };

            let mut addr = Address::new(display_name, uri);
            addr.params = params;
            return Ok(addr);
        }

        // addr-spec form: parameters after the URI belong to the header,
        // not the URI, so split them off before parsing.
        let (uri_part, params) = match s.find(';') {
            Some(i) => (&s[..i], parse_params(&s[i + 1..])?),
            None => (s, Vec::new()),
        };
        let mut addr = Address::from_uri(Uri::from_str(uri_part.trim())?);
        addr.params = params;
        Ok(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_addr_with_display_name() {
        let addr = Address::from_str("\"Alice Smith\" <sip:alice@atlanta.com>;tag=1928301774").unwrap();
        assert_eq!(addr.display_name.as_deref(), Some("Alice Smith"));
        assert_eq!(addr.uri.host, "atlanta.com");
        assert_eq!(addr.tag(), Some("1928301774"));
        assert_eq!(addr.to_string(), "\"Alice Smith\" <sip:alice@atlanta.com>;tag=1928301774");
    }

    #[test]
    fn test_addr_spec_form() {
        let addr = Address::from_str("sip:bob@biloxi.com;tag=a6c85cf").unwrap();
        assert_eq!(addr.uri.user.as_deref(), Some("bob"));
        assert_eq!(addr.tag(), Some("a6c85cf"));
        // tag landed on the address, not the URI
        assert!(addr.uri.parameters.is_empty());
    }

    #[test]
    fn test_uri_params_stay_inside_brackets() {
        let addr = Address::from_str("<sip:proxy.example.com;lr>").unwrap();
        assert_eq!(addr.uri.parameter("lr"), Some(None));
        assert!(addr.params.is_empty());
    }

    #[test]
    fn test_tag_replacement() {
        let mut addr = Address::from_uri(Uri::sip("example.com"));
        assert_eq!(addr.tag(), None);
        addr.set_tag("abc");
        addr.set_tag("def");
        assert_eq!(addr.tag(), Some("def"));
        addr.clear_tag();
        assert_eq!(addr.tag(), None);
    }

    #[test]
    fn test_unquoted_single_token_display_name() {
        let addr = Address::from_str("Bob <sip:bob@biloxi.com>").unwrap();
        assert_eq!(addr.display_name.as_deref(), Some("Bob"));
        assert_eq!(addr.to_string(), "Bob <sip:bob@biloxi.com>");
    }
}
