use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_while1},
    character::complete::{char, digit1},
    combinator::{map, map_res, opt, recognize},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, separated_pair, terminated},
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// SIP URI schema types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheme {
    /// SIP URI (non-secure)
    Sip,
    /// SIPS URI (secure SIP)
    Sips,
    /// TEL URI (telephone number)
    Tel,
}

impl Scheme {
    /// Returns the string representation of the scheme
    pub fn as_str(&self) -> &str {
        match self {
            Scheme::Sip => "sip",
            Scheme::Sips => "sips",
            Scheme::Tel => "tel",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sip" => Ok(Scheme::Sip),
            "sips" => Ok(Scheme::Sips),
            "tel" => Ok(Scheme::Tel),
            _ => Err(Error::InvalidUri(format!("Invalid scheme: {s}"))),
        }
    }
}

/// SIP URI components as defined in RFC 3261.
///
/// Parameters and headers are kept in insertion order so that a URI
/// renders the same way it was parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uri {
    /// URI scheme (sip, sips, tel)
    pub scheme: Scheme,
    /// User part (optional)
    pub user: Option<String>,
    /// Password (optional, deprecated)
    pub password: Option<String>,
    /// Host (required)
    pub host: String,
    /// Port (optional)
    pub port: Option<u16>,
    /// URI parameters (;key=value or ;key), in order
    pub parameters: Vec<(String, Option<String>)>,
    /// URI headers (?key=value), in order
    pub headers: Vec<(String, String)>,
}

impl Uri {
    /// Create a new URI with the minimum required fields
    pub fn new(scheme: Scheme, host: impl Into<String>) -> Self {
        Uri {
            scheme,
            user: None,
            password: None,
            host: host.into(),
            port: None,
            parameters: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Create a new SIP URI
    pub fn sip(host: impl Into<String>) -> Self {
        Self::new(Scheme::Sip, host)
    }

    /// Create a new SIPS URI
    pub fn sips(host: impl Into<String>) -> Self {
        Self::new(Scheme::Sips, host)
    }

    /// Create a new TEL URI
    pub fn tel(number: impl Into<String>) -> Self {
        Self::new(Scheme::Tel, number)
    }

    /// Set the user part of the URI
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the port part of the URI
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Add a parameter to the URI
    pub fn with_parameter(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.parameters.push((key.into(), value.map(|v| v.into())));
        self
    }

    /// Add a header to the URI
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Looks up a parameter by name (case-insensitive key).
    pub fn parameter(&self, key: &str) -> Option<Option<&str>> {
        self.parameters
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_deref())
    }

    /// Returns the transport parameter if present
    pub fn transport(&self) -> Option<&str> {
        self.parameter("transport").flatten()
    }

    /// Renders "user@host[:port]" (or "host[:port]" without a user part),
    /// the form used in identifier derivation.
    pub fn user_at_host_port(&self) -> String {
        let mut s = String::new();
        if let Some(user) = &self.user {
            s.push_str(user);
            s.push('@');
        }
        s.push_str(&self.host);
        if let Some(port) = self.port {
            s.push(':');
            s.push_str(&port.to_string());
        }
        s
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;

        if let Some(user) = &self.user {
            write!(f, "{}", user)?;
            if let Some(password) = &self.password {
                write!(f, ":{}", password)?;
            }
            write!(f, "@")?;
        }

        write!(f, "{}", self.host)?;

        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }

        for (key, value) in &self.parameters {
            write!(f, ";{}", key)?;
            if let Some(val) = value {
                write!(f, "={}", val)?;
            }
        }

        for (i, (key, value)) in self.headers.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, value)?;
        }

        Ok(())
    }
}

// Parse the scheme of a URI (sip, sips, tel). "sips" must be tried
// before "sip" or the shorter tag wins.
fn scheme_parser(input: &str) -> IResult<&str, Scheme> {
    map_res(
        alt((tag("sips"), tag("sip"), tag("tel"))),
        Scheme::from_str,
    )(input)
}

// Parse the userinfo part (user:password@)
fn userinfo_parser(input: &str) -> IResult<&str, (Option<&str>, Option<&str>)> {
    match opt(terminated(
        pair(
            take_while1(|c| c != ':' && c != '@' && c != ';' && c != '?' && c != '>'),
            opt(preceded(char(':'), take_till(|c| c == '@'))),
        ),
        char('@'),
    ))(input)
    {
        Ok((remaining, Some((user, password)))) => Ok((remaining, (Some(user), password))),
        Ok((remaining, None)) => Ok((remaining, (None, None))),
        Err(e) => Err(e),
    }
}

// Parse the host part. A bracketed IPv6 literal keeps its brackets and
// may contain ':'; any port follows after the closing ']'.
fn host_parser(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(delimited(
            char('['),
            take_while1(|c: char| c.is_ascii_hexdigit() || c == ':' || c == '.'),
            char(']'),
        )),
        take_while1(|c: char| c.is_alphanumeric() || c == '.' || c == '-' || c == '+'),
    ))(input)
}

// Parse the port part
fn port_parser(input: &str) -> IResult<&str, u16> {
    map_res(preceded(char(':'), digit1), |s: &str| s.parse::<u16>())(input)
}

// Parse a single parameter
fn parameter_parser(input: &str) -> IResult<&str, (String, Option<String>)> {
    preceded(
        char(';'),
        pair(
            map(take_till(|c| c == '=' || c == ';' || c == '?'), String::from),
            opt(preceded(
                char('='),
                map(take_till(|c| c == ';' || c == '?'), String::from),
            )),
        ),
    )(input)
}

// Parse a single header
fn header_parser(input: &str) -> IResult<&str, (String, String)> {
    separated_pair(
        map(take_till(|c| c == '=' || c == '&'), String::from),
        char('='),
        map(take_till(|c| c == '&'), String::from),
    )(input)
}

// Parser for a complete URI
fn uri_parser(input: &str) -> IResult<&str, Uri> {
    let (input, scheme) = terminated(scheme_parser, char(':'))(input)?;
    let (input, (user, password)) = userinfo_parser(input)?;
    let (input, host) = host_parser(input)?;
    let (input, port) = opt(port_parser)(input)?;
    let (input, parameters) = many0(parameter_parser)(input)?;
    let (input, headers) = opt(preceded(
        char('?'),
        separated_list0(char('&'), header_parser),
    ))(input)?;

    let mut uri = Uri::new(scheme, host);
    uri.user = user.map(String::from);
    uri.password = password.map(String::from);
    uri.port = port;
    uri.parameters = parameters;
    uri.headers = headers.unwrap_or_default();

    Ok((input, uri))
}

impl FromStr for Uri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match uri_parser(s) {
            Ok(("", uri)) => Ok(uri),
            Ok((rest, _)) => Err(Error::InvalidUri(format!(
                "Trailing input after URI: {rest}"
            ))),
            Err(_) => Err(Error::InvalidUri(format!("Failed to parse URI: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_uri() {
        let uri = Uri::sip("example.com");
        assert_eq!(uri.scheme, Scheme::Sip);
        assert_eq!(uri.host, "example.com");
        assert!(uri.user.is_none());
        assert_eq!(uri.to_string(), "sip:example.com");
    }

    #[test]
    fn test_parse_full_uri() {
        let uri = Uri::from_str("sip:alice@example.com:5060;transport=tcp?subject=Meeting").unwrap();
        assert_eq!(uri.scheme, Scheme::Sip);
        assert_eq!(uri.user.as_deref(), Some("alice"));
        assert_eq!(uri.host, "example.com");
        assert_eq!(uri.port, Some(5060));
        assert_eq!(uri.transport(), Some("tcp"));
        assert_eq!(uri.headers[0], ("subject".to_string(), "Meeting".to_string()));
    }

    #[test]
    fn test_sips_scheme() {
        let uri = Uri::from_str("sips:secure.example.com:5061").unwrap();
        assert_eq!(uri.scheme, Scheme::Sips);
        assert_eq!(uri.port, Some(5061));
    }

    #[test]
    fn test_display_round_trip() {
        let text = "sip:bob@biloxi.com;transport=udp;lr?x=1&y=2";
        let uri = Uri::from_str(text).unwrap();
        assert_eq!(uri.to_string(), text);
    }

    #[test]
    fn test_user_at_host_port() {
        let uri = Uri::from_str("sip:alice@example.com:5070").unwrap();
        assert_eq!(uri.user_at_host_port(), "alice@example.com:5070");
        let uri = Uri::from_str("sip:example.com").unwrap();
        assert_eq!(uri.user_at_host_port(), "example.com");
    }

    #[test]
    fn test_valueless_parameter() {
        let uri = Uri::from_str("sip:example.com;lr").unwrap();
        assert_eq!(uri.parameter("lr"), Some(None));
        assert_eq!(uri.to_string(), "sip:example.com;lr");
    }

    #[test]
    fn test_bracketed_ipv6_host() {
        let uri = Uri::from_str("sip:[2001:db8::1]").unwrap();
        assert_eq!(uri.host, "[2001:db8::1]");
        assert_eq!(uri.port, None);

        let uri = Uri::from_str("sip:alice@[2001:db8::1]:5060;transport=tcp").unwrap();
        assert_eq!(uri.user.as_deref(), Some("alice"));
        assert_eq!(uri.host, "[2001:db8::1]");
        assert_eq!(uri.port, Some(5060));
        assert_eq!(uri.transport(), Some("tcp"));
        assert_eq!(uri.to_string(), "sip:alice@[2001:db8::1]:5060;transport=tcp");
    }

    #[test]
    fn test_invalid_uri() {
        assert!(Uri::from_str("http://example.com").is_err());
        assert!(Uri::from_str("sip:").is_err());
    }
}
