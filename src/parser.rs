//! Line-level wire parser.
//!
//! This is the convenience boundary into the model: it handles the first
//! line, header folding, top-level comma splitting of list headers, and the
//! head/body split. Header lines that fail their value grammar are
//! quarantined on the message instead of failing the whole parse; only a
//! broken first line is fatal.

use std::str::FromStr;

use tracing::trace;

use crate::error::{Error, Result};
use crate::types::headers::{HeaderList, HeaderName, TypedHeader};
use crate::types::message::Message;
use crate::types::sip_message::SipMessage;
use crate::types::sip_request::{Request, RequestLine};
use crate::types::sip_response::{Response, StatusLine};
use crate::types::body::Body;

/// Parses a complete SIP message from its textual wire form.
pub fn parse_message(input: &str) -> Result<Message> {
    let (head, body) = split_head_body(input);

    let mut lines = unfold_lines(head);
    if lines.is_empty() {
        return Err(Error::InvalidFormat("empty message".to_string()));
    }
    let first_line = lines.remove(0);

    let mut message = if first_line.trim_start().starts_with("SIP/") {
        let line = StatusLine::from_str(&first_line)?;
        let mut response = Response::new(line.status, Some(&line.reason));
        response.line = line;
        Message::Response(response)
    } else {
        let line = RequestLine::from_str(&first_line)?;
        let mut request = Request::new(line.method.clone(), line.uri.clone());
        request.line = line;
        Message::Request(request)
    };

    {
        let core = match &mut message {
            Message::Request(r) => &mut **r,
            Message::Response(r) => &mut **r,
        };
        for line in &lines {
            parse_header_line(core, line);
        }
        if !body.is_empty() {
            core.set_body(Some(Body::text(body)));
        }
    }

    Ok(message)
}

// Header kinds whose values may be comma-joined on one line.
fn splits_on_comma(name: &HeaderName) -> bool {
    matches!(
        name,
        HeaderName::Via | HeaderName::Route | HeaderName::RecordRoute | HeaderName::Contact
    )
}

fn parse_header_line(core: &mut SipMessage, line: &str) {
    let Some((name, value)) = line.split_once(':') else {
        core.quarantine(line);
        return;
    };
    let Ok(name) = HeaderName::from_str(name) else {
        core.quarantine(line);
        return;
    };

    if splits_on_comma(&name) {
        let mut list = HeaderList::new(name.clone());
        for part in split_top_level_commas(value) {
            match TypedHeader::from_raw(name.clone(), part) {
                Ok(header) => list.push(header),
                Err(_) => {
                    core.quarantine(line);
                    return;
                }
            }
        }
        if core.attach_list(list, false, false).is_err() {
            core.quarantine(line);
        }
        return;
    }

    match TypedHeader::from_raw(name, value) {
        Ok(header) => {
            if core.attach(header, false, false).is_err() {
                core.quarantine(line);
            }
        }
        Err(err) => {
            trace!(%line, %err, "header line failed to parse");
            core.quarantine(line);
        }
    }
}

// Splits the header section from the body at the first blank line and
// returns both halves.
fn split_head_body(input: &str) -> (&str, &str) {
    if let Some(pos) = input.find("\r\n\r\n") {
        (&input[..pos], &input[pos + 4..])
    } else if let Some(pos) = input.find("\n\n") {
        (&input[..pos], &input[pos + 2..])
    } else {
        (input, "")
    }
}

// Splits the head into logical lines, folding continuation lines (leading
// whitespace) onto their predecessor.
fn unfold_lines(head: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in head.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        if raw.is_empty() {
            continue;
        }
        if raw.starts_with(' ') || raw.starts_with('\t') {
            if let Some(prev) = lines.last_mut() {
                prev.push(' ');
                prev.push_str(raw.trim_start());
                continue;
            }
        }
        lines.push(raw.to_string());
    }
    lines
}

// Splits on commas outside quoted strings and angle brackets, so that
// display names and URI headers survive.
fn split_top_level_commas(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut depth = 0usize;
    let mut start = 0usize;

    for (i, c) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '<' if !in_quotes => depth += 1,
            '>' if !in_quotes && depth > 0 => depth -= 1,
            ',' if !in_quotes && depth == 0 => {
                parts.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::method::Method;

    const INVITE: &str = "INVITE sip:bob@biloxi.com SIP/2.0\r\n\
        Via: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776asdhds\r\n\
        Max-Forwards: 70\r\n\
        To: Bob <sip:bob@biloxi.com>\r\n\
        From: Alice <sip:alice@atlanta.com>;tag=1928301774\r\n\
        Call-ID: a84b4c76e66710@pc33.atlanta.com\r\n\
        CSeq: 314159 INVITE\r\n\
        Content-Type: application/sdp\r\n\
        Content-Length: 4\r\n\
        \r\n\
        v=0\r\n";

    #[test]
    fn test_parse_invite() {
        let msg = parse_message(INVITE).unwrap();
        let req = msg.as_request().unwrap();
        assert_eq!(req.line.method, Method::Invite);
        assert_eq!(req.from().unwrap().tag(), Some("1928301774"));
        assert_eq!(req.cseq().unwrap().seq, 314159);
        assert_eq!(req.top_via().unwrap().branch(), Some("z9hG4bK776asdhds"));
        assert_eq!(req.body().unwrap().as_text().as_deref(), Some("v=0\r\n"));
    }

    #[test]
    fn test_parse_response() {
        let text = "SIP/2.0 180 Ringing\r\n\
            Via: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bKnashds8\r\n\
            To: Bob <sip:bob@biloxi.com>;tag=a6c85cf\r\n\
            From: Alice <sip:alice@atlanta.com>;tag=1928301774\r\n\
            Call-ID: a84b4c76e66710@pc33.atlanta.com\r\n\
            CSeq: 314159 INVITE\r\n\
            \r\n";
        let msg = parse_message(text).unwrap();
        let resp = msg.as_response().unwrap();
        assert!(resp.is_provisional());
        assert_eq!(resp.to().unwrap().tag(), Some("a6c85cf"));
    }

    #[test]
    fn test_comma_joined_via_splits() {
        let text = "OPTIONS sip:carol@chicago.com SIP/2.0\r\n\
            Via: SIP/2.0/UDP a.example.com;branch=z9hG4bK1, SIP/2.0/UDP b.example.com;branch=z9hG4bK2\r\n\
            \r\n";
        let msg = parse_message(text).unwrap();
        let vias = msg.vias();
        assert_eq!(vias.len(), 2);
        assert_eq!(vias[0].host, "a.example.com");
        assert_eq!(vias[1].host, "b.example.com");
    }

    #[test]
    fn test_display_name_comma_survives() {
        let text = "OPTIONS sip:carol@chicago.com SIP/2.0\r\n\
            Contact: \"Doe, Jane\" <sip:jane@example.com>\r\n\
            \r\n";
        let msg = parse_message(text).unwrap();
        let entry = msg.header(&HeaderName::Contact).unwrap();
        assert_eq!(entry.len(), 1);
    }

    #[test]
    fn test_folded_header() {
        let text = "OPTIONS sip:carol@chicago.com SIP/2.0\r\n\
            Subject: I know you're there,\r\n\
            \tpick up the phone\r\n\
            \r\n";
        let msg = parse_message(text).unwrap();
        let entry = msg.header(&HeaderName::Subject).unwrap();
        let value = entry.first().unwrap().value_string();
        assert!(value.contains("pick up the phone"));
    }

    #[test]
    fn test_bad_header_quarantined() {
        let text = "OPTIONS sip:carol@chicago.com SIP/2.0\r\n\
            CSeq: not a number\r\n\
            Max-Forwards: 70\r\n\
            \r\n";
        let msg = parse_message(text).unwrap();
        assert_eq!(msg.unrecognized().len(), 1);
        assert!(msg.cseq().is_none());
        assert!(msg.header(&HeaderName::MaxForwards).is_some());
    }

    #[test]
    fn test_duplicate_singleton_quarantined() {
        let text = "OPTIONS sip:carol@chicago.com SIP/2.0\r\n\
            Call-ID: first@host\r\n\
            Call-ID: second@host\r\n\
            \r\n";
        let msg = parse_message(text).unwrap();
        assert_eq!(msg.call_id().unwrap().as_str(), "first@host");
        assert_eq!(msg.unrecognized().len(), 1);
    }

    #[test]
    fn test_bad_first_line_is_fatal() {
        assert!(parse_message("NOT A SIP MESSAGE\r\n\r\n").is_err());
        assert!(parse_message("").is_err());
    }
}
