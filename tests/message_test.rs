use proptest::prelude::*;

use sip_msg_core::prelude::*;
use sip_msg_core::types::from::From as FromHeader;

fn base_request() -> Request {
    let mut req = Request::new(Method::Invite, Uri::sip("biloxi.com").with_user("bob"));
    let mut alice = Address::from_uri(Uri::sip("atlanta.com").with_user("alice"));
    alice.set_tag("1928301774");
    req.attach(TypedHeader::From(FromHeader::new(alice)), false, false)
        .unwrap();
    req.attach(
        TypedHeader::To(To::new(Address::from_uri(
            Uri::sip("biloxi.com").with_user("bob"),
        ))),
        false,
        false,
    )
    .unwrap();
    req.attach(
        TypedHeader::CallId(CallId::new("a84b4c76e66710@pc33.atlanta.com")),
        false,
        false,
    )
    .unwrap();
    req.attach(
        TypedHeader::CSeq(CSeq::new(314159, Method::Invite)),
        false,
        false,
    )
    .unwrap();
    req.attach(
        TypedHeader::Via(Via::new("udp", "pc33.atlanta.com", None).with_branch("z9hG4bK776asdhds")),
        false,
        false,
    )
    .unwrap();
    req
}

#[test]
fn singleton_duplicate_is_rejected_and_state_unchanged() {
    let mut req = base_request();
    let before = req.encode().text;
    let err = req
        .attach(TypedHeader::CallId(CallId::new("other@host")), false, false)
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateHeader(HeaderName::CallId)));
    assert_eq!(req.encode().text, before);
}

#[test]
fn replace_reinstalls_at_requested_position() {
    let mut req = base_request();
    req.attach(TypedHeader::CallId(CallId::new("moved@host")), true, true)
        .unwrap();
    assert_eq!(req.headers()[0].name(), HeaderName::CallId);
    assert_eq!(req.call_id().unwrap().as_str(), "moved@host");

    req.attach(TypedHeader::CallId(CallId::new("end@host")), true, false)
        .unwrap();
    assert_eq!(req.headers().last().unwrap().name(), HeaderName::CallId);
}

#[test]
fn list_headers_accumulate_in_one_entry() {
    let mut req = base_request();
    req.attach(
        TypedHeader::Via(Via::new("udp", "proxy1.example.com", None)),
        false,
        true,
    )
    .unwrap();
    req.attach(
        TypedHeader::Via(Via::new("udp", "proxy2.example.com", None)),
        false,
        true,
    )
    .unwrap();

    let entry = req.header(&HeaderName::Via).unwrap();
    assert_eq!(entry.len(), 3);
    let vias = req.vias();
    assert_eq!(vias[0].host, "proxy2.example.com");
    assert_eq!(vias[1].host, "proxy1.example.com");
    assert_eq!(vias[2].host, "pc33.atlanta.com");
}

#[test]
fn remove_header_end_pops_one_hop() {
    let mut req = base_request();
    req.attach(
        TypedHeader::Via(Via::new("udp", "proxy.example.com", None)),
        false,
        true,
    )
    .unwrap();

    req.remove_header_end(&HeaderName::Via, true);
    assert_eq!(req.top_via().unwrap().host, "pc33.atlanta.com");
    req.remove_header_end(&HeaderName::Via, false);
    assert!(!req.has_header(&HeaderName::Via));
}

#[test]
fn set_content_resyncs_existing_content_length() {
    let mut req = base_request();
    // no Content-Length yet: set_content must not invent one
    req.set_content(Body::text("v=0"), ContentType::application_sdp())
        .unwrap();
    assert!(req.content_length().is_none());

    req.attach(TypedHeader::ContentLength(ContentLength(0)), false, false)
        .unwrap();
    req.set_content(Body::text("hello"), ContentType::text_plain())
        .unwrap();
    assert_eq!(req.content_length().unwrap(), ContentLength(5));
    assert_eq!(
        req.content_type().unwrap().to_string(),
        "text/plain"
    );
}

#[test]
fn raw_body_uses_content_type_charset() {
    let mut req = base_request();
    req.set_content(
        Body::text("héllo"),
        ContentType::text_plain().with_parameter("charset", "ISO-8859-1"),
    )
    .unwrap();
    let bytes = req.raw_body().unwrap();
    assert_eq!(&bytes[..], &[b'h', 0xE9, b'l', b'l', b'o']);
}

#[test]
fn encode_bytes_computes_exact_content_length() {
    let mut req = base_request();
    // stored Content-Length is stale on purpose
    req.attach(TypedHeader::ContentLength(ContentLength(999)), false, false)
        .unwrap();
    req.set_body(Some(Body::text("v=0\r\n")));
    let bytes = req.encode_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("Content-Length: 5\r\n"));
    assert!(!text.contains("999"));
    assert!(text.ends_with("\r\n\r\nv=0\r\n"));
}

#[test]
fn undecodable_raw_body_sets_flag_but_keeps_headers() {
    let mut req = base_request();
    req.set_body(Some(Body::raw(vec![0x80u8, 0x81, 0x82])));
    let encoded = req.encode();
    assert!(encoded.body_omitted);
    assert!(encoded.text.contains("Call-ID:"));
    // the byte rendition is still faithful
    assert!(req.encode_bytes().ends_with(&[0x80, 0x81, 0x82]));
}

// Property: whatever sequence of attach/remove operations runs, the name
// index and the entry sequence stay coherent.

#[derive(Debug, Clone)]
enum Op {
    Attach {
        which: u8,
        replace: bool,
        at_top: bool,
    },
    RemoveWhole {
        which: u8,
    },
    RemoveEnd {
        which: u8,
        top: bool,
    },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..4, any::<bool>(), any::<bool>()).prop_map(|(which, replace, at_top)| Op::Attach {
            which,
            replace,
            at_top
        }),
        (0u8..4).prop_map(|which| Op::RemoveWhole { which }),
        (0u8..4, any::<bool>()).prop_map(|(which, top)| Op::RemoveEnd { which, top }),
    ]
}

fn header_for(which: u8, n: usize) -> TypedHeader {
    match which {
        0 => TypedHeader::CallId(CallId::new(format!("id{n}@host"))),
        1 => TypedHeader::MaxForwards(MaxForwards((n % 70) as u8)),
        2 => TypedHeader::Via(Via::new("udp", format!("h{n}.example.com"), None)),
        _ => TypedHeader::Route(Route::new(Address::from_uri(Uri::sip(format!(
            "r{n}.example.com"
        ))))),
    }
}

fn name_for(which: u8) -> HeaderName {
    match which {
        0 => HeaderName::CallId,
        1 => HeaderName::MaxForwards,
        2 => HeaderName::Via,
        _ => HeaderName::Route,
    }
}

proptest! {
    #[test]
    fn index_and_sequence_stay_coherent(ops in proptest::collection::vec(op_strategy(), 1..40)) {
        let mut msg = SipMessage::new();
        for (n, op) in ops.into_iter().enumerate() {
            match op {
                Op::Attach { which, replace, at_top } => {
                    // duplicate-singleton errors are part of the contract
                    let _ = msg.attach(header_for(which, n), replace, at_top);
                }
                Op::RemoveWhole { which } => msg.remove_header(&name_for(which)),
                Op::RemoveEnd { which, top } => msg.remove_header_end(&name_for(which), top),
            }

            // one entry per name
            let mut seen = std::collections::HashSet::new();
            for entry in msg.headers() {
                prop_assert!(seen.insert(entry.name()), "duplicate entry for {}", entry.name());
                prop_assert!(!entry.is_empty(), "empty entry stored for {}", entry.name());
                // index resolves every entry back to itself
                let found = msg.header(&entry.name());
                prop_assert!(found.is_some());
                prop_assert_eq!(found.unwrap().name(), entry.name());
            }
        }
    }
}
