use sip_msg_core::prelude::*;

fn assert_stable(text: &str) {
    let first = parse_message(text).unwrap();
    let encoded = first.encode();
    assert!(!encoded.body_omitted);

    let second = parse_message(&encoded.text).unwrap();
    let reencoded = second.encode();
    assert_eq!(encoded.text, reencoded.text);
}

#[test]
fn invite_with_body_is_stable() {
    assert_stable(
        "INVITE sip:bob@biloxi.com SIP/2.0\r\n\
         Via: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776asdhds\r\n\
         Max-Forwards: 70\r\n\
         To: Bob <sip:bob@biloxi.com>\r\n\
         From: Alice <sip:alice@atlanta.com>;tag=1928301774\r\n\
         Call-ID: a84b4c76e66710@pc33.atlanta.com\r\n\
         CSeq: 314159 INVITE\r\n\
         Contact: <sip:alice@pc33.atlanta.com>\r\n\
         Content-Type: application/sdp\r\n\
         Content-Length: 4\r\n\
         \r\n\
         v=0\r\n",
    );
}

#[test]
fn response_with_record_route_is_stable() {
    assert_stable(
        "SIP/2.0 200 OK\r\n\
         Via: SIP/2.0/UDP server10.biloxi.com;branch=z9hG4bKnashds8\r\n\
         Via: SIP/2.0/UDP bigbox3.site3.atlanta.com;branch=z9hG4bK77ef4c2312983.1\r\n\
         Record-Route: <sip:rr1.example.com;lr>\r\n\
         Record-Route: <sip:rr2.example.com;lr>\r\n\
         To: Bob <sip:bob@biloxi.com>;tag=a6c85cf\r\n\
         From: Alice <sip:alice@atlanta.com>;tag=1928301774\r\n\
         Call-ID: a84b4c76e66710@pc33.atlanta.com\r\n\
         CSeq: 314159 INVITE\r\n\
         \r\n",
    );
}

#[test]
fn extension_headers_are_stable() {
    assert_stable(
        "OPTIONS sip:carol@chicago.com SIP/2.0\r\n\
         Via: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bKhjhs8ass877\r\n\
         To: <sip:carol@chicago.com>\r\n\
         From: <sip:alice@atlanta.com>;tag=1928301774\r\n\
         Call-ID: a84b4c76e66710\r\n\
         CSeq: 63104 OPTIONS\r\n\
         x-debug-token: 4711\r\n\
         \r\n",
    );
}

#[test]
fn derived_cancel_survives_the_wire() {
    let text = "INVITE sip:bob@biloxi.com SIP/2.0\r\n\
        Via: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776asdhds\r\n\
        To: Bob <sip:bob@biloxi.com>\r\n\
        From: Alice <sip:alice@atlanta.com>;tag=1928301774\r\n\
        Call-ID: a84b4c76e66710@pc33.atlanta.com\r\n\
        CSeq: 314159 INVITE\r\n\
        \r\n";
    let req = match parse_message(text).unwrap() {
        Message::Request(r) => r,
        _ => unreachable!(),
    };

    let cancel = req.create_cancel_request().unwrap();
    let reparsed = match parse_message(&cancel.encode().text).unwrap() {
        Message::Request(r) => r,
        _ => unreachable!(),
    };
    assert_eq!(reparsed.cseq().unwrap().to_string(), "314159 CANCEL");
    assert_eq!(
        reparsed.transaction_id().unwrap(),
        req.transaction_id().unwrap()
    );
    assert_eq!(cancel.encode().text, reparsed.encode().text);
}

#[test]
fn encode_bytes_round_trips_through_text() {
    let text = "MESSAGE sip:bob@biloxi.com SIP/2.0\r\n\
        Via: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776x\r\n\
        To: <sip:bob@biloxi.com>\r\n\
        From: <sip:alice@atlanta.com>;tag=49583\r\n\
        Call-ID: asd88asd77a@1.2.3.4\r\n\
        CSeq: 1 MESSAGE\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        Watson, come here.";
    let msg = parse_message(text).unwrap();
    let bytes = msg.encode_bytes();
    let as_text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(as_text.contains("Content-Length: 18\r\n"));

    let reparsed = parse_message(&as_text).unwrap();
    assert_eq!(
        reparsed.body().unwrap().as_text().as_deref(),
        Some("Watson, come here.")
    );
    assert_eq!(reparsed.encode_bytes(), msg.encode_bytes());
}
