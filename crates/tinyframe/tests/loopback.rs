//! Two engines wired back to back: a master issuing queries and a slave
//! answering them, with the "link" being each engine's captured sink.

use std::cell::RefCell;

use tinyframe::{ChecksumKind, Config, Msg, Peer, TinyFrame};

type Tf = TinyFrame<Vec<u8>>;

thread_local! {
    static REPLIES: RefCell<Vec<(u32, Vec<u8>)>> = RefCell::new(Vec::new());
    static TIMEOUTS: RefCell<u32> = RefCell::new(0);
}

/// Move everything one engine has emitted into the other engine's parser.
fn pump(from: &mut Tf, to: &mut Tf) {
    let bytes = std::mem::take(from.get_mut());
    to.accept(&bytes);
}

/// Slave-side handler: echo the payload back on the same frame ID.
fn echo_handler(tf: &mut Tf, msg: &mut Msg) -> bool {
    let mut reply = Msg::new(msg.frame_type, msg.payload.clone().unwrap_or_default());
    reply.frame_id = msg.frame_id;
    tf.respond(&mut reply, false).expect("respond should succeed");
    true
}

/// Master-side reply listener.
fn reply_listener(_tf: &mut Tf, msg: &mut Msg) -> bool {
    if msg.is_timeout() {
        TIMEOUTS.with(|t| *t.borrow_mut() += 1);
        return true;
    }
    REPLIES.with(|r| {
        r.borrow_mut()
            .push((msg.frame_id, msg.payload_bytes().to_vec()))
    });
    true
}

fn pair() -> (Tf, Tf) {
    (
        TinyFrame::new(Vec::new(), Peer::Master),
        TinyFrame::new(Vec::new(), Peer::Slave),
    )
}

#[test]
fn query_and_response_roundtrip() {
    let (mut master, mut slave) = pair();
    slave.add_type_listener(0x22, echo_handler).unwrap();

    let mut query = Msg::new(0x22, &b"ping"[..]);
    master
        .send_with_listener(&mut query, reply_listener, 10)
        .unwrap();

    pump(&mut master, &mut slave);
    pump(&mut slave, &mut master);

    REPLIES.with(|r| {
        assert_eq!(r.borrow().as_slice(), &[(0x80, b"ping".to_vec())]);
    });
    TIMEOUTS.with(|t| assert_eq!(*t.borrow(), 0));
}

#[test]
fn several_queries_in_flight_resolve_by_id() {
    let (mut master, mut slave) = pair();
    slave.add_type_listener(0x22, echo_handler).unwrap();

    let mut first = Msg::new(0x22, &b"one"[..]);
    let mut second = Msg::new(0x22, &b"two"[..]);
    let mut third = Msg::new(0x22, &b"three"[..]);
    master.send_with_listener(&mut first, reply_listener, 10).unwrap();
    master.send_with_listener(&mut second, reply_listener, 10).unwrap();
    master.send_with_listener(&mut third, reply_listener, 10).unwrap();

    pump(&mut master, &mut slave);
    pump(&mut slave, &mut master);

    REPLIES.with(|r| {
        assert_eq!(
            r.borrow().as_slice(),
            &[
                (0x80, b"one".to_vec()),
                (0x81, b"two".to_vec()),
                (0x82, b"three".to_vec()),
            ]
        );
    });
}

#[test]
fn unanswered_query_times_out() {
    let (mut master, _slave) = pair();

    let mut query = Msg::new(0x22, &b"anyone?"[..]);
    master
        .send_with_listener(&mut query, reply_listener, 3)
        .unwrap();

    for _ in 0..3 {
        master.tick();
    }

    TIMEOUTS.with(|t| assert_eq!(*t.borrow(), 1));
    REPLIES.with(|r| assert!(r.borrow().is_empty()));
}

#[test]
fn corrupted_link_drops_the_frame_but_not_the_session() {
    let (mut master, mut slave) = pair();
    slave.add_type_listener(0x22, echo_handler).unwrap();

    let mut query = Msg::new(0x22, &b"first"[..]);
    master
        .send_with_listener(&mut query, reply_listener, 10)
        .unwrap();

    // Corrupt one payload byte in transit.
    let mut bytes = std::mem::take(master.get_mut());
    bytes[7] ^= 0xFF;
    slave.accept(&bytes);

    // The slave never answered; a clean retry still works.
    REPLIES.with(|r| assert!(r.borrow().is_empty()));

    let mut retry = Msg::new(0x22, &b"second"[..]);
    master
        .send_with_listener(&mut retry, reply_listener, 10)
        .unwrap();
    pump(&mut master, &mut slave);
    pump(&mut slave, &mut master);

    REPLIES.with(|r| {
        assert_eq!(r.borrow().as_slice(), &[(0x81, b"second".to_vec())]);
    });
}

#[test]
fn byte_oriented_link_with_interleaved_ticks() {
    let (mut master, mut slave) = pair();
    slave.add_type_listener(0x22, echo_handler).unwrap();

    let mut query = Msg::new(0x22, &b"trickle"[..]);
    master
        .send_with_listener(&mut query, reply_listener, 1000)
        .unwrap();

    // Deliver the query one byte per "time slot", ticking both engines.
    let bytes = std::mem::take(master.get_mut());
    for &byte in &bytes {
        slave.accept_byte(byte);
        master.tick();
        slave.tick();
    }
    pump(&mut slave, &mut master);

    REPLIES.with(|r| {
        assert_eq!(r.borrow().as_slice(), &[(0x80, b"trickle".to_vec())]);
    });
}

#[test]
fn both_ends_must_share_the_wire_configuration() {
    // A CRC-32 sender against a CRC-16 receiver: every frame is rejected.
    let mut sender = TinyFrame::with_config(
        Vec::new(),
        Peer::Master,
        Config {
            checksum: ChecksumKind::Crc32,
            ..Config::default()
        },
    )
    .unwrap();
    let mut receiver = TinyFrame::new(Vec::new(), Peer::Slave);
    receiver.add_generic_listener(reply_listener).unwrap();

    let mut msg = Msg::new(0x22, &b"mismatched"[..]);
    sender.send(&mut msg).unwrap();
    let bytes = std::mem::take(sender.get_mut());
    receiver.accept(&bytes);

    REPLIES.with(|r| assert!(r.borrow().is_empty()));
}
