//! Request/reply between two engines in one process.
//!
//! The master sends a query and waits for the answer with an ID listener;
//! the slave answers from a type listener. The "UART" is a pair of byte
//! vectors shuttled between the engines.
//!
//! Run with:
//!   cargo run --example request-reply

use tinyframe::{Msg, Peer, TinyFrame};

const MSG_PING: u32 = 0x22;

type Tf = TinyFrame<Vec<u8>>;

fn handle_ping(tf: &mut Tf, msg: &mut Msg) -> bool {
    println!(
        "slave:  ping {:02X} with {:?}",
        msg.frame_id,
        String::from_utf8_lossy(msg.payload_bytes())
    );
    let mut reply = Msg::new(MSG_PING, &b"pong"[..]);
    reply.frame_id = msg.frame_id;
    tf.respond(&mut reply, false).expect("respond should succeed");
    true
}

fn handle_reply(_tf: &mut Tf, msg: &mut Msg) -> bool {
    if msg.is_timeout() {
        println!("master: query {:02X} timed out", msg.frame_id);
    } else {
        println!(
            "master: reply {:02X} with {:?}",
            msg.frame_id,
            String::from_utf8_lossy(msg.payload_bytes())
        );
    }
    true
}

fn main() {
    let mut master = TinyFrame::new(Vec::new(), Peer::Master);
    let mut slave = TinyFrame::new(Vec::new(), Peer::Slave);

    slave
        .add_type_listener(MSG_PING, handle_ping)
        .expect("type table has room");

    let mut query = Msg::new(MSG_PING, &b"ping"[..]);
    master
        .send_with_listener(&mut query, handle_reply, 10)
        .expect("send should succeed");
    println!("master: query {:02X} sent", query.frame_id);

    // Shuttle the bytes across the "link" in both directions.
    let downlink = std::mem::take(master.get_mut());
    slave.accept(&downlink);
    let uplink = std::mem::take(slave.get_mut());
    master.accept(&uplink);

    // A second query that nobody answers, driven to expiry by the tick.
    let mut lost = Msg::new(MSG_PING, &b"ping"[..]);
    master
        .send_with_listener(&mut lost, handle_reply, 10)
        .expect("send should succeed");
    master.get_mut().clear(); // drop the bytes on the floor
    for _ in 0..10 {
        master.tick();
    }
}
