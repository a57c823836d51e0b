//! Compact framing codec for point-to-point binary messaging over
//! byte-oriented links (typically a UART).
//!
//! Every message is framed as:
//!
//! ```text
//! ,------+----+-----+------+------------+- - - - -+------------,
//! | SOF? | ID | LEN | TYPE | HEAD_CKSUM | PAYLOAD | PLD_CKSUM  |
//! '------+----+-----+------+------------+- - - - -+------------'
//! ```
//!
//! Field widths, the checksum algorithm and the SOF sentinel are all
//! configurable; both ends of a link must agree on them. On top of the
//! wire format the engine provides:
//!
//! - a receive parser that reassembles frames from arbitrary chunking and
//!   silently discards corrupted ones,
//! - request/response correlation via frame IDs with a peer bit that keeps
//!   the two endpoints' allocations disjoint,
//! - listener dispatch in fixed priority order (ID, then type, then
//!   catch-all),
//! - tick-driven expiry of waiting listeners and a watchdog that reclaims
//!   stalled parses.
//!
//! One [`TinyFrame`] value per link endpoint; the host serializes all
//! calls and supplies the byte sink and the tick source.
//!
//! ```
//! use tinyframe::{Msg, Peer, TinyFrame};
//!
//! fn on_reply(_tf: &mut TinyFrame<Vec<u8>>, msg: &mut Msg) -> bool {
//!     println!("reply: {:?}", msg.payload_bytes());
//!     true
//! }
//!
//! let mut tf = TinyFrame::new(Vec::new(), Peer::Master);
//! let mut msg = Msg::new(0x22, &b"hello"[..]);
//! tf.send_with_listener(&mut msg, on_reply, 10).unwrap();
//! ```

mod checksum;
mod codec;
mod config;
mod engine;
mod error;
mod listener;
mod msg;
mod parser;

pub use checksum::ChecksumKind;
pub use config::{Config, Peer};
pub use engine::{Listener, TinyFrame};
pub use error::{Error, Result};
pub use msg::Msg;
