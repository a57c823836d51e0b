//! The framing engine: one [`TinyFrame`] value per link endpoint.
//!
//! Incoming bytes go through [`TinyFrame::accept`]; completed frames are
//! dispatched to listeners in fixed priority order (ID, then type, then
//! generic). Outgoing messages go through [`TinyFrame::send`] /
//! [`TinyFrame::respond`], which serialize into an internal buffer and
//! emit to the sink in one write.
//!
//! The engine is single-threaded: the host serializes all calls. Listener
//! callbacks run inline and may re-enter the engine (send, register or
//! remove listeners).

use std::any::Any;
use std::io::Write;

use bytes::BytesMut;

use crate::codec;
use crate::config::{Config, Peer};
use crate::error::{Error, Result};
use crate::listener::{IdSlot, Listeners};
use crate::msg::Msg;
use crate::parser::{Parser, RawFrame};

/// Listener callback.
///
/// Return `true` to consume the frame and stop dispatch. Callbacks are
/// plain function pointers so the generic table can deduplicate and remove
/// by callback identity; per-registration state travels in the ID
/// listener's `user_data` instead of captures.
pub type Listener<W> = fn(&mut TinyFrame<W>, &mut Msg) -> bool;

/// The framing engine.
///
/// Generic over the byte sink, any [`Write`]: a serial port handle, a
/// socket, or a `Vec<u8>` in tests. Two engines on different links are
/// fully independent.
pub struct TinyFrame<W: Write> {
    config: Config,
    peer: Peer,
    sink: W,
    parser: Parser,
    listeners: Listeners<Listener<W>>,
    next_id: u32,
    tx: BytesMut,
}

impl<W: Write> TinyFrame<W> {
    /// Engine with the default wire configuration.
    pub fn new(sink: W, peer: Peer) -> Self {
        Self::with_config(sink, peer, Config::default()).expect("default config is valid")
    }

    /// Engine with an explicit configuration.
    ///
    /// Fails with [`Error::InvalidConfig`] when the configuration violates
    /// a wire-format or capacity constraint.
    pub fn with_config(sink: W, peer: Peer, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            parser: Parser::new(&config),
            listeners: Listeners::new(&config),
            tx: BytesMut::with_capacity(config.overhead_bytes() + config.max_payload_tx),
            config,
            peer,
            sink,
            next_id: 0,
        })
    }

    /// The wire and capacity configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// This endpoint's role on the link.
    pub fn peer(&self) -> Peer {
        self.peer
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Consume the engine and return the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// True while a partial frame sits in the receive parser.
    pub fn parse_in_flight(&self) -> bool {
        !self.parser.is_idle()
    }

    /// Reinitialize the engine: parser to its initial state, all listener
    /// tables emptied, ID counter zeroed. Sink and configuration are kept.
    pub fn reset(&mut self) {
        self.parser.reset(&self.config);
        self.listeners.clear();
        self.next_id = 0;
    }

    /// Abandon any in-flight parse. Registered listeners are unaffected.
    pub fn reset_parser(&mut self) {
        self.parser.reset(&self.config);
    }

    // --- Listener registration -------------------------------------------

    /// Wait for a frame carrying `frame_id`.
    ///
    /// `timeout` is in ticks; 0 waits forever. On expiry the callback is
    /// invoked once with a payload-less message carrying `user_data` back,
    /// and the slot is freed.
    pub fn add_id_listener(
        &mut self,
        frame_id: u32,
        cb: Listener<W>,
        user_data: Option<Box<dyn Any>>,
        timeout: u16,
    ) -> Result<()> {
        self.listeners.add_id(IdSlot {
            id: frame_id,
            cb,
            user_data,
            remaining: timeout,
            period: timeout,
        })
    }

    /// Free the listener waiting on `frame_id`.
    pub fn remove_id_listener(&mut self, frame_id: u32) -> Result<()> {
        self.listeners.remove_id(frame_id)
    }

    /// Restart the expiry countdown of the listener waiting on `frame_id`.
    pub fn renew_id_listener(&mut self, frame_id: u32) -> Result<()> {
        self.listeners.renew_id(frame_id)
    }

    /// Wait for frames carrying `frame_type`. Type listeners do not expire
    /// and are not removed by dispatch.
    pub fn add_type_listener(&mut self, frame_type: u32, cb: Listener<W>) -> Result<()> {
        self.listeners.add_type(frame_type, cb)
    }

    pub fn remove_type_listener(&mut self, frame_type: u32) -> Result<()> {
        self.listeners.remove_type(frame_type)
    }

    /// Catch-all listener, consulted when no ID or type listener consumed
    /// the frame.
    pub fn add_generic_listener(&mut self, cb: Listener<W>) -> Result<()> {
        self.listeners.add_generic(cb)
    }

    pub fn remove_generic_listener(&mut self, cb: Listener<W>) -> Result<()> {
        self.listeners.remove_generic(cb)
    }

    // --- Transmit --------------------------------------------------------

    /// Send a message.
    ///
    /// A non-response gets a freshly allocated frame ID, written back into
    /// `msg.frame_id` for correlation.
    pub fn send(&mut self, msg: &mut Msg) -> Result<()> {
        self.send_internal(msg, None, 0)
    }

    /// Send a message and register `cb` as an ID listener for the reply.
    ///
    /// `timeout` is in ticks; 0 waits forever. `msg.user_data` moves into
    /// the listener slot. When the ID table is full the whole send fails
    /// and nothing is emitted.
    pub fn send_with_listener(
        &mut self,
        msg: &mut Msg,
        cb: Listener<W>,
        timeout: u16,
    ) -> Result<()> {
        self.send_internal(msg, Some(cb), timeout)
    }

    /// Send a response to a received message, keeping its frame ID.
    ///
    /// With `renew`, a listener still waiting on that ID gets a fresh
    /// timeout (multi-part exchanges).
    pub fn respond(&mut self, msg: &mut Msg, renew: bool) -> Result<()> {
        msg.is_response = true;
        if renew {
            // Nothing waiting on the ID is fine; the responder cannot know
            // whether the requester's listener already fired.
            let _ = self.listeners.renew_id(msg.frame_id);
        }
        self.send_internal(msg, None, 0)
    }

    fn send_internal(
        &mut self,
        msg: &mut Msg,
        reply_listener: Option<Listener<W>>,
        timeout: u16,
    ) -> Result<()> {
        let payload_len = msg.payload_bytes().len();
        if payload_len > self.config.max_payload_tx {
            return Err(Error::PayloadTooLarge {
                size: payload_len,
                max: self.config.max_payload_tx,
            });
        }

        if !msg.is_response {
            msg.frame_id = self.alloc_frame_id();
        }

        if let Some(cb) = reply_listener {
            self.listeners.add_id(IdSlot {
                id: msg.frame_id,
                cb,
                user_data: msg.user_data.take(),
                remaining: timeout,
                period: timeout,
            })?;
        }

        self.tx.clear();
        codec::encode_frame(
            &self.config,
            msg.frame_id,
            msg.frame_type,
            msg.payload_bytes(),
            &mut self.tx,
        )?;
        self.sink.write_all(&self.tx)?;
        self.sink.flush()?;
        Ok(())
    }

    /// Next outbound frame ID: counter bits below the peer bit, peer bit
    /// forced to this endpoint's role.
    fn alloc_frame_id(&mut self) -> u32 {
        let id = (self.next_id & self.config.id_mask()) | self.peer.bit(&self.config);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    // --- Receive ---------------------------------------------------------

    /// Feed received bytes into the parser. Completed frames dispatch
    /// inline, before the next byte is consumed.
    pub fn accept(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.accept_byte(byte);
        }
    }

    /// Feed a single received byte.
    pub fn accept_byte(&mut self, byte: u8) {
        if let Some(frame) = self.parser.accept(&self.config, byte) {
            self.dispatch(frame);
        }
    }

    fn dispatch(&mut self, frame: RawFrame) {
        let mut msg = Msg {
            frame_id: frame.frame_id,
            frame_type: frame.frame_type,
            payload: Some(frame.payload),
            is_response: false,
            user_data: None,
        };

        // ID listeners are one-shot: the slot is freed before the callback
        // runs, whether or not it consumes.
        if let Some(slot) = self.listeners.take_id_match(msg.frame_id) {
            msg.user_data = slot.user_data;
            if (slot.cb)(self, &mut msg) {
                return;
            }
        }

        // Callbacks may mutate the tables; iterate by index, re-check
        // occupancy, and copy the callback out before invoking. Active
        // types are unique, so at most one type slot can match; if it
        // declines, the frame falls through to the generic tier.
        for i in 0..self.listeners.by_type.len() {
            let Some(slot) = &self.listeners.by_type[i] else {
                continue;
            };
            if slot.frame_type != msg.frame_type {
                continue;
            }
            let cb = slot.cb;
            if cb(self, &mut msg) {
                return;
            }
            break;
        }

        for i in 0..self.listeners.generic.len() {
            let Some(slot) = &self.listeners.generic[i] else {
                continue;
            };
            let cb = slot.cb;
            if cb(self, &mut msg) {
                return;
            }
        }
        // Nothing consumed the frame: drop it.
    }

    // --- Time base -------------------------------------------------------

    /// Advance the engine's time base by one tick: age ID-listener
    /// timeouts and the parser watchdog.
    pub fn tick(&mut self) {
        for i in 0..self.listeners.id.len() {
            let expired = match &mut self.listeners.id[i] {
                Some(slot) if slot.period != 0 => {
                    slot.remaining -= 1;
                    slot.remaining == 0
                }
                _ => false,
            };
            if !expired {
                continue;
            }
            let Some(slot) = self.listeners.id[i].take() else {
                continue;
            };
            let mut msg = Msg {
                frame_id: slot.id,
                frame_type: 0,
                payload: None,
                is_response: false,
                user_data: slot.user_data,
            };
            // The expired slot is already freed; the return value cannot
            // change that.
            let _ = (slot.cb)(self, &mut msg);
        }

        self.parser.tick(&self.config);
    }
}
