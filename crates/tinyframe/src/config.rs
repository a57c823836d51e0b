//! Engine configuration.
//!
//! Everything that affects the wire (field widths, checksum kind, SOF) must
//! match on both ends of the link; capacities and timeouts are local.

use crate::checksum::ChecksumKind;
use crate::error::{Error, Result};

/// Which end of the link this engine is.
///
/// The role fixes the peer bit (the most significant bit of the ID field)
/// in locally allocated frame IDs, so concurrent allocations on both ends
/// can never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peer {
    /// Allocates IDs with the peer bit clear.
    Slave,
    /// Allocates IDs with the peer bit set.
    Master,
}

/// Wire-format and capacity configuration.
///
/// The defaults mirror a typical UART deployment: 1-byte ID, 2-byte length,
/// 1-byte type, CRC-16, SOF byte `0x01`, 1 KiB payloads.
#[derive(Debug, Clone)]
pub struct Config {
    /// Width of the frame ID field in bytes (1, 2 or 4).
    pub id_bytes: usize,
    /// Width of the payload length field in bytes (1, 2 or 4).
    pub len_bytes: usize,
    /// Width of the message type field in bytes (1, 2 or 4).
    pub type_bytes: usize,
    /// Integrity algorithm for the header and payload checksum fields.
    pub checksum: ChecksumKind,
    /// Whether a start-of-frame sentinel byte precedes every frame.
    pub use_sof: bool,
    /// Value of the sentinel byte when `use_sof` is set.
    pub sof_byte: u8,
    /// Largest payload the receive parser accepts.
    pub max_payload_rx: usize,
    /// Largest payload the send path produces.
    pub max_payload_tx: usize,
    /// Capacity of the frame-ID listener table.
    pub max_id_listeners: usize,
    /// Capacity of the type listener table.
    pub max_type_listeners: usize,
    /// Capacity of the generic listener table.
    pub max_generic_listeners: usize,
    /// Ticks without a received byte before a partial parse is abandoned.
    pub parser_timeout_ticks: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_bytes: 1,
            len_bytes: 2,
            type_bytes: 1,
            checksum: ChecksumKind::Crc16,
            use_sof: true,
            sof_byte: 0x01,
            max_payload_rx: 1024,
            max_payload_tx: 1024,
            max_id_listeners: 20,
            max_type_listeners: 20,
            max_generic_listeners: 4,
            parser_timeout_ticks: 10,
        }
    }
}

impl Config {
    /// Fixed per-frame overhead: everything on the wire except the payload.
    pub fn overhead_bytes(&self) -> usize {
        self.header_bytes() + 2 * self.checksum.width()
    }

    /// Header length: optional SOF plus the ID, LEN and TYPE fields.
    pub(crate) fn header_bytes(&self) -> usize {
        usize::from(self.use_sof) + self.id_bytes + self.len_bytes + self.type_bytes
    }

    /// The peer bit for the configured ID width.
    pub(crate) fn peer_bit(&self) -> u32 {
        1u32 << (self.id_bytes * 8 - 1)
    }

    /// Mask selecting the ID bits below the peer bit.
    pub(crate) fn id_mask(&self) -> u32 {
        self.peer_bit() - 1
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let widths = [
            ("id_bytes", self.id_bytes),
            ("len_bytes", self.len_bytes),
            ("type_bytes", self.type_bytes),
        ];
        for (name, width) in widths {
            if !matches!(width, 1 | 2 | 4) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be 1, 2 or 4, got {width}"
                )));
            }
        }

        let capacities = [
            ("max_payload_rx", self.max_payload_rx),
            ("max_payload_tx", self.max_payload_tx),
            ("max_id_listeners", self.max_id_listeners),
            ("max_type_listeners", self.max_type_listeners),
            ("max_generic_listeners", self.max_generic_listeners),
        ];
        for (name, value) in capacities {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("{name} must be positive")));
            }
        }

        // Both payload bounds must be announceable in the LEN field.
        let len_max = field_max(self.len_bytes);
        for (name, value) in [
            ("max_payload_rx", self.max_payload_rx),
            ("max_payload_tx", self.max_payload_tx),
        ] {
            if value as u64 > len_max {
                return Err(Error::InvalidConfig(format!(
                    "{name} ({value}) does not fit a {}-byte length field",
                    self.len_bytes
                )));
            }
        }

        Ok(())
    }
}

impl Peer {
    /// The value this role contributes to the ID field's peer bit.
    pub(crate) fn bit(self, config: &Config) -> u32 {
        match self {
            Peer::Slave => 0,
            Peer::Master => config.peer_bit(),
        }
    }
}

/// Largest value representable in a big-endian field of `width` bytes.
fn field_max(width: usize) -> u64 {
    (1u64 << (width * 8)) - 1
}
