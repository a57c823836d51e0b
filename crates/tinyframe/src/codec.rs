//! Wire-format serialization.
//!
//! Frame layout, all multi-byte fields big-endian:
//!
//! ```text
//! ,------+----+-----+------+------------+- - - - -+------------,
//! | SOF? | ID | LEN | TYPE | HEAD_CKSUM | PAYLOAD | PLD_CKSUM  |
//! '------+----+-----+------+------------+- - - - -+------------'
//! ```
//!
//! The header checksum covers `[SOF?][ID][LEN][TYPE]` exactly as they
//! appear on the wire; the payload checksum covers the payload bytes.
//! With [`ChecksumKind::None`] both checksum fields are absent.

use bytes::{BufMut, BytesMut};

use crate::checksum::ChecksumKind;
use crate::config::Config;
use crate::error::{Error, Result};

/// Append a big-endian field of the configured width.
pub(crate) fn put_field(dst: &mut BytesMut, width: usize, value: u32) {
    match width {
        1 => dst.put_u8(value as u8),
        2 => dst.put_u16(value as u16),
        4 => dst.put_u32(value),
        _ => unreachable!("field widths are validated at construction"),
    }
}

/// Serialize one complete frame into `dst`.
pub(crate) fn encode_frame(
    config: &Config,
    frame_id: u32,
    frame_type: u32,
    payload: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    if payload.len() > config.max_payload_tx {
        return Err(Error::PayloadTooLarge {
            size: payload.len(),
            max: config.max_payload_tx,
        });
    }

    dst.reserve(config.overhead_bytes() + payload.len());

    let head_start = dst.len();
    if config.use_sof {
        dst.put_u8(config.sof_byte);
    }
    put_field(dst, config.id_bytes, frame_id);
    put_field(dst, config.len_bytes, payload.len() as u32);
    put_field(dst, config.type_bytes, frame_type);

    if config.checksum != ChecksumKind::None {
        let head_cksum = config.checksum.compute(&dst[head_start..]);
        put_field(dst, config.checksum.width(), head_cksum);
    }

    dst.put_slice(payload);

    if config.checksum != ChecksumKind::None {
        let payload_cksum = config.checksum.compute(payload);
        put_field(dst, config.checksum.width(), payload_cksum);
    }

    Ok(())
}
