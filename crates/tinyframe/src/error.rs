/// Errors returned by engine operations.
///
/// Line corruption (bad SOF, checksum mismatch, oversized inbound length)
/// never surfaces here; the receive parser silently resets instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration violates a wire-format or capacity constraint.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The listener table has no free slot.
    #[error("listener table full (capacity {capacity})")]
    TableFull { capacity: usize },

    /// An active listener with the same key is already registered.
    #[error("listener already registered")]
    Duplicate,

    /// No active listener matches the given key.
    #[error("listener not found")]
    NotFound,

    /// The byte sink failed while a frame was being emitted.
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
