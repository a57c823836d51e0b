use std::any::Any;
use std::fmt;

use bytes::Bytes;

/// One message: accepted by the send path, handed to listener callbacks.
pub struct Msg {
    /// Frame ID. Allocated by `send`, preserved by `respond`.
    pub frame_id: u32,
    /// Application-defined message type.
    pub frame_type: u32,
    /// Payload bytes. `None` only when a waiting ID listener timed out.
    pub payload: Option<Bytes>,
    /// Set by `respond`: a response keeps its frame ID instead of
    /// allocating a fresh one.
    pub is_response: bool,
    /// Opaque handle stored verbatim with an ID listener and returned
    /// verbatim to its callback. The engine never inspects it.
    pub user_data: Option<Box<dyn Any>>,
}

impl Msg {
    /// New request message with the given type and payload.
    pub fn new(frame_type: u32, payload: impl Into<Bytes>) -> Self {
        Self {
            frame_id: 0,
            frame_type,
            payload: Some(payload.into()),
            is_response: false,
            user_data: None,
        }
    }

    /// Payload bytes, empty when the payload is absent.
    pub fn payload_bytes(&self) -> &[u8] {
        self.payload.as_deref().unwrap_or(&[])
    }

    /// True when this message signals a listener timeout rather than a
    /// received frame.
    pub fn is_timeout(&self) -> bool {
        self.payload.is_none()
    }
}

impl Default for Msg {
    fn default() -> Self {
        Self {
            frame_id: 0,
            frame_type: 0,
            payload: None,
            is_response: false,
            user_data: None,
        }
    }
}

impl fmt::Debug for Msg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Msg")
            .field("frame_id", &self.frame_id)
            .field("frame_type", &self.frame_type)
            .field("payload", &self.payload)
            .field("is_response", &self.is_response)
            .field("user_data", &self.user_data.as_ref().map(|_| "<opaque>"))
            .finish()
    }
}
