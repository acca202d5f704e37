use std::os::raw::c_char;

use illuminatir_packet::PacketSink;

use crate::types::{IlluminatirSetChannelFn, IlluminatirSetConfigFn};

/// Forwards decoded packets to nullable C callbacks.
pub(crate) struct CallbackSink {
    pub(crate) set_channel: IlluminatirSetChannelFn,
    pub(crate) set_config: IlluminatirSetConfigFn,
}

impl PacketSink for CallbackSink {
    fn set_channel(&mut self, channel: u8, value: u8) {
        if let Some(callback) = self.set_channel {
            // SAFETY: The caller of the export supplied this function pointer.
            unsafe { callback(channel, value) };
        }
    }

    fn set_config(&mut self, key: &[u8], values: &[u8]) {
        if let Some(callback) = self.set_config {
            // Both slices fit a 17-byte payload, so the casts cannot truncate.
            // SAFETY: The caller of the export supplied this function pointer; the
            // slices stay alive for the duration of the call.
            unsafe {
                callback(
                    key.as_ptr() as *const c_char,
                    key.len() as u8,
                    values.as_ptr(),
                    values.len() as u8,
                )
            };
        }
    }
}
