//! Compact lighting-control packets for infrared and serial links.
//!
//! IlluminatIR carries DMX-like channel updates and small configuration
//! entries in 4 to 19 byte packets protected by a CRC-8. Links that cannot
//! delimit packets on their own wrap them in COBS frames, optionally whitened
//! with an LFSR keystream.
//!
//! # Crate Structure
//!
//! - [`packet`] — Packet layout, checksum, parser and builders
//! - [`frame`] — COBS framing, whitening and stream deframing

/// Re-export packet types.
pub mod packet {
    pub use illuminatir_packet::*;
}

/// Re-export frame types.
pub mod frame {
    pub use illuminatir_frame::*;
}
