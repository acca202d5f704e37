//! IlluminatIR packet format.
//!
//! Every packet on the wire is laid out as:
//! - A 1-byte header (version, payload type, payload size)
//! - A 2 to 17 byte payload
//! - A 1-byte CRC-8/KOOP checksum over header and payload
//!
//! Several raw packets may be concatenated into one buffer; [`parse`] walks
//! them in order and reports decoded channel values and configuration entries
//! through a [`PacketSink`].

pub mod build;
pub mod checksum;
pub mod error;
pub mod header;
pub mod limits;
pub mod parse;

pub use build::{build_config, build_offset_array, RawPacket};
pub use checksum::{crc8, CRC8_INITIAL_SEED};
pub use error::{ErrorCode, PacketError, Result};
pub use header::{Header, PayloadType, HEADER_VERSION};
pub use limits::{
    CONFIG_KEY_MAX_LEN, CONFIG_KEY_MIN_LEN, CONFIG_VALUES_MAX_SIZE, CONFIG_VALUES_MIN_SIZE,
    MAX_PACKET_SIZE, MAX_PAYLOAD_SIZE, MIN_PACKET_SIZE, MIN_PAYLOAD_SIZE,
    OFFSET_ARRAY_MAX_VALUES, OFFSET_ARRAY_MIN_VALUES,
};
pub use parse::{
    decode_packet, parse, ConfigEntry, Packet, PacketSink, Packets, Payload, KEY_BASE,
    KEY_MAKE_DEFAULT,
};
