use crate::error::{PacketError, Result};
use crate::limits::{MAX_PAYLOAD_SIZE, MIN_PAYLOAD_SIZE};

/// The only header version this codec understands.
pub const HEADER_VERSION: u8 = 0;

const VERSION_SHIFT: u8 = 6;
const VERSION_MASK: u8 = 0b1100_0000;
const TYPE_SHIFT: u8 = 4;
const TYPE_MASK: u8 = 0b0011_0000;
const SIZE_MASK: u8 = 0b0000_1111;

/// Payload layout selected by the header.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadType {
    /// A start channel followed by consecutive channel values.
    OffsetArray = 0,
    /// Explicit channel/value byte pairs. Parse-only.
    ChannelValuePairs = 1,
    /// A configuration key, a 0x00 delimiter and value bytes.
    Config = 2,
}

impl PayloadType {
    pub fn name(self) -> &'static str {
        match self {
            PayloadType::OffsetArray => "offset-array",
            PayloadType::ChannelValuePairs => "channel-value-pairs",
            PayloadType::Config => "config",
        }
    }
}

impl TryFrom<u8> for PayloadType {
    type Error = PacketError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(PayloadType::OffsetArray),
            1 => Ok(PayloadType::ChannelValuePairs),
            2 => Ok(PayloadType::Config),
            other => Err(PacketError::UnsupportedFormat(other)),
        }
    }
}

/// Decoded view of the 1-byte packet header.
///
/// Bit layout (MSB first):
/// ```text
/// ┌─────────┬─────────┬───────────────────┐
/// │ 7     6 │ 5     4 │ 3               0 │
/// │ Version │ Type    │ PayloadSize - 2   │
/// └─────────┴─────────┴───────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Header version, bits 7-6.
    pub version: u8,
    /// Raw payload type field, bits 5-4. Kept raw so that unknown types can be
    /// reported after the checksum has been verified.
    pub payload_type: u8,
    /// Payload length in bytes (2..=17), derived from bits 3-0.
    pub payload_size: usize,
}

impl Header {
    /// Split a header byte into its fields.
    pub fn from_byte(byte: u8) -> Self {
        Self {
            version: (byte & VERSION_MASK) >> VERSION_SHIFT,
            payload_type: (byte & TYPE_MASK) >> TYPE_SHIFT,
            payload_size: (byte & SIZE_MASK) as usize + MIN_PAYLOAD_SIZE,
        }
    }

    /// Build a version-0 header for the given payload type and size.
    pub fn new(payload_type: PayloadType, payload_size: usize) -> Result<Self> {
        if !(MIN_PAYLOAD_SIZE..=MAX_PAYLOAD_SIZE).contains(&payload_size) {
            return Err(PacketError::InvalidSize);
        }
        Ok(Self {
            version: HEADER_VERSION,
            payload_type: payload_type as u8,
            payload_size,
        })
    }

    /// Pack the fields back into a header byte.
    pub fn to_byte(&self) -> u8 {
        ((self.version << VERSION_SHIFT) & VERSION_MASK)
            | ((self.payload_type << TYPE_SHIFT) & TYPE_MASK)
            | ((self.payload_size - MIN_PAYLOAD_SIZE) as u8 & SIZE_MASK)
    }

    /// Total wire length of the packet this header announces.
    pub fn packet_len(&self) -> usize {
        1 + self.payload_size + 1
    }

    /// The payload type, if it is one this codec knows.
    pub fn kind(&self) -> Result<PayloadType> {
        PayloadType::try_from(self.payload_type)
    }
}
