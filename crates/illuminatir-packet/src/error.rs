use std::fmt;

/// Errors that can occur while parsing or building packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PacketError {
    /// An internal step failed without a more specific cause.
    #[error("unknown error")]
    Unknown,

    /// A required buffer was not supplied.
    #[error("null pointer")]
    NullPointer,

    /// The destination buffer cannot hold the output.
    #[error("buffer overflow ({required} bytes required, {available} available)")]
    BufferOverflow { required: usize, available: usize },

    /// Fewer bytes remain than the smallest valid packet.
    #[error("packet too short to be valid ({len} bytes)")]
    PacketTooShort { len: usize },

    /// More bytes were buffered than any frame may hold.
    #[error("packet too long ({len} bytes, max {max})")]
    PacketTooLong { len: usize, max: usize },

    /// The header carries a version other than 0.
    #[error("unsupported header version {0}")]
    UnsupportedVersion(u8),

    /// The header carries an unknown payload type.
    #[error("unsupported payload format {0}")]
    UnsupportedFormat(u8),

    /// A declared or requested length is outside the allowed range.
    #[error("invalid size")]
    InvalidSize,

    /// The trailing checksum does not match header and payload.
    #[error("invalid CRC (expected {expected:#04x}, received {received:#04x})")]
    InvalidCrc { expected: u8, received: u8 },
}

impl PacketError {
    /// The closed error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PacketError::Unknown => ErrorCode::Unknown,
            PacketError::NullPointer => ErrorCode::NullPointer,
            PacketError::BufferOverflow { .. } => ErrorCode::BufferOverflow,
            PacketError::PacketTooShort { .. } => ErrorCode::PacketTooShort,
            PacketError::PacketTooLong { .. } => ErrorCode::PacketTooLong,
            PacketError::UnsupportedVersion(_) => ErrorCode::UnsupportedVersion,
            PacketError::UnsupportedFormat(_) => ErrorCode::UnsupportedFormat,
            PacketError::InvalidSize => ErrorCode::InvalidSize,
            PacketError::InvalidCrc { .. } => ErrorCode::InvalidCrc,
        }
    }
}

pub type Result<T> = std::result::Result<T, PacketError>;

/// Closed set of status codes shared by every fallible operation.
///
/// `None` is the success code; it never appears inside a [`PacketError`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    None = 0,
    Unknown = 1,
    NullPointer = 2,
    BufferOverflow = 3,
    PacketTooShort = 4,
    PacketTooLong = 5,
    UnsupportedVersion = 6,
    UnsupportedFormat = 7,
    InvalidSize = 8,
    InvalidCrc = 9,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 10] = [
        ErrorCode::None,
        ErrorCode::Unknown,
        ErrorCode::NullPointer,
        ErrorCode::BufferOverflow,
        ErrorCode::PacketTooShort,
        ErrorCode::PacketTooLong,
        ErrorCode::UnsupportedVersion,
        ErrorCode::UnsupportedFormat,
        ErrorCode::InvalidSize,
        ErrorCode::InvalidCrc,
    ];

    /// Human-readable description of the code.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::None => "None",
            ErrorCode::Unknown => "Unknown",
            ErrorCode::NullPointer => "Null Pointer",
            ErrorCode::BufferOverflow => "Buffer overflow",
            ErrorCode::PacketTooShort => "Packet too short to be valid",
            ErrorCode::PacketTooLong => "Packet too long",
            ErrorCode::UnsupportedVersion => "Unsupported version",
            ErrorCode::UnsupportedFormat => "Unsupported format",
            ErrorCode::InvalidSize => "Invalid size",
            ErrorCode::InvalidCrc => "Invalid CRC",
        }
    }

    /// Collapse a result into its status code.
    pub fn of<T>(result: &Result<T>) -> ErrorCode {
        match result {
            Ok(_) => ErrorCode::None,
            Err(err) => err.code(),
        }
    }
}

impl From<PacketError> for ErrorCode {
    fn from(err: PacketError) -> Self {
        err.code()
    }
}

impl TryFrom<u8> for ErrorCode {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        ErrorCode::ALL
            .get(value as usize)
            .copied()
            .ok_or(value)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
