use std::os::raw::c_char;

use illuminatir_packet::ErrorCode;

/// Status code returned by every fallible export (`illuminatir_error_t`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IlluminatirError {
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

impl From<ErrorCode> for IlluminatirError {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::None => IlluminatirError::None,
            ErrorCode::Unknown => IlluminatirError::Unknown,
            ErrorCode::NullPointer => IlluminatirError::NullPointer,
            ErrorCode::BufferOverflow => IlluminatirError::BufferOverflow,
            ErrorCode::PacketTooShort => IlluminatirError::PacketTooShort,
            ErrorCode::PacketTooLong => IlluminatirError::PacketTooLong,
            ErrorCode::UnsupportedVersion => IlluminatirError::UnsupportedVersion,
            ErrorCode::UnsupportedFormat => IlluminatirError::UnsupportedFormat,
            ErrorCode::InvalidSize => IlluminatirError::InvalidSize,
            ErrorCode::InvalidCrc => IlluminatirError::InvalidCrc,
        }
    }
}

#[allow(dead_code)]
pub const ILLUMINATIR_ERROR_NONE: IlluminatirError = IlluminatirError::None;
#[allow(dead_code)]
pub const ILLUMINATIR_ERROR_UNKNOWN: IlluminatirError = IlluminatirError::Unknown;
#[allow(dead_code)]
pub const ILLUMINATIR_ERROR_NULL_POINTER: IlluminatirError = IlluminatirError::NullPointer;
#[allow(dead_code)]
pub const ILLUMINATIR_ERROR_BUFFER_OVERFLOW: IlluminatirError = IlluminatirError::BufferOverflow;
#[allow(dead_code)]
pub const ILLUMINATIR_ERROR_PACKET_TOO_SHORT: IlluminatirError = IlluminatirError::PacketTooShort;
#[allow(dead_code)]
pub const ILLUMINATIR_ERROR_PACKET_TOO_LONG: IlluminatirError = IlluminatirError::PacketTooLong;
#[allow(dead_code)]
pub const ILLUMINATIR_ERROR_UNSUPPORTED_VERSION: IlluminatirError =
    IlluminatirError::UnsupportedVersion;
#[allow(dead_code)]
pub const ILLUMINATIR_ERROR_UNSUPPORTED_FORMAT: IlluminatirError =
    IlluminatirError::UnsupportedFormat;
#[allow(dead_code)]
pub const ILLUMINATIR_ERROR_INVALID_SIZE: IlluminatirError = IlluminatirError::InvalidSize;
#[allow(dead_code)]
pub const ILLUMINATIR_ERROR_INVALID_CRC: IlluminatirError = IlluminatirError::InvalidCrc;

pub const ILLUMINATIR_MIN_PACKET_SIZE: u8 = illuminatir_packet::MIN_PACKET_SIZE as u8;
pub const ILLUMINATIR_MAX_PACKET_SIZE: u8 = illuminatir_packet::MAX_PACKET_SIZE as u8;
pub const ILLUMINATIR_OFFSETARRAY_MIN_VALUES: u8 =
    illuminatir_packet::OFFSET_ARRAY_MIN_VALUES as u8;
pub const ILLUMINATIR_OFFSETARRAY_MAX_VALUES: u8 =
    illuminatir_packet::OFFSET_ARRAY_MAX_VALUES as u8;
pub const ILLUMINATIR_CRC8_INITIAL_SEED: u8 = illuminatir_packet::CRC8_INITIAL_SEED;

/// `void (*)(uint8_t channel, uint8_t value)`; may be null.
pub type IlluminatirSetChannelFn = Option<unsafe extern "C" fn(channel: u8, value: u8)>;

/// `void (*)(const char *key, uint8_t key_size, const uint8_t *values, uint8_t values_size)`;
/// may be null. Only `key_size` bytes of `key` are meaningful.
pub type IlluminatirSetConfigFn = Option<
    unsafe extern "C" fn(key: *const c_char, key_size: u8, values: *const u8, values_size: u8),
>;
