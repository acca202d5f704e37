//! Protocol size limits.
//!
//! All sizes are in bytes unless stated otherwise.

/// Smallest valid raw packet: header + 2 payload bytes + checksum.
pub const MIN_PACKET_SIZE: usize = 4;

/// Largest valid raw packet: header + 17 payload bytes + checksum.
pub const MAX_PACKET_SIZE: usize = 19;

/// Smallest payload the 4-bit size field can express.
pub const MIN_PAYLOAD_SIZE: usize = 2;

/// Largest payload the 4-bit size field can express.
pub const MAX_PAYLOAD_SIZE: usize = 17;

/// Fewest values an offset-array packet may carry.
pub const OFFSET_ARRAY_MIN_VALUES: usize = 1;

/// Most values an offset-array packet may carry.
pub const OFFSET_ARRAY_MAX_VALUES: usize = 16;

/// Shortest configuration key.
pub const CONFIG_KEY_MIN_LEN: usize = 0;

/// Longest configuration key (a payload without a delimiter is all key).
pub const CONFIG_KEY_MAX_LEN: usize = 17;

/// Fewest configuration value bytes.
pub const CONFIG_VALUES_MIN_SIZE: usize = 0;

/// Most configuration value bytes (key of length zero plus delimiter).
pub const CONFIG_VALUES_MAX_SIZE: usize = 16;

const _: () = assert!(MIN_PACKET_SIZE == 1 + MIN_PAYLOAD_SIZE + 1);
const _: () = assert!(MAX_PACKET_SIZE == 1 + MAX_PAYLOAD_SIZE + 1);
const _: () = assert!(OFFSET_ARRAY_MAX_VALUES + 1 == MAX_PAYLOAD_SIZE);
const _: () = assert!(CONFIG_VALUES_MAX_SIZE + 1 == MAX_PAYLOAD_SIZE);
