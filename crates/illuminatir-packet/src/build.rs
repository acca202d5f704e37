use std::ops::Deref;

use crate::checksum::{crc8, CRC8_INITIAL_SEED};
use crate::error::{PacketError, Result};
use crate::header::{Header, PayloadType};
use crate::limits::{
    MAX_PACKET_SIZE, MAX_PAYLOAD_SIZE, MIN_PAYLOAD_SIZE, OFFSET_ARRAY_MAX_VALUES,
    OFFSET_ARRAY_MIN_VALUES,
};

fn ensure_capacity(dst: &[u8], required: usize) -> Result<()> {
    if dst.len() < required {
        return Err(PacketError::BufferOverflow {
            required,
            available: dst.len(),
        });
    }
    Ok(())
}

fn seal(dst: &mut [u8], len: usize) {
    dst[len - 1] = crc8(&dst[..len - 1], CRC8_INITIAL_SEED);
}

/// Write an offset-array packet into `dst` and return its length.
///
/// `values[i]` addresses channel `offset + i`, wrapping at 256. Nothing is
/// written unless the whole packet fits.
///
/// Wire format:
/// ```text
/// ┌──────────┬──────────┬────────────────────┬──────────┐
/// │ Header   │ Offset   │ Values             │ CRC-8    │
/// │ 0b0000ssss (1B)     │ (1..16 B)          │ (1B)     │
/// └──────────┴──────────┴────────────────────┴──────────┘
/// ```
pub fn build_offset_array(dst: &mut [u8], offset: u8, values: &[u8]) -> Result<usize> {
    if !(OFFSET_ARRAY_MIN_VALUES..=OFFSET_ARRAY_MAX_VALUES).contains(&values.len()) {
        return Err(PacketError::InvalidSize);
    }
    let header = Header::new(PayloadType::OffsetArray, 1 + values.len())?;
    let len = header.packet_len();
    ensure_capacity(dst, len)?;

    dst[0] = header.to_byte();
    dst[1] = offset;
    dst[2..2 + values.len()].copy_from_slice(values);
    seal(dst, len);
    Ok(len)
}

/// Write a configuration packet into `dst` and return its length.
///
/// The key is followed by a single 0x00 delimiter and the value bytes. Key,
/// delimiter and values together must fit the 2..=17 byte payload.
pub fn build_config(dst: &mut [u8], key: &[u8], values: &[u8]) -> Result<usize> {
    let payload_size = key.len() + 1 + values.len();
    if !(MIN_PAYLOAD_SIZE..=MAX_PAYLOAD_SIZE).contains(&payload_size) {
        return Err(PacketError::InvalidSize);
    }
    let header = Header::new(PayloadType::Config, payload_size)?;
    let len = header.packet_len();
    ensure_capacity(dst, len)?;

    dst[0] = header.to_byte();
    let mut pos = 1;
    dst[pos..pos + key.len()].copy_from_slice(key);
    pos += key.len();
    dst[pos] = 0;
    pos += 1;
    dst[pos..pos + values.len()].copy_from_slice(values);
    seal(dst, len);
    Ok(len)
}

/// An owned raw packet on the stack.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawPacket {
    bytes: [u8; MAX_PACKET_SIZE],
    len: usize,
}

impl RawPacket {
    /// Build an offset-array packet. See [`build_offset_array`].
    pub fn offset_array(offset: u8, values: &[u8]) -> Result<Self> {
        let mut bytes = [0u8; MAX_PACKET_SIZE];
        let len = build_offset_array(&mut bytes, offset, values)?;
        Ok(Self { bytes, len })
    }

    /// Build a configuration packet. See [`build_config`].
    pub fn config(key: &[u8], values: &[u8]) -> Result<Self> {
        let mut bytes = [0u8; MAX_PACKET_SIZE];
        let len = build_config(&mut bytes, key, values)?;
        Ok(Self { bytes, len })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Mutable access, e.g. for in-place randomization.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..self.len]
    }
}

impl Deref for RawPacket {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for RawPacket {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl std::fmt::Debug for RawPacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RawPacket").field(&self.as_bytes()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse, PacketSink};

    #[derive(Default)]
    struct Recorder {
        channels: Vec<(u8, u8)>,
        configs: Vec<(Vec<u8>, Vec<u8>)>,
    }

    impl PacketSink for Recorder {
        fn set_channel(&mut self, channel: u8, value: u8) {
            self.channels.push((channel, value));
        }

        fn set_config(&mut self, key: &[u8], values: &[u8]) {
            self.configs.push((key.to_vec(), values.to_vec()));
        }
    }

    #[test]
    fn offset_array_single_value() {
        let mut buf = [0u8; MAX_PACKET_SIZE];
        let len = build_offset_array(&mut buf, 0, &[42]).unwrap();
        assert_eq!(&buf[..len], &[0x00, 0x00, 0x2a, 0xf2]);
    }

    #[test]
    fn config_with_values() {
        let mut buf = [0u8; MAX_PACKET_SIZE];
        let len = build_config(&mut buf, b"Test", &[1, 2, 3]).unwrap();
        assert_eq!(
            &buf[..len],
            &[0x26, b'T', b'e', b's', b't', 0, 1, 2, 3, 0x5d]
        );
    }

    #[test]
    fn offset_array_rejects_value_counts_out_of_range() {
        let mut buf = [0u8; MAX_PACKET_SIZE];
        assert_eq!(
            build_offset_array(&mut buf, 0, &[]),
            Err(PacketError::InvalidSize)
        );
        assert_eq!(
            build_offset_array(&mut buf, 0, &[1; 17]),
            Err(PacketError::InvalidSize)
        );
        assert_eq!(buf, [0u8; MAX_PACKET_SIZE]);
    }

    #[test]
    fn config_rejects_payloads_out_of_range() {
        let mut buf = [0u8; MAX_PACKET_SIZE];
        assert_eq!(build_config(&mut buf, b"", &[]), Err(PacketError::InvalidSize));
        assert_eq!(
            build_config(&mut buf, b"0123456789", &[0; 7]),
            Err(PacketError::InvalidSize)
        );
        assert!(build_config(&mut buf, b"0123456789", &[0; 6]).is_ok());
        assert!(build_config(&mut buf, b"K", &[]).is_ok());
        assert!(build_config(&mut buf, b"", &[9]).is_ok());
    }

    #[test]
    fn small_buffer_reports_required_size_without_writing() {
        let mut buf = [0xeeu8; 5];
        let err = build_offset_array(&mut buf, 3, &[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            PacketError::BufferOverflow {
                required: 6,
                available: 5
            }
        );
        assert_eq!(buf, [0xee; 5]);

        let err = build_config(&mut buf, b"Base", &[7]).unwrap_err();
        assert_eq!(
            err,
            PacketError::BufferOverflow {
                required: 8,
                available: 5
            }
        );
        assert_eq!(buf, [0xee; 5]);
    }

    #[test]
    fn exact_capacity_is_enough() {
        let mut buf = [0u8; 6];
        assert_eq!(build_offset_array(&mut buf, 3, &[1, 2, 3]), Ok(6));
    }

    #[test]
    fn offset_array_roundtrip_all_lengths() {
        for len in OFFSET_ARRAY_MIN_VALUES..=OFFSET_ARRAY_MAX_VALUES {
            let values: Vec<u8> = (0..len as u8).map(|v| v.wrapping_mul(37)).collect();
            for offset in [0u8, 7, 250] {
                let packet = RawPacket::offset_array(offset, &values).unwrap();
                assert_eq!(packet.len(), len + 3);

                let mut rec = Recorder::default();
                parse(&packet, &mut rec).unwrap();
                let expected: Vec<(u8, u8)> = values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| (offset.wrapping_add(i as u8), v))
                    .collect();
                assert_eq!(rec.channels, expected);
            }
        }
    }

    #[test]
    fn config_roundtrip_over_valid_shapes() {
        for key_len in 0..=16usize {
            for values_len in 0..=(16 - key_len) {
                if key_len + 1 + values_len < MIN_PAYLOAD_SIZE {
                    continue;
                }
                let key: Vec<u8> = (0..key_len).map(|i| b'a' + i as u8).collect();
                let values: Vec<u8> = (0..values_len).map(|i| i as u8).collect();
                let packet = RawPacket::config(&key, &values).unwrap();

                let mut rec = Recorder::default();
                parse(&packet, &mut rec).unwrap();
                assert_eq!(rec.configs, vec![(key.clone(), values.clone())]);
            }
        }
    }

    #[test]
    fn any_single_bit_flip_is_rejected() {
        let packet = RawPacket::offset_array(4, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        for byte in 0..packet.len() {
            for bit in 0..8 {
                let mut corrupted = packet;
                corrupted.as_bytes_mut()[byte] ^= 1 << bit;
                let result = parse(&corrupted, &mut ());
                if byte == 0 {
                    assert!(result.is_err(), "header bit {bit} flip accepted");
                } else {
                    assert!(
                        matches!(result, Err(PacketError::InvalidCrc { .. })),
                        "byte {byte} bit {bit}: {result:?}"
                    );
                }
            }
        }
    }
}
