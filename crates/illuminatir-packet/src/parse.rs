use tracing::{debug, trace};

use crate::checksum::{crc8, CRC8_INITIAL_SEED};
use crate::error::{PacketError, Result};
use crate::header::{Header, PayloadType, HEADER_VERSION};
use crate::limits::MIN_PACKET_SIZE;

/// Base channel of the device. One value byte.
pub const KEY_BASE: &str = "Base";

/// Persist the current channel values as power-up defaults. No value bytes.
pub const KEY_MAKE_DEFAULT: &str = "MakeDefault";

/// Receives the effects of parsed packets.
///
/// Both methods default to doing nothing, so a sink only implements what it
/// cares about; packets of the other kinds are still validated.
pub trait PacketSink {
    /// Set `channel` to `value`.
    fn set_channel(&mut self, channel: u8, value: u8) {
        let _ = (channel, value);
    }

    /// Apply a configuration entry. `key` is not NUL-terminated.
    fn set_config(&mut self, key: &[u8], values: &[u8]) {
        let _ = (key, values);
    }
}

/// Validate without reporting anything.
impl PacketSink for () {}

impl<S: PacketSink + ?Sized> PacketSink for &mut S {
    fn set_channel(&mut self, channel: u8, value: u8) {
        (**self).set_channel(channel, value);
    }

    fn set_config(&mut self, key: &[u8], values: &[u8]) {
        (**self).set_config(key, values);
    }
}

/// A configuration key with its value bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigEntry<'a> {
    pub key: &'a [u8],
    pub values: &'a [u8],
}

impl<'a> ConfigEntry<'a> {
    /// Split a config payload at its first 0x00 byte.
    ///
    /// Without a delimiter the whole payload is the key.
    pub fn from_payload(payload: &'a [u8]) -> Self {
        match payload.iter().position(|&b| b == 0) {
            Some(end) => Self {
                key: &payload[..end],
                values: &payload[end + 1..],
            },
            None => Self {
                key: payload,
                values: &[],
            },
        }
    }

    /// Case-insensitive key comparison, the convention for config keys.
    pub fn key_matches(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key.as_bytes())
    }
}

/// Decoded payload of a single packet, borrowing from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    OffsetArray { offset: u8, values: &'a [u8] },
    ChannelValuePairs(&'a [u8]),
    Config(ConfigEntry<'a>),
}

impl<'a> Payload<'a> {
    fn new(kind: PayloadType, payload: &'a [u8]) -> Self {
        match kind {
            PayloadType::OffsetArray => Payload::OffsetArray {
                offset: payload[0],
                values: &payload[1..],
            },
            PayloadType::ChannelValuePairs => Payload::ChannelValuePairs(payload),
            PayloadType::Config => Payload::Config(ConfigEntry::from_payload(payload)),
        }
    }

    pub fn kind(&self) -> PayloadType {
        match self {
            Payload::OffsetArray { .. } => PayloadType::OffsetArray,
            Payload::ChannelValuePairs(_) => PayloadType::ChannelValuePairs,
            Payload::Config(_) => PayloadType::Config,
        }
    }

    /// Report this payload to `sink`.
    pub fn dispatch<S: PacketSink + ?Sized>(&self, sink: &mut S) {
        match *self {
            Payload::OffsetArray { offset, values } => {
                for (i, &value) in values.iter().enumerate() {
                    sink.set_channel(offset.wrapping_add(i as u8), value);
                }
            }
            Payload::ChannelValuePairs(pairs) => {
                // An odd trailing channel byte gets value 0.
                for pair in pairs.chunks(2) {
                    sink.set_channel(pair[0], pair.get(1).copied().unwrap_or(0));
                }
            }
            Payload::Config(entry) => sink.set_config(entry.key, entry.values),
        }
    }
}

/// A validated packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet<'a> {
    pub header: Header,
    pub payload: Payload<'a>,
    pub checksum: u8,
}

impl Packet<'_> {
    /// Total wire length of this packet.
    pub fn wire_size(&self) -> usize {
        self.header.packet_len()
    }
}

/// Validate the packet at the start of `buf`.
///
/// Returns the packet and the number of bytes it occupies. Checks run in wire
/// order: minimum length, version, declared length, checksum, payload type.
pub fn decode_packet(buf: &[u8]) -> Result<(Packet<'_>, usize)> {
    if buf.len() < MIN_PACKET_SIZE {
        return Err(PacketError::PacketTooShort { len: buf.len() });
    }

    let header = Header::from_byte(buf[0]);
    if header.version != HEADER_VERSION {
        return Err(PacketError::UnsupportedVersion(header.version));
    }

    let len = header.packet_len();
    if len > buf.len() {
        return Err(PacketError::InvalidSize);
    }

    let received = buf[len - 1];
    let expected = crc8(&buf[..len - 1], CRC8_INITIAL_SEED);
    if received != expected {
        return Err(PacketError::InvalidCrc { expected, received });
    }

    let kind = header.kind()?;
    let packet = Packet {
        header,
        payload: Payload::new(kind, &buf[1..len - 1]),
        checksum: received,
    };
    Ok((packet, len))
}

/// Iterator over concatenated packets.
///
/// Yields at least one item, so an empty buffer produces
/// [`PacketError::PacketTooShort`]. Stops after the first error.
#[derive(Debug, Clone)]
pub struct Packets<'a> {
    rest: &'a [u8],
    position: usize,
    started: bool,
    failed: bool,
}

impl<'a> Packets<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            rest: buf,
            position: 0,
            started: false,
            failed: false,
        }
    }
}

impl<'a> Iterator for Packets<'a> {
    type Item = Result<Packet<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || (self.started && self.rest.is_empty()) {
            return None;
        }
        self.started = true;

        match decode_packet(self.rest) {
            Ok((packet, len)) => {
                self.rest = &self.rest[len..];
                self.position += len;
                Some(Ok(packet))
            }
            Err(err) => {
                debug!(error = %err, position = self.position, "rejected packet");
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Parse one or more concatenated packets and report them to `sink`.
///
/// Each packet is fully validated before its effects reach the sink. On error
/// the remaining packets are skipped; effects of earlier packets stay applied.
pub fn parse<S: PacketSink + ?Sized>(packets: &[u8], sink: &mut S) -> Result<()> {
    for packet in Packets::new(packets) {
        let packet = packet?;
        trace!(
            kind = packet.payload.kind().name(),
            size = packet.wire_size(),
            "dispatching packet"
        );
        packet.payload.dispatch(sink);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[derive(Default)]
    struct ChannelsOnly {
        channels: Vec<(u8, u8)>,
    }

    impl PacketSink for ChannelsOnly {
        fn set_channel(&mut self, channel: u8, value: u8) {
            self.channels.push((channel, value));
        }
    }

    fn seal(mut bytes: Vec<u8>) -> Vec<u8> {
        let crc = crc8(&bytes, CRC8_INITIAL_SEED);
        bytes.push(crc);
        bytes
    }

    #[test]
    fn offset_array_minimum_size() {
        let packet = seal(vec![0x00, 0x00, 42]);
        let mut rec = Recorder::default();
        parse(&packet, &mut rec).unwrap();
        assert_eq!(rec.channels, vec![(0, 42)]);
        assert!(rec.configs.is_empty());
    }

    #[test]
    fn offset_array_with_offset_maximum_size() {
        let mut bytes = vec![0x0f, 0x04];
        bytes.extend(1..=16u8);
        let packet = seal(bytes);

        let mut rec = Recorder::default();
        parse(&packet, &mut rec).unwrap();

        let expected: Vec<(u8, u8)> = (0..16u8).map(|i| (4 + i, 1 + i)).collect();
        assert_eq!(rec.channels, expected);
    }

    #[test]
    fn offset_array_channels_wrap_at_256() {
        let packet = seal(vec![0x03, 0xfe, 1, 2, 3, 4]);
        let mut rec = Recorder::default();
        parse(&packet, &mut rec).unwrap();
        assert_eq!(rec.channels, vec![(0xfe, 1), (0xff, 2), (0, 3), (1, 4)]);
    }

    #[test]
    fn known_example_packet_sets_channel_eight() {
        let mut rec = Recorder::default();
        parse(&[0x00, 8, 42, 0xaa], &mut rec).unwrap();
        assert_eq!(rec.channels, vec![(8, 42)]);
    }

    #[test]
    fn channel_value_pairs_minimum_size() {
        let packet = seal(vec![0x10, 0x07, 21]);
        let mut rec = Recorder::default();
        parse(&packet, &mut rec).unwrap();
        assert_eq!(rec.channels, vec![(7, 21)]);
    }

    #[test]
    fn channel_value_pairs_odd_length_defaults_last_value_to_zero() {
        let mut bytes = vec![0x1f];
        bytes.extend(0..=16u8);
        let packet = seal(bytes);

        let mut rec = Recorder::default();
        parse(&packet, &mut rec).unwrap();

        assert_eq!(rec.channels.len(), 9);
        assert_eq!(rec.channels[0], (0, 1));
        assert_eq!(rec.channels[7], (14, 15));
        assert_eq!(rec.channels[8], (16, 0));
    }

    #[test]
    fn config_without_values() {
        let packet = seal(vec![0x20, b'X', 0]);
        let mut rec = Recorder::default();
        parse(&packet, &mut rec).unwrap();
        assert_eq!(rec.configs, vec![(b"X".to_vec(), vec![])]);
    }

    #[test]
    fn config_without_key() {
        let packet = seal(vec![0x20, 0, 1]);
        let mut rec = Recorder::default();
        parse(&packet, &mut rec).unwrap();
        assert_eq!(rec.configs, vec![(vec![], vec![1])]);
    }

    #[test]
    fn config_maximum_size() {
        let mut bytes = vec![0x2f];
        bytes.extend_from_slice(b"IlluminatIR");
        bytes.extend([0, 1, 2, 3, 4, 5]);
        let packet = seal(bytes);

        let mut rec = Recorder::default();
        parse(&packet, &mut rec).unwrap();
        assert_eq!(
            rec.configs,
            vec![(b"IlluminatIR".to_vec(), vec![1, 2, 3, 4, 5])]
        );
    }

    #[test]
    fn config_without_delimiter_is_all_key() {
        let mut bytes = vec![0x2f];
        bytes.extend_from_slice(b"IlluminatIR Test!");
        let packet = seal(bytes);

        let mut rec = Recorder::default();
        parse(&packet, &mut rec).unwrap();
        assert_eq!(rec.configs.len(), 1);
        assert_eq!(rec.configs[0].0.len(), 17);
        assert_eq!(rec.configs[0].0, b"IlluminatIR Test!".to_vec());
        assert!(rec.configs[0].1.is_empty());
    }

    #[test]
    fn multiple_concatenated_packets() {
        let mut packets = seal(vec![0x00, 0x03, 42]);
        packets.extend(seal(vec![0x00, 0x04, 21]));

        let mut rec = Recorder::default();
        parse(&packets, &mut rec).unwrap();
        assert_eq!(rec.channels, vec![(3, 42), (4, 21)]);
    }

    #[test]
    fn bad_trailing_packet_keeps_earlier_effects() {
        let mut packets = seal(vec![0x00, 0x03, 42]);
        let mut bad = seal(vec![0x00, 0x04, 21]);
        bad[3] ^= 0xff;
        packets.extend(bad);

        let mut rec = Recorder::default();
        let err = parse(&packets, &mut rec).unwrap_err();
        assert!(matches!(err, PacketError::InvalidCrc { .. }));
        assert_eq!(rec.channels, vec![(3, 42)]);
    }

    #[test]
    fn crc_error_fires_no_callbacks() {
        let mut packet = seal(vec![0x00, 0x00, 0]);
        packet[3] = packet[3].wrapping_sub(1);

        let mut rec = Recorder::default();
        let err = parse(&packet, &mut rec).unwrap_err();
        assert!(matches!(err, PacketError::InvalidCrc { .. }));
        assert!(rec.channels.is_empty());
        assert!(rec.configs.is_empty());
    }

    #[test]
    fn too_short() {
        let packet = seal(vec![0x00, 0x00]);
        let err = parse(&packet, &mut ()).unwrap_err();
        assert_eq!(err, PacketError::PacketTooShort { len: 3 });
    }

    #[test]
    fn empty_buffer_is_too_short() {
        let err = parse(&[], &mut ()).unwrap_err();
        assert_eq!(err, PacketError::PacketTooShort { len: 0 });
    }

    #[test]
    fn trailing_garbage_is_too_short() {
        let mut packets = seal(vec![0x00, 0x03, 42]);
        packets.extend([0x00, 0x01]);

        let mut rec = Recorder::default();
        let err = parse(&packets, &mut rec).unwrap_err();
        assert_eq!(err, PacketError::PacketTooShort { len: 2 });
        assert_eq!(rec.channels, vec![(3, 42)]);
    }

    #[test]
    fn unsupported_version() {
        let packet = seal(vec![0x40, 0x00, 42]);
        let err = parse(&packet, &mut ()).unwrap_err();
        assert_eq!(err, PacketError::UnsupportedVersion(1));
    }

    #[test]
    fn declared_size_beyond_buffer_is_invalid_size() {
        let packet = seal(vec![0x01, 0x00, 42]);
        let err = parse(&packet, &mut ()).unwrap_err();
        assert_eq!(err, PacketError::InvalidSize);
    }

    #[test]
    fn unknown_payload_type_after_valid_crc() {
        let packet = seal(vec![0x30, 0x00, 42]);
        let mut rec = Recorder::default();
        let err = parse(&packet, &mut rec).unwrap_err();
        assert_eq!(err, PacketError::UnsupportedFormat(3));
        assert!(rec.channels.is_empty());
    }

    #[test]
    fn absent_callbacks_still_validate() {
        let config = seal(vec![0x20, b'X', 0]);
        let mut only = ChannelsOnly::default();
        parse(&config, &mut only).unwrap();
        assert!(only.channels.is_empty());

        parse(&seal(vec![0x00, 0x00, 1]), &mut ()).unwrap();

        let mut broken = seal(vec![0x20, b'X', 0]);
        broken[1] ^= 0x01;
        assert!(matches!(
            parse(&broken, &mut ()),
            Err(PacketError::InvalidCrc { .. })
        ));
    }

    #[test]
    fn dyn_sink_is_accepted() {
        let packet = seal(vec![0x00, 0x09, 7]);
        let mut rec = Recorder::default();
        let sink: &mut dyn PacketSink = &mut rec;
        parse(&packet, sink).unwrap();
        assert_eq!(rec.channels, vec![(9, 7)]);
    }

    #[test]
    fn decode_packet_reports_consumed_length() {
        let mut packets = seal(vec![0x01, 0x00, 1, 2]);
        packets.extend(seal(vec![0x00, 0x00, 3]));

        let (packet, used) = decode_packet(&packets).unwrap();
        assert_eq!(used, 5);
        assert_eq!(packet.wire_size(), 5);
        assert_eq!(
            packet.payload,
            Payload::OffsetArray {
                offset: 0,
                values: &[1, 2]
            }
        );
    }

    #[test]
    fn packets_iterator_stops_after_error() {
        let mut packets = seal(vec![0x00, 0x00, 3]);
        packets.extend([0x40, 0, 0, 0]);
        packets.extend(seal(vec![0x00, 0x00, 4]));

        let items: Vec<_> = Packets::new(&packets).collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert_eq!(items[1], Err(PacketError::UnsupportedVersion(1)));
    }

    #[test]
    fn config_key_matching_ignores_case() {
        let entry = ConfigEntry::from_payload(b"base\0\x10");
        assert!(entry.key_matches(KEY_BASE));
        assert!(!entry.key_matches(KEY_MAKE_DEFAULT));
        assert_eq!(entry.values, &[0x10]);
    }
}
