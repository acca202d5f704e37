//! Build and parse helpers that combine the packet codec with COBS framing
//! and, for the `rand_*` variants, LFSR whitening.
//!
//! Build helpers emit one packet per frame and never append the trailing
//! 0x00 delimiter; see [`crate::stream::encode_frame`] for that.

use illuminatir_packet::{parse, PacketError, PacketSink, RawPacket, Result, MAX_PACKET_SIZE};

use crate::cobs::{self, decoded_max, encoded_max};
use crate::lfsr::Lfsr127;
use crate::randomize::randomize;

/// Largest COBS encoding of a single packet.
pub const MAX_COBS_PACKET_SIZE: usize = encoded_max(MAX_PACKET_SIZE);

/// Largest COBS frame the parse helpers accept.
pub const MAX_FRAME_SIZE: usize = 255;

/// Largest packet batch a [`MAX_FRAME_SIZE`] frame can decode to.
pub const MAX_DECODED_FRAME_SIZE: usize = decoded_max(MAX_FRAME_SIZE);

const _: () = assert!(MAX_COBS_PACKET_SIZE == 20);
const _: () = assert!(MAX_DECODED_FRAME_SIZE == 254);

/// Decode into `dst`, treating an empty result as failure.
fn unstuff<'a>(frame: &[u8], dst: &'a mut [u8; MAX_DECODED_FRAME_SIZE]) -> Option<&'a mut [u8]> {
    match cobs::decode(frame, &mut dst[..]) {
        Some(len) if len > 0 => Some(&mut dst[..len]),
        _ => None,
    }
}

fn stuff(packet: &[u8], dst: &mut [u8]) -> Result<usize> {
    cobs::encode(packet, dst).ok_or(PacketError::Unknown)
}

/// Decode a COBS frame and parse the packets it contains.
///
/// Frames that do not decode, decode to nothing, or exceed
/// [`MAX_FRAME_SIZE`] fail with [`PacketError::Unknown`].
pub fn cobs_parse<S: PacketSink + ?Sized>(frame: &[u8], sink: &mut S) -> Result<()> {
    let mut buf = [0u8; MAX_DECODED_FRAME_SIZE];
    let packets = unstuff(frame, &mut buf).ok_or(PacketError::Unknown)?;
    parse(packets, sink)
}

/// Build an offset-array packet and COBS-encode it into `dst`.
///
/// `dst` must hold [`MAX_COBS_PACKET_SIZE`] bytes or the encoded size of
/// this packet, whichever is smaller; otherwise [`PacketError::Unknown`].
pub fn cobs_build_offset_array(dst: &mut [u8], offset: u8, values: &[u8]) -> Result<usize> {
    let packet = RawPacket::offset_array(offset, values)?;
    stuff(&packet, dst)
}

/// Build a configuration packet and COBS-encode it into `dst`.
pub fn cobs_build_config(dst: &mut [u8], key: &[u8], values: &[u8]) -> Result<usize> {
    let packet = RawPacket::config(key, values)?;
    stuff(&packet, dst)
}

/// Decode a COBS frame, undo the whitening over the whole decoded batch and
/// parse it.
///
/// A frame that fails to decode is reported as [`PacketError::InvalidSize`].
pub fn rand_cobs_parse<S: PacketSink + ?Sized>(
    frame: &[u8],
    sink: &mut S,
    lfsr: &mut Lfsr127,
) -> Result<()> {
    let mut buf = [0u8; MAX_DECODED_FRAME_SIZE];
    let packets = rand_cobs_unmask(frame, &mut buf, lfsr)?;
    parse(packets, sink)
}

/// Decode a whitened COBS frame into `buf` and undo the whitening, returning
/// the plain packet batch.
///
/// This is the first half of [`rand_cobs_parse`], for callers that must
/// release the generator before parsing.
pub fn rand_cobs_unmask<'a>(
    frame: &[u8],
    buf: &'a mut [u8; MAX_DECODED_FRAME_SIZE],
    lfsr: &mut Lfsr127,
) -> Result<&'a mut [u8]> {
    let packets = unstuff(frame, buf).ok_or(PacketError::InvalidSize)?;
    randomize(packets, lfsr);
    Ok(packets)
}

/// Build an offset-array packet, whiten it and COBS-encode it into `dst`.
pub fn rand_cobs_build_offset_array(
    dst: &mut [u8],
    offset: u8,
    values: &[u8],
    lfsr: &mut Lfsr127,
) -> Result<usize> {
    let mut packet = RawPacket::offset_array(offset, values)?;
    randomize(packet.as_bytes_mut(), lfsr);
    stuff(&packet, dst)
}

/// Build a configuration packet, whiten it and COBS-encode it into `dst`.
pub fn rand_cobs_build_config(
    dst: &mut [u8],
    key: &[u8],
    values: &[u8],
    lfsr: &mut Lfsr127,
) -> Result<usize> {
    let mut packet = RawPacket::config(key, values)?;
    randomize(packet.as_bytes_mut(), lfsr);
    stuff(&packet, dst)
}
