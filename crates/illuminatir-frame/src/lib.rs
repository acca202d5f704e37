//! Framing layer for IlluminatIR packets.
//!
//! Raw packets are not self-delimiting, so links that cannot packetize on
//! their own (e.g. an IR receiver feeding a UART) carry them as COBS frames:
//! - [`cobs`] removes every 0x00 byte so 0x00 can delimit frames
//! - [`randomize`] XORs an LFSR keystream over the payload to avoid long
//!   runs of identical bits
//! - [`framed`] composes build/parse with both steps
//! - [`stream`] splits a continuous byte stream into frames

pub mod cobs;
pub mod framed;
pub mod lfsr;
pub mod randomize;
pub mod stream;

pub use cobs::{decode, decoded_max, encode, encoded_max};
pub use framed::{
    cobs_build_config, cobs_build_offset_array, cobs_parse, rand_cobs_build_config,
    rand_cobs_build_offset_array, rand_cobs_parse, rand_cobs_unmask, MAX_COBS_PACKET_SIZE,
    MAX_DECODED_FRAME_SIZE, MAX_FRAME_SIZE,
};
pub use lfsr::Lfsr127;
pub use randomize::randomize;
pub use stream::{decode_frame, encode_frame, FrameConfig, FrameDecoder, FrameEncoder, DELIMITER};
