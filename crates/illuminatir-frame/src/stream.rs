use bytes::{Buf, BufMut, Bytes, BytesMut};
use illuminatir_packet::{PacketError, PacketSink, Result};
use tracing::{debug, trace};

use crate::cobs::{self, decoded_max, encoded_max};
use crate::framed::{cobs_parse, rand_cobs_parse, MAX_DECODED_FRAME_SIZE, MAX_FRAME_SIZE};
use crate::lfsr::Lfsr127;
use crate::randomize::randomize;

/// Frame terminator on the wire.
pub const DELIMITER: u8 = 0x00;

const INITIAL_BUFFER_CAPACITY: usize = 2 * MAX_FRAME_SIZE;

/// COBS-encode a packet batch and append it to `dst`, followed by
/// [`DELIMITER`].
///
/// Wire format:
/// ```text
/// ┌──────────────────────────────┬───────────┐
/// │ COBS(packets) (no 0x00 byte) │ 0x00      │
/// └──────────────────────────────┴───────────┘
/// ```
pub fn encode_frame(packets: &[u8], dst: &mut BytesMut) -> Result<()> {
    let start = dst.len();
    dst.resize(start + encoded_max(packets.len()), 0);
    match cobs::encode(packets, &mut dst[start..]) {
        Some(len) => {
            dst.truncate(start + len);
            dst.put_u8(DELIMITER);
            Ok(())
        }
        None => {
            dst.truncate(start);
            Err(PacketError::Unknown)
        }
    }
}

/// Split the next delimited frame off `src`.
///
/// Returns `Ok(None)` while no complete frame is buffered. Empty frames
/// between consecutive delimiters are skipped. A frame longer than
/// `max_frame_size` is discarded and reported as
/// [`PacketError::PacketTooLong`]; without a delimiter in sight, the whole
/// buffered run is dropped.
pub fn decode_frame(src: &mut BytesMut, max_frame_size: usize) -> Result<Option<Bytes>> {
    let leading = src.iter().take_while(|&&b| b == DELIMITER).count();
    src.advance(leading);

    match src.iter().position(|&b| b == DELIMITER) {
        Some(len) if len > max_frame_size => {
            src.advance(len + 1);
            debug!(len, max = max_frame_size, "discarding oversized frame");
            Err(PacketError::PacketTooLong {
                len,
                max: max_frame_size,
            })
        }
        Some(len) => {
            let frame = src.split_to(len).freeze();
            src.advance(1);
            Ok(Some(frame))
        }
        None if src.len() > max_frame_size => {
            let len = src.len();
            src.clear();
            debug!(len, max = max_frame_size, "discarding unterminated run");
            Err(PacketError::PacketTooLong {
                len,
                max: max_frame_size,
            })
        }
        None => Ok(None),
    }
}

/// Configuration for the stream encoder and decoder.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum encoded frame size in bytes, capped at [`MAX_FRAME_SIZE`].
    pub max_frame_size: usize,
    /// Whether frame contents are LFSR-whitened.
    pub randomized: bool,
}

impl FrameConfig {
    fn effective_max(&self) -> usize {
        self.max_frame_size.min(MAX_FRAME_SIZE)
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_size: MAX_FRAME_SIZE,
            randomized: false,
        }
    }
}

/// Turns packet batches into delimited frames.
#[derive(Debug, Default)]
pub struct FrameEncoder {
    config: FrameConfig,
    lfsr: Lfsr127,
}

impl FrameEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            config,
            lfsr: Lfsr127::default(),
        }
    }

    /// Encode a batch of concatenated raw packets as one frame.
    ///
    /// A randomized batch is whitened as a whole, seeded from its last byte,
    /// which is what the decoder undoes.
    pub fn encode(&mut self, packets: &[u8], dst: &mut BytesMut) -> Result<()> {
        let max = decoded_max(self.config.effective_max());
        if packets.len() > max {
            return Err(PacketError::PacketTooLong {
                len: packets.len(),
                max,
            });
        }
        if !self.config.randomized {
            return encode_frame(packets, dst);
        }

        let mut buf = [0u8; MAX_DECODED_FRAME_SIZE];
        let batch = &mut buf[..packets.len()];
        batch.copy_from_slice(packets);
        randomize(batch, &mut self.lfsr);
        encode_frame(batch, dst)
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

/// Accumulates stream bytes and hands out complete frames.
///
/// Callers feed whatever chunks they receive through [`push`](Self::push);
/// frames may be split across chunks arbitrarily.
#[derive(Debug)]
pub struct FrameDecoder {
    buf: BytesMut,
    config: FrameConfig,
}

impl FrameDecoder {
    /// Create a decoder with default configuration.
    pub fn new() -> Self {
        Self::with_config(FrameConfig::default())
    }

    /// Create a decoder with explicit configuration.
    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Append received bytes.
    ///
    /// An unterminated run beyond the frame limit is cut down to one byte
    /// over the limit, so a stream that never sends a delimiter cannot grow
    /// the buffer. The next [`next_frame`](Self::next_frame) reports it as
    /// [`PacketError::PacketTooLong`].
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);

        let run_start = self
            .buf
            .iter()
            .rposition(|&b| b == DELIMITER)
            .map_or(0, |pos| pos + 1);
        let keep = run_start + self.config.effective_max() + 1;
        if self.buf.len() > keep {
            debug!(dropped = self.buf.len() - keep, "trimming unterminated run");
            self.buf.truncate(keep);
        }
    }

    /// Take the next complete COBS frame, without its delimiter.
    pub fn next_frame(&mut self) -> Result<Option<Bytes>> {
        decode_frame(&mut self.buf, self.config.effective_max())
    }

    /// Decode and parse every buffered frame, returning how many were
    /// dispatched.
    ///
    /// Stops at the first bad frame. That frame is consumed, so calling again
    /// resumes with the next one.
    pub fn dispatch<S: PacketSink + ?Sized>(
        &mut self,
        sink: &mut S,
        lfsr: &mut Lfsr127,
    ) -> Result<usize> {
        let mut count = 0;
        while let Some(frame) = self.next_frame()? {
            trace!(len = frame.len(), "dispatching frame");
            if self.config.randomized {
                rand_cobs_parse(&frame, sink, lfsr)?;
            } else {
                cobs_parse(&frame, sink)?;
            }
            count += 1;
        }
        Ok(count)
    }

    /// Number of bytes waiting for a delimiter.
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// Drop any partially received frame.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Update the maximum frame size for subsequent decoding.
    pub fn set_max_frame_size(&mut self, max_frame_size: usize) {
        self.config.max_frame_size = max_frame_size;
    }

    /// Current decoder configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}
