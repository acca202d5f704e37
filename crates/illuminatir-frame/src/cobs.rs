//! Consistent Overhead Byte Stuffing.
//!
//! Encoding replaces every 0x00 byte with a code byte holding the distance to
//! the next zero, so the encoded output never contains 0x00 and a single zero
//! can terminate a frame. Runs are capped at 254 data bytes (code 0xff), which
//! bounds the overhead to one byte per 254 input bytes.

/// Largest possible encoded size of `src_len` input bytes.
pub const fn encoded_max(src_len: usize) -> usize {
    src_len + src_len.div_ceil(254)
}

/// Largest possible decoded size of `src_len` encoded bytes.
pub const fn decoded_max(src_len: usize) -> usize {
    src_len.saturating_sub(1)
}

/// Encode `src` into `dst` and return the encoded length.
///
/// Returns `None` if `src` is empty or `dst` is shorter than
/// [`encoded_max`]`(src.len())`. No delimiter is appended.
pub fn encode(src: &[u8], dst: &mut [u8]) -> Option<usize> {
    if src.is_empty() || dst.len() < encoded_max(src.len()) {
        return None;
    }

    let mut code_pos = 0;
    let mut out = 1;
    let mut code: u8 = 1;

    for (i, &byte) in src.iter().enumerate() {
        if byte != 0 {
            dst[out] = byte;
            out += 1;
            code += 1;
        }
        if byte == 0 || code == 0xff {
            dst[code_pos] = code;
            code = 1;
            code_pos = out;
            // A full run at the very end needs no trailing code byte.
            if byte == 0 || i + 1 < src.len() {
                out += 1;
            }
        }
    }

    if code_pos < out {
        dst[code_pos] = code;
    }
    Some(out)
}

/// Decode `src` into `dst` and return the decoded length.
///
/// Stops at a 0x00 delimiter or the end of `src`. Returns `None` if `src` is
/// empty or `dst` is shorter than [`decoded_max`]`(src.len())`.
///
/// A delimiter ends the frame without emitting the zero implied by the
/// preceding block, so `03 11 22 00` decodes to `11 22`. The C reference
/// decoder writes that zero and yields `11 22 00`; vectors ported from it
/// need the trailing zero dropped.
pub fn decode(src: &[u8], dst: &mut [u8]) -> Option<usize> {
    if src.is_empty() || dst.len() < decoded_max(src.len()) {
        return None;
    }

    let mut pos = 0;
    let mut out = 0;
    let mut zero_pending = false;

    while pos < src.len() {
        let code = src[pos];
        pos += 1;
        if code == 0 {
            break;
        }
        if zero_pending {
            dst[out] = 0;
            out += 1;
        }

        let block = (code as usize - 1).min(src.len() - pos);
        dst[out..out + block].copy_from_slice(&src[pos..pos + block]);
        out += block;
        pos += block;
        zero_pending = code != 0xff;
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_encode(decoded: &[u8], encoded: &[u8]) {
        let mut dst = vec![0u8; encoded_max(decoded.len())];
        assert!(encoded.len() <= dst.len());
        let n = encode(decoded, &mut dst).expect("encode should succeed");
        assert_eq!(&dst[..n], encoded);
    }

    fn check_decode(encoded: &[u8], decoded: &[u8]) {
        let mut dst = vec![0u8; decoded_max(encoded.len())];
        let n = decode(encoded, &mut dst).expect("decode should succeed");
        assert_eq!(&dst[..n], decoded);
    }

    fn check_both(decoded: &[u8], encoded: &[u8]) {
        check_encode(decoded, encoded);
        check_decode(encoded, decoded);
    }

    #[test]
    fn size_bounds() {
        assert_eq!(encoded_max(0), 0);
        assert_eq!(encoded_max(1), 2);
        assert_eq!(encoded_max(19), 20);
        assert_eq!(encoded_max(254), 255);
        assert_eq!(encoded_max(255), 257);
        assert_eq!(decoded_max(0), 0);
        assert_eq!(decoded_max(1), 0);
        assert_eq!(decoded_max(20), 19);
    }

    #[test]
    fn empty_input_fails() {
        let mut dst = [0u8; 4];
        assert_eq!(encode(&[], &mut dst), None);
        assert_eq!(decode(&[], &mut dst), None);
    }

    #[test]
    fn undersized_destination_fails() {
        let mut dst = [0u8; 2];
        assert_eq!(encode(&[1, 2], &mut dst), None);
        assert_eq!(decode(&[0x04, 1, 2, 3], &mut dst), None);
    }

    #[test]
    fn single_byte() {
        check_both(&[0xa5], &[0x02, 0xa5]);
    }

    #[test]
    fn reference_examples() {
        check_both(&[0x00], &[0x01, 0x01]);
        check_both(&[0x00, 0x00], &[0x01, 0x01, 0x01]);
        check_both(&[0x11, 0x22, 0x00, 0x33], &[0x03, 0x11, 0x22, 0x02, 0x33]);
        check_both(&[0x11, 0x22, 0x33, 0x44], &[0x05, 0x11, 0x22, 0x33, 0x44]);
        check_both(&[0x11, 0x00, 0x00, 0x00], &[0x02, 0x11, 0x01, 0x01, 0x01]);
    }

    #[test]
    fn full_run_of_254() {
        let decoded: Vec<u8> = (1..=254u8).collect();
        let mut encoded = vec![0xff];
        encoded.extend(1..=254u8);
        check_both(&decoded, &encoded);
    }

    #[test]
    fn leading_zero_then_full_run() {
        let decoded: Vec<u8> = (0..=254u8).collect();
        let mut encoded = vec![0x01, 0xff];
        encoded.extend(1..=254u8);
        check_both(&decoded, &encoded);
    }

    #[test]
    fn full_run_then_trailing_byte() {
        let decoded: Vec<u8> = (1..=255u8).collect();
        let mut encoded = vec![0xff];
        encoded.extend(1..=254u8);
        encoded.extend([0x02, 0xff]);
        check_both(&decoded, &encoded);
    }

    #[test]
    fn full_run_then_trailing_zero() {
        let mut decoded: Vec<u8> = (2..=255u8).collect();
        decoded.push(0);
        let mut encoded = vec![0xff];
        encoded.extend(2..=255u8);
        encoded.extend([0x01, 0x01]);
        check_both(&decoded, &encoded);
    }

    #[test]
    fn zero_inside_second_run() {
        let mut decoded: Vec<u8> = (3..=255u8).collect();
        decoded.extend([0x00, 0x01]);
        let mut encoded = vec![0xfe];
        encoded.extend(3..=255u8);
        encoded.extend([0x02, 0x01]);
        check_both(&decoded, &encoded);
    }

    #[test]
    fn decode_stops_at_delimiter() {
        let mut dst = [0u8; 8];
        let n = decode(&[0x03, 0x11, 0x22, 0x00, 0x02, 0x33], &mut dst).unwrap();
        assert_eq!(&dst[..n], &[0x11, 0x22]);
    }

    #[test]
    fn delimiter_adds_no_trailing_zero() {
        let mut dst = [0u8; 8];
        let n = decode(&[0x03, 0x11, 0x22, 0x00], &mut dst).unwrap();
        assert_eq!(&dst[..n], &[0x11, 0x22]);

        // A delimited packet frame still decodes to the bare packet.
        let n = decode(&[0x01, 0x04, 0x08, 0x2a, 0xaa, 0x00], &mut dst).unwrap();
        assert_eq!(&dst[..n], &[0x00, 0x08, 0x2a, 0xaa]);
    }

    #[test]
    fn decode_truncated_block_copies_what_is_there() {
        let mut dst = [0u8; 8];
        let n = decode(&[0x05, 0x11, 0x22], &mut dst).unwrap();
        assert_eq!(&dst[..n], &[0x11, 0x22]);
    }

    #[test]
    fn encoded_output_has_no_zero_bytes() {
        let src = [0u8; 40];
        let mut dst = [0u8; 41];
        let n = encode(&src, &mut dst).unwrap();
        assert_eq!(n, 41);
        assert!(dst[..n].iter().all(|&b| b != 0));
    }

    #[test]
    fn roundtrip_many_shapes() {
        let mut shapes: Vec<Vec<u8>> = vec![
            vec![0; 1],
            vec![0; 300],
            vec![0xff; 253],
            vec![0xff; 254],
            vec![0xff; 255],
            vec![0x01; 508],
            vec![0x01; 509],
        ];
        shapes.push((0..600u32).map(|i| (i % 7) as u8).collect());
        shapes.push((0..600u32).map(|i| (i * 31 % 256) as u8).collect());

        for src in shapes {
            let mut enc = vec![0u8; encoded_max(src.len())];
            let n = encode(&src, &mut enc).unwrap();
            assert!(n <= encoded_max(src.len()));
            assert!(enc[..n].iter().all(|&b| b != 0));

            let mut dec = vec![0u8; decoded_max(n)];
            let m = decode(&enc[..n], &mut dec).unwrap();
            assert_eq!(&dec[..m], src.as_slice(), "len {}", src.len());
        }
    }
}
