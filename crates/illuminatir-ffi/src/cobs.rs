use std::os::raw::c_char;

use illuminatir_frame::{cobs, framed};
use illuminatir_packet::{PacketError, Result};

use crate::args;
use crate::error;
use crate::sink::CallbackSink;
use crate::types::{IlluminatirError, IlluminatirSetChannelFn, IlluminatirSetConfigFn};

/// Run a frame builder against a caller buffer described by `dst`/`dst_size`.
///
/// `*dst_size` becomes the encoded length on success and 0 when encoding failed.
///
/// # Safety
/// `dst_size` must be null or valid; `dst` must be null or writable for `*dst_size` bytes.
pub(crate) unsafe fn build_frame(
    dst: *mut u8,
    dst_size: *mut u8,
    build: impl FnOnce(&mut [u8]) -> Result<usize>,
) -> IlluminatirError {
    // SAFETY: Null is validated in helper.
    let Some(size) = (unsafe { args::size_arg(dst_size, "size") }) else {
        return IlluminatirError::NullPointer;
    };
    // SAFETY: Null is validated in helper; capacity is guaranteed by the caller.
    let Some(dst) = (unsafe { args::out_bytes_arg(dst, *size as usize, "dst") }) else {
        return IlluminatirError::NullPointer;
    };

    let result = build(dst);
    match result {
        Ok(len) => *size = len as u8,
        Err(PacketError::Unknown) => *size = 0,
        Err(_) => {}
    }
    error::status(&result)
}

/// COBS-encode `src` into `dst`; returns the encoded length or 0 on failure.
///
/// # Safety
/// `dst` must be writable for `dst_size` bytes and `src` readable for `src_size` bytes.
#[no_mangle]
pub unsafe extern "C" fn illuminatir_cobs_encode(
    dst: *mut u8,
    dst_size: usize,
    src: *const u8,
    src_size: usize,
) -> usize {
    crate::ffi_boundary(0, || {
        error::clear_error_state();
        // SAFETY: Null is validated in helpers; sizes are guaranteed by the caller.
        match unsafe {
            (
                args::out_bytes_arg(dst, dst_size, "dst"),
                args::required_bytes_arg(src, src_size, "src"),
            )
        } {
            (Some(dst), Some(src)) => cobs::encode(src, dst).unwrap_or(0),
            _ => 0,
        }
    })
}

/// COBS-decode `src` into `dst`; returns the decoded length or 0 on failure.
///
/// # Safety
/// `dst` must be writable for `dst_size` bytes and `src` readable for `src_size` bytes.
#[no_mangle]
pub unsafe extern "C" fn illuminatir_cobs_decode(
    dst: *mut u8,
    dst_size: usize,
    src: *const u8,
    src_size: usize,
) -> usize {
    crate::ffi_boundary(0, || {
        error::clear_error_state();
        // SAFETY: Null is validated in helpers; sizes are guaranteed by the caller.
        match unsafe {
            (
                args::out_bytes_arg(dst, dst_size, "dst"),
                args::required_bytes_arg(src, src_size, "src"),
            )
        } {
            (Some(dst), Some(src)) => cobs::decode(src, dst).unwrap_or(0),
            _ => 0,
        }
    })
}

/// Decode a COBS frame and parse the packets it contains.
///
/// # Safety
/// `cobs_packet` must be non-null and readable for `cobs_packet_size` bytes.
#[no_mangle]
pub unsafe extern "C" fn illuminatir_cobs_parse(
    cobs_packet: *const u8,
    cobs_packet_size: u8,
    set_channel: IlluminatirSetChannelFn,
    set_config: IlluminatirSetConfigFn,
) -> IlluminatirError {
    crate::ffi_boundary(IlluminatirError::Unknown, || {
        error::clear_error_state();
        // SAFETY: Null is validated in helper; length is guaranteed by the caller.
        let Some(frame) = (unsafe {
            args::required_bytes_arg(cobs_packet, cobs_packet_size as usize, "cobs_packet")
        }) else {
            return IlluminatirError::NullPointer;
        };

        let mut sink = CallbackSink {
            set_channel,
            set_config,
        };
        error::status(&framed::cobs_parse(frame, &mut sink))
    })
}

/// Build a COBS-encoded offset-array packet.
///
/// On entry `*cobs_packet_size` is the capacity of `cobs_packet`; afterwards it holds the
/// encoded length, or 0 if the buffer was too small.
///
/// # Safety
/// `cobs_packet` must be writable for `*cobs_packet_size` bytes and `cobs_packet_size` must be
/// a valid pointer. If `values_size > 0`, `values` must be readable for `values_size` bytes.
#[no_mangle]
pub unsafe extern "C" fn illuminatir_cobs_build_offset_array(
    cobs_packet: *mut u8,
    cobs_packet_size: *mut u8,
    offset: u8,
    values: *const u8,
    values_size: u8,
) -> IlluminatirError {
    crate::ffi_boundary(IlluminatirError::Unknown, || {
        error::clear_error_state();
        // SAFETY: Pointer/length pairing is validated in helper.
        let Some(values) = (unsafe { args::bytes_arg(values, values_size as usize, "values") })
        else {
            return IlluminatirError::NullPointer;
        };

        // SAFETY: Output pointers are forwarded with the caller's guarantees.
        unsafe {
            build_frame(cobs_packet, cobs_packet_size, |dst| {
                framed::cobs_build_offset_array(dst, offset, values)
            })
        }
    })
}

/// Build a COBS-encoded configuration packet.
///
/// `*cobs_packet_size` is updated as for [`illuminatir_cobs_build_offset_array`].
///
/// # Safety
/// As for [`illuminatir_cobs_build_offset_array`]; `key` must be readable for `key_len` bytes
/// when `key_len > 0`.
#[no_mangle]
pub unsafe extern "C" fn illuminatir_cobs_build_config(
    cobs_packet: *mut u8,
    cobs_packet_size: *mut u8,
    key: *const c_char,
    key_len: u8,
    values: *const u8,
    values_size: u8,
) -> IlluminatirError {
    crate::ffi_boundary(IlluminatirError::Unknown, || {
        error::clear_error_state();
        // SAFETY: Pointer/length pairings are validated in helper.
        let (Some(key), Some(values)) = (unsafe {
            (
                args::bytes_arg(key as *const u8, key_len as usize, "key"),
                args::bytes_arg(values, values_size as usize, "values"),
            )
        }) else {
            return IlluminatirError::NullPointer;
        };

        // SAFETY: Output pointers are forwarded with the caller's guarantees.
        unsafe {
            build_frame(cobs_packet, cobs_packet_size, |dst| {
                framed::cobs_build_config(dst, key, values)
            })
        }
    })
}

#[cfg(test)]
mod tests {
    use std::ptr;

    use super::*;
    use crate::packet::tests::{record_channel, record_config, take_recorded};

    #[test]
    fn encode_and_decode() {
        let src = [0x00, 0x00, 0x2a, 0xf2];
        let mut encoded = [0u8; 5];
        // SAFETY: Buffers are valid for the given sizes.
        let n = unsafe { illuminatir_cobs_encode(encoded.as_mut_ptr(), 5, src.as_ptr(), 4) };
        assert_eq!(n, 5);
        assert_eq!(encoded, [0x01, 0x01, 0x03, 0x2a, 0xf2]);

        let mut decoded = [0u8; 4];
        // SAFETY: Buffers are valid for the given sizes.
        let n = unsafe { illuminatir_cobs_decode(decoded.as_mut_ptr(), 4, encoded.as_ptr(), 5) };
        assert_eq!(n, 4);
        assert_eq!(decoded, src);
    }

    #[test]
    fn encode_failures_return_zero() {
        let src = [1u8, 2, 3];
        let mut dst = [0u8; 8];
        // SAFETY: Null pointers and short sizes are handled by the export.
        unsafe {
            assert_eq!(illuminatir_cobs_encode(dst.as_mut_ptr(), 3, src.as_ptr(), 3), 0);
            assert_eq!(illuminatir_cobs_encode(ptr::null_mut(), 8, src.as_ptr(), 3), 0);
            assert_eq!(illuminatir_cobs_encode(dst.as_mut_ptr(), 8, ptr::null(), 3), 0);
            assert_eq!(illuminatir_cobs_encode(dst.as_mut_ptr(), 8, src.as_ptr(), 0), 0);
            assert_eq!(illuminatir_cobs_decode(ptr::null_mut(), 8, src.as_ptr(), 3), 0);
        }
    }

    #[test]
    fn build_then_parse() {
        take_recorded();
        let mut frame = [0u8; 20];
        let mut size = frame.len() as u8;
        let values = [42u8];
        // SAFETY: Buffers are valid for the given sizes.
        let status = unsafe {
            illuminatir_cobs_build_offset_array(frame.as_mut_ptr(), &mut size, 8, values.as_ptr(), 1)
        };
        assert_eq!(status, IlluminatirError::None);
        assert_eq!(&frame[..size as usize], &[0x01, 0x04, 0x08, 0x2a, 0xaa]);

        // SAFETY: Valid buffer and callbacks.
        let status = unsafe {
            illuminatir_cobs_parse(frame.as_ptr(), size, Some(record_channel), Some(record_config))
        };
        assert_eq!(status, IlluminatirError::None);
        assert_eq!(take_recorded().0, vec![(8, 42)]);
    }

    #[test]
    fn build_config_into_small_buffer() {
        let mut frame = [0u8; 4];
        let mut size = frame.len() as u8;
        let key = b"Base";
        // SAFETY: Buffers are valid for the given sizes.
        let status = unsafe {
            illuminatir_cobs_build_config(
                frame.as_mut_ptr(),
                &mut size,
                key.as_ptr() as *const c_char,
                4,
                ptr::null(),
                0,
            )
        };
        assert_eq!(status, IlluminatirError::Unknown);
        assert_eq!(size, 0);
    }

    #[test]
    fn parse_undecodable_frame() {
        let frame = [0x01u8];
        // SAFETY: Valid buffer.
        let status = unsafe { illuminatir_cobs_parse(frame.as_ptr(), 1, None, None) };
        assert_eq!(status, IlluminatirError::Unknown);
        // SAFETY: Null is handled by the export.
        let status = unsafe { illuminatir_cobs_parse(ptr::null(), 1, None, None) };
        assert_eq!(status, IlluminatirError::NullPointer);
    }
}
