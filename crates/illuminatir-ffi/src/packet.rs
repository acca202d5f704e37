use std::os::raw::{c_char, c_int};

use illuminatir_packet::{build_config, build_offset_array, crc8, parse, PacketError, Result};

use crate::args;
use crate::error;
use crate::sink::CallbackSink;
use crate::types::{IlluminatirError, IlluminatirSetChannelFn, IlluminatirSetConfigFn};

/// Report the written length, or the required length on overflow.
pub(crate) fn write_size(size: &mut u8, result: &Result<usize>) {
    match result {
        Ok(len) => *size = *len as u8,
        Err(PacketError::BufferOverflow { required, .. }) => *size = *required as u8,
        Err(_) => {}
    }
}

/// Static description of a status code, or null for values outside the enum.
#[no_mangle]
pub extern "C" fn illuminatir_error_to_string(err: c_int) -> *const c_char {
    crate::ffi_boundary(std::ptr::null(), || {
        error::description(err).map_or(std::ptr::null(), |text| text.as_ptr())
    })
}

/// Parse one or more concatenated raw packets.
///
/// # Safety
/// `packet` must be non-null and readable for `packet_size` bytes. Callbacks may be null.
#[no_mangle]
pub unsafe extern "C" fn illuminatir_parse(
    packet: *const u8,
    packet_size: u8,
    set_channel: IlluminatirSetChannelFn,
    set_config: IlluminatirSetConfigFn,
) -> IlluminatirError {
    crate::ffi_boundary(IlluminatirError::Unknown, || {
        error::clear_error_state();

        let packets = {
            // SAFETY: We validate null in helper; length is guaranteed by the caller.
            match unsafe { args::required_bytes_arg(packet, packet_size as usize, "packet") } {
                Some(v) => v,
                None => return IlluminatirError::NullPointer,
            }
        };

        let mut sink = CallbackSink {
            set_channel,
            set_config,
        };
        error::status(&parse(packets, &mut sink))
    })
}

/// Build an offset-array packet.
///
/// On entry `*packet_size` is the capacity of `packet`; on success it holds the packet length,
/// on `BufferOverflow` the required length.
///
/// # Safety
/// `packet` must be writable for `*packet_size` bytes and `packet_size` must be a valid pointer.
/// If `values_size > 0`, `values` must be readable for `values_size` bytes.
#[no_mangle]
pub unsafe extern "C" fn illuminatir_build_offset_array(
    packet: *mut u8,
    packet_size: *mut u8,
    offset: u8,
    values: *const u8,
    values_size: u8,
) -> IlluminatirError {
    crate::ffi_boundary(IlluminatirError::Unknown, || {
        error::clear_error_state();

        // SAFETY: Each helper validates null; the caller guarantees sizes.
        let (size, values) = match unsafe {
            (
                args::size_arg(packet_size, "packet_size"),
                args::bytes_arg(values, values_size as usize, "values"),
            )
        } {
            (Some(size), Some(values)) => (size, values),
            _ => return IlluminatirError::NullPointer,
        };
        let dst = {
            // SAFETY: Null is validated in helper; capacity is guaranteed by the caller.
            match unsafe { args::out_bytes_arg(packet, *size as usize, "packet") } {
                Some(v) => v,
                None => return IlluminatirError::NullPointer,
            }
        };

        let result = build_offset_array(dst, offset, values);
        write_size(size, &result);
        error::status(&result)
    })
}

/// Build a configuration packet.
///
/// `*packet_size` is updated as for [`illuminatir_build_offset_array`].
///
/// # Safety
/// `packet` must be writable for `*packet_size` bytes and `packet_size` must be a valid pointer.
/// `key` and `values` must be readable for `key_len` and `values_size` bytes when non-empty.
#[no_mangle]
pub unsafe extern "C" fn illuminatir_build_config(
    packet: *mut u8,
    packet_size: *mut u8,
    key: *const c_char,
    key_len: u8,
    values: *const u8,
    values_size: u8,
) -> IlluminatirError {
    crate::ffi_boundary(IlluminatirError::Unknown, || {
        error::clear_error_state();

        // SAFETY: Each helper validates null; the caller guarantees sizes.
        let (size, key, values) = match unsafe {
            (
                args::size_arg(packet_size, "packet_size"),
                args::bytes_arg(key as *const u8, key_len as usize, "key"),
                args::bytes_arg(values, values_size as usize, "values"),
            )
        } {
            (Some(size), Some(key), Some(values)) => (size, key, values),
            _ => return IlluminatirError::NullPointer,
        };
        let dst = {
            // SAFETY: Null is validated in helper; capacity is guaranteed by the caller.
            match unsafe { args::out_bytes_arg(packet, *size as usize, "packet") } {
                Some(v) => v,
                None => return IlluminatirError::NullPointer,
            }
        };

        let result = build_config(dst, key, values);
        write_size(size, &result);
        error::status(&result)
    })
}

/// CRC-8/KOOP over `data`, continuing from `crc`.
///
/// Returns `crc` unchanged if `data` is null.
///
/// # Safety
/// If `data_size > 0`, `data` must be readable for `data_size` bytes.
#[no_mangle]
pub unsafe extern "C" fn illuminatir_crc8(data: *const u8, data_size: usize, crc: u8) -> u8 {
    crate::ffi_boundary(crc, || {
        // SAFETY: Pointer/length pairing is validated in helper.
        match unsafe { args::bytes_arg(data, data_size, "data") } {
            Some(data) => crc8(data, crc),
            None => crc,
        }
    })
}
