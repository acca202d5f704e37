use std::cell::RefCell;
use std::os::raw::c_char;

use illuminatir_frame::{framed, randomize, Lfsr127, MAX_DECODED_FRAME_SIZE};
use illuminatir_packet::parse;

use crate::args;
use crate::cobs::build_frame;
use crate::error;
use crate::sink::CallbackSink;
use crate::types::{IlluminatirError, IlluminatirSetChannelFn, IlluminatirSetConfigFn};

thread_local! {
    static LFSR: RefCell<Lfsr127> = RefCell::new(Lfsr127::default());
}

fn with_lfsr<T>(f: impl FnOnce(&mut Lfsr127) -> T) -> T {
    LFSR.with(|lfsr| f(&mut lfsr.borrow_mut()))
}

/// Reseed this thread's generator; 0 is treated as 1.
#[no_mangle]
pub extern "C" fn illuminatir_lfsr127_init(seed: u8) {
    crate::ffi_boundary((), || with_lfsr(|lfsr| lfsr.reseed(seed)));
}

/// Next pseudo-random byte from this thread's generator.
#[no_mangle]
pub extern "C" fn illuminatir_lfsr127_uint8() -> u8 {
    crate::ffi_boundary(0, || with_lfsr(|lfsr| lfsr.next_byte()))
}

/// Whiten (or un-whiten) a packet buffer in place. Null or short buffers are ignored.
///
/// # Safety
/// `packets` must be null or writable for `size` bytes.
#[no_mangle]
pub unsafe extern "C" fn illuminatir_rand(packets: *mut u8, size: usize) {
    crate::ffi_boundary((), || {
        if packets.is_null() {
            return;
        }
        // SAFETY: Non-null checked above; the caller guarantees `size` writable bytes.
        let packets = unsafe { std::slice::from_raw_parts_mut(packets, size) };
        with_lfsr(|lfsr| randomize(packets, lfsr));
    });
}

/// Decode a whitened COBS frame and parse the packets it contains.
///
/// # Safety
/// `rand_cobs_packets` must be non-null and readable for `rand_cobs_packets_size` bytes.
#[no_mangle]
pub unsafe extern "C" fn illuminatir_rand_cobs_parse(
    rand_cobs_packets: *const u8,
    rand_cobs_packets_size: u8,
    set_channel: IlluminatirSetChannelFn,
    set_config: IlluminatirSetConfigFn,
) -> IlluminatirError {
    crate::ffi_boundary(IlluminatirError::Unknown, || {
        error::clear_error_state();
        // SAFETY: Null is validated in helper; length is guaranteed by the caller.
        let Some(frame) = (unsafe {
            args::required_bytes_arg(
                rand_cobs_packets,
                rand_cobs_packets_size as usize,
                "rand_cobs_packets",
            )
        }) else {
            return IlluminatirError::NullPointer;
        };

        // The generator must not stay borrowed while callbacks run, since they
        // may call back into this library.
        let mut buf = [0u8; MAX_DECODED_FRAME_SIZE];
        let unmasked = with_lfsr(|lfsr| {
            framed::rand_cobs_unmask(frame, &mut buf, lfsr).map(|packets| packets.len())
        });
        let packets = match unmasked {
            Ok(len) => &buf[..len],
            Err(err) => return error::map_packet_error(&err),
        };

        let mut sink = CallbackSink {
            set_channel,
            set_config,
        };
        error::status(&parse(packets, &mut sink))
    })
}

/// Build a whitened, COBS-encoded offset-array packet.
///
/// `*rand_cobs_packet_size` is updated as for `illuminatir_cobs_build_offset_array`.
///
/// # Safety
/// `rand_cobs_packet` must be writable for `*rand_cobs_packet_size` bytes and
/// `rand_cobs_packet_size` must be a valid pointer. If `values_size > 0`, `values` must be
/// readable for `values_size` bytes.
#[no_mangle]
pub unsafe extern "C" fn illuminatir_rand_cobs_build_offset_array(
    rand_cobs_packet: *mut u8,
    rand_cobs_packet_size: *mut u8,
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
            build_frame(rand_cobs_packet, rand_cobs_packet_size, |dst| {
                with_lfsr(|lfsr| framed::rand_cobs_build_offset_array(dst, offset, values, lfsr))
            })
        }
    })
}

/// Build a whitened, COBS-encoded configuration packet.
///
/// # Safety
/// As for [`illuminatir_rand_cobs_build_offset_array`]; `key` must be readable for `key_len`
/// bytes when `key_len > 0`.
#[no_mangle]
pub unsafe extern "C" fn illuminatir_rand_cobs_build_config(
    rand_cobs_packet: *mut u8,
    rand_cobs_packet_size: *mut u8,
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
            build_frame(rand_cobs_packet, rand_cobs_packet_size, |dst| {
                with_lfsr(|lfsr| framed::rand_cobs_build_config(dst, key, values, lfsr))
            })
        }
    })
}
