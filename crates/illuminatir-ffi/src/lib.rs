//! illuminatir-ffi: C-ABI exports for the IlluminatIR packet codec.
//!
//! The exports mirror the classic C library: caller-owned buffers, in/out
//! size parameters and plain function-pointer callbacks. The generator used
//! by the `rand` exports is thread-local.

mod args;
mod cobs;
mod error;
mod packet;
mod rand;
mod sink;
mod types;

use std::panic::AssertUnwindSafe;

pub use cobs::{
    illuminatir_cobs_build_config, illuminatir_cobs_build_offset_array, illuminatir_cobs_decode,
    illuminatir_cobs_encode, illuminatir_cobs_parse,
};
pub use packet::{
    illuminatir_build_config, illuminatir_build_offset_array, illuminatir_crc8,
    illuminatir_error_to_string, illuminatir_parse,
};
pub use rand::{
    illuminatir_lfsr127_init, illuminatir_lfsr127_uint8, illuminatir_rand,
    illuminatir_rand_cobs_build_config, illuminatir_rand_cobs_build_offset_array,
    illuminatir_rand_cobs_parse,
};
pub use types::{
    IlluminatirError, IlluminatirSetChannelFn, IlluminatirSetConfigFn,
    ILLUMINATIR_CRC8_INITIAL_SEED, ILLUMINATIR_ERROR_BUFFER_OVERFLOW,
    ILLUMINATIR_ERROR_INVALID_CRC, ILLUMINATIR_ERROR_INVALID_SIZE, ILLUMINATIR_ERROR_NONE,
    ILLUMINATIR_ERROR_NULL_POINTER, ILLUMINATIR_ERROR_PACKET_TOO_LONG,
    ILLUMINATIR_ERROR_PACKET_TOO_SHORT, ILLUMINATIR_ERROR_UNKNOWN,
    ILLUMINATIR_ERROR_UNSUPPORTED_FORMAT, ILLUMINATIR_ERROR_UNSUPPORTED_VERSION,
    ILLUMINATIR_MAX_PACKET_SIZE, ILLUMINATIR_MIN_PACKET_SIZE, ILLUMINATIR_OFFSETARRAY_MAX_VALUES,
    ILLUMINATIR_OFFSETARRAY_MIN_VALUES,
};

fn ffi_boundary<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error::set_panic_error();
            on_panic
        }
    }
}

/// Detailed message for the last failed call on this thread, or an empty string.
#[no_mangle]
pub extern "C" fn illuminatir_last_error() -> *const std::os::raw::c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}
