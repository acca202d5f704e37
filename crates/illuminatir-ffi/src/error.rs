use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use illuminatir_packet::{ErrorCode, PacketError, Result};

use crate::types::IlluminatirError;

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::default());
}

pub(crate) fn clear_error_state() {
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::default();
    });
}

pub(crate) fn set_error_message(message: impl Into<String>) {
    let message = message.into();
    let sanitized = message.replace('\0', "?");
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::new(sanitized).unwrap_or_default();
    });
}

pub(crate) fn set_panic_error() {
    set_error_message("panic across FFI boundary");
}

pub(crate) fn null_pointer(name: &str) -> IlluminatirError {
    set_error_message(format!("{name} cannot be null"));
    IlluminatirError::NullPointer
}

pub(crate) fn map_packet_error(err: &PacketError) -> IlluminatirError {
    set_error_message(err.to_string());
    err.code().into()
}

/// Collapse a result into a status code, recording the detailed message.
pub(crate) fn status<T>(result: &Result<T>) -> IlluminatirError {
    match result {
        Ok(_) => IlluminatirError::None,
        Err(err) => map_packet_error(err),
    }
}

pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|state| state.borrow().as_ptr())
}

/// Static, NUL-terminated description of a raw status value.
pub(crate) fn description(code: i32) -> Option<&'static CStr> {
    let code = u8::try_from(code).ok()?;
    let text: &'static CStr = match ErrorCode::try_from(code).ok()? {
        ErrorCode::None => c"None",
        ErrorCode::Unknown => c"Unknown",
        ErrorCode::NullPointer => c"Null Pointer",
        ErrorCode::BufferOverflow => c"Buffer overflow",
        ErrorCode::PacketTooShort => c"Packet too short to be valid",
        ErrorCode::PacketTooLong => c"Packet too long",
        ErrorCode::UnsupportedVersion => c"Unsupported version",
        ErrorCode::UnsupportedFormat => c"Unsupported format",
        ErrorCode::InvalidSize => c"Invalid size",
        ErrorCode::InvalidCrc => c"Invalid CRC",
    };
    Some(text)
}
