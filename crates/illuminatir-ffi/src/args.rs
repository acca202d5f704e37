use crate::error;

/// Convert an optional byte pointer + length into a slice.
///
/// # Safety
/// If `len > 0`, `data` must be non-null and readable for `len` bytes.
pub(crate) unsafe fn bytes_arg<'a>(data: *const u8, len: usize, name: &str) -> Option<&'a [u8]> {
    if len == 0 {
        return Some(&[]);
    }
    if data.is_null() {
        let _ = error::null_pointer(name);
        return None;
    }

    // SAFETY: Pointer and length are validated above and owned by caller for the call duration.
    Some(unsafe { std::slice::from_raw_parts(data, len) })
}

/// Convert a required input buffer into a slice; null is rejected even when `len == 0`.
///
/// # Safety
/// `data` must be null or readable for `len` bytes.
pub(crate) unsafe fn required_bytes_arg<'a>(
    data: *const u8,
    len: usize,
    name: &str,
) -> Option<&'a [u8]> {
    if data.is_null() {
        let _ = error::null_pointer(name);
        return None;
    }

    // SAFETY: Non-null checked above; the caller guarantees `len` readable bytes.
    Some(unsafe { std::slice::from_raw_parts(data, len) })
}

/// Convert a required output buffer into a mutable slice.
///
/// # Safety
/// `data` must be null or writable for `len` bytes, and not aliased for the call duration.
pub(crate) unsafe fn out_bytes_arg<'a>(
    data: *mut u8,
    len: usize,
    name: &str,
) -> Option<&'a mut [u8]> {
    if data.is_null() {
        let _ = error::null_pointer(name);
        return None;
    }

    // SAFETY: Non-null checked above; the caller guarantees `len` writable bytes.
    Some(unsafe { std::slice::from_raw_parts_mut(data, len) })
}

/// Borrow an in/out size parameter.
///
/// # Safety
/// `size` must be null or a valid, writable pointer.
pub(crate) unsafe fn size_arg<'a>(size: *mut u8, name: &str) -> Option<&'a mut u8> {
    if size.is_null() {
        let _ = error::null_pointer(name);
        return None;
    }

    // SAFETY: Non-null checked above; validity is guaranteed by the caller.
    Some(unsafe { &mut *size })
}
