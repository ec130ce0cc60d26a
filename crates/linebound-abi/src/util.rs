//! Shared internal utilities for ABI adapters.

use std::ffi::c_char;

/// Scan a C string with a hard bound.
///
/// Returns `(len, terminated)` where `len` is the byte length before the
/// first NUL or before the bound, and `terminated` says whether a NUL was seen.
///
/// # Safety
///
/// `ptr` must be valid to read up to the discovered length (at most `bound`).
pub unsafe fn scan_c_string(ptr: *const c_char, bound: usize) -> (usize, bool) {
    for i in 0..bound {
        if unsafe { *ptr.add(i) } == 0 {
            return (i, true);
        }
    }
    (bound, false)
}

/// Content bytes of the C string at `ptr`, reading at most `bound` bytes.
/// Null yields an empty slice.
///
/// # Safety
///
/// `ptr` must be null or valid to read `bound` bytes for the lifetime `'a`,
/// with no concurrent writes.
pub unsafe fn c_str_bytes<'a>(ptr: *const c_char, bound: usize) -> &'a [u8] {
    if ptr.is_null() {
        return &[];
    }
    let (len, _) = unsafe { scan_c_string(ptr, bound) };
    // SAFETY: the scan above proved `len` bytes are readable.
    unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len) }
}
