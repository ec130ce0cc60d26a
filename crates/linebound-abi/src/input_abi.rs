//! ABI layer for the name readers.
//!
//! Exports the caller-owned reader (`ask_name`), the callee-allocated reader
//! (`ask_name_malloc`) and its release (`free_name`). Each export binds the
//! process stdio and global registry, then delegates to an `*_in` function
//! that takes those collaborators explicitly, which is what the tests and the
//! demo driver call.
//!
//! Buffers from `ask_name_malloc` come from libc `calloc` and must be
//! released with `free_name`, which keeps the allocation registry current.
//! The `try_*_in` functions return the stored [`LineCopy`] or the
//! [`LineError`] instead of a bool or null.

use std::ffi::c_char;
use std::io::{self, Write};
use std::ptr::NonNull;

use linebound_core::{LineCopy, LineError, LineReader, ReadCapacity, Session};
use linebound_membrane::{AllocationRegistry, ReleaseOutcome, SafetyLevel};
use linebound_membrane::{global_registry, safety_level};

/// Written to the diagnostic stream when the line buffer cannot be allocated.
pub const ALLOC_FAILED_MSG: &str = "Failed to allocate memory";

/// Written to the diagnostic stream when no line could be read.
pub const READ_FAILED_MSG: &str = "Error reading input";

/// Write the diagnostic line for `err` to `diag`.
///
/// Allocation failures print [`ALLOC_FAILED_MSG`], everything else
/// [`READ_FAILED_MSG`].
pub fn report(diag: &mut dyn Write, err: &LineError) {
    let msg = if err.is_allocation_failure() {
        ALLOC_FAILED_MSG
    } else {
        READ_FAILED_MSG
    };
    let _ = writeln!(diag, "{msg}");
}

/// Caller-owned read into `name[..size]`, reporting what was stored.
///
/// Sizes above `READ_LIMIT_MAX` are clamped, so only the first
/// `READ_LIMIT_MAX` bytes of the buffer are ever touched. A zero `size`
/// fails with [`LineError::ZeroCapacity`] before anything is read. On error
/// the buffer is unchanged.
///
/// # Safety
///
/// `name` must be valid for writes of `min(size, READ_LIMIT_MAX)` bytes, and
/// not aliased for the duration of the call.
pub unsafe fn try_ask_name_in<L: LineReader, W: Write>(
    session: &mut Session<L, W>,
    name: NonNull<c_char>,
    size: usize,
) -> Result<LineCopy, LineError> {
    let capacity = ReadCapacity::new(size)?;
    // SAFETY: caller guarantees `name` is writable for the clamped capacity.
    let buf = unsafe {
        std::slice::from_raw_parts_mut(name.as_ptr().cast::<u8>(), capacity.effective())
    };
    session.read_line_into(buf)
}

/// Caller-owned read into `name[..size]`.
///
/// Returns true when a line was stored. A null `name` or zero `size` does
/// nothing and reports nothing; read failures are reported to `diag`.
///
/// # Safety
///
/// `name` must be null or satisfy the contract of [`try_ask_name_in`].
pub unsafe fn ask_name_in<L: LineReader, W: Write>(
    session: &mut Session<L, W>,
    diag: &mut dyn Write,
    name: *mut c_char,
    size: usize,
) -> bool {
    let Some(name) = NonNull::new(name) else {
        return false;
    };
    // SAFETY: forwarded caller contract.
    match unsafe { try_ask_name_in(session, name, size) } {
        Ok(_) => true,
        Err(LineError::ZeroCapacity) => false,
        Err(err) => {
            report(diag, &err);
            false
        }
    }
}

/// Callee-allocated read: `calloc(size, 1)`, fill, and hand the pointer over
/// together with what was stored.
///
/// The allocation is registered in `registry` as soon as it exists. If the
/// read fails it is marked released and freed before the error is returned,
/// so a failed call leaves nothing outstanding. Allocation failure returns
/// [`LineError::Allocation`] without touching the input stream.
pub fn try_ask_name_malloc_in<L: LineReader, W: Write>(
    session: &mut Session<L, W>,
    registry: &AllocationRegistry,
    size: usize,
) -> Result<(NonNull<c_char>, LineCopy), LineError> {
    let capacity = ReadCapacity::new(size)?;

    // SAFETY: plain libc allocation; null is handled below.
    let raw = unsafe { libc::calloc(size, 1) }.cast::<c_char>();
    let ptr = NonNull::new(raw).ok_or(LineError::Allocation { requested: size })?;
    registry.register_allocation(ptr.as_ptr() as usize, size);

    // SAFETY: `ptr` is a fresh zeroed allocation of at least `size` bytes and
    // the clamped capacity never exceeds it.
    let buf = unsafe {
        std::slice::from_raw_parts_mut(ptr.as_ptr().cast::<u8>(), capacity.effective())
    };
    match session.read_line_into(buf) {
        Ok(copy) => Ok((ptr, copy)),
        Err(err) => {
            registry.mark_released(ptr.as_ptr() as usize);
            // SAFETY: `ptr` came from calloc above and was never handed out.
            unsafe { libc::free(ptr.as_ptr().cast()) };
            Err(err)
        }
    }
}

/// Callee-allocated read returning the buffer or null.
///
/// Failures other than a zero `size` are reported to `diag`.
pub fn ask_name_malloc_in<L: LineReader, W: Write>(
    session: &mut Session<L, W>,
    registry: &AllocationRegistry,
    diag: &mut dyn Write,
    size: usize,
) -> *mut c_char {
    match try_ask_name_malloc_in(session, registry, size) {
        Ok((ptr, _)) => ptr.as_ptr(),
        Err(LineError::ZeroCapacity) => std::ptr::null_mut(),
        Err(err) => {
            report(diag, &err);
            std::ptr::null_mut()
        }
    }
}

/// Release a buffer returned by [`ask_name_malloc_in`].
///
/// Null is a no-op. In [`SafetyLevel::Strict`] every other pointer is freed
/// (releasing twice is undefined behavior, as with `free`). In
/// [`SafetyLevel::Hardened`] only pointers the registry tracks as live are
/// freed; the rest are reported to `diag` and ignored.
///
/// Returns the registry's view of the release.
///
/// # Safety
///
/// In strict mode `name` must be null or a live pointer obtained from the
/// libc allocator.
pub unsafe fn free_name_in(
    registry: &AllocationRegistry,
    level: SafetyLevel,
    diag: &mut dyn Write,
    name: *mut c_char,
) -> Option<ReleaseOutcome> {
    if name.is_null() {
        return None;
    }
    let outcome = registry.mark_released(name as usize);
    if outcome != ReleaseOutcome::Released && level.guards_release() {
        let _ = writeln!(
            diag,
            "free_name: ignoring {} pointer {name:p}",
            match outcome {
                ReleaseOutcome::AlreadyReleased => "already released",
                _ => "untracked",
            }
        );
        return Some(outcome);
    }
    // SAFETY: caller contract; in hardened mode the registry vouched for it.
    unsafe { libc::free(name.cast()) };
    Some(outcome)
}

/// C `ask_name`: prompt on stdout, read one line from stdin into `name`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ask_name(name: *mut c_char, size: usize) {
    let mut session = Session::stdio();
    let mut diag = io::stderr();
    // SAFETY: forwarded caller contract.
    unsafe { ask_name_in(&mut session, &mut diag, name, size) };
}

/// C `ask_name_malloc`: allocate `size` bytes and read one line into them.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ask_name_malloc(size: usize) -> *mut c_char {
    let mut session = Session::stdio();
    let mut diag = io::stderr();
    ask_name_malloc_in(&mut session, global_registry(), &mut diag, size)
}

/// C `free_name`: release a buffer from `ask_name_malloc`. Null is ignored.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn free_name(name: *mut c_char) {
    let mut diag = io::stderr();
    // SAFETY: forwarded caller contract.
    unsafe { free_name_in(global_registry(), safety_level(), &mut diag, name) };
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::util::c_str_bytes;

    fn session(input: &[u8]) -> Session<Cursor<Vec<u8>>, Vec<u8>> {
        Session::new(Cursor::new(input.to_vec()), Vec::new())
    }

    #[test]
    fn ask_name_ignores_null_and_zero_size() {
        let mut s = session(b"Ada\n");
        let mut diag = Vec::new();
        let mut buf = [0x41 as c_char; 4];

        assert!(!unsafe { ask_name_in(&mut s, &mut diag, std::ptr::null_mut(), 4) });
        assert!(!unsafe { ask_name_in(&mut s, &mut diag, buf.as_mut_ptr(), 0) });
        assert_eq!(buf, [0x41 as c_char; 4]);
        assert!(diag.is_empty());

        // The line was not consumed by the rejected calls.
        assert!(unsafe { ask_name_in(&mut s, &mut diag, buf.as_mut_ptr(), buf.len()) });
        assert_eq!(unsafe { c_str_bytes(buf.as_ptr(), buf.len()) }, b"Ada");
    }

    #[test]
    fn try_variants_report_truncation() {
        let registry = AllocationRegistry::new();
        let mut s = session(b"Grace Hopper\nGrace Hopper\n");
        let mut buf = [0 as c_char; 8];

        let name = NonNull::from(&mut buf).cast::<c_char>();
        let copy = unsafe { try_ask_name_in(&mut s, name, buf.len()) }.unwrap();
        assert_eq!(copy.len, 7);
        assert!(copy.truncated);

        let (p, copy) = try_ask_name_malloc_in(&mut s, &registry, 8).unwrap();
        assert_eq!(copy.len, 7);
        assert!(copy.truncated);
        assert_eq!(unsafe { c_str_bytes(p.as_ptr(), 8) }, b"Grace H");
        unsafe { free_name_in(&registry, SafetyLevel::Strict, &mut Vec::<u8>::new(), p.as_ptr()) };
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn try_malloc_names_the_failure() {
        let registry = AllocationRegistry::new();
        let mut s = session(b"");
        assert!(matches!(
            try_ask_name_malloc_in(&mut s, &registry, usize::MAX),
            Err(LineError::Allocation { requested }) if requested == usize::MAX
        ));
        assert!(matches!(
            try_ask_name_malloc_in(&mut s, &registry, 8),
            Err(LineError::EndOfStream)
        ));
        assert!(matches!(
            try_ask_name_malloc_in(&mut s, &registry, 0),
            Err(LineError::ZeroCapacity)
        ));
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn malloc_then_free_leaves_nothing_live() {
        let registry = AllocationRegistry::new();
        let mut s = session(b"Grace\n");
        let mut diag = Vec::new();

        let p = ask_name_malloc_in(&mut s, &registry, &mut diag, 16);
        assert!(!p.is_null());
        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.live_bytes(), 16);

        let outcome = unsafe { free_name_in(&registry, SafetyLevel::Strict, &mut diag, p) };
        assert_eq!(outcome, Some(ReleaseOutcome::Released));
        assert_eq!(registry.live_count(), 0);
    }
}
