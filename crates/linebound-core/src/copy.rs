//! Truncating copy into NUL-terminated buffers.
//!
//! Every buffer-based reader funnels through [`bounded_copy`], so the bound
//! below is the only place where a write into caller storage is sized.
//!
//! Invariant: for `dest` of capacity `c >= 1`, at most `c - 1` content bytes
//! are written, followed by exactly one NUL at index `len`. Nothing at or past
//! `c` is touched.

use crate::error::LineError;

/// Largest read length honored for one line, matching the C `int` length
/// parameter of `fgets` (`INT_MAX`).
pub const READ_LIMIT_MAX: usize = i32::MAX as usize;

/// Outcome of one bounded copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCopy {
    /// Content bytes written, not counting the NUL sentinel.
    pub len: usize,
    /// True when source content was dropped because it did not fit.
    pub truncated: bool,
}

/// A validated buffer capacity.
///
/// Capacity counts the NUL sentinel, so it must be at least 1. Requests above
/// [`READ_LIMIT_MAX`] are accepted but only the first `READ_LIMIT_MAX` bytes
/// are ever used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadCapacity {
    requested: usize,
}

impl ReadCapacity {
    /// Validate a requested capacity.
    pub fn new(requested: usize) -> Result<Self, LineError> {
        if requested == 0 {
            return Err(LineError::ZeroCapacity);
        }
        Ok(Self { requested })
    }

    /// Capacity as requested by the caller.
    #[must_use]
    pub const fn requested(self) -> usize {
        self.requested
    }

    /// Capacity actually used for reads, clamped to [`READ_LIMIT_MAX`].
    #[must_use]
    pub const fn effective(self) -> usize {
        if self.requested > READ_LIMIT_MAX {
            READ_LIMIT_MAX
        } else {
            self.requested
        }
    }

    /// Maximum content length that fits in front of the sentinel.
    #[must_use]
    pub const fn max_len(self) -> usize {
        self.effective() - 1
    }

    /// True when the request exceeded the read limit.
    #[must_use]
    pub const fn is_clamped(self) -> bool {
        self.requested > READ_LIMIT_MAX
    }
}

/// Length of `src` up to (not including) its first NUL byte.
#[must_use]
pub fn content_len(src: &[u8]) -> usize {
    src.iter().position(|&b| b == 0).unwrap_or(src.len())
}

/// Copy at most `min(content_len(src), capacity - 1)` bytes of `src` into
/// `dest` and NUL-terminate immediately after them.
///
/// `capacity` is `dest.len()` clamped to [`READ_LIMIT_MAX`]. An empty `dest`
/// receives nothing, not even a sentinel.
pub fn bounded_copy(dest: &mut [u8], src: &[u8]) -> LineCopy {
    let src_len = content_len(src);
    let capacity = dest.len().min(READ_LIMIT_MAX);
    if capacity == 0 {
        return LineCopy {
            len: 0,
            truncated: src_len > 0,
        };
    }

    let len = src_len.min(capacity - 1);
    dest[..len].copy_from_slice(&src[..len]);
    dest[len] = 0;
    LineCopy {
        len,
        truncated: src_len > len,
    }
}
