//! Error taxonomy for the line readers.
//!
//! Two failure families exist: the allocation failed ([`LineError::Allocation`])
//! or no line could be obtained ([`LineError::EndOfStream`], [`LineError::Io`]).
//! The plain entry points collapse these into "unchanged", `None` or an
//! empty string; the `try_*` entry points surface them as this type.

use std::io;

use thiserror::Error;

/// Why a read did not produce a line.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LineError {
    /// The buffer had no room even for the NUL sentinel.
    #[error("buffer capacity must be at least 1 byte")]
    ZeroCapacity,
    /// The callee-allocated buffer could not be obtained.
    #[error("failed to allocate {requested} bytes for the line buffer")]
    Allocation {
        /// Requested buffer size in bytes.
        requested: usize,
    },
    /// The input stream ended before any byte of a line was read.
    #[error("input stream ended before a line was read")]
    EndOfStream,
    /// The input or output stream reported an error.
    #[error("i/o error while reading a line: {0}")]
    Io(#[from] io::Error),
}

impl LineError {
    /// True for the ReadFailure family (end of stream or I/O error).
    #[must_use]
    pub fn is_read_failure(&self) -> bool {
        matches!(self, Self::EndOfStream | Self::Io(_))
    }

    /// True when the callee-allocated path could not allocate.
    #[must_use]
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, Self::Allocation { .. })
    }
}
