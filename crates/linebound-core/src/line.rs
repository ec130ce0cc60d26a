//! Raw line acquisition shared by all readers.

use std::io::{self, BufRead};

use crate::error::LineError;

/// Source of raw input lines.
///
/// Implemented for every [`BufRead`]; a line is read through the next `\n`
/// (kept in the output) or to end of stream.
pub trait LineReader {
    /// Append one raw line to `buf` and return the number of bytes read.
    /// Zero means the stream was already at its end.
    fn read_raw_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize>;
}

impl<R: BufRead> LineReader for R {
    fn read_raw_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        self.read_until(b'\n', buf)
    }
}

/// Drop one trailing `\n` (and a `\r` right before it) from `line`.
#[must_use]
pub fn strip_line_terminator(line: &[u8]) -> &[u8] {
    match line {
        [rest @ .., b'\r', b'\n'] => rest,
        [rest @ .., b'\n'] => rest,
        _ => line,
    }
}

/// Read one full line into `buf` (cleared first) with the terminator removed.
///
/// Lines longer than any destination are consumed whole; the bounded
/// readers truncate afterwards.
pub fn next_line<L: LineReader + ?Sized>(
    reader: &mut L,
    buf: &mut Vec<u8>,
) -> Result<(), LineError> {
    buf.clear();
    if reader.read_raw_line(buf)? == 0 {
        return Err(LineError::EndOfStream);
    }
    let kept = strip_line_terminator(buf).len();
    buf.truncate(kept);
    Ok(())
}
