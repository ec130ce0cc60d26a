//! The three "ask for a name" readers.
//!
//! A [`Session`] pairs one input stream with one output stream and exposes the
//! line-input contract under three ownership models:
//!
//! | Method | Storage | Release |
//! |---|---|---|
//! | [`Session::read_line_into`] | caller's slice | caller's scope |
//! | [`Session::read_line_alloc`] | [`OwnedLine`] allocated here | drop / [`release`] |
//! | [`Session::read_line_managed`] | `String`, grown as needed | drop |
//!
//! Each call writes the prompt, reads one whole line, strips its terminator
//! and, on success, writes a confirmation. Calls block and must not overlap;
//! a session is not meant to be shared between threads.

use std::borrow::Cow;
use std::ffi::CStr;
use std::fmt;
use std::io::{self, StdinLock, Stdout, Write};

use crate::copy::{LineCopy, ReadCapacity, bounded_copy};
use crate::error::LineError;
use crate::line::{LineReader, next_line};

/// Prompt written before every read unless overridden.
pub const DEFAULT_PROMPT: &str = "Enter your name: ";

/// Buffer size the demo uses for every bounded variant.
pub const DEFAULT_CAPACITY: usize = 100;

/// A NUL-terminated line buffer allocated by [`Session::read_line_alloc`].
///
/// The allocation is exactly the requested capacity. Ownership belongs to
/// whoever holds the value; dropping it releases the storage.
pub struct OwnedLine {
    storage: Box<[u8]>,
    copy: LineCopy,
}

impl OwnedLine {
    /// Content bytes, without the sentinel.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.copy.len]
    }

    /// Content bytes followed by the NUL sentinel.
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.storage[..=self.copy.len]
    }

    /// View as a C string.
    #[must_use]
    pub fn as_c_str(&self) -> &CStr {
        CStr::from_bytes_until_nul(&self.storage).unwrap_or_default()
    }

    /// Content decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Usable size of the buffer, sentinel included. Equal to the requested
    /// capacity unless that exceeded `READ_LIMIT_MAX`.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Content length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.copy.len
    }

    /// True when the line had no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.copy.len == 0
    }

    /// True when input was cut to fit the capacity.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.copy.truncated
    }
}

impl AsRef<[u8]> for OwnedLine {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for OwnedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedLine")
            .field("text", &self.to_string_lossy())
            .field("capacity", &self.capacity())
            .field("truncated", &self.copy.truncated)
            .finish()
    }
}

impl fmt::Display for OwnedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// Release a buffer obtained from [`Session::read_line_alloc`].
///
/// `None` is accepted and ignored. Since the buffer is moved in, a second
/// release of the same value does not compile.
pub fn release(line: Option<OwnedLine>) {
    drop(line);
}

/// Reserve `reserve` bytes without aborting on exhaustion, then zero-fill the
/// first `fill` of them.
///
/// The full request is reserved so an impossible size still fails as an
/// allocation error; only the usable prefix is committed.
fn try_alloc_buffer(reserve: usize, fill: usize) -> Result<Box<[u8]>, LineError> {
    let mut storage = Vec::new();
    storage
        .try_reserve_exact(reserve)
        .map_err(|_| LineError::Allocation { requested: reserve })?;
    storage.resize(fill.min(reserve), 0);
    Ok(storage.into_boxed_slice())
}

/// One input stream, one output stream, and the prompt text shown on each read.
#[derive(Debug)]
pub struct Session<R, W> {
    input: R,
    output: W,
    prompt: Cow<'static, str>,
    greeter: Option<Cow<'static, str>>,
    scratch: Vec<u8>,
}

impl Session<StdinLock<'static>, Stdout> {
    /// Session over the process's standard input and output.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: LineReader, W: Write> Session<R, W> {
    /// Create a session with the default prompt.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            prompt: Cow::Borrowed(DEFAULT_PROMPT),
            greeter: None,
            scratch: Vec::new(),
        }
    }

    /// Replace the prompt written before each read.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<Cow<'static, str>>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Name shown in the confirmation (`Hello from <greeter>, <name>!`).
    #[must_use]
    pub fn with_greeter(mut self, greeter: impl Into<Cow<'static, str>>) -> Self {
        self.greeter = Some(greeter.into());
        self
    }

    /// Change the prompt in place, for drivers that reuse one session.
    pub fn set_prompt(&mut self, prompt: impl Into<Cow<'static, str>>) {
        self.prompt = prompt.into();
    }

    /// Change the greeter in place; `None` restores the plain greeting.
    pub fn set_greeter(&mut self, greeter: Option<Cow<'static, str>>) {
        self.greeter = greeter;
    }

    /// The output stream, e.g. for transcript lines written by a driver.
    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    /// Tear the session down into its streams.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Caller-owned variant: fill `buf` in place.
    ///
    /// The capacity is `buf.len()`. At most `capacity - 1` bytes are stored,
    /// followed by a NUL. On any failure `buf` is left untouched and no
    /// confirmation is written.
    pub fn read_line_into(&mut self, buf: &mut [u8]) -> Result<LineCopy, LineError> {
        let capacity = ReadCapacity::new(buf.len())?;
        self.write_prompt()?;
        next_line(&mut self.input, &mut self.scratch)?;

        let dest = &mut buf[..capacity.effective()];
        let copy = bounded_copy(dest, &self.scratch);
        let stored = String::from_utf8_lossy(&dest[..copy.len]).into_owned();
        self.confirm(&stored);
        Ok(copy)
    }

    /// Callee-allocated variant: allocate `capacity` bytes, fill, hand over.
    ///
    /// Returns `None` when allocation fails (nothing is read) or when no line
    /// could be read (the allocation is released first).
    pub fn read_line_alloc(&mut self, capacity: usize) -> Option<OwnedLine> {
        self.try_read_line_alloc(capacity).ok()
    }

    /// Same as [`Session::read_line_alloc`], reporting which failure occurred.
    pub fn try_read_line_alloc(&mut self, capacity: usize) -> Result<OwnedLine, LineError> {
        let requested = ReadCapacity::new(capacity)?;
        let mut storage = try_alloc_buffer(requested.requested(), requested.effective())?;

        // `storage` is dropped on every early return below.
        self.write_prompt()?;
        next_line(&mut self.input, &mut self.scratch)?;

        let copy = bounded_copy(&mut storage, &self.scratch);
        let line = OwnedLine { storage, copy };
        let stored = line.to_string_lossy().into_owned();
        self.confirm(&stored);
        Ok(line)
    }

    /// Managed variant: return the whole line as a `String`.
    ///
    /// A failed read and an empty input line both yield `""`; use
    /// [`Session::try_read_line_managed`] to tell them apart.
    pub fn read_line_managed(&mut self) -> String {
        self.try_read_line_managed().unwrap_or_default()
    }

    /// Managed variant with an explicit failure signal.
    pub fn try_read_line_managed(&mut self) -> Result<String, LineError> {
        self.write_prompt()?;
        next_line(&mut self.input, &mut self.scratch)?;

        let line = String::from_utf8_lossy(&self.scratch).into_owned();
        self.confirm(&line);
        Ok(line)
    }

    fn write_prompt(&mut self) -> Result<(), LineError> {
        self.output.write_all(self.prompt.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }

    // The line is already stored when this runs, so output failures are not
    // allowed to turn a successful read into an error.
    fn confirm(&mut self, name: &str) {
        let _ = match &self.greeter {
            Some(greeter) => writeln!(self.output, "Hello from {greeter}, {name}!"),
            None => writeln!(self.output, "Hello, {name}!"),
        };
        let _ = self.output.flush();
    }
}
