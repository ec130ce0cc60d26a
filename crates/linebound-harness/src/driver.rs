//! Demo sequencer: runs each ownership variant once and prints the transcript.
//!
//! The driver owns every buffer it asks for and releases each one before
//! moving on. A failed read is recorded in the report and the run continues.

use std::ffi::c_char;
use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};
use std::ptr::NonNull;

use linebound_abi::util::c_str_bytes;
use linebound_abi::{free_name_in, report, try_ask_name_in, try_ask_name_malloc_in};
use linebound_core::banner::write_banner;
use linebound_core::{DEFAULT_CAPACITY, DEFAULT_PROMPT, LineError, LineReader, Session};
use linebound_membrane::{AllocationRegistry, SafetyLevel};
use serde::Serialize;
use thiserror::Error;

use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};

/// Size of the stack array used by the caller-owned step.
pub const STACK_CAPACITY: usize = DEFAULT_CAPACITY;

pub const DEMO_HEADER: &str = "=== Multi-Language Input Demo ===";
pub const DEMO_FOOTER: &str = "=== All tests completed ===";

/// Failures that stop the demo. Read failures never do.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("capacity must be at least 1 byte")]
    ZeroCapacity,
    #[error("failed to write the transcript: {0}")]
    Transcript(#[source] io::Error),
    #[error("failed to write the structured log: {0}")]
    Log(#[source] io::Error),
}

/// Knobs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Buffer size for the heap and owned steps. The stack step uses
    /// `min(capacity, STACK_CAPACITY)`.
    pub capacity: usize,
    pub banner: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            banner: true,
        }
    }
}

/// The four ownership variants, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Stack,
    Heap,
    Owned,
    Managed,
}

impl Variant {
    pub const ALL: [Variant; 4] = [Self::Stack, Self::Heap, Self::Owned, Self::Managed];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stack => "stack",
            Self::Heap => "heap",
            Self::Owned => "owned",
            Self::Managed => "managed",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            Self::Stack => "1. Stack-based version (caller-owned buffer):",
            Self::Heap => "2. Heap-based version (malloc):",
            Self::Owned => "3. Owned buffer version:",
            Self::Managed => "4. Managed string version:",
        }
    }

    /// Prompt shown before this variant reads. The C-path variants keep the
    /// plain prompt.
    #[must_use]
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Stack | Self::Heap => DEFAULT_PROMPT,
            Self::Owned => "Enter your name (owned buffer version): ",
            Self::Managed => "Enter your name (managed string version): ",
        }
    }

    /// Greeter named in this variant's confirmation, if any.
    #[must_use]
    pub fn greeter(self) -> Option<&'static str> {
        match self {
            Self::Stack | Self::Heap => None,
            Self::Owned => Some("Rust (owned)"),
            Self::Managed => Some("Rust (managed)"),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one step produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantOutcome {
    pub variant: Variant,
    pub capacity: usize,
    pub outcome: Outcome,
    /// Stored text, or `None` when nothing was stored.
    pub name: Option<String>,
    /// Whether the line was cut short, when the variant can tell.
    pub truncated: Option<bool>,
}

impl VariantOutcome {
    fn failed(variant: Variant, capacity: usize, outcome: Outcome) -> Self {
        Self {
            variant,
            capacity,
            outcome,
            name: None,
            truncated: None,
        }
    }

    fn stored(variant: Variant, capacity: usize, name: String, truncated: Option<bool>) -> Self {
        let outcome = if truncated == Some(true) {
            Outcome::Truncated
        } else {
            Outcome::Stored
        };
        Self {
            variant,
            capacity,
            outcome,
            name: Some(name),
            truncated,
        }
    }

    fn log_entry(&self, mode: SafetyLevel) -> LogEntry {
        let mut entry = LogEntry::new("", LogLevel::Info, "variant_complete")
            .with_variant(self.variant.as_str())
            .with_capacity(self.capacity)
            .with_outcome(self.outcome)
            .with_mode(mode.as_str());
        if let Some(name) = &self.name {
            entry = entry.with_length(name.len());
        }
        if let Some(truncated) = self.truncated {
            entry = entry.with_truncated(truncated);
        }
        entry
    }
}

/// Per-step results of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DemoReport {
    pub steps: Vec<VariantOutcome>,
}

impl DemoReport {
    #[must_use]
    pub fn get(&self, variant: Variant) -> Option<&VariantOutcome> {
        self.steps.iter().find(|s| s.variant == variant)
    }

    /// True when every step stored a line.
    #[must_use]
    pub fn all_stored(&self) -> bool {
        self.steps.iter().all(|s| s.outcome.is_success())
    }
}

fn outcome_of(err: &LineError) -> Outcome {
    if err.is_allocation_failure() {
        Outcome::AllocFailed
    } else {
        Outcome::ReadFailed
    }
}

/// Run the four variants against `session`.
///
/// Each variant gets its own prompt and greeter; `session` is left with the
/// default prompt and no greeter afterwards.
///
/// The raw-pointer steps go through the `try_*_in` functions that back the C
/// exports, with `registry` and `level` standing in for the process globals.
/// Diagnostics from those steps go to `diag`.
pub fn run<L, W, E>(
    session: &mut Session<L, W>,
    registry: &AllocationRegistry,
    level: SafetyLevel,
    diag: &mut dyn Write,
    emitter: &mut LogEmitter<E>,
    config: &DemoConfig,
) -> Result<DemoReport, HarnessError>
where
    L: LineReader,
    W: Write,
    E: Write,
{
    if config.capacity == 0 {
        return Err(HarnessError::ZeroCapacity);
    }

    if config.banner {
        write_banner(session.output_mut()).map_err(HarnessError::Transcript)?;
    }
    writeln!(session.output_mut(), "{DEMO_HEADER}\n").map_err(HarnessError::Transcript)?;
    emitter
        .emit_entry(LogEntry::new("", LogLevel::Info, "demo_start").with_mode(level.as_str()))
        .map_err(HarnessError::Log)?;

    let mut report = DemoReport::default();
    for variant in Variant::ALL {
        writeln!(session.output_mut(), "{}", variant.heading()).map_err(HarnessError::Transcript)?;
        session.set_prompt(variant.prompt());
        session.set_greeter(variant.greeter().map(Cow::Borrowed));
        let step = match variant {
            Variant::Stack => stack_step(session, diag, config.capacity),
            Variant::Heap => heap_step(session, registry, level, diag, config.capacity),
            Variant::Owned => owned_step(session, config.capacity),
            Variant::Managed => managed_step(session),
        };
        print_step(session.output_mut(), &step).map_err(HarnessError::Transcript)?;
        emitter
            .emit_entry(step.log_entry(level))
            .map_err(HarnessError::Log)?;
        report.steps.push(step);
    }

    session.set_prompt(DEFAULT_PROMPT);
    session.set_greeter(None);

    writeln!(session.output_mut(), "{DEMO_FOOTER}").map_err(HarnessError::Transcript)?;
    session.output_mut().flush().map_err(HarnessError::Transcript)?;
    emitter
        .emit_entry(
            LogEntry::new("", LogLevel::Info, "demo_complete").with_details(serde_json::json!({
                "stored": report.steps.iter().filter(|s| s.outcome.is_success()).count(),
                "live_allocations": registry.live_count(),
            })),
        )
        .map_err(HarnessError::Log)?;
    emitter.flush().map_err(HarnessError::Log)?;
    Ok(report)
}

fn print_step<W: Write>(out: &mut W, step: &VariantOutcome) -> io::Result<()> {
    let name = step.name.as_deref();
    match step.variant {
        // The stack array is zeroed up front, so a failed read prints it empty.
        Variant::Stack => writeln!(out, "Stored in stack: {}", name.unwrap_or_default())?,
        Variant::Heap => {
            if let Some(name) = name {
                writeln!(out, "Stored in heap: {name}")?;
            }
        }
        Variant::Owned => {
            if let Some(name) = name {
                writeln!(out, "Stored in owned buffer: {name}")?;
            }
        }
        // A failed managed read is indistinguishable from an empty line.
        Variant::Managed => writeln!(out, "Managed string: {}", name.unwrap_or_default())?,
    }
    writeln!(out)
}

#[allow(unsafe_code)]
fn stack_step<L: LineReader, W: Write>(
    session: &mut Session<L, W>,
    diag: &mut dyn Write,
    capacity: usize,
) -> VariantOutcome {
    let size = capacity.min(STACK_CAPACITY);
    let mut name = [0 as c_char; STACK_CAPACITY];

    // SAFETY: `name` is a live local array of STACK_CAPACITY >= size bytes.
    let result = unsafe { try_ask_name_in(session, NonNull::from(&mut name).cast(), size) };
    match result {
        Ok(copy) => {
            // SAFETY: same array, read back within its bounds.
            let bytes = unsafe { c_str_bytes(name.as_ptr(), size) };
            let text = String::from_utf8_lossy(bytes).into_owned();
            VariantOutcome::stored(Variant::Stack, size, text, Some(copy.truncated))
        }
        Err(err) => {
            report(diag, &err);
            VariantOutcome::failed(Variant::Stack, size, outcome_of(&err))
        }
    }
}

#[allow(unsafe_code)]
fn heap_step<L: LineReader, W: Write>(
    session: &mut Session<L, W>,
    registry: &AllocationRegistry,
    level: SafetyLevel,
    diag: &mut dyn Write,
    capacity: usize,
) -> VariantOutcome {
    let (ptr, copy) = match try_ask_name_malloc_in(session, registry, capacity) {
        Ok(filled) => filled,
        Err(err) => {
            report(diag, &err);
            return VariantOutcome::failed(Variant::Heap, capacity, outcome_of(&err));
        }
    };

    // SAFETY: `ptr` is a live NUL-terminated buffer of `capacity` bytes.
    let bytes = unsafe { c_str_bytes(ptr.as_ptr(), capacity) };
    let text = String::from_utf8_lossy(bytes).into_owned();
    // SAFETY: `ptr` came from try_ask_name_malloc_in and is released exactly once.
    unsafe { free_name_in(registry, level, diag, ptr.as_ptr()) };
    VariantOutcome::stored(Variant::Heap, capacity, text, Some(copy.truncated))
}

fn owned_step<L: LineReader, W: Write>(
    session: &mut Session<L, W>,
    capacity: usize,
) -> VariantOutcome {
    match session.try_read_line_alloc(capacity) {
        Ok(line) => {
            let truncated = line.is_truncated();
            VariantOutcome::stored(
                Variant::Owned,
                capacity,
                line.to_string_lossy().into_owned(),
                Some(truncated),
            )
        }
        Err(err) => VariantOutcome::failed(Variant::Owned, capacity, outcome_of(&err)),
    }
}

fn managed_step<L: LineReader, W: Write>(session: &mut Session<L, W>) -> VariantOutcome {
    match session.try_read_line_managed() {
        Ok(line) => VariantOutcome::stored(Variant::Managed, line.len(), line, Some(false)),
        Err(err) => VariantOutcome::failed(Variant::Managed, 0, outcome_of(&err)),
    }
}
