//! Runtime mode configuration.
//!
//! The runtime mode is set via the `LINEBOUND_MODE` environment variable:
//! - `strict` (default): the release entry point frees every non-null pointer
//!   it is handed, exactly like `free`. Releasing twice is undefined behavior
//!   and remains the caller's responsibility.
//! - `hardened`: the release entry point consults the allocation registry and
//!   only frees pointers it currently tracks as live. Unknown and
//!   already-released pointers are ignored.

use std::sync::atomic::{AtomicU8, Ordering};

/// Name of the environment variable holding the runtime mode.
pub const MODE_ENV: &str = "LINEBOUND_MODE";

/// Runtime operating mode for the ABI boundary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafetyLevel {
    /// Original allocate/free contract with no release bookkeeping checks.
    #[default]
    Strict,
    /// Release is validated against the allocation registry.
    Hardened,
}

impl SafetyLevel {
    /// Parse from string (case-insensitive). Unknown values map to `Strict`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hardened" | "repair" | "guarded" => Self::Hardened,
            _ => Self::Strict,
        }
    }

    /// Returns true if release calls are checked against the registry.
    #[must_use]
    pub const fn guards_release(self) -> bool {
        matches!(self, Self::Hardened)
    }

    /// Stable lowercase name, used in logs and CLI help.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Hardened => "hardened",
        }
    }
}

// 0=unresolved, 1=Strict, 2=Hardened.
static CACHED_LEVEL: AtomicU8 = AtomicU8::new(0);

const LEVEL_UNRESOLVED: u8 = 0;
const LEVEL_STRICT: u8 = 1;
const LEVEL_HARDENED: u8 = 2;

fn level_to_u8(level: SafetyLevel) -> u8 {
    match level {
        SafetyLevel::Strict => LEVEL_STRICT,
        SafetyLevel::Hardened => LEVEL_HARDENED,
    }
}

fn u8_to_level(v: u8) -> SafetyLevel {
    match v {
        LEVEL_HARDENED => SafetyLevel::Hardened,
        _ => SafetyLevel::Strict,
    }
}

/// Get the configured safety level (reads the env var on first call, caches thereafter).
#[must_use]
pub fn safety_level() -> SafetyLevel {
    let cached = CACHED_LEVEL.load(Ordering::Acquire);
    if cached != LEVEL_UNRESOLVED {
        return u8_to_level(cached);
    }

    let level = std::env::var(MODE_ENV)
        .map(|v| SafetyLevel::from_str_loose(&v))
        .unwrap_or_default();

    // A concurrent resolver may have won; either result came from the same env.
    match CACHED_LEVEL.compare_exchange(
        LEVEL_UNRESOLVED,
        level_to_u8(level),
        Ordering::AcqRel,
        Ordering::Acquire,
    ) {
        Ok(_) => level,
        Err(existing) => u8_to_level(existing),
    }
}

/// Override the cached level for the rest of the process.
///
/// Used by the demo driver's `--mode` flag, which takes precedence over the
/// environment.
pub fn set_safety_level(level: SafetyLevel) {
    CACHED_LEVEL.store(level_to_u8(level), Ordering::Release);
}
