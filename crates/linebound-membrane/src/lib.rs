//! # linebound-membrane
//!
//! Bookkeeping that sits between the C ABI entry points and the safe core:
//! the runtime mode (strict or hardened) and a registry of buffers the
//! callee-allocated reader has handed to C callers.

pub mod config;
pub mod registry;

pub use config::{SafetyLevel, safety_level, set_safety_level};
pub use registry::{
    AllocationMeta, AllocationRegistry, ReleaseOutcome, TemporalState, global_registry,
};
