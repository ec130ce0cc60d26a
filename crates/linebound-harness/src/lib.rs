//! Demo driver and structured logging for linebound.
//!
//! This crate provides:
//! - [`driver`]: runs the four ownership variants in order and prints the
//!   transcript, returning a [`DemoReport`]
//! - [`structured_log`]: JSONL log records for each step, plus a validator

#![deny(unsafe_code)]

pub mod driver;
pub mod structured_log;

pub use driver::{DemoConfig, DemoReport, HarnessError, Variant, VariantOutcome, run};
pub use structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};
