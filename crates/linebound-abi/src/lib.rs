// Every extern "C" export accepts raw pointers from C callers; the contract is
// documented once on the `*_in` functions they delegate to.
#![allow(clippy::missing_safety_doc)]
//! # linebound-abi
//!
//! `extern "C"` boundary for linebound. Produces a `cdylib` exposing the
//! symbols declared in `include/linebound.h`:
//!
//! ```text
//! C caller -> ABI entry (this crate) -> registry bookkeeping -> linebound-core -> return
//! ```
//!
//! | Symbol | Ownership |
//! |---|---|
//! | `ask_name(char *, size_t)` | caller-owned buffer, filled in place |
//! | `ask_name_malloc(size_t)` | callee-allocated, caller releases once |
//! | `free_name(char *)` | release for `ask_name_malloc`; NULL is a no-op |
//! | `print_banner(void)` | none |
//!
//! The exports read process stdin and write stdout/stderr. Calls must not
//! overlap across threads: each one locks stdin only while it runs, so
//! concurrent prompts would interleave.

pub mod banner_abi;
pub mod input_abi;
pub mod util;

pub use input_abi::{
    ask_name_in, ask_name_malloc_in, free_name_in, report, try_ask_name_in, try_ask_name_malloc_in,
};
