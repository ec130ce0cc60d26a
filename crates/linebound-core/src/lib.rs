//! # linebound-core
//!
//! Safe implementation of the bounded-buffer line-input contract: read one
//! line, strip its terminator, and store it under one of three ownership
//! models (caller-owned slice, callee-allocated [`OwnedLine`], managed
//! `String`). No `unsafe` code is permitted at the crate level; the raw
//! pointer boundary lives in `linebound-abi`.
//!
//! ```
//! use std::io::Cursor;
//! use linebound_core::Session;
//!
//! let mut session = Session::new(Cursor::new(b"Ada Lovelace\n".to_vec()), Vec::new());
//! let mut buf = [0u8; 100];
//! let copy = session.read_line_into(&mut buf).unwrap();
//! assert_eq!(&buf[..copy.len], b"Ada Lovelace");
//! assert_eq!(buf[copy.len], 0);
//! ```

#![deny(unsafe_code)]

pub mod banner;
pub mod copy;
pub mod error;
pub mod line;
pub mod session;

pub use copy::{LineCopy, READ_LIMIT_MAX, ReadCapacity, bounded_copy};
pub use error::LineError;
pub use line::{LineReader, next_line, strip_line_terminator};
pub use session::{DEFAULT_CAPACITY, DEFAULT_PROMPT, OwnedLine, Session, release};
