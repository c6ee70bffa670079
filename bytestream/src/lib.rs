//! Fixed-width primitives for the delve save format.
//!
//! This crate provides [`ByteWriter`] and [`ByteReader`], thin adapters over a
//! borrowed [`std::io::Write`] sink or [`std::io::Read`] source.
//!
//! # Design Principles
//!
//! - **One byte order** - Every multi-byte integer is little-endian.
//! - **Borrowed streams** - The caller owns the sink/source and its lifetime.
//! - **No domain knowledge** - This crate knows nothing about items, monsters or levels.
//! - **Explicit errors** - Truncation and oversized strings are errors, never panics.
//!
//! # Example
//!
//! ```
//! use bytestream::{ByteReader, ByteWriter};
//!
//! let mut buf = Vec::new();
//! let mut writer = ByteWriter::new(&mut buf);
//! writer.write_u16(0xFFFF).unwrap();
//! writer.write_string("Fire").unwrap();
//!
//! let mut src = buf.as_slice();
//! let mut reader = ByteReader::new(&mut src);
//! assert_eq!(reader.read_u16().unwrap(), 0xFFFF);
//! assert_eq!(reader.read_string(64).unwrap(), "Fire");
//! ```

mod error;
mod reader;
mod writer;

pub use error::{ByteError, ByteResult};
pub use reader::ByteReader;
pub use writer::ByteWriter;

/// Byte that closes every encoded string.
pub const STRING_TERMINATOR: u8 = 0;
