//! Byte-level writer for encoding fixed-width little-endian data.

use std::io::Write;

use crate::error::{ByteError, ByteResult};
use crate::STRING_TERMINATOR;

/// A byte-level writer over a borrowed sink.
///
/// The writer never opens, flushes or closes the sink; it only appends bytes
/// in order and counts them. Every multi-byte integer is little-endian.
#[derive(Debug)]
pub struct ByteWriter<'a, W: Write + ?Sized> {
    sink: &'a mut W,
    written: u64,
}

impl<'a, W: Write + ?Sized> ByteWriter<'a, W> {
    /// Creates a writer that appends to `sink`.
    pub fn new(sink: &'a mut W) -> Self {
        Self { sink, written: 0 }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Writes raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> ByteResult<()> {
        self.sink.write_all(bytes).map_err(ByteError::from)?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    /// Writes a single byte.
    pub fn write_u8(&mut self, value: u8) -> ByteResult<()> {
        self.write_bytes(&[value])
    }

    /// Writes a boolean as one byte (`0` or `1`).
    pub fn write_bool(&mut self, value: bool) -> ByteResult<()> {
        self.write_u8(u8::from(value))
    }

    pub fn write_u16(&mut self, value: u16) -> ByteResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> ByteResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i8(&mut self, value: i8) -> ByteResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i16(&mut self, value: i16) -> ByteResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i32(&mut self, value: i32) -> ByteResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Writes `count` zero bytes.
    pub fn write_zeros(&mut self, count: usize) -> ByteResult<()> {
        for _ in 0..count {
            self.write_u8(0)?;
        }
        Ok(())
    }

    /// Writes a string as its raw bytes followed by the terminator.
    ///
    /// # Errors
    ///
    /// Returns [`ByteError::EmbeddedNul`] if the string contains the
    /// terminator byte, since it could not be read back intact.
    pub fn write_string(&mut self, value: &str) -> ByteResult<()> {
        if let Some(index) = value.bytes().position(|b| b == STRING_TERMINATOR) {
            return Err(ByteError::EmbeddedNul { index });
        }
        self.write_bytes(value.as_bytes())?;
        self.write_u8(STRING_TERMINATOR)
    }
}
