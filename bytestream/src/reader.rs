//! Byte-level reader with bounded operations.

use std::io::Read;

use crate::error::{ByteError, ByteResult};
use crate::STRING_TERMINATOR;

/// A byte-level reader over a borrowed source.
///
/// All read operations report truncation as [`ByteError::UnexpectedEof`]
/// and never panic on malformed input.
#[derive(Debug)]
pub struct ByteReader<'a, R: Read + ?Sized> {
    source: &'a mut R,
    position: u64,
}

impl<'a, R: Read + ?Sized> ByteReader<'a, R> {
    /// Creates a reader that consumes from `source`.
    pub fn new(source: &'a mut R) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    /// Returns the number of bytes consumed so far.
    #[must_use]
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// Reads exactly `N` bytes.
    pub fn read_bytes<const N: usize>(&mut self) -> ByteResult<[u8; N]> {
        let mut out = [0u8; N];
        self.read_into(&mut out)?;
        Ok(out)
    }

    /// Fills `buf` completely from the source.
    pub fn read_into(&mut self, buf: &mut [u8]) -> ByteResult<()> {
        self.source
            .read_exact(buf)
            .map_err(|err| ByteError::from_read(&err, buf.len(), self.position))?;
        self.position += buf.len() as u64;
        Ok(())
    }

    pub fn read_u8(&mut self) -> ByteResult<u8> {
        let [byte] = self.read_bytes::<1>()?;
        Ok(byte)
    }

    /// Reads a one-byte boolean; any non-zero value is `true`.
    pub fn read_bool(&mut self) -> ByteResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> ByteResult<u16> {
        Ok(u16::from_le_bytes(self.read_bytes()?))
    }

    pub fn read_u32(&mut self) -> ByteResult<u32> {
        Ok(u32::from_le_bytes(self.read_bytes()?))
    }

    pub fn read_i8(&mut self) -> ByteResult<i8> {
        Ok(i8::from_le_bytes(self.read_bytes()?))
    }

    pub fn read_i16(&mut self) -> ByteResult<i16> {
        Ok(i16::from_le_bytes(self.read_bytes()?))
    }

    pub fn read_i32(&mut self) -> ByteResult<i32> {
        Ok(i32::from_le_bytes(self.read_bytes()?))
    }

    /// Consumes `count` bytes without interpreting them.
    pub fn skip(&mut self, count: usize) -> ByteResult<()> {
        for _ in 0..count {
            self.read_u8()?;
        }
        Ok(())
    }

    /// Reads a terminated string of at most `max_len` bytes.
    ///
    /// Bytes are consumed up to and including the terminator. If `max_len`
    /// bytes are read without finding one, the string is rejected rather than
    /// truncated.
    pub fn read_string(&mut self, max_len: usize) -> ByteResult<String> {
        let start = self.position;
        let mut bytes = Vec::new();
        loop {
            let byte = self.read_u8()?;
            if byte == STRING_TERMINATOR {
                break;
            }
            if bytes.len() == max_len {
                return Err(ByteError::StringTooLong {
                    max: max_len,
                    position: start,
                });
            }
            bytes.push(byte);
        }
        String::from_utf8(bytes).map_err(|_| ByteError::InvalidUtf8 { position: start })
    }
}
