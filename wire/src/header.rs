//! File header types and constants.

use std::io::{Read, Write};

use bytestream::{ByteReader, ByteWriter};

use crate::error::{WireError, WireResult};

/// Magic number identifying delve save files.
///
/// This value is fixed and must never change across versions.
pub const MAGIC: u32 = u32::from_le_bytes(*b"DLVS");

/// Current save format version.
///
/// The version covers the global conventions: little-endian integers,
/// `0x00`-terminated strings and `(length, value)` run pairs.
pub const VERSION: u16 = 1;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 4 + 2;

/// Save file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Format version.
    pub version: u16,
}

impl FileHeader {
    /// Creates a header for the current format version.
    #[must_use]
    pub const fn current() -> Self {
        Self { version: VERSION }
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::current()
    }
}

/// Writes the magic number and `header`.
pub fn encode_header<W: Write + ?Sized>(
    header: &FileHeader,
    writer: &mut ByteWriter<'_, W>,
) -> WireResult<()> {
    writer.write_u32(MAGIC)?;
    writer.write_u16(header.version)?;
    Ok(())
}

/// Reads and validates the magic number and header.
pub fn decode_header<R: Read + ?Sized>(reader: &mut ByteReader<'_, R>) -> WireResult<FileHeader> {
    let magic = reader.read_u32()?;
    if magic != MAGIC {
        return Err(WireError::InvalidMagic { found: magic });
    }
    let version = reader.read_u16()?;
    if version != VERSION {
        return Err(WireError::UnsupportedVersion { found: version });
    }
    Ok(FileHeader { version })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_is_dlvs_ascii() {
        assert_eq!(&MAGIC.to_le_bytes(), b"DLVS");
    }

    #[test]
    fn header_size_is_correct() {
        let mut buf = Vec::new();
        let mut writer = ByteWriter::new(&mut buf);
        encode_header(&FileHeader::current(), &mut writer).unwrap();
        assert_eq!(buf.len(), HEADER_SIZE);
        assert_eq!(&buf[..4], b"DLVS");
    }

    #[test]
    fn header_roundtrip() {
        let mut buf = Vec::new();
        let mut writer = ByteWriter::new(&mut buf);
        encode_header(&FileHeader::default(), &mut writer).unwrap();

        let mut src = buf.as_slice();
        let mut reader = ByteReader::new(&mut src);
        assert_eq!(decode_header(&mut reader).unwrap(), FileHeader::current());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut src: &[u8] = b"SAVE\x01\x00";
        let mut reader = ByteReader::new(&mut src);
        let err = decode_header(&mut reader).unwrap_err();
        assert!(matches!(err, WireError::InvalidMagic { .. }));
    }

    #[test]
    fn rejects_future_version() {
        let mut src: &[u8] = b"DLVS\x02\x00";
        let mut reader = ByteReader::new(&mut src);
        let err = decode_header(&mut reader).unwrap_err();
        assert_eq!(err, WireError::UnsupportedVersion { found: 2 });
    }

    #[test]
    fn truncated_header() {
        let mut src: &[u8] = b"DLV";
        let mut reader = ByteReader::new(&mut src);
        let err = decode_header(&mut reader).unwrap_err();
        assert!(matches!(err, WireError::Bytes(_)));
    }
}
