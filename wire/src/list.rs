//! Flattening of variable-length lists.
//!
//! Three conventions are used by the save format:
//!
//! - **Count-prefixed** - a count, then each element.
//! - **Continuation-flagged** - a presence byte, then each element followed by
//!   a has-next byte. No count pass is needed before writing.
//! - **Sentinel-terminated** - each element, then one reserved record the
//!   element reader recognizes and reports as the end of the list.
//!
//! Element encoders and decoders are supplied by the caller; their error type
//! only has to absorb [`WireError`].

use std::io::{Read, Write};

use bytestream::{ByteReader, ByteWriter};

use crate::error::{CountWidthName, WireError};

/// Width of a count prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountWidth {
    U8,
    U16,
    U32,
}

impl CountWidth {
    /// Largest count the prefix can hold.
    #[must_use]
    pub const fn max(self) -> usize {
        match self {
            Self::U8 => u8::MAX as usize,
            Self::U16 => u16::MAX as usize,
            Self::U32 => u32::MAX as usize,
        }
    }

    const fn name(self) -> CountWidthName {
        match self {
            Self::U8 => CountWidthName::U8,
            Self::U16 => CountWidthName::U16,
            Self::U32 => CountWidthName::U32,
        }
    }

    /// Writes `count` at this width.
    pub fn write<W: Write + ?Sized>(
        self,
        writer: &mut ByteWriter<'_, W>,
        count: usize,
    ) -> Result<(), WireError> {
        let overflow = || WireError::CountOverflow {
            count,
            width: self.name(),
        };
        match self {
            Self::U8 => writer.write_u8(u8::try_from(count).map_err(|_| overflow())?)?,
            Self::U16 => writer.write_u16(u16::try_from(count).map_err(|_| overflow())?)?,
            Self::U32 => writer.write_u32(u32::try_from(count).map_err(|_| overflow())?)?,
        }
        Ok(())
    }

    /// Reads a count at this width and checks it against `limit`.
    pub fn read<R: Read + ?Sized>(
        self,
        reader: &mut ByteReader<'_, R>,
        limit: usize,
    ) -> Result<usize, WireError> {
        let count = match self {
            Self::U8 => usize::from(reader.read_u8()?),
            Self::U16 => usize::from(reader.read_u16()?),
            Self::U32 => reader.read_u32()? as usize,
        };
        if count > limit {
            return Err(WireError::CountExceeded {
                limit,
                actual: count,
            });
        }
        Ok(count)
    }
}

/// Writes `items` behind a count prefix.
pub fn write_counted<'a, W, T, E, F>(
    writer: &mut ByteWriter<'a, W>,
    width: CountWidth,
    items: &[T],
    mut write_item: F,
) -> Result<(), E>
where
    W: Write + ?Sized,
    E: From<WireError>,
    F: FnMut(&mut ByteWriter<'a, W>, &T) -> Result<(), E>,
{
    width.write(writer, items.len())?;
    for item in items {
        write_item(writer, item)?;
    }
    Ok(())
}

/// Reads a count prefix of at most `limit`, then that many elements.
pub fn read_counted<'a, R, T, E, F>(
    reader: &mut ByteReader<'a, R>,
    width: CountWidth,
    limit: usize,
    mut read_item: F,
) -> Result<Vec<T>, E>
where
    R: Read + ?Sized,
    E: From<WireError>,
    F: FnMut(&mut ByteReader<'a, R>) -> Result<T, E>,
{
    let count = width.read(reader, limit)?;
    let mut items = Vec::with_capacity(count.min(256));
    for _ in 0..count {
        items.push(read_item(reader)?);
    }
    Ok(items)
}

/// Writes `items` as a continuation-flagged chain.
pub fn write_chain<'a, W, T, E, F>(
    writer: &mut ByteWriter<'a, W>,
    items: &[T],
    mut write_item: F,
) -> Result<(), E>
where
    W: Write + ?Sized,
    E: From<WireError>,
    F: FnMut(&mut ByteWriter<'a, W>, &T) -> Result<(), E>,
{
    writer
        .write_bool(!items.is_empty())
        .map_err(WireError::from)?;
    for (i, item) in items.iter().enumerate() {
        write_item(writer, item)?;
        writer
            .write_bool(i + 1 < items.len())
            .map_err(WireError::from)?;
    }
    Ok(())
}

/// Reads a continuation-flagged chain of at most `limit` elements.
///
/// Reading stops right after the first element whose has-next byte is zero.
pub fn read_chain<'a, R, T, E, F>(
    reader: &mut ByteReader<'a, R>,
    limit: usize,
    mut read_item: F,
) -> Result<Vec<T>, E>
where
    R: Read + ?Sized,
    E: From<WireError>,
    F: FnMut(&mut ByteReader<'a, R>) -> Result<T, E>,
{
    let mut items = Vec::new();
    let mut more = reader.read_bool().map_err(WireError::from)?;
    while more {
        if items.len() == limit {
            return Err(WireError::ChainTooLong { limit }.into());
        }
        items.push(read_item(reader)?);
        more = reader.read_bool().map_err(WireError::from)?;
    }
    Ok(items)
}

/// Writes `items` followed by the sentinel record.
pub fn write_terminated<'a, W, T, E, F, S>(
    writer: &mut ByteWriter<'a, W>,
    items: impl IntoIterator<Item = T>,
    mut write_item: F,
    write_sentinel: S,
) -> Result<(), E>
where
    W: Write + ?Sized,
    F: FnMut(&mut ByteWriter<'a, W>, T) -> Result<(), E>,
    S: FnOnce(&mut ByteWriter<'a, W>) -> Result<(), E>,
{
    for item in items {
        write_item(writer, item)?;
    }
    write_sentinel(writer)
}

/// Reads records until `read_item` reports the sentinel with `None`.
///
/// At most `limit` live records are accepted; the sentinel itself is
/// consumed and nothing after it is read.
pub fn read_until_sentinel<'a, R, T, E, F>(
    reader: &mut ByteReader<'a, R>,
    limit: usize,
    mut read_item: F,
) -> Result<Vec<T>, E>
where
    R: Read + ?Sized,
    E: From<WireError>,
    F: FnMut(&mut ByteReader<'a, R>) -> Result<Option<T>, E>,
{
    let mut items = Vec::new();
    while let Some(item) = read_item(reader)? {
        if items.len() == limit {
            return Err(WireError::SentinelNotFound { limit }.into());
        }
        items.push(item);
    }
    Ok(items)
}

/// Writes each element behind the one-byte tag chosen by `tag_of`, then `finish`.
pub fn write_tagged<'a, W, T, E, G, F>(
    writer: &mut ByteWriter<'a, W>,
    items: &[T],
    finish: u8,
    mut tag_of: G,
    mut write_item: F,
) -> Result<(), E>
where
    W: Write + ?Sized,
    E: From<WireError>,
    G: FnMut(&T) -> u8,
    F: FnMut(&mut ByteWriter<'a, W>, &T) -> Result<(), E>,
{
    for item in items {
        let tag = tag_of(item);
        debug_assert_ne!(tag, finish, "element tag collides with the finish tag");
        writer.write_u8(tag).map_err(WireError::from)?;
        write_item(writer, item)?;
    }
    writer.write_u8(finish).map_err(WireError::from)?;
    Ok(())
}

/// Reads tagged elements until the `finish` tag.
///
/// `read_item` receives each tag and decodes the element that follows it.
pub fn read_tagged<'a, R, T, E, F>(
    reader: &mut ByteReader<'a, R>,
    finish: u8,
    limit: usize,
    mut read_item: F,
) -> Result<Vec<T>, E>
where
    R: Read + ?Sized,
    E: From<WireError>,
    F: FnMut(u8, &mut ByteReader<'a, R>) -> Result<T, E>,
{
    read_until_sentinel(reader, limit, |reader| {
        let tag = reader.read_u8().map_err(WireError::from)?;
        if tag == finish {
            return Ok(None);
        }
        read_item(tag, reader).map(Some)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer_bytes(f: impl FnOnce(&mut ByteWriter<'_, Vec<u8>>)) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut writer = ByteWriter::new(&mut buf);
        f(&mut writer);
        buf
    }

    #[test]
    fn counted_roundtrip() {
        let bytes = writer_bytes(|w| {
            write_counted::<_, _, WireError, _>(w, CountWidth::U16, &[7u8, 8, 9], |w, v| {
                Ok(w.write_u8(*v)?)
            })
            .unwrap();
        });
        assert_eq!(bytes, vec![3, 0, 7, 8, 9]);

        let mut src = bytes.as_slice();
        let mut reader = ByteReader::new(&mut src);
        let items: Vec<u8> =
            read_counted::<_, _, WireError, _>(&mut reader, CountWidth::U16, 10, |r| {
                Ok(r.read_u8()?)
            })
            .unwrap();
        assert_eq!(items, vec![7, 8, 9]);
    }

    #[test]
    fn counted_limit() {
        let mut src: &[u8] = &[5, 1, 2, 3, 4, 5];
        let mut reader = ByteReader::new(&mut src);
        let err = read_counted::<_, u8, WireError, _>(&mut reader, CountWidth::U8, 4, |r| {
            Ok(r.read_u8()?)
        })
        .unwrap_err();
        assert_eq!(err, WireError::CountExceeded { limit: 4, actual: 5 });
    }

    #[test]
    fn count_overflow_on_write() {
        let mut buf = Vec::new();
        let mut writer = ByteWriter::new(&mut buf);
        let err = CountWidth::U8.write(&mut writer, 256).unwrap_err();
        assert!(matches!(err, WireError::CountOverflow { count: 256, .. }));
    }

    #[test]
    fn empty_chain_is_single_zero() {
        let bytes = writer_bytes(|w| {
            write_chain::<_, u8, WireError, _>(w, &[], |w, v| Ok(w.write_u8(*v)?)).unwrap();
        });
        assert_eq!(bytes, vec![0]);
    }

    #[test]
    fn chain_has_next_bytes() {
        let bytes = writer_bytes(|w| {
            write_chain::<_, _, WireError, _>(w, &[0xAAu8, 0xBB], |w, v| Ok(w.write_u8(*v)?))
                .unwrap();
        });
        assert_eq!(bytes, vec![1, 0xAA, 1, 0xBB, 0]);
    }

    #[test]
    fn chain_too_long() {
        let mut src: &[u8] = &[1, 0, 1, 0, 1, 0, 1];
        let mut reader = ByteReader::new(&mut src);
        let err = read_chain::<_, u8, WireError, _>(&mut reader, 2, |r| Ok(r.read_u8()?))
            .unwrap_err();
        assert_eq!(err, WireError::ChainTooLong { limit: 2 });
    }

    #[test]
    fn sentinel_scan_stops_at_sentinel() {
        // Records are single non-zero bytes; zero is the sentinel.
        let mut src: &[u8] = &[3, 4, 0, 0xEE];
        let mut reader = ByteReader::new(&mut src);
        let items: Vec<u8> = read_until_sentinel::<_, _, WireError, _>(&mut reader, 8, |r| {
            let b = r.read_u8()?;
            Ok((b != 0).then_some(b))
        })
        .unwrap();
        assert_eq!(items, vec![3, 4]);
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn sentinel_never_found() {
        let mut src: &[u8] = &[1, 1, 1, 1];
        let mut reader = ByteReader::new(&mut src);
        let err = read_until_sentinel::<_, u8, WireError, _>(&mut reader, 2, |r| {
            let b = r.read_u8()?;
            Ok((b != 0).then_some(b))
        })
        .unwrap_err();
        assert_eq!(err, WireError::SentinelNotFound { limit: 2 });
    }

    #[test]
    fn tagged_roundtrip() {
        let bytes = writer_bytes(|w| {
            write_tagged::<_, _, WireError, _, _>(
                w,
                &[(254u8, 1u8), (253, 2)],
                255,
                |(t, _)| *t,
                |w, (_, v)| Ok(w.write_u8(*v)?),
            )
            .unwrap();
        });
        assert_eq!(bytes, vec![254, 1, 253, 2, 255]);

        let mut src = bytes.as_slice();
        let mut reader = ByteReader::new(&mut src);
        let items = read_tagged::<_, _, WireError, _>(&mut reader, 255, 8, |tag, r| {
            Ok((tag, r.read_u8()?))
        })
        .unwrap();
        assert_eq!(items, vec![(254, 1), (253, 2)]);
    }
}
