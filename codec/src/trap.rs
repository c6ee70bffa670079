//! Trap records. Trap lists end with an all-zero record.

use std::io::{Read, Write};

use bytestream::{ByteReader, ByteWriter};
use schema::dims::TRF_SIZE;
use wire::FlagSet;

use crate::error::{CodecResult, EncodeReason};
use crate::types::Loc;

pub type TrapFlags = FlagSet<TRF_SIZE>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trap {
    /// Trap kind. Zero is reserved for the sentinel.
    pub kind: u8,
    pub loc: Loc,
    pub xtra: u8,
    pub flags: TrapFlags,
}

impl Trap {
    #[must_use]
    pub const fn new(kind: u8, loc: Loc) -> Self {
        Self {
            kind,
            loc,
            xtra: 0,
            flags: TrapFlags::new(),
        }
    }
}

pub fn encode_trap<W: Write + ?Sized>(
    trap: &Trap,
    writer: &mut ByteWriter<'_, W>,
) -> CodecResult<()> {
    if trap.kind == 0 {
        return Err(EncodeReason::EmptyTrapKind.into());
    }
    write_record(trap, writer)
}

pub fn encode_trap_sentinel<W: Write + ?Sized>(writer: &mut ByteWriter<'_, W>) -> CodecResult<()> {
    write_record(&Trap::new(0, Loc::default()), writer)
}

fn write_record<W: Write + ?Sized>(trap: &Trap, writer: &mut ByteWriter<'_, W>) -> CodecResult<()> {
    writer.write_u8(trap.kind)?;
    writer.write_u8(trap.loc.y)?;
    writer.write_u8(trap.loc.x)?;
    writer.write_u8(trap.xtra)?;
    trap.flags.write(writer)?;
    Ok(())
}

/// Reads one trap record; the sentinel reads as `None`.
pub fn decode_trap<R: Read + ?Sized>(reader: &mut ByteReader<'_, R>) -> CodecResult<Option<Trap>> {
    let kind = reader.read_u8()?;
    let loc = Loc::new(reader.read_u8()?, reader.read_u8()?);
    let xtra = reader.read_u8()?;
    let flags = TrapFlags::read(reader)?;
    if kind == 0 {
        return Ok(None);
    }
    Ok(Some(Trap {
        kind,
        loc,
        xtra,
        flags,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{decode_all, encode, try_encode};

    #[test]
    fn record_layout() {
        let mut trap = Trap::new(3, Loc::new(4, 5));
        trap.xtra = 9;
        trap.flags.insert(0);
        trap.flags.insert(9);
        let bytes = encode(|w, _| encode_trap(&trap, w));
        assert_eq!(bytes, vec![3, 4, 5, 9, 0b0000_0001, 0b0000_0010]);

        let (decoded, _) = decode_all(&bytes, |r, _| decode_trap(r));
        assert_eq!(decoded.unwrap(), Some(trap));
    }

    #[test]
    fn sentinel_is_all_zero() {
        let bytes = encode(|w, _| encode_trap_sentinel(w));
        assert_eq!(bytes, vec![0; 4 + TRF_SIZE]);
        let (decoded, _) = decode_all(&bytes, |r, _| decode_trap(r));
        assert_eq!(decoded.unwrap(), None);
    }

    #[test]
    fn kind_zero_is_unencodable() {
        let err = try_encode(|w, _| encode_trap(&Trap::new(0, Loc::new(1, 1)), w)).unwrap_err();
        assert!(matches!(
            err,
            crate::error::CodecError::Unencodable(EncodeReason::EmptyTrapKind)
        ));
    }
}
