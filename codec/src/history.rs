//! Character history entries.

use std::io::{Read, Write};

use bytestream::{ByteReader, ByteWriter};
use schema::dims::HIST_SIZE;
use wire::FlagSet;

use crate::context::{DecodeContext, EncodeContext};
use crate::error::CodecResult;
use crate::types::ArtifactId;

pub type HistoryFlags = FlagSet<HIST_SIZE>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryEntry {
    pub kind: HistoryFlags,
    pub turn: i32,
    /// Dungeon level at the time.
    pub depth: i16,
    /// Character level at the time.
    pub level: i16,
    pub artifact: Option<ArtifactId>,
    pub event: String,
}

pub fn encode_history_entry<W: Write + ?Sized>(
    entry: &HistoryEntry,
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    let artifact = ctx.artifact(entry.artifact)?;
    entry.kind.write(writer)?;
    writer.write_i32(entry.turn)?;
    writer.write_i16(entry.depth)?;
    writer.write_i16(entry.level)?;
    writer.write_u8(artifact)?;
    ctx.write_string(writer, &entry.event)?;
    Ok(())
}

pub fn decode_history_entry<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<HistoryEntry> {
    Ok(HistoryEntry {
        kind: HistoryFlags::read(reader)?,
        turn: reader.read_i32()?,
        depth: reader.read_i16()?,
        level: reader.read_i16()?,
        artifact: ctx.artifact(reader.read_u8()?)?,
        event: ctx.read_string(reader)?,
    })
}
