//! What the player has learned: monster kills, object kinds, quests,
//! artifacts and ignore rules.

use std::io::{Read, Write};

use bytestream::{ByteReader, ByteWriter};
use schema::dims::{ELEM_MAX, ID_SIZE, ITYPE_SIZE, MFLAG_SIZE, OBJ_MOD_MAX, OF_SIZE};
use schema::TableKind;
use wire::{
    read_counted, read_until_sentinel, write_counted, write_terminated, CountWidth, FlagSet,
};

use crate::context::{check_count, DecodeContext, EncodeContext};
use crate::error::{ArrayKind, CodecError, CodecResult, CorruptReason, EncodeReason, VersionedPart};

/// Name that closes the kill memory list.
pub const KILLS_END: &str = "No more monsters";

/// Kills recorded against one species.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillMemory {
    pub name: String,
    pub kills: u16,
}

/// Knowledge about one object kind, stored as a single status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KindKnowledge {
    pub aware: bool,
    pub tried: bool,
    /// Ignored once the kind is known.
    pub ignored_aware: bool,
    pub everseen: bool,
    /// Ignored while the kind is still unknown.
    pub ignored_unaware: bool,
}

impl KindKnowledge {
    const AWARE: u8 = 0x01;
    const TRIED: u8 = 0x02;
    const IGNORED_AWARE: u8 = 0x04;
    const EVERSEEN: u8 = 0x08;
    const IGNORED_UNAWARE: u8 = 0x10;

    #[must_use]
    pub const fn to_byte(self) -> u8 {
        let mut byte = 0;
        if self.aware {
            byte |= Self::AWARE;
        }
        if self.tried {
            byte |= Self::TRIED;
        }
        if self.ignored_aware {
            byte |= Self::IGNORED_AWARE;
        }
        if self.everseen {
            byte |= Self::EVERSEEN;
        }
        if self.ignored_unaware {
            byte |= Self::IGNORED_UNAWARE;
        }
        byte
    }

    /// Unknown bits are dropped.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            aware: byte & Self::AWARE != 0,
            tried: byte & Self::TRIED != 0,
            ignored_aware: byte & Self::IGNORED_AWARE != 0,
            everseen: byte & Self::EVERSEEN != 0,
            ignored_unaware: byte & Self::IGNORED_UNAWARE != 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quest {
    pub level: u8,
    /// Number of quest monsters killed so far.
    pub cur_num: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArtifactKnowledge {
    pub created: bool,
    pub seen: bool,
    pub everseen: bool,
}

pub type ItemTypeFlags = FlagSet<ITYPE_SIZE>;

/// Ignore settings for one ego template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EgoIgnore {
    pub everseen: bool,
    /// Item types this ego is ignored on.
    pub types: ItemTypeFlags,
}

/// An inscription applied automatically to every item of a kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoInscription {
    /// 0-based object kind index.
    pub kind: u16,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IgnoreRules {
    /// Quality threshold per ignore category.
    pub levels: Vec<u8>,
    /// One entry per ego template, in table order.
    pub egos: Vec<EgoIgnore>,
    pub inscriptions: Vec<AutoInscription>,
}

const EGO_EVERSEEN: u8 = 0x02;

pub(crate) fn encode_kills<W: Write + ?Sized>(
    kills: &[KillMemory],
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    let recorded = kills.iter().filter(|memory| memory.kills > 0);
    check_count(ctx.limits.max_sentinel_scan, recorded.clone().count())?;
    writer.write_u8(MFLAG_SIZE as u8)?;
    write_terminated(
        writer,
        recorded,
        |w, memory| {
            if memory.name == KILLS_END {
                return Err(EncodeReason::ReservedMonsterName.into());
            }
            ctx.write_string(w, &memory.name)?;
            w.write_u16(memory.kills)?;
            Ok::<_, CodecError>(())
        },
        |w| ctx.write_string(w, KILLS_END),
    )
}

pub(crate) fn decode_kills<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<Vec<KillMemory>> {
    check_size(reader, ArrayKind::MonsterFlags, MFLAG_SIZE)?;
    read_until_sentinel(reader, ctx.limits.max_sentinel_scan, |r| {
        let name = ctx.read_string(r)?;
        if name == KILLS_END {
            return Ok(None);
        }
        let kills = r.read_u16()?;
        Ok::<_, CodecError>(Some(KillMemory { name, kills }))
    })
}

pub(crate) fn encode_object_memory<W: Write + ?Sized>(
    kinds: &[KindKnowledge],
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    check_count(ctx.tables.kind_count.min(ctx.codec_limits.max_kinds), kinds.len())?;
    CountWidth::U16.write(writer, kinds.len())?;
    for size in [OF_SIZE, ID_SIZE, OBJ_MOD_MAX, ELEM_MAX] {
        writer.write_u8(size as u8)?;
    }
    for kind in kinds {
        writer.write_u8(kind.to_byte())?;
    }
    Ok(())
}

pub(crate) fn decode_object_memory<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<Vec<KindKnowledge>> {
    let limit = ctx.tables.kind_count.min(ctx.codec_limits.max_kinds);
    let count = CountWidth::U16.read(reader, limit)?;
    check_size(reader, ArrayKind::ObjectFlags, OF_SIZE)?;
    check_size(reader, ArrayKind::IdentifyFlags, ID_SIZE)?;
    check_size(reader, ArrayKind::ObjectModifiers, OBJ_MOD_MAX)?;
    check_size(reader, ArrayKind::Elements, ELEM_MAX)?;
    let mut kinds = Vec::with_capacity(count);
    for _ in 0..count {
        kinds.push(KindKnowledge::from_byte(reader.read_u8()?));
    }
    Ok(kinds)
}

pub(crate) fn encode_quests<W: Write + ?Sized>(
    quests: &[Quest],
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    check_count(ctx.codec_limits.max_kinds, quests.len())?;
    write_counted(writer, CountWidth::U16, quests, |w, quest| {
        w.write_u8(quest.level)?;
        w.write_u16(quest.cur_num)?;
        Ok::<_, CodecError>(())
    })
}

pub(crate) fn decode_quests<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<Vec<Quest>> {
    read_counted(reader, CountWidth::U16, ctx.codec_limits.max_kinds, |r| {
        Ok::<_, CodecError>(Quest {
            level: r.read_u8()?,
            cur_num: r.read_u16()?,
        })
    })
}

/// Writes one entry per artifact; never more than the table holds.
pub(crate) fn encode_artifacts<W: Write + ?Sized>(
    artifacts: &[ArtifactKnowledge],
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    check_count(ctx.tables.artifacts.len(), artifacts.len())?;
    write_counted(writer, CountWidth::U16, artifacts, |w, artifact| {
        w.write_bool(artifact.created)?;
        w.write_bool(artifact.seen)?;
        w.write_bool(artifact.everseen)?;
        w.write_u8(0)?;
        Ok::<_, CodecError>(())
    })
}

pub(crate) fn decode_artifacts<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<Vec<ArtifactKnowledge>> {
    let limit = ctx.tables.artifacts.len();
    read_counted(reader, CountWidth::U16, limit, |r| {
        let artifact = ArtifactKnowledge {
            created: r.read_bool()?,
            seen: r.read_bool()?,
            everseen: r.read_bool()?,
        };
        r.read_u8()?;
        Ok::<_, CodecError>(artifact)
    })
}

pub(crate) fn encode_ignore<W: Write + ?Sized>(
    rules: &IgnoreRules,
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    check_count(ctx.tables.egos.len(), rules.egos.len())?;
    check_count(ctx.codec_limits.max_inscriptions, rules.inscriptions.len())?;
    write_counted(writer, CountWidth::U8, &rules.levels, |w, &level| {
        Ok::<_, CodecError>(w.write_u8(level)?)
    })?;

    CountWidth::U16.write(writer, rules.egos.len())?;
    writer.write_u16(ITYPE_SIZE as u16)?;
    for ego in &rules.egos {
        writer.write_u8(if ego.everseen { EGO_EVERSEEN } else { 0 })?;
        ego.types.write(writer)?;
    }

    write_counted(writer, CountWidth::U16, &rules.inscriptions, |w, inscription| {
        ctx.index(TableKind::ObjectKind, usize::from(inscription.kind))?;
        let kind = i16::try_from(inscription.kind).map_err(|_| EncodeReason::UnknownId {
            table: TableKind::ObjectKind,
            raw: i64::from(inscription.kind),
        })?;
        w.write_i16(kind)?;
        ctx.write_string(w, &inscription.text)?;
        Ok::<_, CodecError>(())
    })
}

pub(crate) fn decode_ignore<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<IgnoreRules> {
    let levels = read_counted(reader, CountWidth::U8, usize::from(u8::MAX), |r| {
        Ok::<_, CodecError>(r.read_u8()?)
    })?;

    let ego_count = CountWidth::U16.read(reader, ctx.tables.egos.len())?;
    let declared = usize::from(reader.read_u16()?);
    if declared != ITYPE_SIZE {
        return Err(CodecError::version(
            VersionedPart::Array(ArrayKind::ItemTypes),
            ITYPE_SIZE,
            declared,
        ));
    }
    let mut egos = Vec::with_capacity(ego_count);
    for _ in 0..ego_count {
        let everseen = reader.read_u8()? & EGO_EVERSEEN != 0;
        let types = ItemTypeFlags::read(reader)?;
        egos.push(EgoIgnore { everseen, types });
    }

    let inscriptions = read_counted(
        reader,
        CountWidth::U16,
        ctx.codec_limits.max_inscriptions,
        |r| {
            let raw = r.read_i16()?;
            let kind = u16::try_from(raw)
                .ok()
                .filter(|&kind| ctx.tables.contains(TableKind::ObjectKind, usize::from(kind)))
                .ok_or(CorruptReason::IdOutOfRange {
                    table: TableKind::ObjectKind,
                    raw: i64::from(raw),
                })?;
            Ok::<_, CodecError>(AutoInscription {
                kind,
                text: ctx.read_string(r)?,
            })
        },
    )?;

    Ok(IgnoreRules {
        levels,
        egos,
        inscriptions,
    })
}

/// Reads a declared one-byte array size and compares it with ours.
pub(crate) fn check_size<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    array: ArrayKind,
    expected: usize,
) -> CodecResult<()> {
    let found = usize::from(reader.read_u8()?);
    if found == expected {
        Ok(())
    } else {
        Err(CodecError::version(VersionedPart::Array(array), expected, found))
    }
}
