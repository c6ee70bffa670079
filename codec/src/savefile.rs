//! Whole-file save and load.
//!
//! A save is the file header followed by every [`SectionKind`] in
//! [`SectionKind::ALL`] order. Each section starts with its one-byte version;
//! nothing else frames it, so sections must be read back in the order they
//! were written.
//!
//! The five level sections (dungeon, objects, monsters, traps, chunks) begin
//! with a presence byte. It is `0` exactly when the player is dead, in which
//! case the section has no body.

use std::fmt;
use std::io::{Read, Write};

use bytestream::{ByteReader, ByteWriter};
use schema::dims::{HIST_SIZE, SQUARE_SIZE};
use schema::GameTables;
use tracing::{debug, error};
use wire::{
    decode_header, encode_header, read_counted, write_counted, CountWidth, FileHeader, Limits,
};

use crate::chunk::{
    decode_chunk, decode_monsters, decode_objects, decode_terrain, decode_traps, encode_chunk,
    encode_monsters, encode_objects, encode_terrain, encode_traps, Chunk,
};
use crate::context::{check_count, DecodeContext, EncodeContext};
use crate::error::{ArrayKind, CodecError, CodecResult, CorruptReason, EncodeReason, VersionedPart};
use crate::gear::{decode_gear, encode_gear};
use crate::history::{decode_history_entry, encode_history_entry};
use crate::knowledge::{
    check_size, decode_artifacts, decode_ignore, decode_kills, decode_object_memory,
    decode_quests, encode_artifacts, encode_ignore, encode_kills, encode_object_memory,
    encode_quests,
};
use crate::limits::CodecLimits;
use crate::options::{decode_messages, decode_options, encode_messages, encode_options};
use crate::player::{
    decode_hp_table, decode_player, decode_spells, encode_hp_table, encode_player, encode_spells,
};
use crate::rng::{decode_rng, encode_rng};
use crate::store::{decode_store, encode_store};
use crate::types::Loc;
use crate::world::{decode_misc, encode_misc, Dungeon, World};

/// Version byte of every section in the current format.
pub const SECTION_VERSION: u8 = 1;

/// The top-level sections of a save, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Description,
    Rng,
    Options,
    Messages,
    MonsterMemory,
    ObjectMemory,
    Quests,
    Artifacts,
    Player,
    Ignore,
    Misc,
    PlayerHp,
    PlayerSpells,
    Gear,
    Stores,
    Dungeon,
    Objects,
    Monsters,
    Traps,
    Chunks,
    History,
}

impl SectionKind {
    /// Every section in the order it is written.
    pub const ALL: [Self; 21] = [
        Self::Description,
        Self::Rng,
        Self::Options,
        Self::Messages,
        Self::MonsterMemory,
        Self::ObjectMemory,
        Self::Quests,
        Self::Artifacts,
        Self::Player,
        Self::Ignore,
        Self::Misc,
        Self::PlayerHp,
        Self::PlayerSpells,
        Self::Gear,
        Self::Stores,
        Self::Dungeon,
        Self::Objects,
        Self::Monsters,
        Self::Traps,
        Self::Chunks,
        Self::History,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Rng => "rng",
            Self::Options => "options",
            Self::Messages => "messages",
            Self::MonsterMemory => "monster memory",
            Self::ObjectMemory => "object memory",
            Self::Quests => "quests",
            Self::Artifacts => "artifacts",
            Self::Player => "player",
            Self::Ignore => "ignore",
            Self::Misc => "misc",
            Self::PlayerHp => "player hp",
            Self::PlayerSpells => "player spells",
            Self::Gear => "gear",
            Self::Stores => "stores",
            Self::Dungeon => "dungeon",
            Self::Objects => "objects",
            Self::Monsters => "monsters",
            Self::Traps => "traps",
            Self::Chunks => "chunks",
            Self::History => "history",
        }
    }

    /// Version byte written at the start of the section.
    #[must_use]
    pub const fn version(self) -> u8 {
        SECTION_VERSION
    }

    /// Returns `true` for the sections left empty when the player is dead.
    #[must_use]
    pub const fn is_level_data(self) -> bool {
        matches!(
            self,
            Self::Dungeon | Self::Objects | Self::Monsters | Self::Traps | Self::Chunks
        )
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where one section sits in the stream, header included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    pub kind: SectionKind,
    pub version: u8,
    /// Offset of the version byte.
    pub start: u64,
    /// Offset just past the section.
    pub end: u64,
}

impl SectionSpan {
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// What a save wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub bytes_written: u64,
    pub sections: Vec<SectionSpan>,
}

/// A decoded save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSave {
    pub description: String,
    pub world: World,
    pub sections: Vec<SectionSpan>,
}

/// Writes `world` to `sink` as a complete save.
///
/// Every id is checked against `tables` and every string and count against
/// the limits, so a save written here loads back under the same arguments.
/// The sink is borrowed; flushing it and making the write atomic are left to
/// the caller. On error the sink may hold a partial save.
pub fn save_savefile<W: Write + ?Sized>(
    world: &World,
    tables: &GameTables,
    limits: &Limits,
    codec_limits: &CodecLimits,
    sink: &mut W,
) -> CodecResult<SaveSummary> {
    let ctx = EncodeContext::new(tables, limits, codec_limits);
    let description = clip(world.description(tables)?, limits.max_string_len);
    if world.misc.is_dead && world.dungeon.is_some() {
        debug!("player is dead, level data will not be written");
    }

    let mut writer = ByteWriter::new(sink);
    encode_header(&FileHeader::current(), &mut writer)?;

    let mut sections = Vec::with_capacity(SectionKind::ALL.len());
    for kind in SectionKind::ALL {
        let start = writer.bytes_written();
        let result = writer
            .write_u8(kind.version())
            .map_err(CodecError::from)
            .and_then(|()| write_section(kind, world, &ctx, &description, &mut writer));
        if let Err(err) = result {
            error!(section = %kind, %err, "failed to write section");
            return Err(err);
        }
        let span = SectionSpan {
            kind,
            version: kind.version(),
            start,
            end: writer.bytes_written(),
        };
        debug!(
            section = %kind,
            version = span.version,
            start = span.start,
            end = span.end,
            "wrote section"
        );
        sections.push(span);
    }

    Ok(SaveSummary {
        bytes_written: writer.bytes_written(),
        sections,
    })
}

/// The description is built from other strings, so it may be longer than
/// any of them. It is cut at a char boundary rather than refused.
fn clip(mut text: String, max: usize) -> String {
    if text.len() > max {
        let mut end = max;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    text
}

fn write_section<W: Write + ?Sized>(
    kind: SectionKind,
    world: &World,
    ctx: &EncodeContext<'_>,
    description: &str,
    writer: &mut ByteWriter<'_, W>,
) -> CodecResult<()> {
    if kind.is_level_data() {
        writer.write_bool(!world.misc.is_dead)?;
        if world.misc.is_dead {
            return Ok(());
        }
    }

    match kind {
        SectionKind::Description => ctx.write_string(writer, description)?,
        SectionKind::Rng => encode_rng(&world.rng, writer)?,
        SectionKind::Options => encode_options(&world.options, writer, ctx)?,
        SectionKind::Messages => encode_messages(&world.messages, writer, ctx)?,
        SectionKind::MonsterMemory => encode_kills(&world.kills, writer, ctx)?,
        SectionKind::ObjectMemory => encode_object_memory(&world.kinds, writer, ctx)?,
        SectionKind::Quests => encode_quests(&world.quests, writer, ctx)?,
        SectionKind::Artifacts => encode_artifacts(&world.artifacts, writer, ctx)?,
        SectionKind::Player => encode_player(&world.player, writer, ctx)?,
        SectionKind::Ignore => encode_ignore(&world.ignore, writer, ctx)?,
        SectionKind::Misc => encode_misc(&world.misc, writer)?,
        SectionKind::PlayerHp => encode_hp_table(&world.player, writer)?,
        SectionKind::PlayerSpells => encode_spells(&world.player, writer, ctx)?,
        SectionKind::Gear => encode_gear(&world.gear, writer, ctx)?,
        SectionKind::Stores => {
            check_count(ctx.codec_limits.max_stores, world.stores.len())?;
            write_counted(writer, CountWidth::U16, &world.stores, |w, store| {
                encode_store(store, w, ctx)
            })?;
        }
        SectionKind::Dungeon => {
            let dungeon = current_level(world)?;
            let level = &dungeon.level;
            if !level.contains(dungeon.player) {
                return Err(EncodeReason::OutsideChunk {
                    loc: dungeon.player,
                    height: level.height(),
                    width: level.width(),
                }
                .into());
            }
            writer.write_u16(dungeon.depth)?;
            writer.write_u16(dungeon.daycount)?;
            writer.write_u16(dungeon.player.y.into())?;
            writer.write_u16(dungeon.player.x.into())?;
            writer.write_u8(SQUARE_SIZE as u8)?;
            encode_terrain(&dungeon.level, writer, ctx)?;
            encode_terrain(&dungeon.known, writer, ctx)?;
        }
        SectionKind::Objects => {
            let dungeon = current_level(world)?;
            encode_objects(&dungeon.level, writer, ctx)?;
            encode_objects(&dungeon.known, writer, ctx)?;
        }
        SectionKind::Monsters => {
            let dungeon = current_level(world)?;
            encode_monsters(&dungeon.level, writer, ctx)?;
            encode_monsters(&dungeon.known, writer, ctx)?;
        }
        SectionKind::Traps => {
            let dungeon = current_level(world)?;
            encode_traps(&dungeon.level, writer, ctx)?;
            encode_traps(&dungeon.known, writer, ctx)?;
        }
        SectionKind::Chunks => {
            check_count(ctx.codec_limits.max_chunks, world.chunks.len())?;
            write_counted(writer, CountWidth::U16, &world.chunks, |w, chunk| {
                encode_chunk(chunk, w, ctx)
            })?;
        }
        SectionKind::History => {
            check_count(ctx.codec_limits.max_history, world.history.len())?;
            writer.write_u8(HIST_SIZE as u8)?;
            write_counted(writer, CountWidth::U32, &world.history, |w, entry| {
                encode_history_entry(entry, w, ctx)
            })?;
        }
    }
    Ok(())
}

fn current_level(world: &World) -> Result<&Dungeon, EncodeReason> {
    world.level_data().ok_or(EncodeReason::MissingDungeon)
}

/// Reads a complete save from `source`.
///
/// Sections are decoded in file order; the first error aborts the load.
/// Bytes after the last section are not read.
pub fn load_savefile<R: Read + ?Sized>(
    source: &mut R,
    tables: &GameTables,
    limits: &Limits,
    codec_limits: &CodecLimits,
) -> CodecResult<LoadedSave> {
    let ctx = DecodeContext::new(tables, limits, codec_limits);
    let mut reader = ByteReader::new(source);
    decode_header(&mut reader)?;

    let mut description = String::new();
    let mut world = World::default();
    let mut sections = Vec::with_capacity(SectionKind::ALL.len());
    for kind in SectionKind::ALL {
        let start = reader.position();
        let result = read_section(kind, &mut reader, &ctx, &mut description, &mut world);
        if let Err(err) = result {
            error!(section = %kind, %err, position = reader.position(), "failed to read section");
            return Err(err);
        }
        let span = SectionSpan {
            kind,
            version: kind.version(),
            start,
            end: reader.position(),
        };
        debug!(
            section = %kind,
            version = span.version,
            start = span.start,
            end = span.end,
            "read section"
        );
        sections.push(span);
    }

    Ok(LoadedSave {
        description,
        world,
        sections,
    })
}

fn read_section<R: Read + ?Sized>(
    kind: SectionKind,
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
    description: &mut String,
    world: &mut World,
) -> CodecResult<()> {
    let version = reader.read_u8()?;
    if version != kind.version() {
        return Err(CodecError::version(
            VersionedPart::Section(kind),
            kind.version().into(),
            version.into(),
        ));
    }

    if kind.is_level_data() {
        let present = reader.read_bool()?;
        if present == world.misc.is_dead {
            return Err(CorruptReason::PresenceMismatch {
                section: kind,
                present,
            }
            .into());
        }
        if !present {
            return Ok(());
        }
    }

    match kind {
        SectionKind::Description => *description = ctx.read_string(reader)?,
        SectionKind::Rng => world.rng = decode_rng(reader)?,
        SectionKind::Options => world.options = decode_options(reader, ctx)?,
        SectionKind::Messages => world.messages = decode_messages(reader, ctx)?,
        SectionKind::MonsterMemory => world.kills = decode_kills(reader, ctx)?,
        SectionKind::ObjectMemory => world.kinds = decode_object_memory(reader, ctx)?,
        SectionKind::Quests => world.quests = decode_quests(reader, ctx)?,
        SectionKind::Artifacts => world.artifacts = decode_artifacts(reader, ctx)?,
        SectionKind::Player => world.player = decode_player(reader, ctx)?,
        SectionKind::Ignore => world.ignore = decode_ignore(reader, ctx)?,
        SectionKind::Misc => world.misc = decode_misc(reader)?,
        SectionKind::PlayerHp => world.player.hp_table = decode_hp_table(reader)?,
        SectionKind::PlayerSpells => {
            let (flags, order) = decode_spells(reader, ctx, world.player.class)?;
            world.player.spell_flags = flags;
            world.player.spell_order = order;
        }
        SectionKind::Gear => world.gear = decode_gear(reader, ctx)?,
        SectionKind::Stores => {
            let limit = ctx.codec_limits.max_stores;
            world.stores = read_counted(reader, CountWidth::U16, limit, |r| decode_store(r, ctx))?;
        }
        SectionKind::Dungeon => world.dungeon = Some(decode_dungeon(reader, ctx)?),
        SectionKind::Objects => {
            let dungeon = loaded_level(world, kind)?;
            decode_objects(reader, ctx, &mut dungeon.level)?;
            decode_objects(reader, ctx, &mut dungeon.known)?;
        }
        SectionKind::Monsters => {
            let dungeon = loaded_level(world, kind)?;
            decode_monsters(reader, ctx, &mut dungeon.level)?;
            decode_monsters(reader, ctx, &mut dungeon.known)?;
        }
        SectionKind::Traps => {
            let dungeon = loaded_level(world, kind)?;
            decode_traps(reader, ctx, &mut dungeon.level)?;
            decode_traps(reader, ctx, &mut dungeon.known)?;
        }
        SectionKind::Chunks => {
            let limit = ctx.codec_limits.max_chunks;
            world.chunks = read_counted(reader, CountWidth::U16, limit, |r| decode_chunk(r, ctx))?;
        }
        SectionKind::History => {
            check_size(reader, ArrayKind::HistoryFlags, HIST_SIZE)?;
            let limit = ctx.codec_limits.max_history;
            world.history = read_counted(reader, CountWidth::U32, limit, |r| {
                decode_history_entry(r, ctx)
            })?;
        }
    }
    Ok(())
}

fn decode_dungeon<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<Dungeon> {
    let depth = reader.read_u16()?;
    let daycount = reader.read_u16()?;
    let py = reader.read_u16()?;
    let px = reader.read_u16()?;
    check_size(reader, ArrayKind::SquareFlags, SQUARE_SIZE)?;
    let level = decode_terrain(reader, ctx)?;
    let known = decode_terrain(reader, ctx)?;

    let player =
        player_loc(&level, py, px).ok_or(CorruptReason::PlayerOutsideLevel { y: py, x: px })?;
    Ok(Dungeon {
        depth,
        daycount,
        player,
        level,
        known,
    })
}

fn player_loc(level: &Chunk, y: u16, x: u16) -> Option<Loc> {
    let loc = Loc::new(u8::try_from(y).ok()?, u8::try_from(x).ok()?);
    level.contains(loc).then_some(loc)
}

/// The level filled in by the dungeon section.
///
/// Presence bytes agree with the death flag, so a missing level here means the
/// dungeon section itself was absent.
fn loaded_level(world: &mut World, section: SectionKind) -> CodecResult<&mut Dungeon> {
    world.dungeon.as_mut().ok_or_else(|| {
        CorruptReason::PresenceMismatch {
            section,
            present: true,
        }
        .into()
    })
}
