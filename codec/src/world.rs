//! The world snapshot a save is written from and read into.

use std::io::{Read, Write};

use bytestream::{ByteReader, ByteWriter};
use schema::{GameTables, TableKind};

use crate::chunk::Chunk;
use crate::error::{CodecResult, EncodeReason};
use crate::gear::Gear;
use crate::history::HistoryEntry;
use crate::knowledge::{ArtifactKnowledge, IgnoreRules, KillMemory, KindKnowledge, Quest};
use crate::options::{Message, Options};
use crate::player::Player;
use crate::rng::RngState;
use crate::store::Store;
use crate::types::Loc;

/// Seeds, scoring flags and the game clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Misc {
    pub seed_randart: u32,
    pub seed_flavor: u32,
    pub total_winner: u16,
    pub noscore: u16,
    pub is_dead: bool,
    pub turn: i32,
}

/// The level the player is on, as it is and as the player remembers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dungeon {
    pub depth: u16,
    pub daycount: u16,
    pub player: Loc,
    pub level: Chunk,
    pub known: Chunk,
}

/// Everything a save holds.
///
/// A dead player has no current level: `dungeon` and `chunks` are not
/// written, and load back as `None` and empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct World {
    pub rng: RngState,
    pub options: Options,
    /// Message log, oldest first.
    pub messages: Vec<Message>,
    pub kills: Vec<KillMemory>,
    /// One entry per object kind.
    pub kinds: Vec<KindKnowledge>,
    pub quests: Vec<Quest>,
    /// One entry per artifact, in table order.
    pub artifacts: Vec<ArtifactKnowledge>,
    pub player: Player,
    pub ignore: IgnoreRules,
    pub misc: Misc,
    pub gear: Gear,
    pub stores: Vec<Store>,
    pub dungeon: Option<Dungeon>,
    /// Stored levels the player may return to.
    pub chunks: Vec<Chunk>,
    pub history: Vec<HistoryEntry>,
}

impl World {
    /// One-line summary shown when picking a save.
    pub fn description(&self, tables: &GameTables) -> Result<String, EncodeReason> {
        let player = &self.player;
        if self.misc.is_dead {
            return Ok(format!("{}, dead ({})", player.name, player.died_from));
        }
        let dungeon = self.dungeon.as_ref().ok_or(EncodeReason::MissingDungeon)?;
        let race = tables.race_name(player.race).ok_or(EncodeReason::UnknownId {
            table: TableKind::Race,
            raw: i64::from(player.race),
        })?;
        let class = tables.class(player.class).ok_or(EncodeReason::UnknownId {
            table: TableKind::Class,
            raw: i64::from(player.class),
        })?;
        Ok(format!(
            "{}, L{} {} {}, at DL{}",
            player.name, player.level, race, class.name, dungeon.depth
        ))
    }

    /// The current level, unless the player is dead.
    pub(crate) fn level_data(&self) -> Option<&Dungeon> {
        if self.misc.is_dead {
            None
        } else {
            self.dungeon.as_ref()
        }
    }
}

pub(crate) fn encode_misc<W: Write + ?Sized>(
    misc: &Misc,
    writer: &mut ByteWriter<'_, W>,
) -> CodecResult<()> {
    writer.write_u32(misc.seed_randart)?;
    writer.write_u32(misc.seed_flavor)?;
    writer.write_u16(misc.total_winner)?;
    writer.write_u16(misc.noscore)?;
    writer.write_bool(misc.is_dead)?;
    writer.write_i32(misc.turn)?;
    Ok(())
}

pub(crate) fn decode_misc<R: Read + ?Sized>(reader: &mut ByteReader<'_, R>) -> CodecResult<Misc> {
    Ok(Misc {
        seed_randart: reader.read_u32()?,
        seed_flavor: reader.read_u32()?,
        total_winner: reader.read_u16()?,
        noscore: reader.read_u16()?,
        is_dead: reader.read_bool()?,
        turn: reader.read_i32()?,
    })
}
