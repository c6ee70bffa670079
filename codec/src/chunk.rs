//! Dungeon levels.
//!
//! A level is written in four parts that can live in different sections:
//! terrain, object piles, monsters and traps. Terrain is a set of run-length
//! coded planes, one per byte of square flags, followed by the feature plane.
//! Objects and traps carry their own positions and are regrouped by square
//! when read back; monster occupancy is derived from monster positions.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};

use bytestream::{ByteReader, ByteWriter};
use schema::dims::{SQUARE_SIZE, TRF_SIZE};
use wire::{
    decode_plane, encode_plane, read_until_sentinel, write_terminated, BytePlane, CountWidth,
};

use crate::context::{check_count, DecodeContext, EncodeContext};
use crate::error::{ArrayKind, CodecResult, CorruptReason, EncodeReason};
use crate::item::{decode_item_list, encode_item_list, Item};
use crate::knowledge::check_size;
use crate::monster::{decode_monster, encode_monster, Monster};
use crate::trap::{decode_trap, encode_trap, encode_trap_sentinel, Trap};
use crate::types::Loc;

/// Name given to a level that was never named.
pub const DEFAULT_CHUNK_NAME: &str = "Blank";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub name: String,
    height: u16,
    width: u16,
    info: [BytePlane; SQUARE_SIZE],
    feat: BytePlane,
    /// Level feeling.
    pub feeling: u8,
    /// Number of squares seen toward the feeling.
    pub feeling_squares: u16,
    /// Turn the level was created on.
    pub created_at: i32,
    pub objects: BTreeMap<Loc, Vec<Item>>,
    pub traps: BTreeMap<Loc, Vec<Trap>>,
    pub monsters: Vec<Monster>,
}

impl Chunk {
    /// Creates an empty level with every square flag clear and feature 0.
    #[must_use]
    pub fn new(name: impl Into<String>, height: u16, width: u16) -> Self {
        Self {
            name: name.into(),
            height,
            width,
            info: std::array::from_fn(|_| BytePlane::filled(width, height, 0)),
            feat: BytePlane::filled(width, height, 0),
            feeling: 0,
            feeling_squares: 0,
            created_at: 0,
            objects: BTreeMap::new(),
            traps: BTreeMap::new(),
            monsters: Vec::new(),
        }
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn contains(&self, loc: Loc) -> bool {
        loc.within(self.height, self.width)
    }

    /// Terrain feature at `loc`.
    #[must_use]
    pub fn feature(&self, loc: Loc) -> Option<u8> {
        self.feat.get(loc.y.into(), loc.x.into())
    }

    pub fn set_feature(&mut self, loc: Loc, feature: u8) -> bool {
        self.feat.set(loc.y.into(), loc.x.into(), feature)
    }

    /// Returns `true` if square flag `flag` is set at `loc`.
    #[must_use]
    pub fn has_flag(&self, loc: Loc, flag: usize) -> bool {
        self.info
            .get(flag / 8)
            .and_then(|plane| plane.get(loc.y.into(), loc.x.into()))
            .is_some_and(|byte| byte & (1 << (flag % 8)) != 0)
    }

    /// Sets or clears a square flag. Returns `false` if `loc` or `flag` is out of range.
    pub fn set_flag(&mut self, loc: Loc, flag: usize, on: bool) -> bool {
        let Some(plane) = self.info.get_mut(flag / 8) else {
            return false;
        };
        let Some(byte) = plane.get(loc.y.into(), loc.x.into()) else {
            return false;
        };
        let mask = 1 << (flag % 8);
        let byte = if on { byte | mask } else { byte & !mask };
        plane.set(loc.y.into(), loc.x.into(), byte)
    }

    /// The square flag planes, one per flag byte.
    #[must_use]
    pub fn info_planes(&self) -> &[BytePlane] {
        &self.info
    }

    #[must_use]
    pub const fn feature_plane(&self) -> &BytePlane {
        &self.feat
    }

    /// Items lying at `loc`, top of the pile first.
    #[must_use]
    pub fn items_at(&self, loc: Loc) -> &[Item] {
        self.objects.get(&loc).map_or(&[], Vec::as_slice)
    }

    /// Adds `item` to the pile at its own position.
    pub fn place_item(&mut self, item: Item) {
        self.objects.entry(item.loc).or_default().push(item);
    }

    pub fn place_trap(&mut self, trap: Trap) {
        self.traps.entry(trap.loc).or_default().push(trap);
    }

    /// The monster standing at `loc`, if any.
    #[must_use]
    pub fn occupant(&self, loc: Loc) -> Option<&Monster> {
        self.monsters.iter().find(|monster| monster.loc == loc)
    }

    fn outside(&self, loc: Loc) -> EncodeReason {
        EncodeReason::OutsideChunk {
            loc,
            height: self.height,
            width: self.width,
        }
    }

    fn check_inside(&self, loc: Loc) -> CodecResult<()> {
        if self.contains(loc) {
            Ok(())
        } else {
            Err(CorruptReason::OutsideChunk {
                loc,
                height: self.height,
                width: self.width,
            }
            .into())
        }
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_NAME, 0, 0)
    }
}

pub(crate) fn encode_terrain<W: Write + ?Sized>(
    chunk: &Chunk,
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    let cells = usize::from(chunk.height) * usize::from(chunk.width);
    let limit = ctx.limits.max_grid_cells;
    if cells > limit {
        return Err(EncodeReason::GridTooLarge { cells, limit }.into());
    }
    ctx.write_string(writer, &chunk.name)?;
    writer.write_u16(chunk.height)?;
    writer.write_u16(chunk.width)?;
    for plane in &chunk.info {
        encode_plane(plane, writer)?;
    }
    encode_plane(&chunk.feat, writer)?;
    writer.write_u8(chunk.feeling)?;
    writer.write_u16(chunk.feeling_squares)?;
    writer.write_i32(chunk.created_at)?;
    Ok(())
}

/// Reads terrain into a level with no objects, monsters or traps.
pub(crate) fn decode_terrain<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<Chunk> {
    let name = ctx.read_string(reader)?;
    let height = reader.read_u16()?;
    let width = reader.read_u16()?;
    let mut chunk = Chunk::new(name, 0, 0);
    for plane in &mut chunk.info {
        *plane = decode_plane(reader, width, height, ctx.limits)?;
    }
    chunk.feat = decode_plane(reader, width, height, ctx.limits)?;
    chunk.height = height;
    chunk.width = width;
    chunk.feeling = reader.read_u8()?;
    chunk.feeling_squares = reader.read_u16()?;
    chunk.created_at = reader.read_i32()?;
    Ok(chunk)
}

/// Writes every object pile in row-major order, then the sentinel item.
///
/// Piles are rebuilt from item positions on load, so an empty pile is refused.
pub(crate) fn encode_objects<W: Write + ?Sized>(
    chunk: &Chunk,
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    for (&pile, items) in &chunk.objects {
        if !chunk.contains(pile) {
            return Err(chunk.outside(pile).into());
        }
        if items.is_empty() {
            return Err(EncodeReason::EmptyPile { loc: pile }.into());
        }
        if let Some(item) = items.iter().find(|item| item.loc != pile) {
            return Err(EncodeReason::ItemOutsidePile {
                pile,
                item: item.loc,
            }
            .into());
        }
    }
    encode_item_list(writer, ctx, chunk.objects.values().flatten())
}

pub(crate) fn decode_objects<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
    chunk: &mut Chunk,
) -> CodecResult<()> {
    for item in decode_item_list(reader, ctx)? {
        chunk.check_inside(item.loc)?;
        chunk.place_item(item);
    }
    Ok(())
}

/// Writes the monster table size (one reserved slot plus the live monsters),
/// then each monster.
pub(crate) fn encode_monsters<W: Write + ?Sized>(
    chunk: &Chunk,
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    check_count(ctx.codec_limits.max_monsters_per_level, chunk.monsters.len())?;
    let mut seen = BTreeSet::new();
    for monster in &chunk.monsters {
        if !chunk.contains(monster.loc) {
            return Err(chunk.outside(monster.loc).into());
        }
        if !seen.insert(monster.loc) {
            return Err(EncodeReason::SharedSquare { loc: monster.loc }.into());
        }
    }
    CountWidth::U16.write(writer, chunk.monsters.len() + 1)?;
    for monster in &chunk.monsters {
        encode_monster(monster, writer, ctx)?;
    }
    Ok(())
}

pub(crate) fn decode_monsters<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
    chunk: &mut Chunk,
) -> CodecResult<()> {
    let slots = usize::from(reader.read_u16()?);
    let count = slots
        .checked_sub(1)
        .ok_or(CorruptReason::MissingReservedSlot)?;
    let limit = ctx.codec_limits.max_monsters_per_level;
    if count > limit {
        return Err(CorruptReason::CountExceeded {
            limit,
            actual: count,
        }
        .into());
    }
    let mut seen = BTreeSet::new();
    chunk.monsters = Vec::with_capacity(count);
    for _ in 0..count {
        let monster = decode_monster(reader, ctx)?;
        chunk.check_inside(monster.loc)?;
        if !seen.insert(monster.loc) {
            return Err(CorruptReason::SharedSquare { loc: monster.loc }.into());
        }
        chunk.monsters.push(monster);
    }
    Ok(())
}

pub(crate) fn encode_traps<W: Write + ?Sized>(
    chunk: &Chunk,
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    for (&square, traps) in &chunk.traps {
        if !chunk.contains(square) {
            return Err(chunk.outside(square).into());
        }
        if traps.is_empty() {
            return Err(EncodeReason::EmptyPile { loc: square }.into());
        }
        if let Some(trap) = traps.iter().find(|trap| trap.loc != square) {
            return Err(chunk.outside(trap.loc).into());
        }
    }
    let count = chunk.traps.values().map(Vec::len).sum();
    check_count(ctx.limits.max_sentinel_scan, count)?;
    writer.write_u8(TRF_SIZE as u8)?;
    write_terminated(
        writer,
        chunk.traps.values().flatten(),
        |w, trap| encode_trap(trap, w),
        |w| encode_trap_sentinel(w),
    )
}

pub(crate) fn decode_traps<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
    chunk: &mut Chunk,
) -> CodecResult<()> {
    check_size(reader, ArrayKind::TrapFlags, TRF_SIZE)?;
    let traps = read_until_sentinel(reader, ctx.limits.max_sentinel_scan, |r| decode_trap(r))?;
    for trap in traps {
        chunk.check_inside(trap.loc)?;
        chunk.place_trap(trap);
    }
    Ok(())
}

/// Writes a whole stored level: terrain, objects, monsters, traps.
pub fn encode_chunk<W: Write + ?Sized>(
    chunk: &Chunk,
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    encode_terrain(chunk, writer, ctx)?;
    encode_objects(chunk, writer, ctx)?;
    encode_monsters(chunk, writer, ctx)?;
    encode_traps(chunk, writer, ctx)
}

pub fn decode_chunk<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<Chunk> {
    let mut chunk = decode_terrain(reader, ctx)?;
    decode_objects(reader, ctx, &mut chunk)?;
    decode_monsters(reader, ctx, &mut chunk)?;
    decode_traps(reader, ctx, &mut chunk)?;
    Ok(chunk)
}
