//! Item records.
//!
//! Every record starts with the reserved marker [`ITEM_MARKER`] and the item
//! record version. Lists of items that have no count are closed by a sentinel
//! record: a full record whose kind (`tval`) is zero.

use std::io::{Read, Write};

use bytestream::{ByteReader, ByteWriter};
use schema::dims::{ELEM_MAX, ID_SIZE, OBJ_MOD_MAX, OF_SIZE};
use wire::{read_chain, read_until_sentinel, write_chain, write_terminated, FlagSet};

use crate::context::{check_count, DecodeContext, EncodeContext};
use crate::error::{CodecError, CodecResult, CorruptReason, EncodeReason, VersionedPart};
use crate::types::{ActivationId, ArtifactId, EgoId, Loc};

/// Reserved value that precedes every item record.
pub const ITEM_MARKER: u16 = 0xFFFF;

/// Current item record version.
pub const ITEM_VERSION: u8 = 5;

pub type ObjectFlags = FlagSet<OF_SIZE>;
pub type IdentifyFlags = FlagSet<ID_SIZE>;

/// Extra damage against targets vulnerable to an element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Brand {
    pub name: String,
    pub element: i16,
    pub multiplier: i16,
    pub known: bool,
}

/// Extra damage against a class of monster.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Slay {
    pub name: String,
    pub race_flag: i16,
    pub multiplier: i16,
    pub known: bool,
}

/// Resistance to one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementInfo {
    pub res_level: i16,
    pub flags: u8,
}

/// A `base + dice d sides` recharge time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timing {
    pub base: u16,
    pub dice: u16,
    pub sides: u16,
}

/// Where an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemOrigin {
    pub kind: u8,
    pub depth: u8,
    /// Species index for drops, unchecked.
    pub extra: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Item {
    pub loc: Loc,
    /// Item type. Zero is reserved for the sentinel record.
    pub tval: u8,
    pub sval: u8,
    pub pval: i16,
    pub number: u8,
    pub weight: i16,
    pub artifact: Option<ArtifactId>,
    pub ego: Option<EgoId>,
    pub timeout: i16,
    pub to_h: i16,
    pub to_d: i16,
    pub to_a: i16,
    pub ac: i16,
    pub dd: u8,
    pub ds: u8,
    pub marked: u8,
    pub origin: ItemOrigin,
    pub ignore: bool,
    pub flags: ObjectFlags,
    pub known_flags: ObjectFlags,
    pub id_flags: IdentifyFlags,
    pub modifiers: [i16; OBJ_MOD_MAX],
    pub brands: Vec<Brand>,
    pub slays: Vec<Slay>,
    pub elements: [ElementInfo; ELEM_MAX],
    /// Index of the monster carrying this item, or 0.
    pub held_by: i16,
    /// Index of the monster this item is a disguise for, or 0.
    pub mimicking: i16,
    pub activation: Option<ActivationId>,
    pub time: Timing,
    pub inscription: Option<String>,
}

impl Item {
    /// Creates an item of the given kind with every other field at its default.
    #[must_use]
    pub fn new(tval: u8, sval: u8) -> Self {
        Self {
            tval,
            sval,
            number: 1,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn at(mut self, loc: Loc) -> Self {
        self.loc = loc;
        self
    }
}

/// Writes a live item record.
pub fn encode_item<W: Write + ?Sized>(
    item: &Item,
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    if item.tval == 0 {
        return Err(EncodeReason::EmptyItemKind.into());
    }
    if item.inscription.as_deref() == Some("") {
        return Err(EncodeReason::EmptyInscription.into());
    }
    write_record(item, writer, ctx)
}

/// Writes the sentinel record that closes an item list.
pub fn encode_item_sentinel<W: Write + ?Sized>(
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    write_record(&Item::default(), writer, ctx)
}

fn write_record<W: Write + ?Sized>(
    item: &Item,
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    let artifact = ctx.artifact(item.artifact)?;
    let ego = ctx.ego(item.ego)?;
    let activation = ctx.activation(item.activation)?;

    writer.write_u16(ITEM_MARKER)?;
    writer.write_u8(ITEM_VERSION)?;

    writer.write_u8(item.loc.y)?;
    writer.write_u8(item.loc.x)?;
    writer.write_u8(item.tval)?;
    writer.write_u8(item.sval)?;
    writer.write_i16(item.pval)?;
    writer.write_u8(item.number)?;
    writer.write_i16(item.weight)?;
    writer.write_u8(artifact)?;
    writer.write_u8(ego)?;
    writer.write_i16(item.timeout)?;
    writer.write_i16(item.to_h)?;
    writer.write_i16(item.to_d)?;
    writer.write_i16(item.to_a)?;
    writer.write_i16(item.ac)?;
    writer.write_u8(item.dd)?;
    writer.write_u8(item.ds)?;
    writer.write_u8(item.marked)?;
    writer.write_u8(item.origin.kind)?;
    writer.write_u8(item.origin.depth)?;
    writer.write_u16(item.origin.extra)?;
    writer.write_bool(item.ignore)?;

    item.flags.write(writer)?;
    item.known_flags.write(writer)?;
    item.id_flags.write(writer)?;
    for &modifier in &item.modifiers {
        writer.write_i16(modifier)?;
    }

    encode_brands(writer, ctx, &item.brands)?;
    encode_slays(writer, ctx, &item.slays)?;

    for element in &item.elements {
        writer.write_i16(element.res_level)?;
        writer.write_u8(element.flags)?;
    }

    writer.write_i16(item.held_by)?;
    writer.write_i16(item.mimicking)?;
    writer.write_u16(activation)?;
    writer.write_u16(item.time.base)?;
    writer.write_u16(item.time.dice)?;
    writer.write_u16(item.time.sides)?;
    ctx.write_string(writer, item.inscription.as_deref().unwrap_or(""))?;
    Ok(())
}

pub(crate) fn encode_brands<W: Write + ?Sized>(
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
    brands: &[Brand],
) -> CodecResult<()> {
    check_count(ctx.limits.max_chain_len, brands.len())?;
    write_chain(writer, brands, |w, brand: &Brand| {
        ctx.write_string(w, &brand.name)?;
        w.write_i16(brand.element)?;
        w.write_i16(brand.multiplier)?;
        w.write_bool(brand.known)?;
        Ok::<_, CodecError>(())
    })
}

fn encode_slays<W: Write + ?Sized>(
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
    slays: &[Slay],
) -> CodecResult<()> {
    check_count(ctx.limits.max_chain_len, slays.len())?;
    write_chain(writer, slays, |w, slay: &Slay| {
        ctx.write_string(w, &slay.name)?;
        w.write_i16(slay.race_flag)?;
        w.write_i16(slay.multiplier)?;
        w.write_bool(slay.known)?;
        Ok::<_, CodecError>(())
    })
}

/// Reads one item record; the sentinel record reads as `None`.
pub fn decode_item<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<Option<Item>> {
    let marker = reader.read_u16()?;
    if marker != ITEM_MARKER {
        return Err(CorruptReason::BadItemMarker { found: marker }.into());
    }
    let version = reader.read_u8()?;
    if version != ITEM_VERSION {
        return Err(CodecError::version(
            VersionedPart::ItemRecord,
            ITEM_VERSION.into(),
            version.into(),
        ));
    }

    let loc = Loc::new(reader.read_u8()?, reader.read_u8()?);
    let tval = reader.read_u8()?;
    let sval = reader.read_u8()?;
    let pval = reader.read_i16()?;
    let number = reader.read_u8()?;
    let weight = reader.read_i16()?;
    let artifact = reader.read_u8()?;
    let ego = reader.read_u8()?;
    let timeout = reader.read_i16()?;
    let to_h = reader.read_i16()?;
    let to_d = reader.read_i16()?;
    let to_a = reader.read_i16()?;
    let ac = reader.read_i16()?;
    let dd = reader.read_u8()?;
    let ds = reader.read_u8()?;
    let marked = reader.read_u8()?;
    let origin = ItemOrigin {
        kind: reader.read_u8()?,
        depth: reader.read_u8()?,
        extra: reader.read_u16()?,
    };
    let ignore = reader.read_bool()?;

    let flags = ObjectFlags::read(reader)?;
    let known_flags = ObjectFlags::read(reader)?;
    let id_flags = IdentifyFlags::read(reader)?;
    let mut modifiers = [0; OBJ_MOD_MAX];
    for modifier in &mut modifiers {
        *modifier = reader.read_i16()?;
    }

    let brands = read_chain(reader, ctx.limits.max_chain_len, |r| {
        Ok::<_, CodecError>(Brand {
            name: ctx.read_string(r)?,
            element: r.read_i16()?,
            multiplier: r.read_i16()?,
            known: r.read_bool()?,
        })
    })?;
    let slays = read_chain(reader, ctx.limits.max_chain_len, |r| {
        Ok::<_, CodecError>(Slay {
            name: ctx.read_string(r)?,
            race_flag: r.read_i16()?,
            multiplier: r.read_i16()?,
            known: r.read_bool()?,
        })
    })?;

    let mut elements = [ElementInfo::default(); ELEM_MAX];
    for element in &mut elements {
        element.res_level = reader.read_i16()?;
        element.flags = reader.read_u8()?;
    }

    let held_by = reader.read_i16()?;
    let mimicking = reader.read_i16()?;
    let activation = reader.read_u16()?;
    let time = Timing {
        base: reader.read_u16()?,
        dice: reader.read_u16()?,
        sides: reader.read_u16()?,
    };
    let inscription = ctx.read_string(reader)?;

    if tval == 0 {
        return Ok(None);
    }

    Ok(Some(Item {
        loc,
        tval,
        sval,
        pval,
        number,
        weight,
        artifact: ctx.artifact(artifact)?,
        ego: ctx.ego(ego)?,
        timeout,
        to_h,
        to_d,
        to_a,
        ac,
        dd,
        ds,
        marked,
        origin,
        ignore,
        flags,
        known_flags,
        id_flags,
        modifiers,
        brands,
        slays,
        elements,
        held_by,
        mimicking,
        activation: ctx.activation(activation)?,
        time,
        inscription: (!inscription.is_empty()).then_some(inscription),
    }))
}

/// Reads an item record that must not be the sentinel.
pub fn decode_live_item<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<Item> {
    decode_item(reader, ctx)?.ok_or_else(|| CorruptReason::UnexpectedSentinel.into())
}

/// Writes `items` followed by the sentinel record.
///
/// Refuses more items than a reader scans for the sentinel.
pub fn encode_item_list<'i, W: Write + ?Sized>(
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
    items: impl IntoIterator<Item = &'i Item>,
) -> CodecResult<()> {
    let mut written = 0;
    write_terminated(
        writer,
        items,
        |w, item| {
            written += 1;
            check_count(ctx.limits.max_sentinel_scan, written)?;
            encode_item(item, w, ctx)
        },
        |w| encode_item_sentinel(w, ctx),
    )
}

/// Reads item records up to and including the sentinel.
pub fn decode_item_list<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<Vec<Item>> {
    read_until_sentinel(reader, ctx.limits.max_sentinel_scan, |r| decode_item(r, ctx))
}
