//! The player's gear: what is carried, and what the player believes is carried.

use std::io::{Read, Write};

use bytestream::{ByteReader, ByteWriter};
use wire::{read_tagged, write_tagged};

use crate::context::{check_count, DecodeContext, EncodeContext};
use crate::error::{CodecResult, CorruptReason};
use crate::item::{decode_live_item, encode_item, Item};

/// Closes a gear list.
pub const GEAR_FINISHED: u8 = 255;
pub const GEAR_EQUIPPED: u8 = 254;
pub const GEAR_PACK: u8 = 253;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GearSlot {
    Equipped,
    Pack,
}

impl GearSlot {
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Equipped => GEAR_EQUIPPED,
            Self::Pack => GEAR_PACK,
        }
    }

    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            GEAR_EQUIPPED => Some(Self::Equipped),
            GEAR_PACK => Some(Self::Pack),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GearItem {
    pub slot: GearSlot,
    pub item: Item,
}

impl GearItem {
    #[must_use]
    pub const fn equipped(item: Item) -> Self {
        Self {
            slot: GearSlot::Equipped,
            item,
        }
    }

    #[must_use]
    pub const fn in_pack(item: Item) -> Self {
        Self {
            slot: GearSlot::Pack,
            item,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Gear {
    pub carried: Vec<GearItem>,
    /// The player's view of `carried`, which may lag behind it.
    pub known: Vec<GearItem>,
}

fn encode_list<W: Write + ?Sized>(
    list: &[GearItem],
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    check_count(ctx.limits.max_sentinel_scan, list.len())?;
    write_tagged(
        writer,
        list,
        GEAR_FINISHED,
        |entry| entry.slot.tag(),
        |w, entry| encode_item(&entry.item, w, ctx),
    )
}

fn decode_list<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<Vec<GearItem>> {
    read_tagged(
        reader,
        GEAR_FINISHED,
        ctx.limits.max_sentinel_scan,
        |tag, r| {
            let slot = GearSlot::from_tag(tag).ok_or(CorruptReason::UnknownGearTag { tag })?;
            let item = decode_live_item(r, ctx)?;
            Ok(GearItem { slot, item })
        },
    )
}

pub(crate) fn encode_gear<W: Write + ?Sized>(
    gear: &Gear,
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    encode_list(&gear.carried, writer, ctx)?;
    encode_list(&gear.known, writer, ctx)
}

pub(crate) fn decode_gear<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<Gear> {
    Ok(Gear {
        carried: decode_list(reader, ctx)?,
        known: decode_list(reader, ctx)?,
    })
}
