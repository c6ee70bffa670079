//! Store records.

use std::io::{Read, Write};

use bytestream::{ByteReader, ByteWriter};
use wire::{read_counted, write_counted, CountWidth};

use crate::context::{check_count, DecodeContext, EncodeContext};
use crate::error::CodecResult;
use crate::item::{decode_live_item, encode_item, Item};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Store {
    /// Index of the current shopkeeper.
    pub owner: u8,
    pub stock: Vec<Item>,
}

pub fn encode_store<W: Write + ?Sized>(
    store: &Store,
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    check_count(ctx.codec_limits.max_store_stock, store.stock.len())?;
    writer.write_u8(store.owner)?;
    write_counted(writer, CountWidth::U8, &store.stock, |w, item| {
        encode_item(item, w, ctx)
    })
}

pub fn decode_store<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<Store> {
    let owner = reader.read_u8()?;
    let stock = read_counted(
        reader,
        CountWidth::U8,
        ctx.codec_limits.max_store_stock,
        |r| decode_live_item(r, ctx),
    )?;
    Ok(Store { owner, stock })
}
