//! Opaque random number generator state.

use std::io::{Read, Write};

use bytestream::{ByteReader, ByteWriter};

use crate::error::CodecResult;

pub const RNG_STATE_WORDS: usize = 32;

/// Zero words written after the state so the blob keeps its historical size.
pub const RNG_PADDING_WORDS: usize = 27;

/// Generator state as saved. Only the values are kept, never the algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RngState {
    pub value: u32,
    pub state_index: u32,
    pub z: [u32; 3],
    pub state: [u32; RNG_STATE_WORDS],
}

pub(crate) fn encode_rng<W: Write + ?Sized>(
    rng: &RngState,
    writer: &mut ByteWriter<'_, W>,
) -> CodecResult<()> {
    writer.write_u32(rng.value)?;
    writer.write_u32(rng.state_index)?;
    for &word in rng.z.iter().chain(&rng.state) {
        writer.write_u32(word)?;
    }
    writer.write_zeros(RNG_PADDING_WORDS * 4)?;
    Ok(())
}

/// Padding words are skipped whatever they contain.
pub(crate) fn decode_rng<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
) -> CodecResult<RngState> {
    let mut rng = RngState {
        value: reader.read_u32()?,
        state_index: reader.read_u32()?,
        ..RngState::default()
    };
    for word in rng.z.iter_mut().chain(rng.state.iter_mut()) {
        *word = reader.read_u32()?;
    }
    reader.skip(RNG_PADDING_WORDS * 4)?;
    Ok(rng)
}
