//! Helpers shared by the unit tests.

use bytestream::{ByteReader, ByteWriter};
use schema::GameTables;
use wire::Limits;

use crate::context::{DecodeContext, EncodeContext};
use crate::error::CodecResult;
use crate::limits::CodecLimits;

/// Runs `f` against a fresh writer with the testing tables and limits and
/// returns the bytes it wrote.
pub fn encode<F>(f: F) -> Vec<u8>
where
    F: FnOnce(&mut ByteWriter<'_, Vec<u8>>, &EncodeContext<'_>) -> CodecResult<()>,
{
    encode_with(&Limits::for_testing(), &CodecLimits::for_testing(), f).unwrap()
}

/// Like [`encode`] with no limits, for building input a decoder must reject.
pub fn encode_unlimited<F>(f: F) -> Vec<u8>
where
    F: FnOnce(&mut ByteWriter<'_, Vec<u8>>, &EncodeContext<'_>) -> CodecResult<()>,
{
    encode_with(&Limits::unlimited(), &CodecLimits::unlimited(), f).unwrap()
}

/// Runs `f` with the testing tables and limits and returns its result.
pub fn try_encode<F>(f: F) -> CodecResult<Vec<u8>>
where
    F: FnOnce(&mut ByteWriter<'_, Vec<u8>>, &EncodeContext<'_>) -> CodecResult<()>,
{
    encode_with(&Limits::for_testing(), &CodecLimits::for_testing(), f)
}

fn encode_with<F>(limits: &Limits, codec_limits: &CodecLimits, f: F) -> CodecResult<Vec<u8>>
where
    F: FnOnce(&mut ByteWriter<'_, Vec<u8>>, &EncodeContext<'_>) -> CodecResult<()>,
{
    let tables = GameTables::for_testing();
    let ctx = EncodeContext::new(&tables, limits, codec_limits);
    let mut buf = Vec::new();
    let mut writer = ByteWriter::new(&mut buf);
    f(&mut writer, &ctx)?;
    Ok(buf)
}

/// Runs `f` over `bytes` with the testing tables and limits.
///
/// Returns the decode result and the number of bytes consumed.
pub fn decode_all<'b, T>(
    bytes: &'b [u8],
    f: impl FnOnce(&mut ByteReader<'_, &'b [u8]>, &DecodeContext<'_>) -> CodecResult<T>,
) -> (CodecResult<T>, u64) {
    let tables = GameTables::for_testing();
    let limits = Limits::for_testing();
    let codec_limits = CodecLimits::for_testing();
    let ctx = DecodeContext::new(&tables, &limits, &codec_limits);
    let mut src = bytes;
    let mut reader = ByteReader::new(&mut src);
    let result = f(&mut reader, &ctx);
    (result, reader.position())
}
