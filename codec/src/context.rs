//! Contexts threaded through every entity encoder and decoder.
//!
//! Both sides check against the same tables and limits. A world the
//! [`EncodeContext`] accepts reads back under a [`DecodeContext`] built from
//! the same values.

use std::io::{Read, Write};

use bytestream::{ByteReader, ByteWriter};
use schema::{GameTables, TableKind};
use tracing::warn;
use wire::Limits;

use crate::error::{CodecError, CodecResult, CorruptReason, EncodeReason};
use crate::limits::{CodecLimits, UnknownIdPolicy};
use crate::types::{
    activation_raw, artifact_raw, ego_raw, ActivationId, ArtifactId, EgoId, SpeciesId,
};

/// Tables and limits an encoder checks a world against before writing it.
///
/// Unknown ids are always refused here, whatever the decode-side
/// [`UnknownIdPolicy`] says.
#[derive(Debug, Clone, Copy)]
pub struct EncodeContext<'a> {
    pub tables: &'a GameTables,
    pub limits: &'a Limits,
    pub codec_limits: &'a CodecLimits,
}

impl<'a> EncodeContext<'a> {
    #[must_use]
    pub const fn new(
        tables: &'a GameTables,
        limits: &'a Limits,
        codec_limits: &'a CodecLimits,
    ) -> Self {
        Self {
            tables,
            limits,
            codec_limits,
        }
    }

    /// Writes a terminated string no longer than `max_string_len`.
    pub fn write_string<W: Write + ?Sized>(
        &self,
        writer: &mut ByteWriter<'_, W>,
        value: &str,
    ) -> CodecResult<()> {
        let max = self.limits.max_string_len;
        if value.len() > max {
            return Err(EncodeReason::StringTooLong {
                len: value.len(),
                max,
            }
            .into());
        }
        Ok(writer.write_string(value)?)
    }

    pub fn artifact(&self, id: Option<ArtifactId>) -> CodecResult<u8> {
        let raw = artifact_raw(id);
        self.optional(TableKind::Artifact, usize::from(raw))?;
        Ok(raw)
    }

    pub fn ego(&self, id: Option<EgoId>) -> CodecResult<u8> {
        let raw = ego_raw(id);
        self.optional(TableKind::Ego, usize::from(raw))?;
        Ok(raw)
    }

    pub fn activation(&self, id: Option<ActivationId>) -> CodecResult<u16> {
        let raw = activation_raw(id);
        self.optional(TableKind::Activation, usize::from(raw))?;
        Ok(raw)
    }

    /// Wire value of a species that must be in the tables.
    pub fn species(&self, id: SpeciesId) -> CodecResult<i16> {
        self.index(TableKind::Species, usize::from(id.raw()))?;
        Ok(id.wire())
    }

    pub fn index(&self, table: TableKind, raw: usize) -> CodecResult<()> {
        if self.tables.contains(table, raw) {
            Ok(())
        } else {
            Err(unknown(table, raw))
        }
    }

    fn optional(&self, table: TableKind, raw: usize) -> CodecResult<()> {
        if raw == 0 {
            return Ok(());
        }
        self.index(table, raw)
    }
}

/// Refuses a list longer than the reader would accept.
pub(crate) fn check_count(limit: usize, actual: usize) -> CodecResult<()> {
    if actual > limit {
        Err(EncodeReason::CountExceeded { limit, actual }.into())
    } else {
        Ok(())
    }
}

fn unknown(table: TableKind, raw: usize) -> CodecError {
    CodecError::Unencodable(EncodeReason::UnknownId {
        table,
        raw: i64::try_from(raw).unwrap_or(i64::MAX),
    })
}

/// Tables and limits a decoder resolves ids and bounds against.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    pub tables: &'a GameTables,
    pub limits: &'a Limits,
    pub codec_limits: &'a CodecLimits,
}

impl<'a> DecodeContext<'a> {
    #[must_use]
    pub const fn new(
        tables: &'a GameTables,
        limits: &'a Limits,
        codec_limits: &'a CodecLimits,
    ) -> Self {
        Self {
            tables,
            limits,
            codec_limits,
        }
    }

    /// Reads a terminated string bounded by `max_string_len`.
    pub fn read_string<R: Read + ?Sized>(
        &self,
        reader: &mut ByteReader<'_, R>,
    ) -> CodecResult<String> {
        Ok(reader.read_string(self.limits.max_string_len)?)
    }

    pub fn artifact(&self, raw: u8) -> CodecResult<Option<ArtifactId>> {
        let present = self.optional(TableKind::Artifact, usize::from(raw))?;
        Ok(ArtifactId::new(raw).filter(|_| present))
    }

    pub fn ego(&self, raw: u8) -> CodecResult<Option<EgoId>> {
        let present = self.optional(TableKind::Ego, usize::from(raw))?;
        Ok(EgoId::new(raw).filter(|_| present))
    }

    pub fn activation(&self, raw: u16) -> CodecResult<Option<ActivationId>> {
        let present = self.optional(TableKind::Activation, usize::from(raw))?;
        Ok(ActivationId::new(raw).filter(|_| present))
    }

    /// Resolves a mandatory species id.
    pub fn species(&self, raw: i16) -> CodecResult<SpeciesId> {
        u16::try_from(raw)
            .ok()
            .filter(|&id| self.tables.contains(TableKind::Species, usize::from(id)))
            .and_then(SpeciesId::new)
            .ok_or_else(|| out_of_range(TableKind::Species, i64::from(raw)))
    }

    /// Checks a mandatory 0-based index such as a race or class.
    pub fn index(&self, table: TableKind, raw: usize) -> CodecResult<()> {
        if self.tables.contains(table, raw) {
            Ok(())
        } else {
            Err(out_of_range(table, i64::try_from(raw).unwrap_or(i64::MAX)))
        }
    }

    /// Returns whether a non-zero optional id should be kept.
    fn optional(&self, table: TableKind, raw: usize) -> CodecResult<bool> {
        if raw == 0 {
            return Ok(false);
        }
        if self.tables.contains(table, raw) {
            return Ok(true);
        }
        match self.codec_limits.unknown_ids {
            UnknownIdPolicy::Strict => Err(out_of_range(
                table,
                i64::try_from(raw).unwrap_or(i64::MAX),
            )),
            UnknownIdPolicy::TreatAsAbsent => {
                warn!(%table, raw, "unknown id decoded as absent");
                Ok(false)
            }
        }
    }
}

fn out_of_range(table: TableKind, raw: i64) -> CodecError {
    CodecError::Corrupt(CorruptReason::IdOutOfRange { table, raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_ctx<T>(policy: UnknownIdPolicy, f: impl FnOnce(&DecodeContext<'_>) -> T) -> T {
        let tables = GameTables::for_testing();
        let limits = Limits::for_testing();
        let codec_limits = CodecLimits::for_testing().with_unknown_ids(policy);
        f(&DecodeContext::new(&tables, &limits, &codec_limits))
    }

    #[test]
    fn zero_is_absent() {
        with_ctx(UnknownIdPolicy::Strict, |ctx| {
            assert_eq!(ctx.artifact(0).unwrap(), None);
            assert_eq!(ctx.ego(0).unwrap(), None);
            assert_eq!(ctx.activation(0).unwrap(), None);
        });
    }

    #[test]
    fn known_ids_resolve() {
        with_ctx(UnknownIdPolicy::Strict, |ctx| {
            assert_eq!(ctx.artifact(3).unwrap(), ArtifactId::new(3));
            assert_eq!(ctx.ego(1).unwrap(), EgoId::new(1));
            assert_eq!(ctx.activation(2).unwrap(), ActivationId::new(2));
        });
    }

    #[test]
    fn strict_rejects_unknown() {
        with_ctx(UnknownIdPolicy::Strict, |ctx| {
            let err = ctx.artifact(4).unwrap_err();
            assert_eq!(
                err,
                CodecError::Corrupt(CorruptReason::IdOutOfRange {
                    table: TableKind::Artifact,
                    raw: 4
                })
            );
        });
    }

    #[test]
    fn lenient_drops_unknown() {
        with_ctx(UnknownIdPolicy::TreatAsAbsent, |ctx| {
            assert_eq!(ctx.artifact(200).unwrap(), None);
            assert_eq!(ctx.activation(9).unwrap(), None);
        });
    }

    #[test]
    fn species_is_always_strict() {
        with_ctx(UnknownIdPolicy::TreatAsAbsent, |ctx| {
            assert_eq!(ctx.species(5).unwrap().raw(), 5);
            assert!(ctx.species(0).is_err());
            assert!(ctx.species(-3).is_err());
            assert!(ctx.species(6).is_err());
        });
    }

    #[test]
    fn index_is_zero_based() {
        with_ctx(UnknownIdPolicy::Strict, |ctx| {
            assert!(ctx.index(TableKind::Race, 0).is_ok());
            assert!(ctx.index(TableKind::Class, 3).is_err());
        });
    }

    fn with_encode_ctx<T>(f: impl FnOnce(&EncodeContext<'_>) -> T) -> T {
        let tables = GameTables::for_testing();
        let limits = Limits::for_testing();
        let codec_limits =
            CodecLimits::for_testing().with_unknown_ids(UnknownIdPolicy::TreatAsAbsent);
        f(&EncodeContext::new(&tables, &limits, &codec_limits))
    }

    #[test]
    fn encode_resolves_known_ids() {
        with_encode_ctx(|ctx| {
            assert_eq!(ctx.artifact(None).unwrap(), 0);
            assert_eq!(ctx.artifact(ArtifactId::new(3)).unwrap(), 3);
            assert_eq!(ctx.ego(EgoId::new(1)).unwrap(), 1);
            assert_eq!(ctx.activation(ActivationId::new(2)).unwrap(), 2);
            assert_eq!(ctx.species(SpeciesId::new(5).unwrap()).unwrap(), 5);
        });
    }

    #[test]
    fn encode_refuses_unknown_ids_under_any_policy() {
        with_encode_ctx(|ctx| {
            assert_eq!(
                ctx.ego(EgoId::new(200)).unwrap_err(),
                CodecError::Unencodable(EncodeReason::UnknownId {
                    table: TableKind::Ego,
                    raw: 200
                })
            );
            assert!(ctx.artifact(ArtifactId::new(4)).is_err());
            assert!(ctx.activation(ActivationId::new(3)).is_err());
            assert!(ctx.species(SpeciesId::new(6).unwrap()).is_err());
        });
    }

    #[test]
    fn encode_string_limit() {
        with_encode_ctx(|ctx| {
            let mut buf = Vec::new();
            let mut writer = ByteWriter::new(&mut buf);
            ctx.write_string(&mut writer, &"a".repeat(128)).unwrap();
            let err = ctx.write_string(&mut writer, &"a".repeat(129)).unwrap_err();
            assert_eq!(
                err,
                CodecError::Unencodable(EncodeReason::StringTooLong { len: 129, max: 128 })
            );
            assert_eq!(buf.len(), 129);
        });
    }

    #[test]
    fn count_at_limit_is_accepted() {
        assert!(check_count(8, 8).is_ok());
        assert_eq!(
            check_count(8, 9).unwrap_err(),
            CodecError::Unencodable(EncodeReason::CountExceeded { limit: 8, actual: 9 })
        );
    }
}
