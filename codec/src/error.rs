//! Error types for codec operations.

use std::fmt;
use std::io;

use bytestream::ByteError;
use schema::TableKind;
use wire::{CountWidthName, WireError};

use crate::savefile::SectionKind;
use crate::types::Loc;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while saving or loading a world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The sink or source failed.
    Io { kind: io::ErrorKind, message: String },

    /// The stream is not a valid save.
    Corrupt(CorruptReason),

    /// A version tag or declared array size is not the one this reader supports.
    VersionMismatch {
        what: VersionedPart,
        expected: u32,
        found: u32,
    },

    /// The world contains a value the format cannot represent.
    Unencodable(EncodeReason),
}

impl CodecError {
    /// Returns `true` if the sink or source itself failed.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt(_))
    }

    #[must_use]
    pub const fn is_version_mismatch(&self) -> bool {
        matches!(self, Self::VersionMismatch { .. })
    }

    pub(crate) fn version(what: VersionedPart, expected: usize, found: usize) -> Self {
        Self::VersionMismatch {
            what,
            expected: u32::try_from(expected).unwrap_or(u32::MAX),
            found: u32::try_from(found).unwrap_or(u32::MAX),
        }
    }
}

/// Which part of the stream carried an unexpected version or size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionedPart {
    FileFormat,
    Section(SectionKind),
    ItemRecord,
    Array(ArrayKind),
}

/// Fixed-size arrays whose declared length is written ahead of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    ObjectFlags,
    IdentifyFlags,
    ObjectModifiers,
    Elements,
    MonsterFlags,
    MonsterTimed,
    TrapFlags,
    SquareFlags,
    HistoryFlags,
    ItemTypes,
    Stats,
    PlayerTimed,
}

/// Why a stream was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorruptReason {
    /// The source ended in the middle of a record.
    Truncated { requested: usize, position: u64 },
    StringTooLong { max: usize, position: u64 },
    InvalidUtf8 { position: u64 },
    BadMagic { found: u32 },
    RunLengthMismatch { expected: usize, actual: usize },
    ZeroLengthRun { cell: usize },
    GridTooLarge { cells: usize, limit: usize },
    ChainTooLong { limit: usize },
    SentinelNotFound { limit: usize },
    CountExceeded { limit: usize, actual: usize },
    IdOutOfRange { table: TableKind, raw: i64 },
    BadItemMarker { found: u16 },
    /// A sentinel record appeared where a live record was required.
    UnexpectedSentinel,
    UnknownGearTag { tag: u8 },
    OutsideChunk { loc: Loc, height: u16, width: u16 },
    SharedSquare { loc: Loc },
    PlayerOutsideLevel { y: u16, x: u16 },
    /// A monster table count of zero leaves no room for the reserved slot.
    MissingReservedSlot,
    /// A level section's presence byte disagrees with the death flag.
    PresenceMismatch { section: SectionKind, present: bool },
    SpellCountMismatch { expected: u16, found: u16 },
    /// Any other framing error.
    Framing(WireError),
}

/// Why a world could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeReason {
    EmbeddedNul { index: usize },
    CountOverflow { count: usize, width: CountWidthName },
    PlaneShape { expected: usize, actual: usize },
    /// A live item has kind 0, which is reserved for the sentinel.
    EmptyItemKind,
    /// A live trap has kind 0, which is reserved for the sentinel.
    EmptyTrapKind,
    /// `Some("")` cannot be told apart from "no inscription".
    EmptyInscription,
    /// An empty option name would end the option list early.
    EmptyOptionName,
    /// A kill record uses the reserved end-of-list name.
    ReservedMonsterName,
    UnknownId { table: TableKind, raw: i64 },
    StringTooLong { len: usize, max: usize },
    CountExceeded { limit: usize, actual: usize },
    GridTooLarge { cells: usize, limit: usize },
    SpellCountMismatch { expected: u16, found: usize },
    OutsideChunk { loc: Loc, height: u16, width: u16 },
    SharedSquare { loc: Loc },
    ItemOutsidePile { pile: Loc, item: Loc },
    /// A pile or trap square with nothing in it would not survive a reload.
    EmptyPile { loc: Loc },
    /// A living player must have a current level.
    MissingDungeon,
}

impl From<ByteError> for CodecError {
    fn from(err: ByteError) -> Self {
        match err {
            ByteError::Io { kind, message } => Self::Io { kind, message },
            ByteError::UnexpectedEof {
                requested,
                position,
            } => Self::Corrupt(CorruptReason::Truncated {
                requested,
                position,
            }),
            ByteError::StringTooLong { max, position } => {
                Self::Corrupt(CorruptReason::StringTooLong { max, position })
            }
            ByteError::InvalidUtf8 { position } => {
                Self::Corrupt(CorruptReason::InvalidUtf8 { position })
            }
            ByteError::EmbeddedNul { index } => {
                Self::Unencodable(EncodeReason::EmbeddedNul { index })
            }
        }
    }
}

impl From<WireError> for CodecError {
    fn from(err: WireError) -> Self {
        match err {
            WireError::Bytes(e) => e.into(),
            WireError::InvalidMagic { found } => Self::Corrupt(CorruptReason::BadMagic { found }),
            WireError::UnsupportedVersion { found } => Self::VersionMismatch {
                what: VersionedPart::FileFormat,
                expected: u32::from(wire::VERSION),
                found: u32::from(found),
            },
            WireError::RunLengthMismatch { expected, actual } => {
                Self::Corrupt(CorruptReason::RunLengthMismatch { expected, actual })
            }
            WireError::ZeroLengthRun { cell } => {
                Self::Corrupt(CorruptReason::ZeroLengthRun { cell })
            }
            WireError::GridTooLarge { cells, limit } => {
                Self::Corrupt(CorruptReason::GridTooLarge { cells, limit })
            }
            WireError::PlaneShape { expected, actual } => {
                Self::Unencodable(EncodeReason::PlaneShape { expected, actual })
            }
            WireError::ChainTooLong { limit } => {
                Self::Corrupt(CorruptReason::ChainTooLong { limit })
            }
            WireError::SentinelNotFound { limit } => {
                Self::Corrupt(CorruptReason::SentinelNotFound { limit })
            }
            WireError::CountExceeded { limit, actual } => {
                Self::Corrupt(CorruptReason::CountExceeded { limit, actual })
            }
            WireError::CountOverflow { count, width } => {
                Self::Unencodable(EncodeReason::CountOverflow { count, width })
            }
            other => Self::Corrupt(CorruptReason::Framing(other)),
        }
    }
}

impl From<CorruptReason> for CodecError {
    fn from(reason: CorruptReason) -> Self {
        Self::Corrupt(reason)
    }
}

impl From<EncodeReason> for CodecError {
    fn from(reason: EncodeReason) -> Self {
        Self::Unencodable(reason)
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { kind, message } => write!(f, "i/o error ({kind:?}): {message}"),
            Self::Corrupt(reason) => write!(f, "corrupt save: {reason}"),
            Self::VersionMismatch {
                what,
                expected,
                found,
            } => {
                write!(
                    f,
                    "{what} version mismatch: expected {expected}, found {found}"
                )
            }
            Self::Unencodable(reason) => write!(f, "cannot encode: {reason}"),
        }
    }
}

impl fmt::Display for VersionedPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileFormat => write!(f, "file format"),
            Self::Section(section) => write!(f, "{section} section"),
            Self::ItemRecord => write!(f, "item record"),
            Self::Array(array) => write!(f, "{array} size"),
        }
    }
}

impl fmt::Display for ArrayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ObjectFlags => "object flag",
            Self::IdentifyFlags => "identify flag",
            Self::ObjectModifiers => "object modifier",
            Self::Elements => "element",
            Self::MonsterFlags => "monster flag",
            Self::MonsterTimed => "monster timed effect",
            Self::TrapFlags => "trap flag",
            Self::SquareFlags => "square flag",
            Self::HistoryFlags => "history flag",
            Self::ItemTypes => "item type",
            Self::Stats => "stat",
            Self::PlayerTimed => "player timed effect",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for CorruptReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated {
                requested,
                position,
            } => {
                write!(f, "stream ended at {position} reading {requested} bytes")
            }
            Self::StringTooLong { max, position } => {
                write!(f, "string at {position} longer than {max} bytes")
            }
            Self::InvalidUtf8 { position } => write!(f, "string at {position} is not UTF-8"),
            Self::BadMagic { found } => write!(f, "bad magic number 0x{found:08X}"),
            Self::RunLengthMismatch { expected, actual } => {
                write!(f, "runs cover {actual} cells, plane has {expected}")
            }
            Self::ZeroLengthRun { cell } => write!(f, "zero-length run at cell {cell}"),
            Self::GridTooLarge { cells, limit } => {
                write!(f, "plane of {cells} cells exceeds limit {limit}")
            }
            Self::ChainTooLong { limit } => {
                write!(f, "chain did not end within {limit} elements")
            }
            Self::SentinelNotFound { limit } => {
                write!(f, "no sentinel record within {limit} records")
            }
            Self::CountExceeded { limit, actual } => {
                write!(f, "count {actual} exceeds limit {limit}")
            }
            Self::IdOutOfRange { table, raw } => write!(f, "{table} id {raw} out of range"),
            Self::BadItemMarker { found } => write!(f, "bad item marker 0x{found:04X}"),
            Self::UnexpectedSentinel => write!(f, "sentinel record where a record was required"),
            Self::UnknownGearTag { tag } => write!(f, "unknown gear tag {tag}"),
            Self::OutsideChunk { loc, height, width } => {
                write!(f, "{loc} lies outside a {height}x{width} level")
            }
            Self::SharedSquare { loc } => write!(f, "two monsters occupy {loc}"),
            Self::PlayerOutsideLevel { y, x } => {
                write!(f, "player at ({y}, {x}) is outside the level")
            }
            Self::MissingReservedSlot => write!(f, "monster count leaves no reserved slot"),
            Self::PresenceMismatch { section, present } => {
                write!(
                    f,
                    "{section} section presence byte {} contradicts death flag",
                    u8::from(*present)
                )
            }
            Self::SpellCountMismatch { expected, found } => {
                write!(f, "class has {expected} spells, save has {found}")
            }
            Self::Framing(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for EncodeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmbeddedNul { index } => write!(f, "string has a NUL byte at {index}"),
            Self::CountOverflow { count, width } => {
                write!(f, "count {count} does not fit a {width} prefix")
            }
            Self::PlaneShape { expected, actual } => {
                write!(f, "plane expects {expected} cells, has {actual}")
            }
            Self::EmptyItemKind => write!(f, "item has kind 0"),
            Self::EmptyTrapKind => write!(f, "trap has kind 0"),
            Self::EmptyInscription => write!(f, "inscription is present but empty"),
            Self::EmptyOptionName => write!(f, "option has an empty name"),
            Self::ReservedMonsterName => write!(f, "kill record uses the reserved name"),
            Self::UnknownId { table, raw } => write!(f, "{table} id {raw} is not in the tables"),
            Self::StringTooLong { len, max } => {
                write!(f, "string of {len} bytes is longer than {max}")
            }
            Self::CountExceeded { limit, actual } => {
                write!(f, "count {actual} exceeds limit {limit}")
            }
            Self::GridTooLarge { cells, limit } => {
                write!(f, "plane of {cells} cells exceeds limit {limit}")
            }
            Self::SpellCountMismatch { expected, found } => {
                write!(f, "class has {expected} spells, player has {found}")
            }
            Self::OutsideChunk { loc, height, width } => {
                write!(f, "{loc} lies outside a {height}x{width} level")
            }
            Self::SharedSquare { loc } => write!(f, "two monsters occupy {loc}"),
            Self::ItemOutsidePile { pile, item } => {
                write!(f, "item at {item} filed under pile {pile}")
            }
            Self::EmptyPile { loc } => write!(f, "empty pile at {loc}"),
            Self::MissingDungeon => write!(f, "living player has no current level"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Corrupt(CorruptReason::Framing(e)) => Some(e),
            _ => None,
        }
    }
}
