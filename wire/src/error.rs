//! Error types for wire format operations.

use std::fmt;

use bytestream::ByteError;

/// Result type for wire format operations.
pub type WireResult<T> = Result<T, WireError>;

/// Errors raised by the header, plane and list framing layers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WireError {
    /// Primitive read/write failure.
    Bytes(ByteError),

    /// File does not start with the expected magic number.
    InvalidMagic { found: u32 },

    /// File was written by an unsupported format version.
    UnsupportedVersion { found: u16 },

    /// Plane runs did not add up to `width * height` cells.
    RunLengthMismatch { expected: usize, actual: usize },

    /// A run of length zero was encountered.
    ZeroLengthRun { cell: usize },

    /// Plane dimensions exceed the configured cell limit.
    GridTooLarge { cells: usize, limit: usize },

    /// Cell buffer length does not match the declared dimensions.
    PlaneShape { expected: usize, actual: usize },

    /// A continuation-flagged chain did not end within the limit.
    ChainTooLong { limit: usize },

    /// No sentinel record was found within the limit.
    SentinelNotFound { limit: usize },

    /// A count prefix exceeds the caller's limit.
    CountExceeded { limit: usize, actual: usize },

    /// A count does not fit its prefix width.
    CountOverflow { count: usize, width: CountWidthName },
}

/// Printable name of a count prefix width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountWidthName {
    U8,
    U16,
    U32,
}

impl From<ByteError> for WireError {
    fn from(err: ByteError) -> Self {
        Self::Bytes(err)
    }
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(e) => write!(f, "{e}"),
            Self::InvalidMagic { found } => write!(f, "invalid magic number: 0x{found:08X}"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version: {found}")
            }
            Self::RunLengthMismatch { expected, actual } => {
                write!(
                    f,
                    "run lengths cover {actual} cells but plane has {expected}"
                )
            }
            Self::ZeroLengthRun { cell } => write!(f, "zero-length run at cell {cell}"),
            Self::GridTooLarge { cells, limit } => {
                write!(f, "plane of {cells} cells exceeds limit {limit}")
            }
            Self::PlaneShape { expected, actual } => {
                write!(f, "plane expects {expected} cells, got {actual}")
            }
            Self::ChainTooLong { limit } => {
                write!(f, "chain did not terminate within {limit} elements")
            }
            Self::SentinelNotFound { limit } => {
                write!(f, "no sentinel record within {limit} records")
            }
            Self::CountExceeded { limit, actual } => {
                write!(f, "count {actual} exceeds limit {limit}")
            }
            Self::CountOverflow { count, width } => {
                write!(f, "count {count} does not fit a {width} prefix")
            }
        }
    }
}

impl fmt::Display for CountWidthName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for WireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bytes(e) => Some(e),
            _ => None,
        }
    }
}
