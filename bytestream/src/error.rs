//! Error types for byte stream operations.

use std::fmt;
use std::io;

/// Result type for byte stream operations.
pub type ByteResult<T> = Result<T, ByteError>;

/// Errors that can occur while writing to a sink or reading from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteError {
    /// The underlying sink or source failed.
    Io {
        /// Kind reported by the sink/source.
        kind: io::ErrorKind,
        /// Rendered message of the original error.
        message: String,
    },

    /// The source ended in the middle of a value.
    UnexpectedEof {
        /// Number of bytes requested.
        requested: usize,
        /// Stream offset at which the read started.
        position: u64,
    },

    /// A string ran past the maximum buffer length without a terminator.
    StringTooLong {
        /// Maximum number of bytes allowed before the terminator.
        max: usize,
        /// Stream offset at which the string started.
        position: u64,
    },

    /// A decoded string was not valid UTF-8.
    InvalidUtf8 {
        /// Stream offset at which the string started.
        position: u64,
    },

    /// A string to be written contains the terminator byte.
    EmbeddedNul {
        /// Byte index of the terminator inside the string.
        index: usize,
    },
}

impl ByteError {
    /// Converts an I/O error raised while reading `requested` bytes at `position`.
    ///
    /// A short read becomes [`ByteError::UnexpectedEof`]; everything else is
    /// reported as a sink/source failure.
    pub(crate) fn from_read(err: &io::Error, requested: usize, position: u64) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::UnexpectedEof {
                requested,
                position,
            }
        } else {
            Self::from(err)
        }
    }

    /// Returns `true` if the sink or source itself failed.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

impl From<&io::Error> for ByteError {
    fn from(err: &io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<io::Error> for ByteError {
    fn from(err: io::Error) -> Self {
        Self::from(&err)
    }
}

impl fmt::Display for ByteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { kind, message } => write!(f, "i/o failure ({kind:?}): {message}"),
            Self::UnexpectedEof {
                requested,
                position,
            } => {
                write!(
                    f,
                    "unexpected end of stream reading {requested} bytes at offset {position}"
                )
            }
            Self::StringTooLong { max, position } => {
                write!(
                    f,
                    "string at offset {position} exceeds maximum of {max} bytes"
                )
            }
            Self::InvalidUtf8 { position } => {
                write!(f, "string at offset {position} is not valid utf-8")
            }
            Self::EmbeddedNul { index } => {
                write!(f, "string contains a terminator byte at index {index}")
            }
        }
    }
}

impl std::error::Error for ByteError {}
