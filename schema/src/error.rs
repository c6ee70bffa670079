//! Table validation errors.

use std::fmt;

use crate::TableKind;

/// Result type for table operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when building or validating game tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A table has more entries than its id width can address.
    TableTooLarge {
        table: TableKind,
        len: usize,
        max: usize,
    },

    /// A table entry has an empty name.
    EmptyName { table: TableKind, index: usize },

    /// Two entries in one table share a name.
    DuplicateName { table: TableKind, name: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TableTooLarge { table, len, max } => {
                write!(f, "{table} table has {len} entries, maximum is {max}")
            }
            Self::EmptyName { table, index } => {
                write!(f, "{table} entry {index} has an empty name")
            }
            Self::DuplicateName { table, name } => {
                write!(f, "{table} name {name:?} appears more than once")
            }
        }
    }
}

impl std::error::Error for SchemaError {}
