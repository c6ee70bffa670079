//! Static game tables and record dimensions for the delve save format.
//!
//! Save records never hold live references. Species, artifacts, egos,
//! activations, races and classes are written as small integer ids and
//! resolved against the [`GameTables`] supplied by the caller.
//!
//! # Design Principles
//!
//! - **Explicit context** - Tables are passed into every codec call, never read from globals.
//! - **Reserved zero** - Optional 1-based ids use `0` for "none", never for an entry.
//! - **Fixed dimensions** - Flag array sizes are compile-time constants in [`dims`].

pub mod dims;
mod error;
mod tables;

use std::fmt;

pub use error::{SchemaError, SchemaResult};
pub use tables::{ClassDef, GameTables, TablesBuilder};

/// The tables a save record can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Species,
    Artifact,
    Ego,
    Activation,
    Race,
    Class,
    ObjectKind,
}

impl TableKind {
    /// Returns `true` for tables addressed by 1-based ids.
    #[must_use]
    pub const fn is_one_based(self) -> bool {
        matches!(
            self,
            Self::Species | Self::Artifact | Self::Ego | Self::Activation
        )
    }

    /// Largest number of entries the on-disk id width can address.
    #[must_use]
    pub const fn max_entries(self) -> usize {
        match self {
            Self::Species => i16::MAX as usize,
            Self::Artifact | Self::Ego => u8::MAX as usize,
            Self::Activation => u16::MAX as usize,
            Self::Race | Self::Class => u8::MAX as usize + 1,
            Self::ObjectKind => i16::MAX as usize + 1,
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Species => "species",
            Self::Artifact => "artifact",
            Self::Ego => "ego",
            Self::Activation => "activation",
            Self::Race => "race",
            Self::Class => "class",
            Self::ObjectKind => "object kind",
        };
        write!(f, "{name}")
    }
}
