//! Ids and positions shared by the entity records.

use std::fmt;
use std::num::{NonZeroU16, NonZeroU8};

/// A square on a level, `y` first so that ordering is row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Loc {
    pub y: u8,
    pub x: u8,
}

impl Loc {
    #[must_use]
    pub const fn new(y: u8, x: u8) -> Self {
        Self { y, x }
    }

    /// Returns `true` if this square lies on a `height` by `width` level.
    #[must_use]
    pub const fn within(self, height: u16, width: u16) -> bool {
        (self.y as u16) < height && (self.x as u16) < width
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.y, self.x)
    }
}

/// A monster species, 1-based.
///
/// Written as an `i16`, so ids above `i16::MAX` do not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpeciesId(NonZeroU16);

impl SpeciesId {
    /// Creates a species id, or `None` for `0` and values above `i16::MAX`.
    #[must_use]
    pub const fn new(raw: u16) -> Option<Self> {
        if raw > i16::MAX as u16 {
            return None;
        }
        match NonZeroU16::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0.get()
    }

    pub(crate) const fn wire(self) -> i16 {
        // new() keeps the id within i16 range
        self.0.get() as i16
    }
}

/// An artifact, 1-based; `0` on the wire means none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactId(NonZeroU8);

impl ArtifactId {
    #[must_use]
    pub const fn new(raw: u8) -> Option<Self> {
        match NonZeroU8::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0.get()
    }
}

/// An ego template, 1-based; `0` on the wire means none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EgoId(NonZeroU8);

impl EgoId {
    #[must_use]
    pub const fn new(raw: u8) -> Option<Self> {
        match NonZeroU8::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0.get()
    }
}

/// An activation effect, 1-based; `0` on the wire means none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActivationId(NonZeroU16);

impl ActivationId {
    #[must_use]
    pub const fn new(raw: u16) -> Option<Self> {
        match NonZeroU16::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0.get()
    }
}

/// Wire value of an optional artifact reference.
pub(crate) fn artifact_raw(id: Option<ArtifactId>) -> u8 {
    id.map_or(0, ArtifactId::raw)
}

pub(crate) fn ego_raw(id: Option<EgoId>) -> u8 {
    id.map_or(0, EgoId::raw)
}

pub(crate) fn activation_raw(id: Option<ActivationId>) -> u16 {
    id.map_or(0, ActivationId::raw)
}
