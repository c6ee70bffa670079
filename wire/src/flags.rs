//! Fixed-size flag bit-sets.

use std::io::{Read, Write};

use bytestream::{ByteReader, ByteResult, ByteWriter};

/// A bit-set stored in exactly `N` bytes.
///
/// `N` is the declared byte size of a flag enumeration. Bit `i` lives in
/// byte `i / 8` at mask `1 << (i % 8)`; the bytes go on the wire in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagSet<const N: usize>([u8; N]);

impl<const N: usize> FlagSet<N> {
    /// Number of addressable bits.
    pub const BITS: usize = N * 8;

    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self([0; N])
    }

    /// Creates a set from its raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Returns `true` if no bit is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Returns `true` if `bit` is set. Out-of-range bits are never set.
    #[must_use]
    pub fn contains(&self, bit: usize) -> bool {
        bit < Self::BITS && self.0[bit / 8] & (1 << (bit % 8)) != 0
    }

    /// Sets `bit`. Returns `false` if it is out of range.
    pub fn insert(&mut self, bit: usize) -> bool {
        if bit >= Self::BITS {
            return false;
        }
        self.0[bit / 8] |= 1 << (bit % 8);
        true
    }

    /// Clears `bit`. Returns `false` if it is out of range.
    pub fn remove(&mut self, bit: usize) -> bool {
        if bit >= Self::BITS {
            return false;
        }
        self.0[bit / 8] &= !(1 << (bit % 8));
        true
    }

    /// Iterates over set bits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..Self::BITS).filter(|&bit| self.contains(bit))
    }

    pub fn write<W: Write + ?Sized>(&self, writer: &mut ByteWriter<'_, W>) -> ByteResult<()> {
        writer.write_bytes(&self.0)
    }

    pub fn read<R: Read + ?Sized>(reader: &mut ByteReader<'_, R>) -> ByteResult<Self> {
        Ok(Self(reader.read_bytes()?))
    }
}

impl<const N: usize> Default for FlagSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FromIterator<usize> for FlagSet<N> {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = Self::new();
        for bit in iter {
            set.insert(bit);
        }
        set
    }
}
