//! Declared sizes of the fixed arrays in save records.
//!
//! Flag sets are measured in bytes (`*_SIZE`), counter arrays in elements
//! (`*_MAX`). Readers compare the sizes a file declares against these and
//! treat any difference as a version mismatch.

/// Bytes needed to hold `bits` flags.
#[must_use]
pub const fn flag_bytes(bits: usize) -> usize {
    bits.div_ceil(8)
}

/// Object property flags.
pub const OF_MAX: usize = 39;
pub const OF_SIZE: usize = flag_bytes(OF_MAX);

/// Identification flags.
pub const ID_MAX: usize = 12;
pub const ID_SIZE: usize = flag_bytes(ID_MAX);

/// Numeric object modifiers (stats, stealth, speed, ...).
pub const OBJ_MOD_MAX: usize = 17;

/// Elements (acid, fire, ...).
pub const ELEM_MAX: usize = 25;

/// Monster timed effects.
pub const MON_TMD_MAX: usize = 10;

/// Monster state flags.
pub const MFLAG_MAX: usize = 14;
pub const MFLAG_SIZE: usize = flag_bytes(MFLAG_MAX);

/// Trap flags.
pub const TRF_MAX: usize = 13;
pub const TRF_SIZE: usize = flag_bytes(TRF_MAX);

/// Per-square info flags; one RLE plane per byte.
pub const SQUARE_MAX: usize = 20;
pub const SQUARE_SIZE: usize = flag_bytes(SQUARE_MAX);

/// History entry type flags.
pub const HIST_MAX: usize = 14;
pub const HIST_SIZE: usize = flag_bytes(HIST_MAX);

/// Ignore categories (item types).
pub const ITYPE_MAX: usize = 22;
pub const ITYPE_SIZE: usize = flag_bytes(ITYPE_MAX);

/// Player stats.
pub const STAT_MAX: usize = 5;

/// Player timed effects.
pub const TMD_MAX: usize = 53;

/// Character levels with a hit-point roll.
pub const PY_MAX_LEVEL: usize = 50;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_bytes_rounds_up() {
        assert_eq!(flag_bytes(0), 0);
        assert_eq!(flag_bytes(1), 1);
        assert_eq!(flag_bytes(8), 1);
        assert_eq!(flag_bytes(9), 2);
    }

    #[test]
    fn sizes_fit_their_wire_headers() {
        // Sizes are written as single bytes in section headers.
        for size in [
            OF_SIZE,
            ID_SIZE,
            OBJ_MOD_MAX,
            ELEM_MAX,
            MFLAG_SIZE,
            MON_TMD_MAX,
            TRF_SIZE,
            SQUARE_SIZE,
            HIST_SIZE,
            STAT_MAX,
            TMD_MAX,
            ITYPE_MAX,
        ] {
            assert!(size <= usize::from(u8::MAX));
        }
    }

    #[test]
    fn flag_sets_hold_their_flags() {
        assert!(OF_SIZE * 8 >= OF_MAX);
        assert!(SQUARE_SIZE * 8 >= SQUARE_MAX);
        assert!(ITYPE_SIZE * 8 >= ITYPE_MAX);
    }
}
