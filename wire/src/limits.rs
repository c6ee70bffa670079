//! Configurable limits for bounded decoding.

/// Wire-level limits enforced while reading a save stream.
///
/// Every unbounded structure in the format (strings, chains, sentinel
/// scans, grid planes) is checked against one of these before it can grow.
/// Per-section record counts belong to the codec layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum string length in bytes, excluding the terminator.
    pub max_string_len: usize,

    /// Maximum number of elements in a continuation-flagged chain.
    pub max_chain_len: usize,

    /// Maximum number of live records before a sentinel must appear.
    pub max_sentinel_scan: usize,

    /// Maximum number of cells in one grid plane.
    pub max_grid_cells: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_string_len: 1024,
            max_chain_len: 64,
            max_sentinel_scan: 32 * 1024,
            // Largest levels are a few hundred cells on each side.
            max_grid_cells: 1 << 20,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_string_len: 128,
            max_chain_len: 8,
            max_sentinel_scan: 256,
            max_grid_cells: 4096,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_string_len: usize::MAX,
            max_chain_len: usize::MAX,
            max_sentinel_scan: usize::MAX,
            max_grid_cells: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_string_len() {
        let limits = Limits::default();
        assert_eq!(limits.max_string_len, 1024);
    }

    #[test]
    fn testing_limits_smaller() {
        let test_limits = Limits::for_testing();
        let default_limits = Limits::default();

        assert!(test_limits.max_string_len < default_limits.max_string_len);
        assert!(test_limits.max_chain_len < default_limits.max_chain_len);
        assert!(test_limits.max_sentinel_scan < default_limits.max_sentinel_scan);
        assert!(test_limits.max_grid_cells < default_limits.max_grid_cells);
    }

    #[test]
    fn unlimited_limits() {
        let limits = Limits::unlimited();
        assert_eq!(limits.max_grid_cells, usize::MAX);
        assert_eq!(limits.max_sentinel_scan, usize::MAX);
    }

    #[test]
    fn limits_const_constructible() {
        const LIMITS: Limits = Limits::for_testing();
        assert_eq!(LIMITS.max_chain_len, 8);
    }
}
