//! Run-length coding of byte grid planes.
//!
//! A plane is scanned in row-major order over the whole grid; runs carry on
//! across row boundaries. Each run goes on the wire as a `(length, value)`
//! byte pair with `length` in `1..=255`.

use std::io::{Read, Write};

use bytestream::{ByteReader, ByteWriter};

use crate::error::{WireError, WireResult};
use crate::limits::Limits;

/// Longest run a single pair can carry.
pub const MAX_RUN: u8 = u8::MAX;

/// A `width * height` grid of bytes stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BytePlane {
    width: u16,
    height: u16,
    cells: Vec<u8>,
}

impl BytePlane {
    /// Creates a plane with every cell set to `value`.
    #[must_use]
    pub fn filled(width: u16, height: u16, value: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![value; usize::from(width) * usize::from(height)],
        }
    }

    /// Creates a plane from row-major cells.
    pub fn from_cells(width: u16, height: u16, cells: Vec<u8>) -> WireResult<Self> {
        let expected = usize::from(width) * usize::from(height);
        if cells.len() != expected {
            return Err(WireError::PlaneShape {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Creates a plane from equally sized rows.
    pub fn from_rows<I, R>(rows: I) -> WireResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[u8]>,
    {
        let mut cells = Vec::new();
        let mut width = None;
        let mut height = 0usize;
        for row in rows {
            let row = row.as_ref();
            let w = *width.get_or_insert(row.len());
            if row.len() != w {
                return Err(WireError::PlaneShape {
                    expected: w,
                    actual: row.len(),
                });
            }
            cells.extend_from_slice(row);
            height += 1;
        }
        let width = width.unwrap_or(0);
        let too_large = || WireError::GridTooLarge {
            cells: cells.len(),
            limit: usize::from(u16::MAX),
        };
        let width = u16::try_from(width).map_err(|_| too_large())?;
        let height = u16::try_from(height).map_err(|_| too_large())?;
        Self::from_cells(width, height, cells)
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Returns the cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Returns the cell at `(y, x)`, if inside the plane.
    #[must_use]
    pub fn get(&self, y: u16, x: u16) -> Option<u8> {
        self.index(y, x).map(|i| self.cells[i])
    }

    /// Sets the cell at `(y, x)`. Returns `false` if outside the plane.
    pub fn set(&mut self, y: u16, x: u16, value: u8) -> bool {
        match self.index(y, x) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    /// Returns `true` if `(y, x)` is inside the plane.
    #[must_use]
    pub const fn contains(&self, y: u16, x: u16) -> bool {
        y < self.height && x < self.width
    }

    fn index(&self, y: u16, x: u16) -> Option<usize> {
        self.contains(y, x)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }
}

/// Iterator over the `(length, value)` runs of a cell slice.
#[derive(Debug, Clone)]
pub struct Runs<'a> {
    cells: &'a [u8],
}

impl<'a> Runs<'a> {
    #[must_use]
    pub const fn new(cells: &'a [u8]) -> Self {
        Self { cells }
    }
}

impl Iterator for Runs<'_> {
    type Item = (u8, u8);

    fn next(&mut self) -> Option<Self::Item> {
        let (&value, rest) = self.cells.split_first()?;
        let extra = rest
            .iter()
            .take(usize::from(MAX_RUN) - 1)
            .take_while(|&&cell| cell == value)
            .count();
        let len = extra + 1;
        self.cells = &self.cells[len..];
        // `len` is capped at MAX_RUN by the `take` above.
        Some((len as u8, value))
    }
}

/// Returns the exact run pairs [`encode_plane`] emits for `cells`.
#[must_use]
pub fn run_pairs(cells: &[u8]) -> Vec<(u8, u8)> {
    Runs::new(cells).collect()
}

/// Writes one plane as run pairs. Returns the number of pairs written.
pub fn encode_plane<W: Write + ?Sized>(
    plane: &BytePlane,
    writer: &mut ByteWriter<'_, W>,
) -> WireResult<usize> {
    let mut pairs = 0;
    for (len, value) in Runs::new(&plane.cells) {
        writer.write_u8(len)?;
        writer.write_u8(value)?;
        pairs += 1;
    }
    Ok(pairs)
}

/// Reads run pairs until exactly `width * height` cells are filled.
pub fn decode_plane<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    width: u16,
    height: u16,
    limits: &Limits,
) -> WireResult<BytePlane> {
    let total = usize::from(width) * usize::from(height);
    if total > limits.max_grid_cells {
        return Err(WireError::GridTooLarge {
            cells: total,
            limit: limits.max_grid_cells,
        });
    }

    let mut cells = Vec::with_capacity(total);
    while cells.len() < total {
        let len = reader.read_u8()?;
        let value = reader.read_u8()?;
        if len == 0 {
            return Err(WireError::ZeroLengthRun { cell: cells.len() });
        }
        let end = cells.len() + usize::from(len);
        if end > total {
            return Err(WireError::RunLengthMismatch {
                expected: total,
                actual: end,
            });
        }
        cells.resize(end, value);
    }

    Ok(BytePlane {
        width,
        height,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(plane: &BytePlane) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut writer = ByteWriter::new(&mut buf);
        encode_plane(plane, &mut writer).unwrap();
        buf
    }

    #[test]
    fn runs_cross_row_boundaries() {
        let plane = BytePlane::from_rows([[1u8, 1, 2], [2, 2, 2], [3, 1, 1]]).unwrap();
        assert_eq!(run_pairs(plane.cells()), vec![(2, 1), (4, 2), (1, 3), (2, 1)]);
        assert_eq!(encode(&plane), vec![2, 1, 4, 2, 1, 3, 2, 1]);
    }

    #[test]
    fn first_cell_nonzero_has_no_empty_run() {
        let plane = BytePlane::filled(2, 1, 7);
        assert_eq!(encode(&plane), vec![2, 7]);
    }

    #[test]
    fn long_run_split_at_cap() {
        let plane = BytePlane::filled(200, 2, 0);
        assert_eq!(run_pairs(plane.cells()), vec![(255, 0), (145, 0)]);
    }

    #[test]
    fn exact_cap_is_one_pair() {
        let plane = BytePlane::filled(255, 1, 4);
        assert_eq!(run_pairs(plane.cells()), vec![(255, 4)]);
    }

    #[test]
    fn empty_plane_has_no_pairs() {
        let plane = BytePlane::filled(0, 10, 3);
        assert!(encode(&plane).is_empty());

        let mut src: &[u8] = &[];
        let mut reader = ByteReader::new(&mut src);
        let decoded = decode_plane(&mut reader, 0, 10, &Limits::default()).unwrap();
        assert!(decoded.cells().is_empty());
    }

    #[test]
    fn decode_rejects_overrun() {
        let mut src: &[u8] = &[5, 1, 5, 2];
        let mut reader = ByteReader::new(&mut src);
        let err = decode_plane(&mut reader, 3, 3, &Limits::default()).unwrap_err();
        assert_eq!(
            err,
            WireError::RunLengthMismatch {
                expected: 9,
                actual: 10
            }
        );
    }

    #[test]
    fn decode_rejects_zero_run() {
        let mut src: &[u8] = &[0, 0, 9, 1];
        let mut reader = ByteReader::new(&mut src);
        let err = decode_plane(&mut reader, 3, 3, &Limits::default()).unwrap_err();
        assert_eq!(err, WireError::ZeroLengthRun { cell: 0 });
    }

    #[test]
    fn decode_truncated() {
        let mut src: &[u8] = &[4, 1, 4];
        let mut reader = ByteReader::new(&mut src);
        let err = decode_plane(&mut reader, 3, 3, &Limits::default()).unwrap_err();
        assert!(matches!(err, WireError::Bytes(_)));
    }

    #[test]
    fn decode_respects_grid_limit() {
        let mut src: &[u8] = &[];
        let mut reader = ByteReader::new(&mut src);
        let err = decode_plane(&mut reader, 100, 100, &Limits::for_testing()).unwrap_err();
        assert!(matches!(err, WireError::GridTooLarge { cells: 10_000, .. }));
    }

    #[test]
    fn decode_stops_at_plane_end() {
        let mut src: &[u8] = &[2, 8, 0xAA];
        let mut reader = ByteReader::new(&mut src);
        let plane = decode_plane(&mut reader, 2, 1, &Limits::default()).unwrap();
        assert_eq!(plane.cells(), &[8, 8]);
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn plane_get_set() {
        let mut plane = BytePlane::filled(3, 2, 0);
        assert!(plane.set(1, 2, 9));
        assert_eq!(plane.get(1, 2), Some(9));
        assert_eq!(plane.cells()[5], 9);
        assert!(!plane.set(2, 0, 1));
        assert_eq!(plane.get(0, 3), None);
    }

    #[test]
    fn from_rows_rejects_ragged() {
        let err = BytePlane::from_rows([vec![1u8, 2], vec![3]]).unwrap_err();
        assert!(matches!(err, WireError::PlaneShape { .. }));
    }

    #[test]
    fn from_cells_checks_len() {
        assert!(BytePlane::from_cells(2, 2, vec![0; 3]).is_err());
        assert!(BytePlane::from_cells(2, 2, vec![0; 4]).is_ok());
    }
}
