//! File framing, grid planes and list flattening for the delve save format.
//!
//! This crate handles the structural layer of a save stream: the file
//! header, run-length coded byte planes, fixed-size flag sets and the three
//! list conventions. It does not know about items, monsters or levels.
//!
//! # Design Principles
//!
//! - **Stable wire format** - Byte order, string terminator and run pair
//!   layout are fixed by [`VERSION`].
//! - **Bounded decoding** - Every length, chain and scan is checked against [`Limits`].
//! - **No domain knowledge** - This crate handles framing, not game logic.

mod error;
mod flags;
mod header;
mod limits;
mod list;
mod rle;

pub use error::{CountWidthName, WireError, WireResult};
pub use flags::FlagSet;
pub use header::{decode_header, encode_header, FileHeader, HEADER_SIZE, MAGIC, VERSION};
pub use limits::Limits;
pub use list::{
    read_chain, read_counted, read_tagged, read_until_sentinel, write_chain, write_counted,
    write_tagged, write_terminated, CountWidth,
};
pub use rle::{decode_plane, encode_plane, run_pairs, BytePlane, Runs, MAX_RUN};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        // Verify all expected items are exported
        let _ = MAGIC;
        let _ = VERSION;
        let _ = HEADER_SIZE;
        let _ = MAX_RUN;
        let _ = FileHeader::current();
        let _ = Limits::default();
        let _ = FlagSet::<2>::new();
        let _ = BytePlane::default();
        let _ = CountWidth::U16;

        // Error types
        let _: WireResult<()> = Ok(());
    }

    #[test]
    fn limits_default_is_reasonable() {
        let limits = Limits::default();
        assert!(
            limits.max_grid_cells >= 198 * 66,
            "should hold a full-size level"
        );
        assert!(
            limits.max_string_len >= 80,
            "should hold message log lines"
        );
    }
}
