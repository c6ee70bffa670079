#![no_main]

use bytestream::{ByteReader, ByteWriter};
use libfuzzer_sys::fuzz_target;
use wire::{decode_plane, encode_plane, Limits};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let width = u16::from(data[0] % 64);
    let height = u16::from(data[1] % 64);
    let limits = Limits::for_testing();

    let mut src = &data[2..];
    let mut reader = ByteReader::new(&mut src);
    let Ok(plane) = decode_plane(&mut reader, width, height, &limits) else {
        return;
    };

    // Anything that decodes must survive a re-encode unchanged.
    let mut buf = Vec::new();
    encode_plane(&plane, &mut ByteWriter::new(&mut buf)).unwrap();
    let mut again = buf.as_slice();
    let decoded = decode_plane(&mut ByteReader::new(&mut again), width, height, &limits).unwrap();
    assert_eq!(decoded, plane);
});
