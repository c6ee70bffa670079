#![no_main]

use bytestream::ByteReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut src = data;
    let mut reader = ByteReader::new(&mut src);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of operations.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 7;
        idx += 1;

        let result = match op {
            0 => reader.read_u8().map(drop),
            1 => reader.read_u16().map(drop),
            2 => reader.read_u32().map(drop),
            3 => reader.read_i16().map(drop),
            4 => reader.read_bool().map(drop),
            5 => reader.read_string(usize::from(data[idx - 1])).map(drop),
            _ => reader.skip(usize::from(data[idx - 1] % 16)),
        };
        if result.is_err() {
            break;
        }
    }
});
