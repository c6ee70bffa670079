use bytestream::{ByteReader, ByteWriter};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wire::{decode_plane, encode_plane, BytePlane, Limits};

/// A 198x66 level: granite border, mostly floor, a scatter of rooms.
fn level_plane() -> BytePlane {
    let (w, h) = (198u16, 66u16);
    let mut plane = BytePlane::filled(w, h, 1);
    for x in 0..w {
        plane.set(0, x, 61);
        plane.set(h - 1, x, 61);
    }
    for y in 0..h {
        plane.set(y, 0, 61);
        plane.set(y, w - 1, 61);
        if y % 7 == 0 {
            for x in (y % 11)..(y % 11 + 20) {
                plane.set(y, x, 56);
            }
        }
    }
    plane
}

fn bench_rle(c: &mut Criterion) {
    let plane = level_plane();
    let mut encoded = Vec::new();
    {
        let mut writer = ByteWriter::new(&mut encoded);
        encode_plane(&plane, &mut writer).unwrap();
    }

    c.bench_function("rle_encode_level", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(encoded.len());
            let mut writer = ByteWriter::new(&mut buf);
            encode_plane(black_box(&plane), &mut writer).unwrap();
            buf
        });
    });

    c.bench_function("rle_decode_level", |b| {
        b.iter(|| {
            let mut src = encoded.as_slice();
            let mut reader = ByteReader::new(&mut src);
            decode_plane(&mut reader, 198, 66, &Limits::default()).unwrap()
        });
    });
}

criterion_group!(benches, bench_rle);
criterion_main!(benches);
