use bytestream::{ByteReader, ByteWriter};
use proptest::prelude::*;
use wire::{read_chain, read_until_sentinel, write_chain, write_terminated, WireError};

proptest! {
    #[test]
    fn prop_chain_roundtrip(items in prop::collection::vec(any::<u16>(), 0..20), trailer in any::<u8>()) {
        let mut buf = Vec::new();
        let mut writer = ByteWriter::new(&mut buf);
        write_chain::<_, _, WireError, _>(&mut writer, &items, |w, v| Ok(w.write_u16(*v)?)).unwrap();
        writer.write_u8(trailer).unwrap();

        let mut src = buf.as_slice();
        let mut reader = ByteReader::new(&mut src);
        let decoded: Vec<u16> =
            read_chain::<_, _, WireError, _>(&mut reader, 64, |r| Ok(r.read_u16()?)).unwrap();
        prop_assert_eq!(&decoded, &items);
        // The byte after the final has-next flag is untouched.
        let expected = [trailer];
        prop_assert_eq!(src, &expected[..]);
    }

    #[test]
    fn prop_sentinel_roundtrip(items in prop::collection::vec(1u16.., 0..20), trailer in any::<u16>()) {
        let mut buf = Vec::new();
        let mut writer = ByteWriter::new(&mut buf);
        write_terminated::<_, _, WireError, _, _>(
            &mut writer,
            items.iter().copied(),
            |w, v| Ok(w.write_u16(v)?),
            |w| Ok(w.write_u16(0)?),
        )
        .unwrap();
        writer.write_u16(trailer).unwrap();

        let mut src = buf.as_slice();
        let mut reader = ByteReader::new(&mut src);
        let decoded: Vec<u16> = read_until_sentinel::<_, _, WireError, _>(&mut reader, 64, |r| {
            let v = r.read_u16()?;
            Ok((v != 0).then_some(v))
        })
        .unwrap();
        prop_assert_eq!(&decoded, &items);
        let expected = trailer.to_le_bytes();
        prop_assert_eq!(src, &expected[..]);
    }
}
