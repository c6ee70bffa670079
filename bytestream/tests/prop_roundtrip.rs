use bytestream::{ByteReader, ByteWriter};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    Bool(bool),
    Str(String),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::U8),
        any::<i8>().prop_map(Op::I8),
        any::<u16>().prop_map(Op::U16),
        any::<i16>().prop_map(Op::I16),
        any::<u32>().prop_map(Op::U32),
        any::<i32>().prop_map(Op::I32),
        any::<bool>().prop_map(Op::Bool),
        "[a-zA-Z0-9 ,()]{0,40}".prop_map(Op::Str),
    ]
}

proptest! {
    #[test]
    fn prop_roundtrip_ops(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut buf = Vec::new();
        let mut writer = ByteWriter::new(&mut buf);

        for op in &ops {
            match op {
                Op::U8(v) => writer.write_u8(*v).unwrap(),
                Op::I8(v) => writer.write_i8(*v).unwrap(),
                Op::U16(v) => writer.write_u16(*v).unwrap(),
                Op::I16(v) => writer.write_i16(*v).unwrap(),
                Op::U32(v) => writer.write_u32(*v).unwrap(),
                Op::I32(v) => writer.write_i32(*v).unwrap(),
                Op::Bool(v) => writer.write_bool(*v).unwrap(),
                Op::Str(v) => writer.write_string(v).unwrap(),
            }
        }
        let written = writer.bytes_written();
        prop_assert_eq!(written, buf.len() as u64);

        let mut src = buf.as_slice();
        let mut reader = ByteReader::new(&mut src);

        for op in &ops {
            match op {
                Op::U8(v) => { prop_assert_eq!(reader.read_u8().unwrap(), *v); }
                Op::I8(v) => { prop_assert_eq!(reader.read_i8().unwrap(), *v); }
                Op::U16(v) => { prop_assert_eq!(reader.read_u16().unwrap(), *v); }
                Op::I16(v) => { prop_assert_eq!(reader.read_i16().unwrap(), *v); }
                Op::U32(v) => { prop_assert_eq!(reader.read_u32().unwrap(), *v); }
                Op::I32(v) => { prop_assert_eq!(reader.read_i32().unwrap(), *v); }
                Op::Bool(v) => { prop_assert_eq!(reader.read_bool().unwrap(), *v); }
                Op::Str(v) => { prop_assert_eq!(&reader.read_string(64).unwrap(), v); }
            }
        }
        prop_assert_eq!(reader.position(), written);
    }

    #[test]
    fn prop_truncation_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..32)) {
        let mut src = bytes.as_slice();
        let mut reader = ByteReader::new(&mut src);
        while reader.read_u32().is_ok() {}
        let mut src = bytes.as_slice();
        let mut reader = ByteReader::new(&mut src);
        let _ = reader.read_string(8);
    }
}
