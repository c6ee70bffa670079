#![no_main]

use codec::{load_savefile, save_savefile, CodecLimits, UnknownIdPolicy};
use libfuzzer_sys::fuzz_target;
use schema::GameTables;

fuzz_target!(|data: &[u8]| {
    let tables = GameTables::for_testing();
    let wire_limits = wire::Limits::for_testing();
    let limits = CodecLimits::for_testing().with_unknown_ids(UnknownIdPolicy::TreatAsAbsent);

    let mut src = data;
    let Ok(loaded) = load_savefile(&mut src, &tables, &wire_limits, &limits) else {
        return;
    };

    // A world that loaded must save again.
    let mut buf = Vec::new();
    save_savefile(&loaded.world, &tables, &wire_limits, &limits, &mut buf).unwrap();
});
