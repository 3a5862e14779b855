#![no_main]
use libfuzzer_sys::fuzz_target;
use histdelta::delta::binary;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must only ever produce errors, never panics.
    let _ = binary::apply(&[], data);
    let _ = binary::format(data, true);

    if data.len() >= 2 {
        let split = data.len() / 2;
        let (source, delta) = data.split_at(split);
        let _ = binary::apply(source, delta);
    }
});
