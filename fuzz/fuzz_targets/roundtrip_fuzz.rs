#![no_main]
use libfuzzer_sys::fuzz_target;
use histdelta::delta::{DeltaIndex, binary};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the source/target split point.
    let split = usize::from(data[0]) * data.len() / 256;
    let payload = &data[1..];
    let split = split.min(payload.len());
    let (source, target) = payload.split_at(split);

    let index = DeltaIndex::new(source);
    let delta = index.encode(target).unwrap();
    assert_eq!(binary::base_size(&delta).unwrap(), source.len() as u64);
    assert_eq!(binary::result_size(&delta).unwrap(), target.len() as u64);
    assert_eq!(binary::apply(source, &delta).unwrap(), target);

    // A limited encode either fits or leaves no more than the limit.
    let limit = delta.len() / 2;
    let mut out = Vec::new();
    if !index.encode_to(&mut out, target, Some(limit)).unwrap() {
        assert!(out.len() <= limit.max(binary::header(&delta).unwrap().len));
    }
});
