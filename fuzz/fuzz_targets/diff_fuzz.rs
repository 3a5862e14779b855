#![no_main]
use libfuzzer_sys::fuzz_target;
use histdelta::diff::{DiffAlgorithm, HistogramDiff, SliceComparator};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // Small alphabet so both sides share plenty of elements.
    let cap = usize::from(data[0] % 8) + 1;
    let payload: Vec<u8> = data[1..].iter().map(|b| b % 6).collect();
    let (a, b) = payload.split_at(payload.len() / 2);

    let edits = HistogramDiff::new().with_max_chain_length(cap).diff(&SliceComparator, a, b);

    // Replaying the edits over `a` must rebuild `b`.
    let mut out = Vec::with_capacity(b.len());
    let mut pos = 0;
    for e in edits.iter() {
        out.extend_from_slice(&a[pos..e.begin_a]);
        out.extend_from_slice(&b[e.begin_b..e.end_b]);
        pos = e.end_a;
    }
    out.extend_from_slice(&a[pos..]);
    assert_eq!(out, b);
});
