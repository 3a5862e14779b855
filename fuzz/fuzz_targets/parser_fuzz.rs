#![no_main]
use libfuzzer_sys::fuzz_target;

// Arbitrary argv for the clap definition; parsing must never panic.
fuzz_target!(|data: &[u8]| {
    let args: Vec<String> = String::from_utf8_lossy(data)
        .split_whitespace()
        .take(32)
        .map(str::to_owned)
        .collect();
    histdelta::cli::fuzz_try_parse_args(&args);
});
