#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let clean = stepcheck::ingest::ingest_lines(
            input
                .lines()
                .filter(|line| stepcheck::ingest::parse_record(line).is_ok()),
        );
        let noisy = stepcheck::ingest::ingest_lines(input.lines());
        debug_assert_eq!(clean.metrics, noisy.metrics);
        debug_assert_eq!(clean.parsed, noisy.parsed);
    }
});
