#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(settings) = stepcheck::fuzzing::resolve_run_from_toml(input) {
            debug_assert!(!settings.timeout.is_zero());
            debug_assert!(!settings.form_id.is_empty() || input.contains("form_id"));
        }
    }
});
