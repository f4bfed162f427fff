#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok((summary, report)) = stepcheck::fuzzing::render_summary_json(input) {
            let overview = summary.overview();
            debug_assert_eq!(
                overview.total,
                overview.passed + overview.failed + overview.skipped
            );
            for step in summary.steps() {
                if step.name.contains('<') {
                    debug_assert!(!report.html.contains(step.name.as_str()));
                }
            }
        }
    }
});
