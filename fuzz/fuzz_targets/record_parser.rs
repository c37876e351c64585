#![no_main]

use hintlet::config::HintletConfig;
use hintlet::engine::HintletEngine;
use hintlet::hint::Hint;
use hintlet::rules::register_builtin_rules;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Malformed records must be rejected, never panic
        let mut engine = HintletEngine::new(Vec::<Hint>::new());
        register_builtin_rules(&mut engine, &HintletConfig::default());
        for line in input.lines() {
            let _ = engine.dispatch_json(line);
        }
    }
});
