#![no_main]

//! Fuzz target for the lint pipeline.
//!
//! Arbitrary JSON must always produce a verdict, under every profile, and never panic.

use blueprint_core::pipeline::Linter;
use blueprint_core::settings::RepairSettings;
use blueprint_types::Profile;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(doc) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    for profile in Profile::ALL {
        let Ok(linter) = Linter::for_profile(profile) else {
            return;
        };
        let result = linter.lint(&doc);
        assert_eq!(result.ok, result.violations.is_empty());
        assert_eq!(result.count as usize, result.violations.len());

        let attempt = linter.lint_with_repair(&doc, &RepairSettings::enabled());
        assert!(attempt.lint_runs <= 2);
        let _ = blueprint_render::render_validation_report_md(&attempt.result);
    }
});
