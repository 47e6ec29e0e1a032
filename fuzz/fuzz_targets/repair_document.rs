#![no_main]

//! Fuzz target for auto-repair.
//!
//! Repair either refuses the document or returns one that a second repair leaves untouched.

use blueprint_types::Profile;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(doc) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    for profile in Profile::ALL {
        let Ok(first) = blueprint_repair::repair(&doc, &[], profile) else {
            continue;
        };
        let second = blueprint_repair::repair(&first.document, &[], profile)
            .expect("repaired document stays repairable");
        assert!(!second.changed(), "repair is not idempotent");
        assert_eq!(second.document, first.document);
    }
});
