#![no_main]

//! Fuzz target for the diff engine and its formatters.
//!
//! Builds two documents from structured input so the zones are actually populated, then checks
//! reflexivity and symmetry.

use blueprint_core::compare;
use libfuzzer_sys::fuzz_target;
use serde_json::{Value, json};

#[derive(Debug, arbitrary::Arbitrary)]
struct Side {
    version: Option<String>,
    modules: Vec<(String, Option<String>, Vec<(String, i64)>, u8)>,
    connections: Vec<(String, String)>,
    policies: Vec<(String, bool)>,
    credentials: Vec<String>,
}

impl Side {
    fn to_document(&self) -> Value {
        let modules: Vec<Value> = self
            .modules
            .iter()
            .map(|(id, name, params, mappings)| {
                let params: serde_json::Map<String, Value> =
                    params.iter().map(|(k, v)| (k.clone(), json!(v))).collect();
                json!({
                    "id": id,
                    "name": name,
                    "params": params,
                    "mappings": vec![json!({}); usize::from(*mappings % 4)],
                })
            })
            .collect();
        let connections: Vec<Value> = self
            .connections
            .iter()
            .map(|(from, to)| json!({ "from": from, "to": to }))
            .collect();
        let policies: serde_json::Map<String, Value> = self
            .policies
            .iter()
            .map(|(k, v)| (k.clone(), json!(v)))
            .collect();
        json!({
            "version": self.version,
            "modules": modules,
            "connections": connections,
            "policies": policies,
            "credentials": self.credentials,
        })
    }
}

fuzz_target!(|input: (Side, Side)| {
    let old = input.0.to_document();
    let new = input.1.to_document();

    assert!(compare(&old, &old).is_identical);

    let forward = compare(&old, &new);
    let backward = compare(&new, &old);
    assert_eq!(forward.summary.added, backward.summary.removed);
    assert_eq!(forward.summary.removed, backward.summary.added);
    assert_eq!(forward.summary.total as usize, forward.changes.len());

    let _ = blueprint_render::to_text(&forward);
    let _ = blueprint_render::to_structured(&forward);
});
