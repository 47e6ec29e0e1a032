//! BDD harness (cucumber-rs).
//!
//! This crate exists to keep scenario tests isolated from the production crates. It only holds
//! the documents scenarios start from.

use serde_json::{Value, json};

/// A clean make-profile blueprint: a Gmail trigger feeding a Slack action.
pub fn mock_blueprint() -> Value {
    json!({
        "version": "v1.0",
        "triggerId": "gmail-trigger",
        "modules": [
            {
                "id": "gmail-trigger",
                "type": "trigger",
                "name": "Gmail Trigger",
                "params": { "app": "Gmail" }
            },
            {
                "id": "slack-action",
                "type": "action",
                "name": "Slack Action",
                "params": { "channel": "#leads" }
            }
        ],
        "connections": [ { "from": "gmail-trigger", "to": "slack-action" } ]
    })
}
