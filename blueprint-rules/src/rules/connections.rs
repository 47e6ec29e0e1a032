//! Graph-level rules: connection endpoints, loops, entry points and sinks.

use std::collections::BTreeSet;

use super::v;
use crate::rule::{Rule, RuleMeta};
use blueprint_types::document::{self, fields, scalar_text};
use blueprint_types::{Profile, Violation};
use serde_json::Value;

/// Module types recognised as workflow outputs.
pub const SINK_TYPES: [&str; 4] = ["http_response", "datastore_write", "email_send", "webhook_reply"];

pub(crate) const NO_ORPHAN_CONNECTIONS: RuleMeta = RuleMeta {
    key: "no_orphan_connections",
    title: "No orphan connections",
    description: "Both ends of every connection must name an existing module id. A bad 'from' \
and a bad 'to' are reported separately.",
    remediation: "Fix the endpoint id, add the missing module, or drop the connection.",
    profiles: &[Profile::Make, Profile::Graph],
};

pub(crate) const TRIGGER_ID_REFERENCE: RuleMeta = RuleMeta {
    key: "trigger_id_reference",
    title: "triggerId references a module",
    description: "triggerId must be the id of one of the blueprint's modules.",
    remediation: "Point triggerId at the trigger module. With --repair it is reassigned to the \
first trigger module, or the first module when there is none.",
    profiles: &[Profile::Make],
};

pub(crate) const NO_SELF_LOOPS: RuleMeta = RuleMeta {
    key: "no_self_loops",
    title: "No self-loops",
    description: "A connection may not lead from a module back to itself.",
    remediation: "Remove the connection, or route it through another module.",
    profiles: &[Profile::Make, Profile::Graph],
};

pub(crate) const NO_TWO_NODE_CYCLES: RuleMeta = RuleMeta {
    key: "no_two_node_cycles",
    title: "No two-node cycles",
    description: "Two modules may not connect to each other in both directions. Each pair is \
reported once.",
    remediation: "Remove one direction of the connection pair.",
    profiles: &[Profile::Make, Profile::Graph],
};

pub(crate) const ENTRYPOINT_EXISTS: RuleMeta = RuleMeta {
    key: "entrypoint_exists",
    title: "Entry point exists",
    description: "At least one module must start the workflow: type \"trigger\", or \
config.trigger / params.trigger set to true.",
    remediation: "Add a trigger module, or mark the starting module with config.trigger = true.",
    profiles: &[Profile::Make, Profile::Graph],
};

pub(crate) const OUTPUT_EXISTS: RuleMeta = RuleMeta {
    key: "output_exists",
    title: "Output exists",
    description: "At least one module must be a recognised sink: http_response, datastore_write, \
email_send or webhook_reply.",
    remediation: "Add a module that returns or persists the workflow's result.",
    profiles: &[Profile::Graph],
};

pub(crate) const MIN_ONE_CONNECTION: RuleMeta = RuleMeta {
    key: "min_one_connection",
    title: "At least one connection",
    description: "The graph must contain at least one connection.",
    remediation: "Connect the entry point to the next module.",
    profiles: &[Profile::Graph],
};

pub(crate) struct NoOrphanConnections;

impl Rule for NoOrphanConnections {
    fn meta(&self) -> &'static RuleMeta {
        &NO_ORPHAN_CONNECTIONS
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        let ids: BTreeSet<&str> = document::module_ids(doc).into_iter().collect();
        let known = |end: &Value| end.as_str().is_some_and(|id| ids.contains(id));

        let mut out = Vec::new();
        for (i, edge) in document::edges(doc).enumerate() {
            if !known(edge.from) {
                out.push(v(
                    format!("connections.{i}.from"),
                    format!("Connection from unknown module: {}", scalar_text(edge.from)),
                    NO_ORPHAN_CONNECTIONS.key,
                ));
            }
            if !known(edge.to) {
                out.push(v(
                    format!("connections.{i}.to"),
                    format!("Connection to unknown module: {}", scalar_text(edge.to)),
                    NO_ORPHAN_CONNECTIONS.key,
                ));
            }
        }
        out
    }
}

pub(crate) struct TriggerIdReference;

impl Rule for TriggerIdReference {
    fn meta(&self) -> &'static RuleMeta {
        &TRIGGER_ID_REFERENCE
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        // Empty or missing ids belong to trigger_id_present.
        let Some(trigger_id) = document::str_field(doc, fields::TRIGGER_ID).filter(|s| !s.is_empty())
        else {
            return vec![];
        };
        if document::module_ids(doc).contains(&trigger_id) {
            return vec![];
        }
        vec![v(
            fields::TRIGGER_ID,
            format!("triggerId '{trigger_id}' does not reference an existing module"),
            TRIGGER_ID_REFERENCE.key,
        )]
    }
}

pub(crate) struct NoSelfLoops;

impl Rule for NoSelfLoops {
    fn meta(&self) -> &'static RuleMeta {
        &NO_SELF_LOOPS
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for (i, edge) in document::edges(doc).enumerate() {
            if edge.from.is_null() || edge.from != edge.to {
                continue;
            }
            let node = scalar_text(edge.from);
            if seen.insert(node.clone()) {
                out.push(v(
                    format!("connections.{i}"),
                    format!("Self-loop not allowed: {node}"),
                    NO_SELF_LOOPS.key,
                ));
            }
        }
        out
    }
}

pub(crate) struct NoTwoNodeCycles;

impl Rule for NoTwoNodeCycles {
    fn meta(&self) -> &'static RuleMeta {
        &NO_TWO_NODE_CYCLES
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        let pairs: BTreeSet<(String, String)> = document::edges(doc)
            .filter(|e| !e.from.is_null() && !e.to.is_null())
            .map(|e| e.endpoints())
            .collect();

        pairs
            .iter()
            .filter(|(a, b)| a < b && pairs.contains(&(b.clone(), a.clone())))
            .map(|(a, b)| {
                v(
                    fields::CONNECTIONS,
                    format!("2-node cycle between {a} and {b}"),
                    NO_TWO_NODE_CYCLES.key,
                )
            })
            .collect()
    }
}

pub(crate) struct EntrypointExists;

impl Rule for EntrypointExists {
    fn meta(&self) -> &'static RuleMeta {
        &ENTRYPOINT_EXISTS
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        if document::modules(doc).any(|m| m.is_trigger()) {
            return vec![];
        }
        vec![v(
            fields::MODULES,
            "No trigger/entrypoint module found",
            ENTRYPOINT_EXISTS.key,
        )]
    }
}

pub(crate) struct OutputExists;

impl Rule for OutputExists {
    fn meta(&self) -> &'static RuleMeta {
        &OUTPUT_EXISTS
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        let is_sink = |kind: &str| {
            let kind = kind.to_ascii_lowercase();
            SINK_TYPES.contains(&kind.as_str())
        };
        if document::modules(doc).any(|m| m.kind().is_some_and(is_sink)) {
            return vec![];
        }
        vec![v(
            fields::MODULES,
            "No obvious output/sink module found",
            OUTPUT_EXISTS.key,
        )]
    }
}

pub(crate) struct MinOneConnection;

impl Rule for MinOneConnection {
    fn meta(&self) -> &'static RuleMeta {
        &MIN_ONE_CONNECTION
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        if document::edges(doc).next().is_some() {
            return vec![];
        }
        vec![v(
            fields::CONNECTIONS,
            "At least one connection required",
            MIN_ONE_CONNECTION.key,
        )]
    }
}
