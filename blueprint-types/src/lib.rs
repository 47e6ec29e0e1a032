//! Shared DTOs for the blueprint workspace.
//!
//! # Design constraints
//! - Everything here is a plain value: constructed per lint or diff call, never shared mutably.
//! - Lint and diff output is serialized for callers, so field names are part of the contract.
//! - Prefer adding optional fields over changing semantics.

pub mod diff;
pub mod document;
pub mod lint;
pub mod profile;

pub use diff::{Change, ChangeType, DiffResult, DiffSummary};
pub use lint::{LintResult, Violation};
pub use profile::Profile;

/// Schema identifiers, one per blueprint profile.
pub mod schema {
    pub const BLUEPRINT_MAKE_V1: &str = "blueprint.make.v1";
    pub const BLUEPRINT_LEGACY_V1: &str = "blueprint.legacy.v1";
    pub const BLUEPRINT_GRAPH_V1: &str = "blueprint.graph.v1";
}
