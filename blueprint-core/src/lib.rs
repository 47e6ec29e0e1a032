//! Embeddable core library for blueprint linting and diffing.
//!
//! Provides a clap-free entry point that the `blueprint` CLI, the acceptance suite and any other
//! host process link against.
//!
//! # Entry points
//!
//! - [`Linter::lint`](pipeline::Linter::lint) - schema validation, then semantic rules
//! - [`Linter::lint_with_repair`](pipeline::Linter::lint_with_repair) - one lint/repair/re-lint attempt
//! - [`run_lint`](pipeline::run_lint) - lint files and directories from disk
//! - [`run_diff`](pipeline::run_diff) - compare two documents on disk

pub mod pipeline;
pub mod settings;

pub use blueprint_diff::compare;
pub use blueprint_repair::{RepairAction, RepairError, RepairOutcome};
pub use blueprint_schema::{DocumentLoadError, SchemaError};
pub use blueprint_types::{Change, ChangeType, DiffResult, LintResult, Profile, Violation};
