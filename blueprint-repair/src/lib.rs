//! Auto-repair: a bounded, best-effort normalization of a blueprint that failed linting.
//!
//! Repair runs a fixed, profile-specific list of steps once. Every step is idempotent, so
//! repairing a repaired document changes nothing. Whether the repaired document is accepted is
//! not decided here; the lint pipeline re-lints it exactly once and keeps it only when clean.

mod error;
mod steps;

pub use error::{RepairError, RepairResult};
pub use steps::{DefaultVersion, EnsureArray, ReassignTriggerId, RepairAction, RepairStep};

use blueprint_types::document::fields;
use blueprint_types::{Profile, Violation};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Result of one repair pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepairOutcome {
    pub document: Value,
    /// Steps that changed the document, in application order.
    pub actions: Vec<RepairAction>,
    /// Input violations located at a path one of the actions rewrote.
    pub addressed: Vec<Violation>,
}

impl RepairOutcome {
    pub fn changed(&self) -> bool {
        !self.actions.is_empty()
    }
}

/// Built-in steps for `profile`, in application order.
///
/// `canonical_version` overrides the profile's default version string.
pub fn builtin_steps(profile: Profile, canonical_version: Option<&str>) -> Vec<Box<dyn RepairStep>> {
    let version = canonical_version
        .or(profile.canonical_version())
        .map(str::to_string);
    let mut steps: Vec<Box<dyn RepairStep>> = Vec::new();
    match profile {
        Profile::Make => {
            if let Some(version) = version {
                steps.push(Box::new(DefaultVersion { version }));
            }
            steps.push(Box::new(ReassignTriggerId));
            steps.push(Box::new(EnsureArray {
                field: fields::MODULES,
            }));
            steps.push(Box::new(EnsureArray {
                field: fields::CONNECTIONS,
            }));
        }
        Profile::Graph => {
            steps.push(Box::new(EnsureArray {
                field: fields::MODULES,
            }));
            steps.push(Box::new(EnsureArray {
                field: fields::CONNECTIONS,
            }));
        }
        Profile::Legacy => {
            if let Some(version) = version {
                steps.push(Box::new(DefaultVersion { version }));
            }
        }
    }
    steps
}

/// Applies a fixed list of repair steps.
pub struct Repairer {
    steps: Vec<Box<dyn RepairStep>>,
}

impl Repairer {
    pub fn for_profile(profile: Profile) -> Self {
        Self::with_steps(builtin_steps(profile, None))
    }

    pub fn with_steps(steps: Vec<Box<dyn RepairStep>>) -> Self {
        Self { steps }
    }

    pub fn step_keys(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.key()).collect()
    }

    /// Normalize a copy of `document`. `violations` are the lint findings that triggered the repair.
    pub fn repair(&self, document: &Value, violations: &[Violation]) -> RepairResult<RepairOutcome> {
        let Value::Object(map) = document else {
            return Err(RepairError::NotAnObject {
                found: error::json_type(document),
            });
        };
        let mut map = map.clone();

        let mut actions = Vec::new();
        for step in &self.steps {
            if let Some(action) = step.apply(&mut map)? {
                debug!(step = action.step, path = %action.path, "applied repair step");
                actions.push(action);
            }
        }

        let addressed = violations
            .iter()
            .filter(|v| actions.iter().any(|a| v.touches(&a.path)))
            .cloned()
            .collect();

        Ok(RepairOutcome {
            document: Value::Object(map),
            actions,
            addressed,
        })
    }
}

/// Repair with the built-in steps of `profile`.
pub fn repair(
    document: &Value,
    violations: &[Violation],
    profile: Profile,
) -> RepairResult<RepairOutcome> {
    Repairer::for_profile(profile).repair(document, violations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_lists_per_profile() {
        assert_eq!(
            Repairer::for_profile(Profile::Make).step_keys(),
            vec![
                "default_version",
                "reassign_trigger_id",
                "ensure_modules",
                "ensure_connections"
            ]
        );
        assert_eq!(
            Repairer::for_profile(Profile::Graph).step_keys(),
            vec!["ensure_modules", "ensure_connections"]
        );
        assert_eq!(
            Repairer::for_profile(Profile::Legacy).step_keys(),
            vec!["default_version"]
        );
    }
}
