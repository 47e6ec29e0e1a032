//! Lint, repair and diff pipelines, extracted from the CLI.
//!
//! Document content never produces an error here: a malformed blueprint is a lint verdict. Errors
//! are reserved for infrastructure (a schema that will not compile, a file that cannot be read).

use crate::settings::{LintSettings, RepairSettings};
use blueprint_diff::compare;
use blueprint_repair::{RepairOutcome, Repairer, builtin_steps};
use blueprint_rules::RuleSet;
use blueprint_schema::{
    DocumentLoadError, LoadedDocument, SchemaError, SchemaValidator, load_document, load_inputs,
};
use blueprint_types::{DiffResult, LintResult, Profile};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Error type for pipeline results. Every variant maps to exit code 1.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Load(#[from] DocumentLoadError),
}

impl ToolError {
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// What happened to the repair pass of a lint attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStatus {
    /// The first lint was clean.
    NotNeeded,
    /// The first lint failed and repair is switched off.
    Disabled,
    /// The repaired document linted clean and replaced the original.
    Accepted,
    /// The repaired document still had violations and was discarded.
    Rejected,
    /// A repair step refused the document.
    Failed,
}

impl RepairStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RepairStatus::NotNeeded => "not_needed",
            RepairStatus::Disabled => "disabled",
            RepairStatus::Accepted => "accepted",
            RepairStatus::Rejected => "rejected",
            RepairStatus::Failed => "failed",
        }
    }
}

/// Outcome of one generation attempt: lint, optionally repair, lint once more.
#[derive(Debug, Clone, Serialize)]
pub struct LintAttempt {
    /// Verdict on `document`. When repair was rejected or failed this is the original verdict.
    pub result: LintResult,
    /// The repaired document when accepted, the input otherwise.
    pub document: Value,
    pub status: RepairStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair: Option<RepairOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair_error: Option<String>,
    /// Number of lint passes run, 1 or 2.
    pub lint_runs: u8,
}

impl LintAttempt {
    fn single(result: LintResult, document: &Value, status: RepairStatus) -> Self {
        Self {
            result,
            document: document.clone(),
            status,
            repair: None,
            repair_error: None,
            lint_runs: 1,
        }
    }
}

/// Schema validator and rule set bound to one profile. Immutable once built.
#[derive(Debug)]
pub struct Linter {
    profile: Profile,
    schema: SchemaValidator,
    rules: RuleSet,
}

impl Linter {
    pub fn for_profile(profile: Profile) -> Result<Self, SchemaError> {
        Ok(Self::with_parts(
            profile,
            SchemaValidator::for_profile(profile)?,
            RuleSet::for_profile(profile),
        ))
    }

    /// Build from settings, compiling the override schema when one is configured.
    pub fn from_settings(settings: &LintSettings) -> Result<Self, SchemaError> {
        let schema = match &settings.schema {
            Some(path) => SchemaValidator::from_path(path)?,
            None => SchemaValidator::for_profile(settings.profile)?,
        };
        Ok(Self::with_parts(
            settings.profile,
            schema,
            RuleSet::for_profile(settings.profile),
        ))
    }

    pub fn with_parts(profile: Profile, schema: SchemaValidator, rules: RuleSet) -> Self {
        Self {
            profile,
            schema,
            rules,
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Schema validation, then the semantic rules when the schema found nothing.
    pub fn lint(&self, document: &Value) -> LintResult {
        let schema_violations = self.schema.validate(document);
        if !schema_violations.is_empty() {
            debug!(
                profile = %self.profile,
                count = schema_violations.len(),
                "schema validation failed, rules skipped"
            );
            return LintResult::from_violations(schema_violations);
        }

        let violations = self.rules.evaluate(document);
        debug!(profile = %self.profile, count = violations.len(), "rules evaluated");
        LintResult::from_violations(violations)
    }

    /// Lint, and on failure repair once and re-lint once.
    ///
    /// The repaired document is kept only when the second lint is clean; otherwise the attempt
    /// reports the original verdict and the original document.
    pub fn lint_with_repair(&self, document: &Value, settings: &RepairSettings) -> LintAttempt {
        let first = self.lint(document);
        if first.ok {
            return LintAttempt::single(first, document, RepairStatus::NotNeeded);
        }
        if !settings.enabled {
            return LintAttempt::single(first, document, RepairStatus::Disabled);
        }

        let repairer = Repairer::with_steps(builtin_steps(
            self.profile,
            settings.canonical_version.as_deref(),
        ));
        let outcome = match repairer.repair(document, &first.violations) {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(error = %err, "repair failed");
                let mut attempt = LintAttempt::single(first, document, RepairStatus::Failed);
                attempt.repair_error = Some(err.to_string());
                return attempt;
            }
        };

        let second = self.lint(&outcome.document);
        debug!(
            actions = outcome.actions.len(),
            ok = second.ok,
            "re-linted repaired document"
        );
        if second.ok {
            LintAttempt {
                result: second,
                document: outcome.document.clone(),
                status: RepairStatus::Accepted,
                repair: Some(outcome),
                repair_error: None,
                lint_runs: 2,
            }
        } else {
            LintAttempt {
                result: first,
                document: document.clone(),
                status: RepairStatus::Rejected,
                repair: Some(outcome),
                repair_error: None,
                lint_runs: 2,
            }
        }
    }
}

/// Lint verdict for one input file.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub path: Utf8PathBuf,
    pub attempt: Result<LintAttempt, DocumentLoadError>,
}

impl DocumentReport {
    pub fn ok(&self) -> bool {
        matches!(&self.attempt, Ok(attempt) if attempt.result.ok)
    }
}

/// Outcome of `run_lint`.
#[derive(Debug, Clone)]
pub struct LintRun {
    pub profile: Profile,
    pub reports: Vec<DocumentReport>,
}

impl LintRun {
    /// 0 when every document is clean, 2 when any has violations, 1 when any failed to load.
    pub fn exit_code(&self) -> u8 {
        if self.reports.iter().any(|r| r.attempt.is_err()) {
            1
        } else if self.reports.iter().all(DocumentReport::ok) {
            0
        } else {
            2
        }
    }

    pub fn failed(&self) -> usize {
        self.reports.iter().filter(|r| !r.ok()).count()
    }
}

/// Lint every file named by `inputs` (directories expand to their `*.json` files).
pub fn run_lint(settings: &LintSettings, inputs: &[Utf8PathBuf]) -> Result<LintRun, ToolError> {
    let linter = Linter::from_settings(settings)?;
    let loaded = load_inputs(inputs)?;
    debug!(documents = loaded.len(), profile = %settings.profile, "linting inputs");

    let reports = loaded
        .into_iter()
        .map(|LoadedDocument { path, document }| DocumentReport {
            attempt: document.map(|doc| linter.lint_with_repair(&doc, &settings.repair)),
            path,
        })
        .collect();

    Ok(LintRun {
        profile: settings.profile,
        reports,
    })
}

/// Load two documents and compare them.
pub fn run_diff(old: &Utf8Path, new: &Utf8Path) -> Result<DiffResult, ToolError> {
    let before = load_document(old)?;
    let after = load_document(new)?;
    let result = compare(&before, &after);
    debug!(%old, %new, changes = result.total_changes, "compared documents");
    Ok(result)
}
