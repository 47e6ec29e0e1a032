//! Clap-free settings for the lint pipeline.

use blueprint_types::Profile;
use camino::Utf8PathBuf;

/// Settings for one lint run.
#[derive(Debug, Clone, Default)]
pub struct LintSettings {
    pub profile: Profile,
    /// Operator-supplied schema replacing the profile's embedded one.
    pub schema: Option<Utf8PathBuf>,
    pub repair: RepairSettings,
}

/// Auto-repair behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairSettings {
    pub enabled: bool,
    /// Overrides the profile's canonical version when defaulting `version`.
    pub canonical_version: Option<String>,
}

impl RepairSettings {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            canonical_version: None,
        }
    }
}
