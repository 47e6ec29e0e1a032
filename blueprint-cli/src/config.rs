//! Configuration file loading for blueprint.
//!
//! Discovers and loads `blueprint.toml` from the working directory.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use blueprint_core::settings::{LintSettings, RepairSettings};
use blueprint_types::Profile;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "blueprint.toml";

/// Top-level configuration from blueprint.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlueprintConfig {
    pub lint: LintConfig,
    pub repair: RepairConfig,
}

/// `[lint]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Blueprint format to lint against.
    pub profile: Option<Profile>,

    /// Schema file replacing the profile's embedded schema.
    /// Relative paths resolve against the config file's directory.
    pub schema: Option<Utf8PathBuf>,
}

/// `[repair]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Attempt one auto-repair pass when a document fails.
    pub enabled: bool,

    /// Version written when a document has none.
    pub canonical_version: Option<String>,
}

/// Discover the blueprint.toml config file in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a blueprint.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<BlueprintConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    let mut config =
        parse_config(&contents).with_context(|| format!("parse config file {}", path))?;

    if let Some(schema) = &config.lint.schema
        && let Some(base) = path.parent()
        && schema.is_relative()
        && !base.as_str().is_empty()
    {
        config.lint.schema = Some(base.join(schema));
    }
    Ok(config)
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<BlueprintConfig> {
    let config: BlueprintConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load the explicit config file when given, else `blueprint.toml` in `dir` when present.
pub fn load_or_default(
    explicit: Option<&Utf8Path>,
    dir: &Utf8Path,
) -> anyhow::Result<BlueprintConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(BlueprintConfig::default()),
    }
}

/// Lint arguments as given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct LintArgs {
    pub profile: Option<Profile>,
    pub schema: Option<Utf8PathBuf>,
    /// `--repair` is `Some(true)`, `--no-repair` is `Some(false)`.
    pub repair: Option<bool>,
    pub canonical_version: Option<String>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: BlueprintConfig,
}

impl ConfigMerger {
    pub fn new(config: BlueprintConfig) -> Self {
        Self { config }
    }

    /// Merge with lint command CLI arguments.
    ///
    /// Values given on the command line replace the file's, including `--repair` and
    /// `--no-repair` over `[repair] enabled`.
    pub fn merge_lint_args(self, args: LintArgs) -> LintSettings {
        let BlueprintConfig { lint, repair } = self.config;
        LintSettings {
            profile: args.profile.or(lint.profile).unwrap_or_default(),
            schema: args.schema.or(lint.schema),
            repair: RepairSettings {
                enabled: args.repair.unwrap_or(repair.enabled),
                canonical_version: args.canonical_version.or(repair.canonical_version),
            },
        }
    }
}
