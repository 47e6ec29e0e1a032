//! Top-level field rules.

use std::sync::LazyLock;

use super::v;
use crate::rule::{Rule, RuleMeta};
use blueprint_types::document::{fields, str_field};
use blueprint_types::{Profile, Violation};
use regex::Regex;
use serde_json::Value;

static MAKE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v\d+(\.\d+)?$").expect("valid make version regex"));
static SEMVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid semver regex"));

const MAX_NAME_CHARS: usize = 100;

pub(crate) const REQUIRED_FIELDS: RuleMeta = RuleMeta {
    key: "required_fields",
    title: "Required top-level fields",
    description: "Every top-level field the profile requires must be present. Make blueprints \
need version, triggerId, modules and connections; legacy blueprints need name, version, trigger \
and actions.",
    remediation: "Add the missing key. With --repair, version, modules and connections are \
filled in automatically.",
    profiles: &[Profile::Make, Profile::Legacy],
};

pub(crate) const VERSION_FORMAT: RuleMeta = RuleMeta {
    key: "version_format",
    title: "Version pattern",
    description: "The version string must match the profile's pattern: vN or vN.N for make \
blueprints (v1.0, v2.1), MAJOR.MINOR.PATCH for legacy blueprints (1.0.0).",
    remediation: "Rewrite the version in the profile's pattern. A missing or empty version is \
replaced by the canonical one when repair is enabled.",
    profiles: &[Profile::Make, Profile::Legacy],
};

pub(crate) const NAME_PRESENT: RuleMeta = RuleMeta {
    key: "name_present",
    title: "Blueprint name present",
    description: "Graph blueprints must carry a non-empty top-level name.",
    remediation: "Add a name describing what the workflow does.",
    profiles: &[Profile::Graph],
};

pub(crate) const NAME_LENGTH: RuleMeta = RuleMeta {
    key: "name_length",
    title: "Blueprint name length",
    description: "When a top-level name is present it must be a string of 1 to 100 characters.",
    remediation: "Shorten the name, or give it at least one character.",
    profiles: &[Profile::Make, Profile::Legacy, Profile::Graph],
};

pub(crate) const TRIGGER_ID_PRESENT: RuleMeta = RuleMeta {
    key: "trigger_id_present",
    title: "Trigger id present",
    description: "triggerId must be a non-empty string.",
    remediation: "Set triggerId to the id of the module that starts the workflow.",
    profiles: &[Profile::Make],
};

pub(crate) const TRIGGER_SHAPE: RuleMeta = RuleMeta {
    key: "trigger_shape",
    title: "Trigger declares type and app",
    description: "The trigger object must declare both a type and the app it listens to.",
    remediation: "Add trigger.type (for example \"webhook\") and trigger.app.",
    profiles: &[Profile::Legacy],
};

pub(crate) struct RequiredFields {
    fields: &'static [&'static str],
}

impl RequiredFields {
    pub(crate) fn make() -> Self {
        Self {
            fields: &[
                fields::VERSION,
                fields::TRIGGER_ID,
                fields::MODULES,
                fields::CONNECTIONS,
            ],
        }
    }

    pub(crate) fn legacy() -> Self {
        Self {
            fields: &[fields::NAME, fields::VERSION, fields::TRIGGER, fields::ACTIONS],
        }
    }
}

impl Rule for RequiredFields {
    fn meta(&self) -> &'static RuleMeta {
        &REQUIRED_FIELDS
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        self.fields
            .iter()
            .filter(|field| doc.get(**field).is_none())
            .map(|field| {
                v(
                    *field,
                    format!("Required field '{field}' is missing"),
                    REQUIRED_FIELDS.key,
                )
            })
            .collect()
    }
}

pub(crate) struct VersionFormat {
    pattern: &'static LazyLock<Regex>,
    hint: &'static str,
}

impl VersionFormat {
    pub(crate) fn make() -> Self {
        Self {
            pattern: &MAKE_VERSION,
            hint: "vN or vN.N (e.g. v1.0, v2.1)",
        }
    }

    pub(crate) fn legacy() -> Self {
        Self {
            pattern: &SEMVER,
            hint: "semantic versioning MAJOR.MINOR.PATCH (e.g. 1.0.0)",
        }
    }
}

impl Rule for VersionFormat {
    fn meta(&self) -> &'static RuleMeta {
        &VERSION_FORMAT
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        let version = str_field(doc, fields::VERSION).unwrap_or_default();
        if self.pattern.is_match(version) {
            return vec![];
        }
        vec![v(
            fields::VERSION,
            format!("Version '{version}' must follow {}", self.hint),
            VERSION_FORMAT.key,
        )]
    }
}

pub(crate) struct NamePresent;

impl Rule for NamePresent {
    fn meta(&self) -> &'static RuleMeta {
        &NAME_PRESENT
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        let present = match doc.get(fields::NAME) {
            None | Some(Value::Null) => false,
            Some(Value::String(name)) => !name.is_empty(),
            Some(_) => true,
        };
        if present {
            return vec![];
        }
        vec![v(fields::NAME, "Blueprint name missing", NAME_PRESENT.key)]
    }
}

pub(crate) struct NameLength;

impl Rule for NameLength {
    fn meta(&self) -> &'static RuleMeta {
        &NAME_LENGTH
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        let Some(name) = doc.get(fields::NAME) else {
            return vec![];
        };
        let chars = name.as_str().map(|s| s.chars().count()).unwrap_or(0);
        if (1..=MAX_NAME_CHARS).contains(&chars) {
            return vec![];
        }
        vec![v(
            fields::NAME,
            format!("Name must be 1-{MAX_NAME_CHARS} characters long"),
            NAME_LENGTH.key,
        )]
    }
}

pub(crate) struct TriggerIdPresent;

impl Rule for TriggerIdPresent {
    fn meta(&self) -> &'static RuleMeta {
        &TRIGGER_ID_PRESENT
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        match str_field(doc, fields::TRIGGER_ID) {
            Some(id) if !id.is_empty() => vec![],
            _ => vec![v(
                fields::TRIGGER_ID,
                "triggerId must be a non-empty string",
                TRIGGER_ID_PRESENT.key,
            )],
        }
    }
}

pub(crate) struct TriggerShape;

impl Rule for TriggerShape {
    fn meta(&self) -> &'static RuleMeta {
        &TRIGGER_SHAPE
    }

    fn check(&self, doc: &Value) -> Vec<Violation> {
        let trigger = doc.get(fields::TRIGGER);
        let has = |key: &str| trigger.and_then(|t| t.get(key)).is_some();

        let mut out = Vec::new();
        if !has(fields::TYPE) {
            out.push(v("trigger.type", "Trigger must have a type", TRIGGER_SHAPE.key));
        }
        if !has(fields::APP) {
            out.push(v("trigger.app", "Trigger must specify an app", TRIGGER_SHAPE.key));
        }
        out
    }
}
