use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Blueprint format a lint entry point is bound to.
///
/// Each profile owns exactly one schema, one rule list and one repair step list; the version
/// patterns of `Make` and `Legacy` are not interchangeable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// `version` / `triggerId` / `modules` / `connections`, version `vN[.N]`.
    #[default]
    Make,
    /// `name` / `version` / `trigger` / `actions`, version `MAJOR.MINOR.PATCH`.
    Legacy,
    /// `name` / `modules` / `connections`, modules carry `config` and sink types.
    Graph,
}

impl Profile {
    pub const ALL: [Profile; 3] = [Profile::Make, Profile::Legacy, Profile::Graph];

    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Make => "make",
            Profile::Legacy => "legacy",
            Profile::Graph => "graph",
        }
    }

    pub fn schema_id(self) -> &'static str {
        match self {
            Profile::Make => crate::schema::BLUEPRINT_MAKE_V1,
            Profile::Legacy => crate::schema::BLUEPRINT_LEGACY_V1,
            Profile::Graph => crate::schema::BLUEPRINT_GRAPH_V1,
        }
    }

    /// Version written by auto-repair when a document has none.
    pub fn canonical_version(self) -> Option<&'static str> {
        match self {
            Profile::Make => Some("v1.0"),
            Profile::Legacy => Some("1.0.0"),
            Profile::Graph => None,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProfile(pub String);

impl fmt::Display for UnknownProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown blueprint profile '{}' (expected make, legacy or graph)",
            self.0
        )
    }
}

impl std::error::Error for UnknownProfile {}

impl FromStr for Profile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "make" => Ok(Profile::Make),
            "legacy" => Ok(Profile::Legacy),
            "graph" => Ok(Profile::Graph),
            other => Err(UnknownProfile(other.to_string())),
        }
    }
}
