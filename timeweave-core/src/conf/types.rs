use serde::{Deserialize, Serialize};

/// Contents of `timeweave.hcl`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// One log source: a named set of files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub name: String,

    /// Glob relative to the session directory.
    pub files: String,

    /// Matched files are consecutive parts of one rotated log.
    #[serde(default)]
    pub rotated: bool,

    #[serde(default)]
    pub clock_shift_ms: i64,

    #[serde(default)]
    pub annotation: Option<String>,

    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}
