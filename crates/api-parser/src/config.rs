//! Naming-convention tables used while building the path tree
//!
//! Stored as a plain JSON file so alternate API conventions can be swapped in
//! without touching the merger or the bridge synthesizer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::ParseResult;

/// Rewrites a concrete versioned prefix into a placeholder (first match only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRule {
    /// Regular expression matched against the raw template
    pub pattern: String,
    pub replacement: String,
}

impl PrefixRule {
    pub fn new(pattern: &str, replacement: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserConfig {
    /// Applied in order; a later rule sees the output of earlier ones
    pub prefix_rules: Vec<PrefixRule>,
    /// Segment preceding a trailing item parameter -> default value
    pub item_defaults: IndexMap<String, String>,
    /// Segment preceding a version placeholder -> default value
    pub version_defaults: IndexMap<String, String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            prefix_rules: vec![
                PrefixRule::new(r"/restapi/v1\.0/", "/restapi/{apiVersion}/"),
                PrefixRule::new(r"/scim/v2", "/scim/{version}"),
                PrefixRule::new(r"/team-messaging/v1", "/team-messaging/{version}"),
                PrefixRule::new(r"/analytics/calls/v1", "/analytics/calls/{version}"),
                PrefixRule::new(r"/rcvideo/v1", "/rcvideo/{version}"),
                PrefixRule::new(r"/\.search", "/dotSearch"),
            ],
            item_defaults: table(&[("account", "~"), ("extension", "~"), ("restapi", "v1.0")]),
            version_defaults: table(&[
                ("scim", "v2"),
                ("rcvideo", "v1"),
                ("team-messaging", "v1"),
                ("calls", "v1"),
            ]),
        }
    }
}

fn table(entries: &[(&str, &str)]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl ParserConfig {
    /// Config with no rewrite rules and empty default tables
    pub fn empty() -> Self {
        Self {
            prefix_rules: Vec::new(),
            item_defaults: IndexMap::new(),
            version_defaults: IndexMap::new(),
        }
    }

    /// Load configuration from a JSON file, falling back to defaults when it is absent
    pub fn load_from_file(path: &Path) -> ParseResult<Self> {
        if !path.exists() {
            debug!("No parser config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: ParserConfig = serde_json::from_str(&contents)?;
        debug!("Loaded parser config from {:?}", path);
        Ok(config)
    }

    pub fn item_default(&self, segment: &str) -> Option<&str> {
        self.item_defaults.get(segment).map(String::as_str)
    }

    pub fn version_default(&self, segment: &str) -> Option<&str> {
        self.version_defaults.get(segment).map(String::as_str)
    }
}
