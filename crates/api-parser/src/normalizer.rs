//! Endpoint template normalization

use regex::Regex;

use crate::config::PrefixRule;
use crate::error::ParseResult;

/// A template after prefix rewriting, split into literal segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPath {
    /// Rewritten template, e.g. "/restapi/{apiVersion}/account/{accountId}"
    pub endpoint: String,
    /// Literal segments with parameters removed
    pub segments: Vec<String>,
    /// Name of the trailing parameter, if the template ends in one
    pub parameter: Option<String>,
}

impl NormalizedPath {
    pub fn is_parameterized(&self) -> bool {
        self.parameter.is_some()
    }

    /// Segment immediately preceding the trailing parameter
    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

/// Applies the ordered prefix rules and splits templates into segments
pub struct PathNormalizer {
    rules: Vec<(Regex, String)>,
}

impl PathNormalizer {
    pub fn new(rules: &[PrefixRule]) -> ParseResult<Self> {
        let rules = rules
            .iter()
            .map(|rule| Ok((Regex::new(&rule.pattern)?, rule.replacement.clone())))
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Apply every prefix rule in order, each to its first match
    pub fn rewrite(&self, template: &str) -> String {
        self.rules
            .iter()
            .fold(template.to_string(), |acc, (re, replacement)| {
                re.replacen(&acc, 1, replacement.as_str()).into_owned()
            })
    }

    pub fn normalize(&self, template: &str) -> NormalizedPath {
        let endpoint = self.rewrite(template);
        let segments = endpoint
            .split('/')
            .filter(|t| !t.is_empty() && !is_parameter(t))
            .map(str::to_string)
            .collect();
        let parameter = trailing_parameter(&endpoint).map(str::to_string);

        NormalizedPath {
            endpoint,
            segments,
            parameter,
        }
    }
}

/// A `{name}` placeholder segment
pub fn is_parameter(token: &str) -> bool {
    token.starts_with('{')
}

/// Name inside a `{name}` token
pub fn parameter_name(token: &str) -> &str {
    token.trim_start_matches('{').trim_end_matches('}')
}

/// Parameter name when the template ends with `{name}`
pub fn trailing_parameter(template: &str) -> Option<&str> {
    if !template.ends_with('}') {
        return None;
    }
    template.rsplit('/').next().map(parameter_name)
}
