//! Synthesis of operation-less ancestor nodes

use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::warn;

use crate::config::ParserConfig;
use crate::normalizer::{is_parameter, parameter_name};
use crate::types::PathNode;

/// Fills in structural ancestors of the merged nodes.
///
/// Must run after merging is complete: whether a prefix is followed by a
/// parameter is only known once every real node exists.
pub struct BridgeSynthesizer<'a> {
    config: &'a ParserConfig,
}

impl<'a> BridgeSynthesizer<'a> {
    pub fn new(config: &'a ParserConfig) -> Self {
        Self { config }
    }

    /// Bridge nodes for every proper prefix not already present in `nodes`
    pub fn synthesize(&self, nodes: &[PathNode]) -> Vec<PathNode> {
        let real: HashSet<&[String]> = nodes.iter().map(|n| n.paths.as_slice()).collect();
        let mut bridges: IndexMap<Vec<String>, PathNode> = IndexMap::new();

        for node in nodes {
            let Some(template) = node.operations.first().map(|op| op.endpoint.as_str()) else {
                continue;
            };

            for len in 1..node.paths.len() {
                let prefix = &node.paths[..len];
                if real.contains(prefix) {
                    continue;
                }
                let parameter = parameter_after(template, len);

                // First real node wins; disagreement is reported, not resolved
                if let Some(bridge) = bridges.get(prefix) {
                    if bridge.parameter != parameter {
                        warn!(
                            "Ambiguous parameter for bridge {}: kept {:?}, {} implies {:?}",
                            bridge.joined(),
                            bridge.parameter,
                            template,
                            parameter
                        );
                    }
                    continue;
                }

                let mut bridge = PathNode::new(prefix.to_vec());
                if parameter.is_some() {
                    bridge.default_parameter = prefix
                        .last()
                        .and_then(|segment| self.config.version_default(segment))
                        .map(str::to_string);
                }
                bridge.parameter = parameter;
                bridges.insert(prefix.to_vec(), bridge);
            }
        }

        bridges.into_values().collect()
    }
}

/// Name of the parameter token immediately following the `literals`-th literal segment
fn parameter_after(template: &str, literals: usize) -> Option<String> {
    let mut tokens = template.split('/').filter(|t| !t.is_empty());
    let mut seen = 0;

    while let Some(token) = tokens.next() {
        if is_parameter(token) {
            continue;
        }
        seen += 1;
        if seen == literals {
            return tokens
                .next()
                .filter(|next| is_parameter(next))
                .map(|next| parameter_name(next).to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HttpMethod, Operation, OperationRole};

    fn real_node(paths: &[&str], endpoint: &str) -> PathNode {
        let mut node = PathNode::new(paths.iter().map(|s| s.to_string()).collect());
        node.operations.push(Operation {
            endpoint: endpoint.to_string(),
            method: HttpMethod::Get,
            role: OperationRole::Get,
            operation_id: "op".to_string(),
            tags: vec![],
            description: None,
            summary: None,
            rate_limit_group: None,
            app_permission: None,
            user_permission: None,
            with_parameter: endpoint.ends_with('}'),
            response_schema: None,
            query_parameters: None,
            body_parameters: None,
            form_url_encoded: false,
            multipart: false,
        });
        node
    }

    #[test]
    fn test_parameter_after() {
        let template = "/restapi/{apiVersion}/account/{accountId}/call-log";
        assert_eq!(parameter_after(template, 1).as_deref(), Some("apiVersion"));
        assert_eq!(parameter_after(template, 2).as_deref(), Some("accountId"));
        assert_eq!(parameter_after(template, 3), None);
        assert_eq!(parameter_after(template, 4), None);
    }

    #[test]
    fn test_parameter_after_repeated_segment_name() {
        let template = "/a/b/a/{id}/c";
        assert_eq!(parameter_after(template, 1), None);
        assert_eq!(parameter_after(template, 3).as_deref(), Some("id"));
    }

    #[test]
    fn test_bridges_for_missing_prefixes() {
        let config = ParserConfig::default();
        let nodes = vec![real_node(
            &["scim", "Users"],
            "/scim/{version}/Users",
        )];

        let bridges = BridgeSynthesizer::new(&config).synthesize(&nodes);

        assert_eq!(bridges.len(), 1);
        assert_eq!(bridges[0].paths, vec!["scim"]);
        assert_eq!(bridges[0].parameter.as_deref(), Some("version"));
        assert_eq!(bridges[0].default_parameter.as_deref(), Some("v2"));
        assert!(bridges[0].is_bridge());
    }

    #[test]
    fn test_existing_prefixes_are_not_bridged() {
        let config = ParserConfig::default();
        let nodes = vec![
            real_node(&["restapi", "account"], "/restapi/{apiVersion}/account/{accountId}"),
            real_node(
                &["restapi", "account", "extension"],
                "/restapi/{apiVersion}/account/{accountId}/extension/{extensionId}",
            ),
        ];

        let bridges = BridgeSynthesizer::new(&config).synthesize(&nodes);

        assert_eq!(bridges.len(), 1);
        assert_eq!(bridges[0].paths, vec!["restapi"]);
        assert_eq!(bridges[0].parameter.as_deref(), Some("apiVersion"));
        assert!(bridges[0].default_parameter.is_none());
    }

    #[test]
    fn test_bridge_without_parameter_has_no_default() {
        let config = ParserConfig::default();
        let nodes = vec![real_node(&["scim", "health", "check"], "/scim/health/check")];

        let bridges = BridgeSynthesizer::new(&config).synthesize(&nodes);

        assert_eq!(bridges.len(), 2);
        assert!(bridges.iter().all(|b| b.parameter.is_none() && b.default_parameter.is_none()));
    }

    #[test]
    fn test_first_real_node_decides_parameter() {
        let config = ParserConfig::empty();
        let nodes = vec![
            real_node(&["org", "teams"], "/org/{orgId}/teams"),
            real_node(&["org", "users"], "/org/{organizationId}/users"),
        ];

        let bridges = BridgeSynthesizer::new(&config).synthesize(&nodes);

        assert_eq!(bridges.len(), 1);
        assert_eq!(bridges[0].parameter.as_deref(), Some("orgId"));
    }

    #[test]
    fn test_custom_version_defaults() {
        let mut config = ParserConfig::empty();
        config.version_defaults.insert("api".to_string(), "v3".to_string());
        let nodes = vec![real_node(&["api", "items"], "/api/{version}/items")];

        let bridges = BridgeSynthesizer::new(&config).synthesize(&nodes);

        assert_eq!(bridges[0].default_parameter.as_deref(), Some("v3"));
    }
}
