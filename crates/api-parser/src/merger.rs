//! Folds raw endpoints into a deduplicated set of path nodes

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::ParserConfig;
use crate::error::ParseResult;
use crate::normalizer::{trailing_parameter, NormalizedPath, PathNormalizer};
use crate::operations::OperationExtractor;
use crate::types::*;

/// Merges collection and item endpoints that share a segment sequence
pub struct PathMerger<'a> {
    config: &'a ParserConfig,
    normalizer: PathNormalizer,
}

impl<'a> PathMerger<'a> {
    pub fn new(config: &'a ParserConfig) -> ParseResult<Self> {
        Ok(Self {
            config,
            normalizer: PathNormalizer::new(&config.prefix_rules)?,
        })
    }

    /// Merge every endpoint into real (operation-carrying) nodes.
    ///
    /// Templates are visited shortest first, so a bare collection endpoint is
    /// always in the result set before its parameterized sibling replaces it.
    pub fn merge(&self, paths: &IndexMap<String, RawPathItem>) -> ParseResult<Vec<PathNode>> {
        let mut templates: Vec<(&String, &RawPathItem)> = paths.iter().collect();
        templates.sort_by_key(|(template, _)| template.len());

        let mut result: IndexMap<Vec<String>, PathNode> = IndexMap::new();

        for (template, item) in templates {
            debug!("processing endpoint {}", template);
            let path = self.normalizer.normalize(template);

            let mut node = match &path.parameter {
                Some(parameter) => {
                    let mut node = PathNode::new(path.segments.clone());
                    node.parameter = Some(parameter.clone());
                    node.default_parameter = self.default_parameter(template, &path);
                    // Superseded node is dropped; it is re-added at the end
                    if let Some(previous) = result.shift_remove(&path.segments) {
                        node.operations = Self::transfer(previous, item);
                    }
                    node
                }
                // Same sequence as an existing node: keep its position and fold into it
                None => result
                    .get(&path.segments)
                    .cloned()
                    .unwrap_or_else(|| PathNode::new(path.segments.clone())),
            };

            // Bare endpoint arriving after its item sibling
            let folds_into_item = !path.is_parameterized() && node.parameter.is_some();

            for method in HttpMethod::ALL {
                let Some(raw) = item.operation(method) else {
                    continue;
                };
                debug!("processing HTTP {}", method);
                if let Some(operation) = OperationExtractor::extract(template, &path, method, raw)? {
                    let operation = if folds_into_item {
                        Self::reclassify_incoming(&node, operation)
                    } else {
                        operation
                    };
                    Self::push_operation(&mut node, operation);
                }
            }

            if !node.operations.is_empty() {
                result.insert(path.segments, node);
            }
        }

        Ok(result.into_values().collect())
    }

    /// Default for a trailing parameter, keyed by the segment before it.
    ///
    /// A parameter introduced by a prefix rule (e.g. `/scim/v2`) also
    /// consults the version table.
    fn default_parameter(&self, template: &str, path: &NormalizedPath) -> Option<String> {
        let segment = path.last_segment()?;
        if let Some(value) = self.config.item_default(segment) {
            return Some(value.to_string());
        }
        if trailing_parameter(template).is_none() {
            return self.config.version_default(segment).map(str::to_string);
        }
        None
    }

    /// Carry operations of a superseded node over to its replacement.
    ///
    /// Only operations that came from a bare endpoint are reclassified, and
    /// only for verbs the replacing endpoint also defines.
    fn transfer(previous: PathNode, item: &RawPathItem) -> Vec<Operation> {
        let from_bare = previous.parameter.is_none();
        previous
            .operations
            .into_iter()
            .map(|op| match op.role {
                OperationRole::Get if from_bare && item.has(HttpMethod::Get) => {
                    op.with_role(OperationRole::List)
                }
                OperationRole::Delete if from_bare && item.has(HttpMethod::Delete) => {
                    op.with_role(OperationRole::DeleteAll)
                }
                _ => op,
            })
            .collect()
    }

    /// Collection verb joining a node that already holds the item verb
    fn reclassify_incoming(node: &PathNode, operation: Operation) -> Operation {
        match operation.role {
            OperationRole::Get if node.operation(OperationRole::Get).is_some() => {
                operation.with_role(OperationRole::List)
            }
            OperationRole::Delete if node.operation(OperationRole::Delete).is_some() => {
                operation.with_role(OperationRole::DeleteAll)
            }
            _ => operation,
        }
    }

    fn push_operation(node: &mut PathNode, operation: Operation) {
        if let Some(existing) = node.operation(operation.role) {
            warn!(
                "Skipping {} for {}: role {:?} already taken by {}",
                operation.operation_id,
                node.joined(),
                operation.role,
                existing.operation_id
            );
            return;
        }
        node.operations.push(operation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(yaml: &str) -> IndexMap<String, RawPathItem> {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn merge(yaml: &str) -> Vec<PathNode> {
        let config = ParserConfig::default();
        PathMerger::new(&config).unwrap().merge(&paths(yaml)).unwrap()
    }

    fn find<'n>(nodes: &'n [PathNode], joined: &str) -> &'n PathNode {
        nodes
            .iter()
            .find(|n| n.joined() == joined)
            .unwrap_or_else(|| panic!("no node {}", joined))
    }

    const COLLECTION_AND_ITEM: &str = r#"
/restapi/v1.0/dictionary/brand/{brandId}:
  get:
    operationId: readBrand
    responses:
      '200': { description: OK }
  delete:
    operationId: deleteBrand
    responses:
      '204': { description: No content }
/restapi/v1.0/dictionary/brand:
  get:
    operationId: listBrands
    responses:
      '200': { description: OK }
  post:
    operationId: createBrand
    responses:
      '201': { description: Created }
  delete:
    operationId: deleteAllBrands
    responses:
      '204': { description: No content }
"#;

    #[test]
    fn test_collection_and_item_merge_into_one_node() {
        let nodes = merge(COLLECTION_AND_ITEM);

        assert_eq!(nodes.len(), 1);
        let node = &nodes[0];
        assert_eq!(node.paths, vec!["restapi", "dictionary", "brand"]);
        assert_eq!(node.parameter.as_deref(), Some("brandId"));
        assert!(node.default_parameter.is_none());
        assert_eq!(node.operations.len(), 5);
    }

    #[test]
    fn test_reclassifies_only_bare_operations() {
        let nodes = merge(COLLECTION_AND_ITEM);
        let node = &nodes[0];

        let roles: Vec<(&str, OperationRole)> = node
            .operations
            .iter()
            .map(|op| (op.operation_id.as_str(), op.role))
            .collect();
        assert_eq!(
            roles,
            vec![
                ("listBrands", OperationRole::List),
                ("createBrand", OperationRole::Post),
                ("deleteAllBrands", OperationRole::DeleteAll),
                ("readBrand", OperationRole::Get),
                ("deleteBrand", OperationRole::Delete),
            ]
        );
        // Methods never change
        assert_eq!(node.operation(OperationRole::List).unwrap().method, HttpMethod::Get);
        assert_eq!(node.operation(OperationRole::DeleteAll).unwrap().method, HttpMethod::Delete);
        assert!(!node.operation(OperationRole::List).unwrap().with_parameter);
        assert!(node.operation(OperationRole::Get).unwrap().with_parameter);
    }

    #[test]
    fn test_no_reclassification_without_matching_item_verb() {
        let nodes = merge(r#"
/things:
  get:
    operationId: listThings
    responses:
      '200': { description: OK }
  delete:
    operationId: purgeThings
    responses:
      '204': { description: OK }
/things/{thingId}:
  put:
    operationId: updateThing
    responses:
      '200': { description: OK }
"#);
        let node = find(&nodes, "things");

        assert_eq!(node.operation(OperationRole::Get).unwrap().operation_id, "listThings");
        assert_eq!(node.operation(OperationRole::Delete).unwrap().operation_id, "purgeThings");
        assert!(node.operation(OperationRole::List).is_none());
        assert!(node.operation(OperationRole::DeleteAll).is_none());
    }

    #[test]
    fn test_default_parameter_inference() {
        let nodes = merge(r#"
/restapi/v1.0/account/{accountId}:
  get:
    operationId: readAccount
    responses:
      '200': { description: OK }
/restapi/v1.0/account/{accountId}/extension/{extensionId}:
  get:
    operationId: readExtension
    responses:
      '200': { description: OK }
/restapi/{apiVersion}:
  get:
    operationId: readApiVersion
    responses:
      '200': { description: OK }
/restapi/v1.0/account/{accountId}/paging-only-groups/{pagingOnlyGroupId}:
  get:
    operationId: readPagingGroup
    responses:
      '200': { description: OK }
"#);

        let account = find(&nodes, "restapi/account");
        assert_eq!(account.parameter.as_deref(), Some("accountId"));
        assert_eq!(account.default_parameter.as_deref(), Some("~"));

        let extension = find(&nodes, "restapi/account/extension");
        assert_eq!(extension.parameter.as_deref(), Some("extensionId"));
        assert_eq!(extension.default_parameter.as_deref(), Some("~"));

        let restapi = find(&nodes, "restapi");
        assert_eq!(restapi.parameter.as_deref(), Some("apiVersion"));
        assert_eq!(restapi.default_parameter.as_deref(), Some("v1.0"));

        let paging = find(&nodes, "restapi/account/paging-only-groups");
        assert_eq!(paging.parameter.as_deref(), Some("pagingOnlyGroupId"));
        assert!(paging.default_parameter.is_none());
    }

    #[test]
    fn test_rewritten_version_placeholder_gets_version_default() {
        let nodes = merge(r#"
/scim/v2:
  get:
    operationId: readScim
    responses:
      '200': { description: OK }
/scim/{id}/things:
  get:
    operationId: readThings
    responses:
      '200': { description: OK }
"#);
        let scim = find(&nodes, "scim");
        assert_eq!(scim.parameter.as_deref(), Some("version"));
        assert_eq!(scim.default_parameter.as_deref(), Some("v2"));
    }

    #[test]
    fn test_explicit_parameter_ignores_version_table() {
        let nodes = merge(r#"
/scim/{id}:
  get:
    operationId: readScim
    responses:
      '200': { description: OK }
"#);
        assert!(find(&nodes, "scim").default_parameter.is_none());
    }

    #[test]
    fn test_custom_item_defaults() {
        let mut config = ParserConfig::empty();
        config.item_defaults.insert("workspace".to_string(), "current".to_string());
        let nodes = PathMerger::new(&config)
            .unwrap()
            .merge(&paths(r#"
/workspace/{workspaceId}:
  get:
    operationId: readWorkspace
    responses:
      '200': { description: OK }
/account/{accountId}:
  get:
    operationId: readAccount
    responses:
      '200': { description: OK }
"#))
            .unwrap();

        assert_eq!(find(&nodes, "workspace").default_parameter.as_deref(), Some("current"));
        assert!(find(&nodes, "account").default_parameter.is_none());
    }

    #[test]
    fn test_endpoint_without_operations_is_dropped() {
        let nodes = merge(r#"
/old:
  get:
    operationId: oldThing
    deprecated: true
    responses:
      '200': { description: OK }
/new:
  get:
    operationId: newThing
    responses:
      '200': { description: OK }
"#);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].paths, vec!["new"]);
    }

    #[test]
    fn test_bare_templates_with_same_segments_share_a_node() {
        let nodes = merge(r#"
/a/b:
  get:
    operationId: readB
    responses:
      '200': { description: OK }
/a/{id}/b:
  post:
    operationId: createB
    responses:
      '200': { description: OK }
  get:
    operationId: readNestedB
    responses:
      '200': { description: OK }
"#);
        assert_eq!(nodes.len(), 1);
        let node = &nodes[0];
        let ids: Vec<&str> = node.operations.iter().map(|op| op.operation_id.as_str()).collect();
        // Duplicate role is skipped, first one wins
        assert_eq!(ids, vec!["readB", "createB"]);
    }

    #[test]
    fn test_bare_endpoint_after_item_node_is_reclassified() {
        // The item template is shorter, so it is merged first
        let nodes = merge(r#"
/a/b/{i}:
  get:
    operationId: readB
    responses:
      '200': { description: OK }
  delete:
    operationId: deleteB
    responses:
      '204': { description: OK }
/a/{longParameterName}/b:
  get:
    operationId: listNestedB
    responses:
      '200': { description: OK }
  delete:
    operationId: deleteNestedBs
    responses:
      '204': { description: OK }
  post:
    operationId: createNestedB
    responses:
      '201': { description: OK }
"#);
        assert_eq!(nodes.len(), 1);
        let node = &nodes[0];
        assert_eq!(node.parameter.as_deref(), Some("i"));

        let roles: Vec<(&str, OperationRole)> = node
            .operations
            .iter()
            .map(|op| (op.operation_id.as_str(), op.role))
            .collect();
        assert_eq!(
            roles,
            vec![
                ("readB", OperationRole::Get),
                ("deleteB", OperationRole::Delete),
                ("listNestedB", OperationRole::List),
                ("createNestedB", OperationRole::Post),
                ("deleteNestedBs", OperationRole::DeleteAll),
            ]
        );
    }

    #[test]
    fn test_missing_response_aborts_merge() {
        let config = ParserConfig::default();
        let result = PathMerger::new(&config).unwrap().merge(&paths(r#"
/things:
  get:
    operationId: listThings
    responses:
      '404': { description: Not found }
"#));
        assert!(matches!(result, Err(crate::ParseError::MissingResponse { .. })));
    }
}
