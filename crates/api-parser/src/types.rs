//! Type definitions for parsed OpenAPI specs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP methods the path tree is built from, in processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Every supported method, in the order operations are appended to a node
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Semantic role of an operation on its node.
///
/// Starts out equal to the HTTP method. Operations transferred from a bare
/// collection endpoint onto its item sibling become `List` / `DeleteAll`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationRole {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    List,
    DeleteAll,
}

impl From<HttpMethod> for OperationRole {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => OperationRole::Get,
            HttpMethod::Post => OperationRole::Post,
            HttpMethod::Put => OperationRole::Put,
            HttpMethod::Delete => OperationRole::Delete,
            HttpMethod::Patch => OperationRole::Patch,
        }
    }
}

/// Schema of the response an operation returns, with `$ref` reduced to a bare type name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseSchema {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// A string, or a list of types in OpenAPI 3.1 documents
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
    /// Any other schema keywords, passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A single operation attached to a path node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Endpoint template after prefix rewriting (e.g. "/restapi/{apiVersion}/account/{accountId}")
    pub endpoint: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Role on the node; differs from `method` only after reclassification
    #[serde(rename = "method2")]
    pub role: OperationRole,
    pub operation_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_permission: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_permission: Option<String>,
    /// Whether the endpoint ends in a path parameter
    pub with_parameter: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<ResponseSchema>,
    /// Name of the query-parameter model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_parameters: Option<String>,
    /// Name of the request-body model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_parameters: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub form_url_encoded: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub multipart: bool,
}

impl Operation {
    /// Replacement record carrying a different role
    pub fn with_role(self, role: OperationRole) -> Self {
        Self { role, ..self }
    }
}

/// One node of the path tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathNode {
    /// Literal segments, parameters removed
    pub paths: Vec<String>,
    /// Trailing path parameter name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    /// Value used when the caller omits the parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_parameter: Option<String>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl PathNode {
    pub fn new(paths: Vec<String>) -> Self {
        Self {
            paths,
            parameter: None,
            default_parameter: None,
            operations: Vec::new(),
        }
    }

    /// Segments joined with `/`, the key used for output ordering
    pub fn joined(&self) -> String {
        self.paths.join("/")
    }

    pub fn operation(&self, role: OperationRole) -> Option<&Operation> {
        self.operations.iter().find(|op| op.role == role)
    }

    /// Bridge nodes carry no operations
    pub fn is_bridge(&self) -> bool {
        self.operations.is_empty()
    }
}

/// A field of a data model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Field>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// A flat data model handed to the generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<Field>,
}

/// Everything the generator consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSpec {
    pub models: Vec<Model>,
    pub paths: Vec<PathNode>,
}

// --- Raw OpenAPI 3.x structures for parsing ---

/// Raw OpenAPI document structure
#[derive(Debug, Clone, Deserialize)]
pub struct RawOpenApiSpec {
    pub openapi: String,
    pub info: RawInfo,
    #[serde(default)]
    pub paths: IndexMap<String, RawPathItem>,
    #[serde(default)]
    pub components: Option<RawComponents>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawInfo {
    pub title: String,
    pub description: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPathItem {
    pub get: Option<RawOperation>,
    pub post: Option<RawOperation>,
    pub put: Option<RawOperation>,
    pub patch: Option<RawOperation>,
    pub delete: Option<RawOperation>,
    pub head: Option<RawOperation>,
    pub options: Option<RawOperation>,
    pub trace: Option<RawOperation>,
    #[serde(default)]
    pub parameters: Vec<RawParameter>,
}

impl RawPathItem {
    /// Operation declared for `method`, deprecated or not
    pub fn operation(&self, method: HttpMethod) -> Option<&RawOperation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
        }
    }

    pub fn has(&self, method: HttpMethod) -> bool {
        self.operation(method).is_some()
    }

    /// Every declared operation keyed by lowercase verb, including
    /// head/options/trace which the path tree ignores
    pub fn declared_operations(&self) -> impl Iterator<Item = (&'static str, &RawOperation)> {
        [
            ("get", &self.get),
            ("post", &self.post),
            ("put", &self.put),
            ("delete", &self.delete),
            ("patch", &self.patch),
            ("head", &self.head),
            ("options", &self.options),
            ("trace", &self.trace),
        ]
        .into_iter()
        .filter_map(|(verb, operation)| operation.as_ref().map(|op| (verb, op)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOperation {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub parameters: Vec<RawParameter>,
    pub request_body: Option<RawRequestBody>,
    #[serde(default)]
    pub responses: IndexMap<String, RawResponse>,
    #[serde(rename = "x-throttling-group")]
    pub throttling_group: Option<String>,
    #[serde(rename = "x-app-permission")]
    pub app_permission: Option<String>,
    #[serde(rename = "x-user-permission")]
    pub user_permission: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawParameter {
    /// Parameter name (optional when $ref is used)
    #[serde(default)]
    pub name: String,
    /// Parameter location (optional when $ref is used)
    #[serde(rename = "in", default)]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    pub description: Option<String>,
    pub schema: Option<Value>,
    pub example: Option<Value>,
    /// Reference to a parameter in components/parameters
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
}

impl RawParameter {
    pub fn is_query(&self) -> bool {
        self.location == "query"
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRequestBody {
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: IndexMap<String, RawMediaType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMediaType {
    pub schema: Option<Value>,
}

impl RawMediaType {
    /// `$ref` of the schema, when the schema is a reference object
    pub fn schema_ref(&self) -> Option<&str> {
        self.schema.as_ref()?.get("$ref")?.as_str()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResponse {
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<IndexMap<String, RawMediaType>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComponents {
    #[serde(default)]
    pub schemas: IndexMap<String, Value>,
}

/// Final segment of a `$ref` such as "#/components/schemas/User"
pub fn ref_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}
