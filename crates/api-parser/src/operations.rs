//! Operation extraction from raw endpoint definitions

use crate::error::{ParseError, ParseResult};
use crate::normalizer::NormalizedPath;
use crate::types::*;

const FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data";

/// Status codes probed, in order, before falling back to `default`
const RESPONSE_PRIORITY: [&str; 7] = ["200", "201", "202", "204", "205", "302", "501"];

/// Builds one [`Operation`] per HTTP method of an endpoint
pub struct OperationExtractor;

/// Request-body model name plus its encoding flags
#[derive(Debug, Default, PartialEq, Eq)]
struct BodyParameters {
    name: Option<String>,
    form_url_encoded: bool,
    multipart: bool,
}

impl OperationExtractor {
    /// Extract the operation for `method`.
    ///
    /// Returns `Ok(None)` for deprecated operations.
    pub fn extract(
        template: &str,
        path: &NormalizedPath,
        method: HttpMethod,
        operation: &RawOperation,
    ) -> ParseResult<Option<Operation>> {
        if operation.deprecated {
            return Ok(None);
        }

        let operation_id = operation
            .operation_id
            .clone()
            .unwrap_or_else(|| Self::generate_operation_id(template, method));

        let response_schema = Self::extract_response_schema(&path.endpoint, method, operation)?;

        let query_parameters = operation
            .parameters
            .iter()
            .any(RawParameter::is_query)
            .then(|| format!("{}Parameters", operation_id));

        let body = operation
            .request_body
            .as_ref()
            .map(|body| Self::extract_body_parameters(body, &operation_id))
            .unwrap_or_default();

        Ok(Some(Operation {
            endpoint: path.endpoint.clone(),
            method,
            role: method.into(),
            operation_id,
            tags: operation.tags.clone(),
            description: operation.description.clone(),
            summary: operation.summary.clone(),
            rate_limit_group: operation.throttling_group.clone(),
            app_permission: operation.app_permission.clone(),
            user_permission: operation.user_permission.clone(),
            with_parameter: path.is_parameterized(),
            response_schema,
            query_parameters,
            body_parameters: body.name,
            form_url_encoded: body.form_url_encoded,
            multipart: body.multipart,
        }))
    }

    /// Schema of the first response found in priority order
    fn extract_response_schema(
        endpoint: &str,
        method: HttpMethod,
        operation: &RawOperation,
    ) -> ParseResult<Option<ResponseSchema>> {
        let response = RESPONSE_PRIORITY
            .iter()
            .chain(std::iter::once(&"default"))
            .find_map(|status| operation.responses.get(*status))
            .ok_or_else(|| ParseError::MissingResponse {
                endpoint: endpoint.to_string(),
                method: method.to_string(),
            })?;

        let schema = response
            .content
            .as_ref()
            .and_then(|content| content.first())
            .and_then(|(_, media)| media.schema.clone());

        let Some(schema) = schema else {
            return Ok(None);
        };

        let mut schema: ResponseSchema = serde_json::from_value(schema)?;
        if let Some(reference) = schema.reference.take() {
            schema.reference = Some(ref_name(&reference).to_string());
        }
        Ok(Some(schema))
    }

    fn extract_body_parameters(body: &RawRequestBody, operation_id: &str) -> BodyParameters {
        let inline_name = || format!("{}Request", operation_id);

        if let Some(media) = body.content.get(FORM_URL_ENCODED) {
            return BodyParameters {
                name: Some(media.schema_ref().map(|r| ref_name(r).to_string()).unwrap_or_else(inline_name)),
                form_url_encoded: true,
                multipart: false,
            };
        }
        if let Some(media) = body.content.get(MULTIPART) {
            return BodyParameters {
                name: Some(media.schema_ref().map(|r| ref_name(r).to_string()).unwrap_or_else(inline_name)),
                form_url_encoded: false,
                multipart: true,
            };
        }

        let name = body.content.first().map(|(_, media)| {
            media
                .schema_ref()
                .map(|r| lower_case_first_letter(ref_name(r)))
                .unwrap_or_else(inline_name)
        });

        BodyParameters {
            name,
            ..Default::default()
        }
    }

    /// Generate a lower-camel operation ID from method and template:
    /// GET /users/{id}/posts -> getUsersIdPosts
    fn generate_operation_id(template: &str, method: HttpMethod) -> String {
        let mut id = method.as_str().to_string();
        for word in template.split(|c: char| !c.is_ascii_alphanumeric()) {
            id.push_str(&capitalize_first_letter(word));
        }
        id
    }
}

pub(crate) fn lower_case_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
