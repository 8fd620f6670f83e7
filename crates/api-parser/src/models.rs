//! Flat data-model list derived from schemas, form bodies and query parameters

use serde_json::Value;
use tracing::debug;

use crate::operations::capitalize_first_letter;
use crate::types::*;

const ATTACHMENT: &str = "Attachment";

/// Builds the [`Model`] list that accompanies the path tree
pub struct ModelExtractor;

impl ModelExtractor {
    /// Extract all models from a raw OpenAPI spec
    pub fn extract(spec: &RawOpenApiSpec) -> Vec<Model> {
        let mut models: Vec<Model> = spec
            .components
            .iter()
            .flat_map(|c| c.schemas.iter())
            .map(|(name, schema)| Self::normalize_schema(name, schema))
            .collect();

        models.push(Self::attachment());

        for (template, item) in &spec.paths {
            for (method, operation) in item.declared_operations() {
                let Some(operation_id) = operation.operation_id.as_deref() else {
                    debug!("Skipping models for {} {}: no operationId", method, template);
                    continue;
                };

                if let Some(model) = operation
                    .request_body
                    .as_ref()
                    .and_then(|body| Self::form_request_model(operation_id, body))
                {
                    models.push(model);
                }

                if let Some(model) = Self::query_parameters_model(operation_id, &operation.parameters) {
                    models.push(model);
                }
            }
        }

        debug!("Extracted {} models", models.len());
        models
    }

    fn normalize_schema(name: &str, schema: &Value) -> Model {
        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let fields = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| {
                properties
                    .iter()
                    .map(|(key, property)| {
                        let mut field = Self::field_from_schema(key, property);
                        field.required = Some(required.contains(&key.as_str()));
                        field
                    })
                    .collect()
            })
            .unwrap_or_default();

        Model {
            name: name.to_string(),
            description: string(schema, "description"),
            fields,
        }
    }

    /// Read the field-relevant keywords of a property schema and normalize them
    fn field_from_schema(name: &str, schema: &Value) -> Field {
        let mut field = Field {
            name: name.to_string(),
            field_type: string(schema, "type"),
            reference: string(schema, "$ref").map(|r| ref_name(&r).to_string()),
            description: string(schema, "description"),
            enum_values: schema.get("enum").and_then(Value::as_array).cloned(),
            example: schema.get("example").cloned(),
            format: string(schema, "format"),
            items: schema
                .get("items")
                .map(|items| Box::new(Self::field_from_schema("", items))),
            default: schema.get("default").cloned(),
            minimum: schema.get("minimum").and_then(Value::as_f64),
            maximum: schema.get("maximum").and_then(Value::as_f64),
            required: None,
        };

        let binary = field.field_type.as_deref() == Some("file")
            || (field.field_type.as_deref() == Some("string") && field.format.as_deref() == Some("binary"));
        if binary {
            field.reference = Some(ATTACHMENT.to_string());
            field.field_type = None;
            field.format = None;
        }

        field
    }

    /// `<OperationId>Request` for an inline form-url-encoded or multipart body
    fn form_request_model(operation_id: &str, body: &RawRequestBody) -> Option<Model> {
        let media = body
            .content
            .get("application/x-www-form-urlencoded")
            .or_else(|| body.content.get("multipart/form-data"))?;
        let schema = media.schema.as_ref()?;
        schema.get("properties")?;

        let mut model = Self::normalize_schema(
            &format!("{}Request", capitalize_first_letter(operation_id)),
            schema,
        );
        if model.description.is_none() {
            model.description = Some(format!("Request body for operation {}", operation_id));
        }
        Some(model)
    }

    /// `<OperationId>Parameters` with one field per query parameter
    fn query_parameters_model(operation_id: &str, parameters: &[RawParameter]) -> Option<Model> {
        let fields: Vec<Field> = parameters
            .iter()
            .filter(|p| p.is_query())
            .map(|p| {
                let mut field = p
                    .schema
                    .as_ref()
                    .map(|schema| Self::field_from_schema(&p.name, schema))
                    .unwrap_or_else(|| Field {
                        name: p.name.clone(),
                        ..Default::default()
                    });
                // Schema keywords take precedence over the parameter's own
                if field.description.is_none() {
                    field.description = p.description.clone();
                }
                if field.example.is_none() {
                    field.example = p.example.clone();
                }
                field.required = p.required.then_some(true);
                field
            })
            .collect();

        if fields.is_empty() {
            return None;
        }

        Some(Model {
            name: format!("{}Parameters", capitalize_first_letter(operation_id)),
            description: Some(format!("Query parameters for operation {}", operation_id)),
            fields,
        })
    }

    fn attachment() -> Model {
        let field = |name: &str, field_type: &str, description: &str| Field {
            name: name.to_string(),
            field_type: Some(field_type.to_string()),
            description: Some(description.to_string()),
            ..Default::default()
        };

        Model {
            name: ATTACHMENT.to_string(),
            description: Some("Attachment is a file to be uploaded".to_string()),
            fields: vec![
                Field {
                    example: Some(Value::from("example.png")),
                    ..field("filename", "string", "Filename with extension")
                },
                Field {
                    required: Some(true),
                    ..field("content", "byte[]", "Binary content of the file")
                },
                field(
                    "contentType",
                    "string",
                    "Content type of the file, such as \"image/png\"",
                ),
            ],
        }
    }
}

fn string(schema: &Value, key: &str) -> Option<String> {
    schema.get(key).and_then(Value::as_str).map(str::to_string)
}
