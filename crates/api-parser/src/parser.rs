//! Main OpenAPI parser

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ParserConfig;
use crate::error::{ParseError, ParseResult};
use crate::models::ModelExtractor;
use crate::paths::PathTreeBuilder;
use crate::types::*;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenAPI 3.x parser producing models and the path tree
#[derive(Debug, Clone, Default)]
pub struct OpenApiParser {
    config: ParserConfig,
}

impl OpenApiParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse an OpenAPI spec from a string (auto-detects JSON/YAML)
    pub fn parse(&self, content: &str) -> ParseResult<ParsedSpec> {
        if content.trim_start().starts_with('{') {
            self.parse_json(content)
        } else {
            self.parse_yaml(content)
        }
    }

    /// Parse an OpenAPI spec from JSON
    pub fn parse_json(&self, content: &str) -> ParseResult<ParsedSpec> {
        let raw: RawOpenApiSpec = serde_json::from_str(content)?;
        self.parse_document(&raw)
    }

    /// Parse an OpenAPI spec from YAML
    pub fn parse_yaml(&self, content: &str) -> ParseResult<ParsedSpec> {
        let raw: RawOpenApiSpec = serde_yaml::from_str(content)?;
        self.parse_document(&raw)
    }

    /// Fetch and parse an OpenAPI spec from a URL.
    ///
    /// A YAML content type or file extension forces the YAML parser;
    /// anything else goes through format detection.
    pub async fn fetch_and_parse(&self, url: &str) -> ParseResult<ParsedSpec> {
        let (content, yaml) = Self::fetch(url).await?;
        if yaml {
            self.parse_yaml(&content)
        } else {
            self.parse(&content)
        }
    }

    /// Download a document, returning its body and whether it is declared YAML
    async fn fetch(url: &str) -> ParseResult<(String, bool)> {
        info!("Fetching OpenAPI spec from: {}", url);

        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| ParseError::HttpError(e.to_string()))?;

        let response = client
            .get(url)
            .header(ACCEPT, "application/json, application/yaml, text/yaml")
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ParseError::FetchError(e.to_string()))?;

        let content_type = response.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
        let yaml = declares_yaml(content_type, url);

        let content = response
            .text()
            .await
            .map_err(|e| ParseError::FetchError(e.to_string()))?;

        Ok((content, yaml))
    }

    /// Build models and paths from an already-deserialized document.
    ///
    /// The document is only borrowed; nothing in it is rewritten.
    pub fn parse_document(&self, raw: &RawOpenApiSpec) -> ParseResult<ParsedSpec> {
        if !raw.openapi.starts_with("3.") {
            return Err(ParseError::UnsupportedVersion(raw.openapi.clone()));
        }

        debug!("Parsing OpenAPI {} spec: {}", raw.openapi, raw.info.title);

        let models = ModelExtractor::extract(raw);
        let paths = PathTreeBuilder::new(&self.config)?.build(raw)?;

        info!("Parsed {}: {} models, {} paths", raw.info.title, models.len(), paths.len());

        Ok(ParsedSpec { models, paths })
    }
}

/// Whether the response is declared YAML by content type or file extension
fn declares_yaml(content_type: Option<&str>, url: &str) -> bool {
    content_type.is_some_and(|ct| ct.contains("yaml")) || url.ends_with(".yaml") || url.ends_with(".yml")
}
