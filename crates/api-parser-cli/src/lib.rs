//! # api-parser-cli
//!
//! Loads an OpenAPI spec from a file or URL, runs the parser and writes the
//! resulting models and path tree as JSON.

use anyhow::{Context, Result};
use api_parser::{OpenApiParser, ParsedSpec, ParserConfig};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

/// Build the model list and path tree an SDK generator consumes
#[derive(Parser, Debug)]
#[command(name = "api-parser")]
#[command(version)]
#[command(about = "Parse an OpenAPI 3.x spec into models and a path-segment tree")]
pub struct Cli {
    /// Spec file path or http(s) URL
    #[arg(env = "SPEC_FILE_PATH")]
    pub spec: String,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Parser config (JSON); built-in conventions when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Emit only the path tree
    #[arg(long)]
    pub paths_only: bool,

    /// Log every endpoint and method processed
    #[arg(long, env = "API_PARSER_DEBUG")]
    pub debug: bool,
}

/// Where the spec comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    File(PathBuf),
    Url(String),
}

impl SpecSource {
    pub fn detect(spec: &str) -> Self {
        match Url::parse(spec) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => SpecSource::Url(spec.to_string()),
            _ => SpecSource::File(PathBuf::from(spec)),
        }
    }
}

/// Install the stderr subscriber; stdout is reserved for JSON output
pub fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

pub fn load_config(path: Option<&Path>) -> Result<ParserConfig> {
    match path {
        Some(path) => ParserConfig::load_from_file(path)
            .with_context(|| format!("Failed to load parser config from {}", path.display())),
        None => Ok(ParserConfig::default()),
    }
}

pub async fn parse_source(parser: &OpenApiParser, source: &SpecSource) -> Result<ParsedSpec> {
    match source {
        SpecSource::Url(url) => parser
            .fetch_and_parse(url)
            .await
            .with_context(|| format!("Failed to parse spec from {}", url)),
        SpecSource::File(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parser
                .parse(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))
        }
    }
}

/// Pretty JSON of the full result, or of the path list only
pub fn render(spec: &ParsedSpec, paths_only: bool) -> Result<String> {
    let json = if paths_only {
        serde_json::to_string_pretty(&spec.paths)?
    } else {
        serde_json::to_string_pretty(spec)?
    };
    Ok(json)
}

pub async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let parser = OpenApiParser::new(config);

    let source = SpecSource::detect(&cli.spec);
    let spec = parse_source(&parser, &source).await?;
    let json = render(&spec, cli.paths_only)?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} models and {} paths to {}", spec.models.len(), spec.paths.len(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
