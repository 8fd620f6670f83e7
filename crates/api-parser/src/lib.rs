//! # api-parser
//!
//! OpenAPI 3.x parser for SDK generators.
//! Turns a spec into a flat model list and a tree of path-segment nodes,
//! merging collection and item endpoints that share a resource path.

mod bridge;
mod config;
mod error;
mod merger;
mod models;
mod normalizer;
mod operations;
mod parser;
mod paths;
mod types;

pub use bridge::BridgeSynthesizer;
pub use config::{ParserConfig, PrefixRule};
pub use error::{ParseError, ParseResult};
pub use merger::PathMerger;
pub use models::ModelExtractor;
pub use normalizer::{NormalizedPath, PathNormalizer};
pub use operations::OperationExtractor;
pub use parser::OpenApiParser;
pub use paths::{sort_nodes, PathTreeBuilder};
pub use types::*;
