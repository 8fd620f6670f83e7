//! Path tree construction: merge, bridge, sort

use tracing::info;

use crate::bridge::BridgeSynthesizer;
use crate::config::ParserConfig;
use crate::error::ParseResult;
use crate::merger::PathMerger;
use crate::types::{PathNode, RawOpenApiSpec};

/// Builds the ordered path-node list for a document
pub struct PathTreeBuilder<'a> {
    merger: PathMerger<'a>,
    bridges: BridgeSynthesizer<'a>,
}

impl<'a> PathTreeBuilder<'a> {
    pub fn new(config: &'a ParserConfig) -> ParseResult<Self> {
        Ok(Self {
            merger: PathMerger::new(config)?,
            bridges: BridgeSynthesizer::new(config),
        })
    }

    /// Build the tree. Bridges are synthesized only after every real node is merged.
    pub fn build(&self, spec: &RawOpenApiSpec) -> ParseResult<Vec<PathNode>> {
        let nodes = self.merger.merge(&spec.paths)?;
        let bridges = self.bridges.synthesize(&nodes);

        info!(
            "Built {} path nodes ({} bridge) from {} endpoints",
            nodes.len() + bridges.len(),
            bridges.len(),
            spec.paths.len()
        );

        Ok(sort_nodes(nodes.into_iter().chain(bridges).collect()))
    }
}

/// Shallow to deep by joined segment length; ties keep their relative order
pub fn sort_nodes(mut nodes: Vec<PathNode>) -> Vec<PathNode> {
    nodes.sort_by_cached_key(|node| node.joined().len());
    nodes
}
