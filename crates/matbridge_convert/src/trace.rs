// SPDX-License-Identifier: MIT OR Apache-2.0
//! Backward traversal from an input port to the image feeding it.

use matbridge_graph::{Node, PortId, ShaderGraph};
use std::collections::HashSet;

use crate::config::DEFAULT_TRACE_DEPTH;

/// Depth-bounded, first-input-preferring walk toward upstream images.
///
/// The visited set spans the whole walk: a port reached twice through
/// reconvergent or cyclic wiring is never expanded again, so the walk visits
/// at most every port of the graph once regardless of topology.
pub struct UpstreamTrace<'g> {
    graph: &'g ShaderGraph,
    max_depth: usize,
    visited: HashSet<PortId>,
}

impl<'g> UpstreamTrace<'g> {
    /// Create a trace over `graph` with a hop budget
    pub fn new(graph: &'g ShaderGraph, max_depth: usize) -> Self {
        Self {
            graph,
            max_depth,
            visited: HashSet::new(),
        }
    }

    /// First image-texture node (with an image) upstream of `port`
    pub fn find_image(&mut self, port: PortId) -> Option<&'g Node> {
        self.walk(port, self.max_depth)
    }

    /// Number of ports visited so far
    pub fn visited(&self) -> usize {
        self.visited.len()
    }

    fn walk(&mut self, port: PortId, depth: usize) -> Option<&'g Node> {
        if !self.visited.insert(port) {
            return None;
        }

        let graph = self.graph;
        let link = graph.link_to(port)?;
        let source = graph.node(link.from_node)?;
        if source.has_image() {
            return Some(source);
        }
        if depth == 0 {
            return None;
        }

        for input in &source.inputs {
            if graph.link_to(input.id).is_none() {
                continue;
            }
            if let Some(found) = self.walk(input.id, depth - 1) {
                return Some(found);
            }
        }
        None
    }
}

/// Find the first image-texture node upstream of `port` within `max_depth` hops
pub fn find_upstream_image(graph: &ShaderGraph, port: PortId, max_depth: usize) -> Option<&Node> {
    UpstreamTrace::new(graph, max_depth).find_image(port)
}

/// [`find_upstream_image`] with the default hop budget
pub fn find_image_default(graph: &ShaderGraph, port: PortId) -> Option<&Node> {
    find_upstream_image(graph, port, DEFAULT_TRACE_DEPTH)
}
