// SPDX-License-Identifier: MIT OR Apache-2.0
//! Schema-aware graph construction helpers.

use matbridge_graph::{
    create_shader_registry, ColorSpace, GraphError, Node, NodeCategory, NodeId, NodeKind,
    NodeRegistry, NodeType, PortId, PortValue, ShaderGraph, ShaderSchema,
};

use crate::roles::ImageSource;

/// Builds a target graph from scratch.
///
/// Every socket operation reports success as a `bool`; a socket the schema
/// lacks is an expected outcome, not an error, and is logged at `trace`.
pub struct GraphBuilder<'g> {
    graph: &'g mut ShaderGraph,
    registry: NodeRegistry,
    nodes_created: usize,
    links_created: usize,
}

impl<'g> GraphBuilder<'g> {
    /// Clear `graph` and start building with `schema`'s port layouts
    pub fn new(graph: &'g mut ShaderGraph, schema: ShaderSchema) -> Self {
        graph.clear();
        Self {
            graph,
            registry: create_shader_registry(schema),
            nodes_created: 0,
            links_created: 0,
        }
    }

    /// Add a node of `kind` at a cosmetic position
    pub fn add(&mut self, kind: NodeKind, position: [f32; 2]) -> NodeId {
        let node = match self.registry.create_node(kind.clone()) {
            Some(node) => node,
            None => {
                tracing::warn!("Node kind '{}' missing from registry, adding without sockets", kind.type_id());
                let bare = NodeType {
                    id: kind.type_id().to_string(),
                    name: kind.type_id().to_string(),
                    category: NodeCategory::Custom,
                    description: String::new(),
                    inputs: Vec::new(),
                    outputs: Vec::new(),
                };
                Node::new(&bare, kind)
            }
        };
        self.nodes_created += 1;
        self.graph.add_node(node.with_position(position[0], position[1]))
    }

    /// Add a node with a display label
    pub fn add_labeled(&mut self, kind: NodeKind, label: &str, position: [f32; 2]) -> NodeId {
        let id = self.add(kind, position);
        if let Some(node) = self.graph.node_mut(id) {
            node.label = Some(label.to_string());
        }
        id
    }

    /// Add an image node copying `source`'s image, UV map and sampling
    /// settings, tagged with `color_space`
    pub fn add_image(
        &mut self,
        source: &ImageSource,
        color_space: ColorSpace,
        label: &str,
        position: [f32; 2],
    ) -> NodeId {
        let texture = source.texture.retagged(color_space);
        self.add_labeled(NodeKind::ImageTexture(texture), label, position)
    }

    /// Whether `node` has an input named `name`
    pub fn has_input(&self, node: NodeId, name: &str) -> bool {
        self.graph.node(node).is_some_and(|n| n.input(name).is_some())
    }

    /// Whether `node` has an output named `name`
    pub fn has_output(&self, node: NodeId, name: &str) -> bool {
        self.graph.node(node).is_some_and(|n| n.output(name).is_some())
    }

    /// First of `names` that `node` declares as an input
    pub fn input_any(&self, node: NodeId, names: &[&str]) -> Option<String> {
        self.graph
            .node(node)?
            .input_any(names)
            .map(|port| port.name.clone())
    }

    fn output_id(&self, node: NodeId, name: &str) -> Option<PortId> {
        Some(self.graph.node(node)?.output(name)?.id)
    }

    /// Link `from.output` to `to.input`
    pub fn link(&mut self, from: NodeId, output: &str, to: NodeId, input: &str) -> bool {
        let from_port = self.output_id(from, output);
        let to_port = self.graph.node(to).and_then(|n| n.input(input)).map(|p| p.id);
        self.connect(from, from_port, to, to_port, output, input)
    }

    /// Link `from.output` to the `index`-th input of `to`, for nodes with
    /// repeated socket names
    pub fn link_at(&mut self, from: NodeId, output: &str, to: NodeId, index: usize) -> bool {
        let from_port = self.output_id(from, output);
        let to_port = self.graph.node(to).and_then(|n| n.input_at(index)).map(|p| p.id);
        self.connect(from, from_port, to, to_port, output, &format!("#{index}"))
    }

    fn connect(
        &mut self,
        from: NodeId,
        from_port: Option<PortId>,
        to: NodeId,
        to_port: Option<PortId>,
        output: &str,
        input: &str,
    ) -> bool {
        let (Some(from_port), Some(to_port)) = (from_port, to_port) else {
            tracing::trace!("Socket pair '{output}' -> '{input}' absent in this schema, link skipped");
            return false;
        };

        match self.graph.connect(from, from_port, to, to_port) {
            Ok(_) => {
                self.links_created += 1;
                true
            }
            Err(e) => {
                tracing::debug!("Link '{output}' -> '{input}' rejected: {e}");
                false
            }
        }
    }

    /// Set the static value of a named input
    pub fn set(&mut self, node: NodeId, input: &str, value: PortValue) -> bool {
        let result = self.graph.set_input_value(node, input, value);
        Self::report_set(result, input)
    }

    /// Set the static value of the `index`-th input
    pub fn set_at(&mut self, node: NodeId, index: usize, value: PortValue) -> bool {
        let result = self.graph.set_input_value_at(node, index, value);
        Self::report_set(result, &format!("#{index}"))
    }

    /// Set the first of `names` that `node` declares
    pub fn set_any(&mut self, node: NodeId, names: &[&str], value: PortValue) -> bool {
        match self.input_any(node, names) {
            Some(name) => self.set(node, &name, value),
            None => {
                tracing::trace!("None of {names:?} present in this schema, value skipped");
                false
            }
        }
    }

    fn report_set(result: Result<(), GraphError>, input: &str) -> bool {
        match result {
            Ok(()) => true,
            Err(GraphError::InputNotFound(..)) => {
                tracing::trace!("Input '{input}' absent in this schema, value skipped");
                false
            }
            Err(e) => {
                tracing::debug!("Value for '{input}' rejected: {e}");
                false
            }
        }
    }

    /// Nodes added so far
    pub fn nodes_created(&self) -> usize {
        self.nodes_created
    }

    /// Links created so far
    pub fn links_created(&self) -> usize {
        self.links_created
    }
}
