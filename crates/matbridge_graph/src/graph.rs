// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shading graph containing nodes and links.

use crate::link::{Link, LinkId};
use crate::node::{Node, NodeId, NodeKind};
use crate::port::{PortDirection, PortId, PortValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A shading node graph
///
/// Nodes and links keep insertion order, which is the "graph node order"
/// every first-match rule in role inference relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderGraph {
    /// Graph name
    pub name: String,
    /// Nodes in the graph
    nodes: IndexMap<NodeId, Node>,
    /// Links between nodes
    links: IndexMap<LinkId, Link>,
}

impl ShaderGraph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            links: IndexMap::new(),
        }
    }

    /// Add a node to the graph.
    ///
    /// A node whose name is already taken gets a numeric suffix
    /// (`Image Texture.001`), the way node editors keep names unique.
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        if self.name_taken(&node.name) {
            let base = node.name.clone();
            let mut suffix = 1;
            while self.name_taken(&format!("{base}.{suffix:03}")) {
                suffix += 1;
            }
            node.name = format!("{base}.{suffix:03}");
        }
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    fn name_taken(&self, name: &str) -> bool {
        self.nodes.values().any(|n| n.name == name)
    }

    /// Remove a node and its links
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.links.retain(|_, l| !l.involves_node(node_id));
        self.nodes.shift_remove(&node_id)
    }

    /// Remove every node and link
    pub fn clear(&mut self) {
        self.links.clear();
        self.nodes.clear();
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes, in graph order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of ports across all nodes
    pub fn port_count(&self) -> usize {
        self.nodes.values().map(|n| n.inputs.len() + n.outputs.len()).sum()
    }

    /// First node, in graph order, matching `predicate`
    pub fn find_node(&self, predicate: impl Fn(&Node) -> bool) -> Option<&Node> {
        self.nodes.values().find(|n| predicate(n))
    }

    /// Nodes whose kind satisfies `predicate`, in graph order
    pub fn nodes_where<'a>(
        &'a self,
        predicate: impl Fn(&NodeKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.values().filter(move |n| predicate(&n.kind))
    }

    /// The material output node, if any
    pub fn output_node(&self) -> Option<&Node> {
        self.find_node(|n| matches!(n.kind, NodeKind::MaterialOutput))
    }

    /// Add a link between ports
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_port: PortId,
        to_node: NodeId,
        to_port: PortId,
    ) -> Result<LinkId, GraphError> {
        // Validate nodes exist
        let source_node = self.nodes.get(&from_node)
            .ok_or(GraphError::NodeNotFound(from_node))?;
        let target_node = self.nodes.get(&to_node)
            .ok_or(GraphError::NodeNotFound(to_node))?;

        // Validate ports exist
        let source_port = source_node.port(&from_port)
            .ok_or(GraphError::PortNotFound(from_port))?;
        let target_port = target_node.port(&to_port)
            .ok_or(GraphError::PortNotFound(to_port))?;

        if source_port.direction != PortDirection::Output || !source_port.can_connect(target_port) {
            return Err(GraphError::IncompatiblePorts);
        }

        // An input holds at most one incoming link
        if !target_port.multi_connect && self.is_linked(to_port) {
            return Err(GraphError::PortAlreadyConnected(to_port));
        }

        // Prevent self-loops
        if from_node == to_node {
            return Err(GraphError::SelfLoop);
        }

        let link = Link::new(from_node, from_port, to_node, to_port);
        let id = link.id;
        self.links.insert(id, link);
        Ok(id)
    }

    /// Get all links
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    /// Get the link arriving at a specific input port
    pub fn link_to(&self, port_id: PortId) -> Option<&Link> {
        self.links.values().find(|l| l.to_port == port_id)
    }

    /// Whether any link touches the port
    pub fn is_linked(&self, port_id: PortId) -> bool {
        self.links.values().any(|l| l.involves_port(port_id))
    }

    /// Get the number of links
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Set the static value of a named input
    pub fn set_input_value(
        &mut self,
        node_id: NodeId,
        input: &str,
        value: PortValue,
    ) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        let port = node.input_mut(input)
            .ok_or_else(|| GraphError::InputNotFound(node_id, input.to_string()))?;

        if !value.port_type().can_connect_to(&port.port_type) {
            return Err(GraphError::IncompatiblePorts);
        }

        port.default_value = Some(value);
        Ok(())
    }

    /// Set the static value of an input by declaration index
    pub fn set_input_value_at(
        &mut self,
        node_id: NodeId,
        index: usize,
        value: PortValue,
    ) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        let port = node.inputs.get_mut(index)
            .ok_or_else(|| GraphError::InputNotFound(node_id, format!("#{index}")))?;

        if !value.port_type().can_connect_to(&port.port_type) {
            return Err(GraphError::IncompatiblePorts);
        }

        port.default_value = Some(value);
        Ok(())
    }
}

impl Default for ShaderGraph {
    fn default() -> Self {
        Self::new("Shader Nodetree")
    }
}

/// Error when mutating a graph
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0:?}")]
    PortNotFound(PortId),

    /// Named input absent on this node's schema
    #[error("Input '{1}' not found on node {0:?}")]
    InputNotFound(NodeId, String),

    /// Incompatible port types or directions
    #[error("Incompatible port types")]
    IncompatiblePorts,

    /// Input already has an incoming link
    #[error("Port already connected: {0:?}")]
    PortAlreadyConnected(PortId),

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,
}
