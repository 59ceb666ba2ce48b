// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph-building helpers shared by unit tests.

use matbridge_graph::{
    create_shader_registry, GraphError, ImageRef, ImageTexture, LinkId, Node, NodeId, NodeKind,
    Port, PortId, PortType, ShaderGraph, ShaderSchema,
};

pub fn create(kind: NodeKind) -> Node {
    create_shader_registry(ShaderSchema::V4)
        .create_node(kind)
        .expect("kind registered")
}

pub fn image_node(name: &str, image: &str) -> Node {
    create(NodeKind::ImageTexture(ImageTexture::new(ImageRef::new(image)))).with_name(name)
}

pub fn empty_image_node(name: &str) -> Node {
    create(NodeKind::ImageTexture(ImageTexture::default())).with_name(name)
}

/// Host node with one color input and one color output
pub fn passthrough(name: &str) -> Node {
    create(NodeKind::Custom("passthrough".to_string()))
        .with_name(name)
        .with_input(Port::input("In", PortType::Color))
        .with_output(Port::output("Out", PortType::Color))
}

pub fn input_id(graph: &ShaderGraph, node: NodeId, name: &str) -> PortId {
    graph.node(node).unwrap().input(name).unwrap().id
}

pub fn output_id(graph: &ShaderGraph, node: NodeId, name: &str) -> PortId {
    graph.node(node).unwrap().output(name).unwrap().id
}

pub fn try_link(
    graph: &mut ShaderGraph,
    from: NodeId,
    output: &str,
    to: NodeId,
    input: &str,
) -> Result<LinkId, GraphError> {
    let from_port = output_id(graph, from, output);
    let to_port = input_id(graph, to, input);
    graph.connect(from, from_port, to, to_port)
}

pub fn link(graph: &mut ShaderGraph, from: NodeId, output: &str, to: NodeId, input: &str) {
    try_link(graph, from, output, to, input).unwrap();
}
