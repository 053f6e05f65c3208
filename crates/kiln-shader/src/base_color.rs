//! Base colour sub-graphs.
//!
//! Six shapes, one per (mode, vertex colour) pair. With vertex colours the
//! colour attribute always multiplies into whatever the mode produces:
//! a single colour mix for a constant, and a per-channel multiply stage for
//! texture modes.

use glam::Vec2;
use kiln_assets::{BaseColor, TextureRef};
use kiln_core::Color;
use kiln_mesh::COLOR_LAYER_NAME;

use crate::error::ShaderError;
use crate::graph::{BlendType, ColorSpace, MathOp, NodeId, NodeKind, ShaderGraph, Socket, Value};
use crate::texture::add_texture_chain;

const LABEL: &str = "BASE COLOR";

/// A node output feeding one colour channel.
type ChannelSource = (NodeId, Socket);

pub(crate) fn build(
    graph: &mut ShaderGraph,
    principled: NodeId,
    base_color: &BaseColor,
    vertex_color: bool,
) -> Result<(), ShaderError> {
    match (base_color, vertex_color) {
        (BaseColor::Factor(factor), false) => {
            graph.set_default(principled, Socket::BaseColor, Value::Rgba(factor.to_array()))
        }
        (BaseColor::Factor(factor), true) => factor_times_vertex_color(graph, principled, *factor),
        (BaseColor::FactorTexture { factor, texture }, vertex_color) => {
            factor_times_texture(graph, principled, *factor, texture, vertex_color)
        }
        (BaseColor::Texture(texture), false) => {
            let image = add_texture_chain(
                graph,
                texture,
                LABEL,
                ColorSpace::Color,
                Vec2::new(-500.0, 500.0),
            )?;
            graph.link(image, Socket::Color, principled, Socket::BaseColor)
        }
        (BaseColor::Texture(texture), true) => {
            let image = add_texture_chain(
                graph,
                texture,
                LABEL,
                ColorSpace::Color,
                Vec2::new(-2000.0, 500.0),
            )?;
            let split = separate(graph, (image, Socket::Color), Vec2::new(-1500.0, 500.0))?;
            let product = multiply_by_vertex_color(graph, split, -1000.0)?;
            combine_into(graph, product, principled, Vec2::new(-500.0, 500.0))
        }
    }
}

fn factor_times_vertex_color(
    graph: &mut ShaderGraph,
    principled: NodeId,
    factor: Color,
) -> Result<(), ShaderError> {
    let attribute = vertex_color_node(graph, Vec2::new(-500.0, 0.0));
    let mix = graph.add_node(
        NodeKind::MixRgb {
            blend: BlendType::Multiply,
        },
        Vec2::new(-250.0, 0.0),
    );
    graph.set_default(mix, Socket::Fac, Value::Float(1.0))?;
    graph.set_default(mix, Socket::Color1, Value::Rgba(factor.to_array()))?;
    graph.link(attribute, Socket::Color, mix, Socket::Color2)?;
    graph.link(mix, Socket::Color, principled, Socket::BaseColor)
}

fn factor_times_texture(
    graph: &mut ShaderGraph,
    principled: NodeId,
    factor: Color,
    texture: &TextureRef,
    vertex_color: bool,
) -> Result<(), ShaderError> {
    let shift = if vertex_color { -1000.0 } else { 0.0 };
    let image = add_texture_chain(
        graph,
        texture,
        LABEL,
        ColorSpace::Color,
        Vec2::new(-1000.0 + shift, 500.0),
    )?;
    let split = separate(graph, (image, Socket::Color), Vec2::new(-750.0 + shift, 500.0))?;

    let mut scaled = split;
    for (channel, (source, slot)) in split.into_iter().zip(scaled.iter_mut()).enumerate() {
        let math = graph.add_node(
            NodeKind::Math { op: MathOp::Multiply },
            Vec2::new(-500.0 + shift, 750.0 - 250.0 * channel as f32),
        );
        graph.link(source.0, source.1, math, Socket::A)?;
        graph.set_default(math, Socket::B, Value::Float(factor.channel(channel)))?;
        *slot = (math, Socket::Value);
    }

    let result = if vertex_color {
        multiply_by_vertex_color(graph, scaled, -1000.0)?
    } else {
        scaled
    };
    combine_into(graph, result, principled, Vec2::new(-250.0, 500.0))
}

fn vertex_color_node(graph: &mut ShaderGraph, location: Vec2) -> NodeId {
    graph.add_node(
        NodeKind::VertexColor {
            attribute: COLOR_LAYER_NAME.to_owned(),
        },
        location,
    )
}

fn separate(
    graph: &mut ShaderGraph,
    source: ChannelSource,
    location: Vec2,
) -> Result<[ChannelSource; 3], ShaderError> {
    let node = graph.add_node(NodeKind::SeparateRgb, location);
    graph.link(source.0, source.1, node, Socket::Image)?;
    Ok(Socket::CHANNELS.map(|socket| (node, socket)))
}

/// Multiply each incoming channel by the matching vertex colour channel.
fn multiply_by_vertex_color(
    graph: &mut ShaderGraph,
    channels: [ChannelSource; 3],
    x: f32,
) -> Result<[ChannelSource; 3], ShaderError> {
    let attribute = vertex_color_node(graph, Vec2::new(x - 1000.0, 250.0));
    let vertex = separate(graph, (attribute, Socket::Color), Vec2::new(x - 500.0, 250.0))?;

    let mut products = channels;
    for (channel, slot) in products.iter_mut().enumerate() {
        let math = graph.add_node(
            NodeKind::Math { op: MathOp::Multiply },
            Vec2::new(x, 750.0 - 250.0 * channel as f32),
        );
        let (source, socket) = channels[channel];
        graph.link(source, socket, math, Socket::A)?;
        let (source, socket) = vertex[channel];
        graph.link(source, socket, math, Socket::B)?;
        *slot = (math, Socket::Value);
    }
    Ok(products)
}

fn combine_into(
    graph: &mut ShaderGraph,
    channels: [ChannelSource; 3],
    principled: NodeId,
    location: Vec2,
) -> Result<(), ShaderError> {
    let combine = graph.add_node(NodeKind::CombineRgb, location);
    for ((source, socket), target) in channels.into_iter().zip(Socket::CHANNELS) {
        graph.link(source, socket, combine, target)?;
    }
    graph.link(combine, Socket::Image, principled, Socket::BaseColor)
}
