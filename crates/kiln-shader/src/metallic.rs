//! Metallic and roughness sub-graphs. The packed texture carries roughness
//! in green and metalness in blue.

use glam::Vec2;
use kiln_assets::MetallicRoughness;

use crate::error::ShaderError;
use crate::graph::{ColorSpace, MathOp, NodeId, NodeKind, ShaderGraph, Socket, Value};
use crate::texture::add_texture_chain;

const LABEL: &str = "METALLIC ROUGHNESS";

pub(crate) const ROUGHNESS_CHANNEL: usize = 1;
pub(crate) const METALLIC_CHANNEL: usize = 2;

pub(crate) fn build(
    graph: &mut ShaderGraph,
    principled: NodeId,
    input: &MetallicRoughness,
) -> Result<(), ShaderError> {
    match input {
        MetallicRoughness::Factor {
            metallic,
            roughness,
        } => {
            graph.set_default(principled, Socket::Metallic, Value::Float(*metallic))?;
            graph.set_default(principled, Socket::Roughness, Value::Float(*roughness))
        }
        MetallicRoughness::FactorTexture {
            metallic,
            roughness,
            texture,
        } => {
            let image = add_texture_chain(
                graph,
                texture,
                LABEL,
                ColorSpace::NonColor,
                Vec2::new(-1000.0, 0.0),
            )?;
            let split = graph.add_node(NodeKind::SeparateRgb, Vec2::new(-500.0, 0.0));
            graph.link(image, Socket::Color, split, Socket::Image)?;

            let targets = [
                (METALLIC_CHANNEL, *metallic, Socket::Metallic, 100.0),
                (ROUGHNESS_CHANNEL, *roughness, Socket::Roughness, -100.0),
            ];
            for (channel, factor, socket, y) in targets {
                let math = graph.add_node(
                    NodeKind::Math { op: MathOp::Multiply },
                    Vec2::new(-250.0, y),
                );
                graph.link(split, Socket::CHANNELS[channel], math, Socket::A)?;
                graph.set_default(math, Socket::B, Value::Float(factor))?;
                graph.link(math, Socket::Value, principled, socket)?;
            }
            Ok(())
        }
        MetallicRoughness::Texture(texture) => {
            let image = add_texture_chain(
                graph,
                texture,
                LABEL,
                ColorSpace::NonColor,
                Vec2::new(-500.0, 0.0),
            )?;
            let split = graph.add_node(NodeKind::SeparateRgb, Vec2::new(-250.0, 0.0));
            graph.link(image, Socket::Color, split, Socket::Image)?;
            graph.link(split, Socket::CHANNELS[METALLIC_CHANNEL], principled, Socket::Metallic)?;
            graph.link(split, Socket::CHANNELS[ROUGHNESS_CHANNEL], principled, Socket::Roughness)
        }
    }
}
