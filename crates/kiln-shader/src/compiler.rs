use glam::Vec2;
use kiln_assets::{BaseColor, MaterialAsset};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::base_color;
use crate::error::ShaderError;
use crate::graph::{NodeKind, ShaderGraph, Socket};
use crate::metallic;

/// Compiler settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Give constant-colour materials a flat viewport preview colour.
    pub viewport_color: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            viewport_color: true,
        }
    }
}

/// Builds shader graphs from metallic-roughness materials.
///
/// The result depends only on the material and whether the mesh using it
/// has a vertex colour layer. Compiling into an existing graph first clears
/// it down to its output node, so recompiling never accumulates nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShaderCompiler {
    options: CompileOptions,
}

impl ShaderCompiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn compile(
        &self,
        material: &MaterialAsset,
        vertex_color: bool,
    ) -> Result<ShaderGraph, ShaderError> {
        let mut graph = ShaderGraph::new();
        self.compile_into(&mut graph, material, vertex_color)?;
        Ok(graph)
    }

    pub fn compile_into(
        &self,
        graph: &mut ShaderGraph,
        material: &MaterialAsset,
        vertex_color: bool,
    ) -> Result<(), ShaderError> {
        graph.reset();

        let output = graph.output();
        let principled = graph.add_node(NodeKind::PrincipledBsdf, Vec2::ZERO);
        graph.link(principled, Socket::Bsdf, output, Socket::Surface)?;

        base_color::build(graph, principled, &material.base_color, vertex_color)?;
        metallic::build(graph, principled, &material.metallic_roughness)?;

        if let BaseColor::Factor(factor) = material.base_color {
            if self.options.viewport_color && !vertex_color {
                graph.set_viewport_color(factor.to_rgb());
            }
        }

        debug!(
            "Compiled material '{}' (base color: {}, metallic: {}, vertex color: {}): {} nodes, {} links",
            material.name,
            material.base_color.mode(),
            material.metallic_roughness.mode(),
            vertex_color,
            graph.nodes().len(),
            graph.links().len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ColorSpace, ImageSlot, Value};
    use crate::metallic::{METALLIC_CHANNEL, ROUGHNESS_CHANNEL};
    use kiln_assets::{Handle, MetallicRoughness, TextureRef};
    use kiln_core::Color;
    use kiln_mesh::UvChannelBindings;

    fn tex(image: usize) -> TextureRef {
        TextureRef::new(Handle::new(image))
    }

    fn material(base_color: BaseColor, metallic_roughness: MetallicRoughness) -> MaterialAsset {
        MaterialAsset::new("test", base_color, metallic_roughness)
    }

    fn factors(metallic: f32, roughness: f32) -> MetallicRoughness {
        MetallicRoughness::Factor {
            metallic,
            roughness,
        }
    }

    fn compile(material: &MaterialAsset, vertex_color: bool) -> ShaderGraph {
        ShaderCompiler::default().compile(material, vertex_color).unwrap()
    }

    fn float(value: Option<Value>) -> f32 {
        match value {
            Some(Value::Float(v)) => v,
            other => panic!("expected float, got: {:?}", other),
        }
    }

    #[test]
    fn test_factor_only_is_output_and_bsdf() {
        let red = Color::rgb(0.8, 0.2, 0.2);
        let graph = compile(&material(BaseColor::Factor(red), factors(0.0, 0.5)), false);

        assert_eq!(graph.nodes().len(), 2);
        let principled = graph.find("PrincipledBsdf").unwrap();
        assert_eq!(
            graph.source_of(graph.output(), Socket::Surface),
            Some((principled, Socket::Bsdf))
        );
        assert_eq!(
            graph.default_value(principled, Socket::BaseColor),
            Some(Value::Rgba([0.8, 0.2, 0.2, 1.0]))
        );
        assert!((float(graph.default_value(principled, Socket::Metallic)) - 0.0).abs() < 1e-6);
        assert!((float(graph.default_value(principled, Socket::Roughness)) - 0.5).abs() < 1e-6);
        assert_eq!(graph.viewport_color(), Some([0.8, 0.2, 0.2]));
    }

    #[test]
    fn test_viewport_color_can_be_disabled() {
        let compiler = ShaderCompiler::new(CompileOptions {
            viewport_color: false,
        });
        let graph = compiler
            .compile(&material(BaseColor::Factor(Color::BLACK), factors(1.0, 1.0)), false)
            .unwrap();
        assert_eq!(graph.viewport_color(), None);
    }

    #[test]
    fn test_factor_with_vertex_color_mixes() {
        let graph = compile(
            &material(BaseColor::Factor(Color::rgb(0.5, 0.5, 0.5)), factors(0.0, 1.0)),
            true,
        );
        let principled = graph.find("PrincipledBsdf").unwrap();
        let (mix, _) = graph.source_of(principled, Socket::BaseColor).unwrap();
        let (attribute, socket) = graph.source_of(mix, Socket::Color2).unwrap();

        assert_eq!(socket, Socket::Color);
        assert_eq!(
            graph.node(attribute).unwrap().kind,
            NodeKind::VertexColor {
                attribute: "COLOR_0".into()
            }
        );
        assert_eq!(graph.default_value(mix, Socket::Fac), Some(Value::Float(1.0)));
        assert_eq!(graph.viewport_color(), None);
    }

    #[test]
    fn test_texture_with_vertex_color_multiplies_per_channel() {
        let graph = compile(&material(BaseColor::Texture(tex(0)), factors(0.0, 1.0)), true);

        assert_eq!(graph.count("ImageTexture"), 1);
        assert_eq!(graph.count("VertexColor"), 1);
        assert_eq!(graph.count("Math"), 3);
        assert_eq!(graph.count("MixRgb"), 0);

        let principled = graph.find("PrincipledBsdf").unwrap();
        let (combine, _) = graph.source_of(principled, Socket::BaseColor).unwrap();
        assert_eq!(graph.node(combine).unwrap().kind, NodeKind::CombineRgb);
        for channel in Socket::CHANNELS {
            let (math, _) = graph.source_of(combine, channel).unwrap();
            assert_eq!(graph.node(math).unwrap().kind.type_name(), "Math");
            // Texture channel times vertex colour channel.
            assert_eq!(graph.source_of(math, Socket::A).map(|(_, s)| s), Some(channel));
            assert_eq!(graph.source_of(math, Socket::B).map(|(_, s)| s), Some(channel));
        }
    }

    #[test]
    fn test_texture_alone_links_straight_to_bsdf() {
        let graph = compile(&material(BaseColor::Texture(tex(0)), factors(0.0, 1.0)), false);
        let principled = graph.find("PrincipledBsdf").unwrap();
        let (image, socket) = graph.source_of(principled, Socket::BaseColor).unwrap();
        assert_eq!(socket, Socket::Color);
        assert!(matches!(
            graph.node(image).unwrap().kind,
            NodeKind::ImageTexture {
                image: ImageSlot::Linked(_),
                color_space: ColorSpace::Color
            }
        ));
    }

    #[test]
    fn test_factor_texture_scales_each_channel() {
        let base = BaseColor::FactorTexture {
            factor: Color::rgb(0.1, 0.2, 0.3),
            texture: tex(0),
        };
        let graph = compile(&material(base, factors(0.0, 1.0)), false);
        let principled = graph.find("PrincipledBsdf").unwrap();
        let (combine, _) = graph.source_of(principled, Socket::BaseColor).unwrap();

        let expected = [0.1, 0.2, 0.3];
        for (channel, socket) in Socket::CHANNELS.into_iter().enumerate() {
            let (math, _) = graph.source_of(combine, socket).unwrap();
            let factor = float(graph.default_value(math, Socket::B));
            assert!((factor - expected[channel]).abs() < 1e-6);
        }
        assert_eq!(graph.count("VertexColor"), 0);
    }

    #[test]
    fn test_factor_texture_with_vertex_color_adds_second_stage() {
        let base = BaseColor::FactorTexture {
            factor: Color::rgb(0.1, 0.2, 0.3),
            texture: tex(0),
        };
        let graph = compile(&material(base, factors(0.0, 1.0)), true);
        assert_eq!(graph.count("Math"), 6);
        assert_eq!(graph.count("SeparateRgb"), 2);
        assert_eq!(graph.count("VertexColor"), 1);
    }

    #[test]
    fn test_metallic_texture_uses_blue_and_green() {
        assert_eq!(Socket::CHANNELS[METALLIC_CHANNEL], Socket::Blue);
        assert_eq!(Socket::CHANNELS[ROUGHNESS_CHANNEL], Socket::Green);

        let graph = compile(
            &material(BaseColor::default(), MetallicRoughness::Texture(tex(1))),
            false,
        );
        let principled = graph.find("PrincipledBsdf").unwrap();
        let (split, metal) = graph.source_of(principled, Socket::Metallic).unwrap();
        let (same, rough) = graph.source_of(principled, Socket::Roughness).unwrap();
        assert_eq!(split, same);
        assert_eq!(metal, Socket::Blue);
        assert_eq!(rough, Socket::Green);

        let (image, _) = graph.source_of(split, Socket::Image).unwrap();
        let image = graph.node(image).unwrap();
        assert_eq!(image.label.as_deref(), Some("METALLIC ROUGHNESS"));
        assert!(matches!(
            image.kind,
            NodeKind::ImageTexture {
                color_space: ColorSpace::NonColor,
                ..
            }
        ));
    }

    #[test]
    fn test_metallic_factor_texture_multiplies() {
        let input = MetallicRoughness::FactorTexture {
            metallic: 0.5,
            roughness: 0.25,
            texture: tex(1),
        };
        let graph = compile(&material(BaseColor::default(), input), false);
        let principled = graph.find("PrincipledBsdf").unwrap();

        let (math, _) = graph.source_of(principled, Socket::Metallic).unwrap();
        assert_eq!(graph.source_of(math, Socket::A).map(|(_, s)| s), Some(Socket::Blue));
        assert!((float(graph.default_value(math, Socket::B)) - 0.5).abs() < 1e-6);

        let (math, _) = graph.source_of(principled, Socket::Roughness).unwrap();
        assert_eq!(graph.source_of(math, Socket::A).map(|(_, s)| s), Some(Socket::Green));
        assert!((float(graph.default_value(math, Socket::B)) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_recompiling_is_idempotent() {
        let compiler = ShaderCompiler::default();
        let textured = material(
            BaseColor::FactorTexture {
                factor: Color::rgb(0.5, 0.5, 0.5),
                texture: tex(0),
            },
            MetallicRoughness::Texture(tex(1)),
        );

        let once = compiler.compile(&textured, true).unwrap();
        let mut twice = once.clone();
        compiler.compile_into(&mut twice, &textured, true).unwrap();
        assert_eq!(once, twice);
        assert!(once.is_isomorphic(&twice));

        // A different material replaces everything.
        let plain = material(BaseColor::Factor(Color::WHITE), factors(0.0, 1.0));
        compiler.compile_into(&mut twice, &plain, false).unwrap();
        assert_eq!(twice.nodes().len(), 2);
    }

    #[test]
    fn test_vertex_color_changes_the_graph() {
        let textured = material(BaseColor::Texture(tex(0)), factors(0.0, 1.0));
        assert!(!compile(&textured, false).is_isomorphic(&compile(&textured, true)));
    }

    #[test]
    fn test_missing_uv_set_fails_binding() {
        let graph_material = material(
            BaseColor::Texture(tex(0).with_tex_coord(1)),
            factors(0.0, 1.0),
        );
        let mut graph = compile(&graph_material, false);
        let bindings = UvChannelBindings::new(vec!["UVMap".into()]);
        assert!(matches!(
            graph.bind_uv_maps(&bindings),
            Err(ShaderError::MissingUvChannel {
                channel: 1,
                available: 1
            })
        ));
    }

    #[test]
    fn test_uv_nodes_stay_unbound_until_binding() {
        let mut graph = compile(
            &material(BaseColor::Texture(tex(0)), MetallicRoughness::Texture(tex(1))),
            false,
        );
        let unbound = |g: &ShaderGraph| {
            g.nodes()
                .iter()
                .filter(|n| matches!(n.kind, NodeKind::UvMap { uv_map: None, .. }))
                .count()
        };
        assert_eq!(unbound(&graph), 2);
        graph
            .bind_uv_maps(&UvChannelBindings::new(vec!["UVMap".into()]))
            .unwrap();
        assert_eq!(unbound(&graph), 0);
    }
}
