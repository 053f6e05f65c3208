use glam::Vec2;
use kiln_assets::TextureRef;

use crate::error::ShaderError;
use crate::graph::{ColorSpace, ImageSlot, NodeId, NodeKind, ShaderGraph, Socket};

/// Horizontal gap between the stages of a texture chain.
const STAGE_SPACING: f32 = 500.0;

/// Add a texture coordinate -> mapping -> image sample chain with the image
/// node at `location`. Returns the image node.
///
/// The coordinate node only records the texture's set index; it is bound to
/// a named UV layer later.
pub(crate) fn add_texture_chain(
    graph: &mut ShaderGraph,
    texture: &TextureRef,
    label: &str,
    color_space: ColorSpace,
    location: Vec2,
) -> Result<NodeId, ShaderError> {
    let image = graph.add_node(
        NodeKind::ImageTexture {
            image: ImageSlot::Linked(texture.image),
            color_space,
        },
        location,
    );
    graph.set_label(image, label)?;

    let mapping = graph.add_node(NodeKind::Mapping, location - Vec2::new(STAGE_SPACING, 0.0));
    let uv = graph.add_node(
        NodeKind::UvMap {
            tex_coord: texture.tex_coord,
            uv_map: None,
        },
        location - Vec2::new(2.0 * STAGE_SPACING, 0.0),
    );

    graph.link(uv, Socket::Uv, mapping, Socket::Vector)?;
    graph.link(mapping, Socket::Vector, image, Socket::Vector)?;
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_assets::Handle;

    #[test]
    fn test_chain_runs_uv_through_mapping() {
        let mut graph = ShaderGraph::new();
        let texture = TextureRef::new(Handle::new(3)).with_tex_coord(1);
        let image = add_texture_chain(
            &mut graph,
            &texture,
            "BASE COLOR",
            ColorSpace::Color,
            Vec2::new(-500.0, 500.0),
        )
        .unwrap();

        let (mapping, _) = graph.source_of(image, Socket::Vector).unwrap();
        let (uv, _) = graph.source_of(mapping, Socket::Vector).unwrap();
        let uv = graph.node(uv).unwrap();
        assert_eq!(uv.kind, NodeKind::UvMap { tex_coord: 1, uv_map: None });
        assert!((uv.location.x - -1500.0).abs() < 1e-6);
        assert_eq!(graph.node(image).unwrap().label.as_deref(), Some("BASE COLOR"));
    }
}
