use std::collections::HashMap;

use kiln_assets::{Document, ImageHandle, MaterialHandle};
use kiln_mesh::MeshObject;
use kiln_shader::ShaderGraph;
use serde::Serialize;
use tracing::warn;

/// Index of a mesh in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MeshId(usize);

/// Index of a compiled material in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MaterialId(usize);

/// A shader graph compiled for one source material and one vertex colour
/// flag.
#[derive(Debug, Clone, Serialize)]
pub struct SceneMaterial {
    pub name: String,
    pub source: MaterialHandle,
    pub vertex_color: bool,
    pub graph: ShaderGraph,
    /// Images the graph samples that the document could not provide.
    pub broken_images: Vec<ImageHandle>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneMesh {
    pub object: MeshObject,
    /// Compiled material per slot of `object.material_slots`. `None` where
    /// shading was skipped or failed.
    pub slot_materials: Vec<Option<MaterialId>>,
}

/// The scene being built by an import. All additions go through here and
/// return identifiers; nothing is shared outside it.
#[derive(Debug, Default, Serialize)]
pub struct SceneBuilder {
    meshes: Vec<SceneMesh>,
    materials: Vec<SceneMaterial>,
    #[serde(skip)]
    variants: HashMap<(MaterialHandle, bool), MaterialId>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: SceneMesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    /// Hand a compiled graph to the scene. Image references are resolved
    /// against `document` here; unresolved ones stay in the graph as broken
    /// slots.
    pub fn add_material(
        &mut self,
        document: &Document,
        source: MaterialHandle,
        name: impl Into<String>,
        vertex_color: bool,
        mut graph: ShaderGraph,
    ) -> MaterialId {
        let name = name.into();
        let broken_images = graph.resolve_images(|image| document.is_image_loaded(image));
        for image in &broken_images {
            warn!("Material '{}': image {} is missing, left as a broken reference", name, image);
        }

        let id = MaterialId(self.materials.len());
        self.materials.push(SceneMaterial {
            name,
            source,
            vertex_color,
            graph,
            broken_images,
        });
        self.variants.insert((source, vertex_color), id);
        id
    }

    /// The material already compiled for this source and vertex colour flag.
    pub fn material_variant(&self, source: MaterialHandle, vertex_color: bool) -> Option<MaterialId> {
        self.variants.get(&(source, vertex_color)).copied()
    }

    pub fn mesh(&self, id: MeshId) -> Option<&SceneMesh> {
        self.meshes.get(id.0)
    }

    pub fn material(&self, id: MaterialId) -> Option<&SceneMaterial> {
        self.materials.get(id.0)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut SceneMaterial> {
        self.materials.get_mut(id.0)
    }

    pub fn meshes(&self) -> &[SceneMesh] {
        &self.meshes
    }

    pub fn materials(&self) -> &[SceneMaterial] {
        &self.materials
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_assets::{Handle, ImageAsset, ImageSource};
    use kiln_shader::{ColorSpace, ImageSlot, NodeKind};

    fn sampling(images: &[usize]) -> ShaderGraph {
        let mut graph = ShaderGraph::new();
        for &i in images {
            graph.add_node(
                NodeKind::ImageTexture {
                    image: ImageSlot::Linked(Handle::new(i)),
                    color_space: ColorSpace::Color,
                },
                glam::Vec2::ZERO,
            );
        }
        graph
    }

    #[test]
    fn test_missing_images_become_broken_slots() {
        let mut document = Document::new();
        document.insert_image(
            Handle::new(0),
            ImageAsset::new("albedo", ImageSource::Uri("albedo.png".into())),
        );

        let mut scene = SceneBuilder::new();
        let id = scene.add_material(&document, Handle::new(0), "m", false, sampling(&[0, 1]));
        let material = scene.material(id).unwrap();

        assert_eq!(material.broken_images, vec![Handle::new(1)]);
        let broken = material
            .graph
            .nodes()
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::ImageTexture { image: ImageSlot::Broken(_), .. }))
            .count();
        assert_eq!(broken, 1);
    }

    #[test]
    fn test_variants_are_keyed_by_vertex_color() {
        let document = Document::new();
        let mut scene = SceneBuilder::new();
        let plain = scene.add_material(&document, Handle::new(3), "m", false, ShaderGraph::new());

        assert_eq!(scene.material_variant(Handle::new(3), false), Some(plain));
        assert_eq!(scene.material_variant(Handle::new(3), true), None);
        assert_eq!(scene.material_variant(Handle::new(4), false), None);
    }
}
