use std::ops::Range;

use glam::{Vec2, Vec3};
use kiln_assets::MaterialHandle;
use serde::Serialize;

/// Name of the merged vertex colour layer, after the source attribute.
pub const COLOR_LAYER_NAME: &str = "COLOR_0";

/// Flat geometry of a merged mesh in host space. Every face is a triangle
/// and owns three consecutive face corners ("loops").
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergedGeometry {
    pub positions: Vec<Vec3>,
    pub edges: Vec<[u32; 2]>,
    pub faces: Vec<[u32; 3]>,
}

impl MergedGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn loop_count(&self) -> usize {
        self.faces.len() * 3
    }

    /// Vertex referenced by a face corner.
    pub fn loop_vertex(&self, loop_index: usize) -> u32 {
        self.faces[loop_index / 3][loop_index % 3]
    }
}

/// Where one primitive's vertices, faces and edges sit in the merged arrays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrimitiveRange {
    pub vertex_offset: usize,
    pub vertex_count: usize,
    pub face_offset: usize,
    pub face_count: usize,
    pub edge_offset: usize,
    pub edge_count: usize,
}

impl PrimitiveRange {
    pub fn vertices(&self) -> Range<usize> {
        self.vertex_offset..self.vertex_offset + self.vertex_count
    }

    pub fn faces(&self) -> Range<usize> {
        self.face_offset..self.face_offset + self.face_count
    }

    pub fn edges(&self) -> Range<usize> {
        self.edge_offset..self.edge_offset + self.edge_count
    }

    pub fn loops(&self) -> Range<usize> {
        self.face_offset * 3..(self.face_offset + self.face_count) * 3
    }
}

/// Per-primitive ranges in input order. Offsets are exclusive prefix sums
/// of the counts of earlier primitives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OffsetTable {
    ranges: Vec<PrimitiveRange>,
}

impl OffsetTable {
    pub(crate) fn push(&mut self, range: PrimitiveRange) {
        self.ranges.push(range);
    }

    pub fn get(&self, primitive: usize) -> Option<&PrimitiveRange> {
        self.ranges.get(primitive)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PrimitiveRange> {
        self.ranges.iter()
    }

    /// Vertex offset of every primitive.
    pub fn vertex_offsets(&self) -> Vec<usize> {
        self.ranges.iter().map(|r| r.vertex_offset).collect()
    }
}

/// A per-face-corner UV layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UvLayer {
    pub name: String,
    pub data: Vec<Vec2>,
}

impl UvLayer {
    /// Host layer name for a texture coordinate set: `UVMap`, `UVMap.001`, ...
    pub fn name_for_set(set: u32) -> String {
        if set == 0 {
            "UVMap".to_owned()
        } else {
            format!("UVMap.{set:03}")
        }
    }
}

/// The single per-face-corner colour layer. RGB only: the source alpha is
/// not carried over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorLayer {
    pub name: String,
    pub data: Vec<[f32; 3]>,
}

/// One shape channel: absolute host-space positions for every vertex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeKey {
    pub name: String,
    pub weight: f32,
    pub positions: Vec<Vec3>,
}

/// Maps texture coordinate sets to the UV layer names of one mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UvChannelBindings {
    layers: Vec<String>,
}

impl UvChannelBindings {
    pub fn new(layers: Vec<String>) -> Self {
        Self { layers }
    }

    /// Layer name for a texture coordinate set, if the mesh has it.
    pub fn resolve(&self, set: u32) -> Option<&str> {
        self.layers.get(set as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// A merged mesh as handed to the host scene.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MeshObject {
    pub name: String,
    pub geometry: MergedGeometry,
    pub offsets: OffsetTable,
    pub normals: Option<Vec<Vec3>>,
    pub uv_layers: Vec<UvLayer>,
    pub color_layer: Option<ColorLayer>,
    /// Distinct materials in first-use order.
    pub material_slots: Vec<MaterialHandle>,
    /// Slot index per face; `None` for faces of primitives without a material.
    pub face_materials: Vec<Option<usize>>,
    /// Empty, or the `Basis` channel followed by one channel per target index.
    pub shape_keys: Vec<ShapeKey>,
}

impl MeshObject {
    /// The UV channel bindings shader graphs resolve their texture
    /// coordinate sets against. Only complete after the UV pass.
    pub fn uv_bindings(&self) -> UvChannelBindings {
        UvChannelBindings::new(self.uv_layers.iter().map(|l| l.name.clone()).collect())
    }

    pub fn has_vertex_colors(&self) -> bool {
        self.color_layer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uv_layer_names() {
        assert_eq!(UvLayer::name_for_set(0), "UVMap");
        assert_eq!(UvLayer::name_for_set(1), "UVMap.001");
        assert_eq!(UvLayer::name_for_set(12), "UVMap.012");
    }

    #[test]
    fn test_range_accessors() {
        let range = PrimitiveRange {
            vertex_offset: 4,
            vertex_count: 6,
            face_offset: 2,
            face_count: 3,
            edge_offset: 0,
            edge_count: 0,
        };
        assert_eq!(range.vertices(), 4..10);
        assert_eq!(range.faces(), 2..5);
        assert_eq!(range.loops(), 6..15);
        assert!(range.edges().is_empty());
    }

    #[test]
    fn test_bindings_resolve_by_set() {
        let bindings = UvChannelBindings::new(vec!["UVMap".into(), "UVMap.001".into()]);
        assert_eq!(bindings.resolve(1), Some("UVMap.001"));
        assert_eq!(bindings.resolve(2), None);
        assert_eq!(bindings.len(), 2);
    }

    #[test]
    fn test_loop_vertex_walks_face_corners() {
        let geometry = MergedGeometry {
            positions: vec![Vec3::ZERO; 4],
            edges: Vec::new(),
            faces: vec![[0, 1, 2], [2, 1, 3]],
        };
        assert_eq!(geometry.loop_count(), 6);
        assert_eq!(geometry.loop_vertex(3), 2);
        assert_eq!(geometry.loop_vertex(5), 3);
    }
}
