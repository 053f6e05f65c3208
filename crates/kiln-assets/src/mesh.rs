use std::collections::BTreeMap;
use std::fmt;

use glam::{Vec2, Vec3};

use crate::material::MaterialHandle;

/// The vertex attributes the importer understands, resolved once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    Position,
    Normal,
    TexCoord(u32),
    Color0,
}

impl Attribute {
    /// Map a glTF semantic onto a known attribute. Joints, weights, tangents
    /// and colour sets beyond the first are not imported.
    pub fn from_semantic(semantic: &gltf::Semantic) -> Option<Self> {
        match semantic {
            gltf::Semantic::Positions => Some(Self::Position),
            gltf::Semantic::Normals => Some(Self::Normal),
            gltf::Semantic::TexCoords(set) => Some(Self::TexCoord(*set)),
            gltf::Semantic::Colors(0) => Some(Self::Color0),
            _ => None,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position => f.write_str("POSITION"),
            Self::Normal => f.write_str("NORMAL"),
            Self::TexCoord(set) => write!(f, "TEXCOORD_{set}"),
            Self::Color0 => f.write_str("COLOR_0"),
        }
    }
}

/// A per-vertex position displacement of one primitive.
#[derive(Debug, Clone, Default)]
pub struct MorphTarget {
    /// Name of the target's position accessor, if the document gave one.
    pub name: Option<String>,
    /// Displacements in glTF space. Empty when the target moves no positions.
    pub position_deltas: Vec<Vec3>,
}

/// A single drawable piece of a mesh, with attributes in glTF space.
///
/// Faces and edges index into this primitive's own vertex arrays.
#[derive(Debug, Clone, Default)]
pub struct Primitive {
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub tex_coords: BTreeMap<u32, Vec<Vec2>>,
    pub color0: Option<Vec<[f32; 4]>>,
    pub faces: Vec<[u32; 3]>,
    pub edges: Vec<[u32; 2]>,
    pub targets: Vec<MorphTarget>,
    pub material: Option<MaterialHandle>,
}

impl Primitive {
    /// Create a primitive from positions and triangle faces.
    pub fn new(positions: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            faces,
            ..Default::default()
        }
    }

    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_tex_coords(mut self, set: u32, uvs: Vec<Vec2>) -> Self {
        self.tex_coords.insert(set, uvs);
        self
    }

    pub fn with_color0(mut self, colors: Vec<[f32; 4]>) -> Self {
        self.color0 = Some(colors);
        self
    }

    pub fn with_edges(mut self, edges: Vec<[u32; 2]>) -> Self {
        self.edges = edges;
        self
    }

    pub fn with_target(mut self, target: MorphTarget) -> Self {
        self.targets.push(target);
        self
    }

    pub fn with_material(mut self, material: MaterialHandle) -> Self {
        self.material = Some(material);
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }


    /// Number of elements stored for an attribute, or `None` when absent.
    pub fn attribute_len(&self, attribute: Attribute) -> Option<usize> {
        match attribute {
            Attribute::Position => Some(self.positions.len()),
            Attribute::Normal => self.normals.as_ref().map(Vec::len),
            Attribute::TexCoord(set) => self.tex_coords.get(&set).map(Vec::len),
            Attribute::Color0 => self.color0.as_ref().map(Vec::len),
        }
    }

    pub fn has(&self, attribute: Attribute) -> bool {
        self.attribute_len(attribute).is_some()
    }
}

/// A mesh as described by the document: an ordered list of primitives and
/// the default morph weights.
#[derive(Debug, Clone, Default)]
pub struct MeshAsset {
    pub name: String,
    pub primitives: Vec<Primitive>,
    pub weights: Vec<f32>,
}

impl MeshAsset {
    pub fn new(name: impl Into<String>, primitives: Vec<Primitive>) -> Self {
        Self {
            name: name.into(),
            primitives,
            weights: Vec::new(),
        }
    }

    pub fn with_weights(mut self, weights: Vec<f32>) -> Self {
        self.weights = weights;
        self
    }

    /// True iff at least one primitive carries `COLOR_0`.
    pub fn has_vertex_colors(&self) -> bool {
        self.primitives.iter().any(|p| p.has(Attribute::Color0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Primitive {
        Primitive::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 2]])
    }

    #[test]
    fn test_attribute_names() {
        assert_eq!(Attribute::Position.to_string(), "POSITION");
        assert_eq!(Attribute::TexCoord(1).to_string(), "TEXCOORD_1");
        assert_eq!(Attribute::Color0.to_string(), "COLOR_0");
    }

    #[test]
    fn test_semantic_resolution() {
        assert_eq!(
            Attribute::from_semantic(&gltf::Semantic::TexCoords(2)),
            Some(Attribute::TexCoord(2))
        );
        assert_eq!(Attribute::from_semantic(&gltf::Semantic::Colors(1)), None);
        assert_eq!(Attribute::from_semantic(&gltf::Semantic::Joints(0)), None);
    }

    #[test]
    fn test_primitive_attribute_lengths() {
        let prim = triangle()
            .with_tex_coords(1, vec![Vec2::ZERO; 3])
            .with_color0(vec![[1.0; 4]; 3]);
        assert!(prim.has(Attribute::Color0));
        assert_eq!(prim.face_count(), 1);
        assert_eq!(prim.attribute_len(Attribute::Normal), None);
        assert_eq!(prim.attribute_len(Attribute::TexCoord(1)), Some(3));
    }

    #[test]
    fn test_vertex_colors_on_any_primitive() {
        let mesh = MeshAsset::new(
            "pair",
            vec![triangle(), triangle().with_color0(vec![[1.0; 4]; 3])],
        );
        assert!(mesh.has_vertex_colors());
        assert!(!MeshAsset::new("empty", Vec::new()).has_vertex_colors());
    }
}
