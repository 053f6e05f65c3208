use kiln_assets::Attribute;

/// A single defect found in merged geometry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TopologyIssue {
    #[error("primitive {primitive} references vertex {index} but has {vertex_count} vertices")]
    IndexOutOfRange {
        primitive: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("face {face} repeats a vertex")]
    DegenerateFace { face: usize },

    #[error("edge {edge} connects a vertex to itself")]
    DegenerateEdge { edge: usize },

    #[error("vertex {vertex} has a non-finite position")]
    NonFinitePosition { vertex: usize },
}

/// Errors raised while merging a mesh or placing its attributes.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error(
        "mesh '{mesh}' has {} topology issue(s), first: {}",
        .issues.len(),
        .issues.first().map(ToString::to_string).unwrap_or_default()
    )]
    InvalidTopology {
        mesh: String,
        issues: Vec<TopologyIssue>,
    },

    #[error("primitive {primitive}: {attribute} has {found} elements, expected {expected}")]
    AttributeLength {
        primitive: usize,
        attribute: Attribute,
        expected: usize,
        found: usize,
    },

    #[error("primitive {primitive}: morph target {target} has {found} deltas, expected {expected}")]
    TargetLength {
        primitive: usize,
        target: usize,
        expected: usize,
        found: usize,
    },

    #[error("pass received {found} primitives but the mesh was merged from {expected}")]
    PrimitiveCountMismatch { expected: usize, found: usize },
}

/// Per-primitive problems a placement pass stepped over. The pass still
/// completes for every other primitive.
pub type Skipped = Vec<MeshError>;
