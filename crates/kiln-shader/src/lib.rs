//! Kiln Shader - Material to node graph compilation
//!
//! Turns a metallic-roughness material into a principled-BSDF node graph.
//! Base colour and metallic/roughness each compile to one of a fixed set of
//! sub-graph shapes picked by how the input is sourced and, for base colour,
//! whether the mesh carries vertex colours.
//!
//! Texture coordinate nodes are created unbound. Once the owning mesh's UV
//! layers exist, [`ShaderGraph::bind_uv_maps`] attaches the layer names.

mod base_color;
mod compiler;
mod error;
mod graph;
mod metallic;
mod texture;

pub use compiler::{CompileOptions, ShaderCompiler};
pub use error::ShaderError;
pub use graph::{
    BlendType, ColorSpace, ImageSlot, Link, MathOp, Node, NodeId, NodeKind, ShaderGraph, Socket,
    Value,
};
