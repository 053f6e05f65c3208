//! Kiln Mesh - Multi-primitive mesh merging
//!
//! Merges the primitives of one mesh into a single indexed geometry and
//! records where each primitive landed. Every later pass (normals, UV
//! layers, the vertex colour layer, material slots, shape keys) addresses
//! its primitive's slice through that offset table.
//!
//! Passes run in a fixed order: [`MeshObject::from_primitives`] first, then
//! the placement passes, and only then may shader graphs resolve their UV
//! channels through [`MeshObject::uv_bindings`].

mod attributes;
mod error;
mod materials;
mod merge;
mod morph;
mod object;
mod validate;

pub use error::{MeshError, Skipped, TopologyIssue};
pub use merge::merge_primitives;
pub use object::{
    ColorLayer, MergedGeometry, MeshObject, OffsetTable, PrimitiveRange, ShapeKey,
    UvChannelBindings, UvLayer, COLOR_LAYER_NAME,
};
pub use validate::validate;
