//! Kiln Assets - Read-only document model
//!
//! Provides the snapshot the importer works from: meshes split into
//! primitives with typed attributes and morph targets, metallic-roughness
//! materials classified by how each input is sourced, and the images those
//! materials reference. Documents are loaded from glTF 2.0 files.

mod document;
mod error;
mod gltf_loader;
mod handle;
mod image;
mod material;
mod mesh;

pub use document::Document;
pub use error::AssetError;
pub use gltf_loader::{load_gltf, load_gltf_slice};
pub use handle::Handle;
pub use image::{ImageAsset, ImageSource};
pub use material::{
    BaseColor, ImageHandle, MaterialAsset, MaterialHandle, MeshHandle, MetallicRoughness,
    PbrMode, TextureRef,
};
pub use mesh::{Attribute, MeshAsset, MorphTarget, Primitive};
