use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::AssetError;
use crate::gltf_loader;
use crate::handle::Handle;
use crate::image::ImageAsset;
use crate::material::{ImageHandle, MaterialAsset, MaterialHandle, MeshHandle};
use crate::mesh::MeshAsset;

/// Read-only snapshot of an imported document. Meshes and materials are
/// dense tables; images are only present when their bytes are reachable, so
/// a texture may reference an image handle that does not resolve.
#[derive(Debug, Default)]
pub struct Document {
    source_path: Option<PathBuf>,
    meshes: Vec<MeshAsset>,
    materials: Vec<MaterialAsset>,
    images: HashMap<ImageHandle, ImageAsset>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a `.gltf` or `.glb` file.
    pub fn open(path: &Path) -> Result<Self, AssetError> {
        if !path.exists() {
            return Err(AssetError::NotFound(path.to_path_buf()));
        }

        let mut document = gltf_loader::load_gltf(path)?;
        document.source_path = Some(path.to_path_buf());
        info!(
            "Opened '{}': {} meshes, {} materials, {} images",
            path.display(),
            document.meshes.len(),
            document.materials.len(),
            document.images.len()
        );
        Ok(document)
    }

    /// Load a document from memory. Relative image URIs resolve against
    /// `base` and are treated as missing without one.
    pub fn from_slice(bytes: &[u8], base: Option<&Path>) -> Result<Self, AssetError> {
        gltf_loader::load_gltf_slice(bytes, base)
    }

    pub fn add_mesh(&mut self, mesh: MeshAsset) -> MeshHandle {
        self.meshes.push(mesh);
        Handle::new(self.meshes.len() - 1)
    }

    pub fn add_material(&mut self, material: MaterialAsset) -> MaterialHandle {
        self.materials.push(material);
        Handle::new(self.materials.len() - 1)
    }

    /// Register an image under the handle textures use to reference it.
    pub fn insert_image(&mut self, handle: ImageHandle, image: ImageAsset) {
        self.images.insert(handle, image);
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&MeshAsset> {
        self.meshes.get(handle.index())
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&MaterialAsset> {
        self.materials.get(handle.index())
    }

    pub fn image(&self, handle: ImageHandle) -> Option<&ImageAsset> {
        self.images.get(&handle)
    }

    /// Check if an image handle refers to reachable image bytes.
    pub fn is_image_loaded(&self, handle: ImageHandle) -> bool {
        self.images.contains_key(&handle)
    }

    /// All meshes with their handles, in document order.
    pub fn meshes(&self) -> impl Iterator<Item = (MeshHandle, &MeshAsset)> {
        self.meshes
            .iter()
            .enumerate()
            .map(|(i, mesh)| (Handle::new(i), mesh))
    }

    /// All materials with their handles, in document order.
    pub fn materials(&self) -> impl Iterator<Item = (MaterialHandle, &MaterialAsset)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, material)| (Handle::new(i), material))
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// The file this document was opened from, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
}
