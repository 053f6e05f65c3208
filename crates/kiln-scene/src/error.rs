use kiln_assets::{AssetError, MaterialHandle, MeshHandle};
use kiln_mesh::MeshError;
use kiln_shader::ShaderError;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("mesh {0} does not exist in the document")]
    NoSuchMesh(MeshHandle),

    #[error("material {0} does not exist in the document")]
    NoSuchMaterial(MaterialHandle),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Shader(#[from] ShaderError),
}
