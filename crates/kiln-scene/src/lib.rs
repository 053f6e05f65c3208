//! Kiln Scene - Import orchestration
//!
//! Owns the scene being built and runs each mesh through the three import
//! phases: geometry merge, attribute placement, then shader compilation
//! against the placed UV layers.

mod error;
mod import;
mod options;
mod scene;

pub use error::ImportError;
pub use import::{import_document, AttributeWarning, ImportReport, Importer, MaterialFailure};
pub use options::ImportOptions;
pub use scene::{MaterialId, MeshId, SceneBuilder, SceneMaterial, SceneMesh};
