use kiln_assets::{Document, MaterialHandle, MeshHandle};
use kiln_mesh::{MeshError, MeshObject, UvChannelBindings};
use kiln_shader::ShaderCompiler;
use tracing::{debug, info, warn};

use crate::error::ImportError;
use crate::options::ImportOptions;
use crate::scene::{MaterialId, MeshId, SceneBuilder, SceneMesh};

/// A primitive attribute that was left out of an imported mesh.
#[derive(Debug)]
pub struct AttributeWarning {
    pub mesh: String,
    pub error: MeshError,
}

/// A material slot left without a shader graph.
#[derive(Debug)]
pub struct MaterialFailure {
    pub mesh: String,
    pub material: MaterialHandle,
    pub error: ImportError,
}

/// Outcome of importing a document.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<(String, MeshId)>,
    /// Meshes with no primitives.
    pub empty: Vec<String>,
    pub failed_meshes: Vec<(String, ImportError)>,
    pub failed_materials: Vec<MaterialFailure>,
    pub warnings: Vec<AttributeWarning>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.failed_meshes.is_empty() && self.failed_materials.is_empty() && self.warnings.is_empty()
    }
}

/// Runs meshes through merge, attribute placement and shading, in that
/// order, writing results into a [`SceneBuilder`].
pub struct Importer<'a> {
    document: &'a Document,
    options: ImportOptions,
    compiler: ShaderCompiler,
}

impl<'a> Importer<'a> {
    pub fn new(document: &'a Document, options: ImportOptions) -> Self {
        Self {
            document,
            options,
            compiler: ShaderCompiler::new(options.compile_options()),
        }
    }

    /// Import every mesh of the document. A failing mesh is reported and
    /// the rest continue.
    pub fn import_all(&self, scene: &mut SceneBuilder) -> ImportReport {
        let mut report = ImportReport::default();

        for (handle, mesh) in self.document.meshes() {
            match self.import_mesh(scene, handle, &mut report) {
                Ok(Some(id)) => report.imported.push((mesh.name.clone(), id)),
                Ok(None) => report.empty.push(mesh.name.clone()),
                Err(e) => {
                    warn!("Mesh '{}' not imported: {}", mesh.name, e);
                    report.failed_meshes.push((mesh.name.clone(), e));
                }
            }
        }

        info!(
            "Imported {} meshes, {} materials ({} meshes failed, {} material slots failed, {} warnings)",
            report.imported.len(),
            scene.materials().len(),
            report.failed_meshes.len(),
            report.failed_materials.len(),
            report.warnings.len()
        );
        report
    }

    /// Import one mesh. Returns `Ok(None)` for a mesh without primitives.
    ///
    /// A merge failure adds nothing to the scene. Attribute and shading
    /// problems are recorded in `report` and the mesh is still added.
    pub fn import_mesh(
        &self,
        scene: &mut SceneBuilder,
        handle: MeshHandle,
        report: &mut ImportReport,
    ) -> Result<Option<MeshId>, ImportError> {
        let asset = self
            .document
            .mesh(handle)
            .ok_or(ImportError::NoSuchMesh(handle))?;
        let primitives = &asset.primitives;
        if primitives.is_empty() {
            debug!("Mesh '{}' has no primitives, skipping", asset.name);
            return Ok(None);
        }

        // Geometry.
        let mut object = MeshObject::from_primitives(asset.name.clone(), primitives)?;

        // Attributes.
        let mut skipped = Vec::new();
        if self.options.import_normals {
            skipped.extend(object.apply_normals(primitives)?);
        }
        skipped.extend(object.apply_uvs(primitives)?);
        let vertex_color = self.options.import_vertex_colors && asset.has_vertex_colors();
        if vertex_color {
            skipped.extend(object.apply_vertex_colors(primitives)?);
        }
        object.assign_materials(primitives)?;
        if self.options.import_shape_keys {
            skipped.extend(object.apply_shape_keys(primitives, &asset.weights)?);
        }
        report
            .warnings
            .extend(skipped.into_iter().map(|error| AttributeWarning {
                mesh: asset.name.clone(),
                error,
            }));

        // Shading.
        let mut slot_materials = vec![None; object.material_slots.len()];
        if self.options.import_shading {
            let bindings = object.uv_bindings();
            for (slot, &source) in object.material_slots.iter().enumerate() {
                match self.shade_slot(scene, source, vertex_color, &bindings) {
                    Ok(id) => slot_materials[slot] = Some(id),
                    Err(error) => {
                        warn!(
                            "Mesh '{}': material {} left unshaded: {}",
                            object.name, source, error
                        );
                        report.failed_materials.push(MaterialFailure {
                            mesh: object.name.clone(),
                            material: source,
                            error,
                        });
                    }
                }
            }
        }

        Ok(Some(scene.add_mesh(SceneMesh {
            object,
            slot_materials,
        })))
    }

    /// Compile, or reuse, the graph for one material slot and bind its
    /// texture coordinates to this mesh's UV layers.
    fn shade_slot(
        &self,
        scene: &mut SceneBuilder,
        source: MaterialHandle,
        vertex_color: bool,
        bindings: &UvChannelBindings,
    ) -> Result<MaterialId, ImportError> {
        if let Some(id) = scene.material_variant(source, vertex_color) {
            if let Some(material) = scene.material_mut(id) {
                material.graph.bind_uv_maps(bindings)?;
            }
            return Ok(id);
        }

        let material = self
            .document
            .material(source)
            .ok_or(ImportError::NoSuchMaterial(source))?;
        let mut graph = self.compiler.compile(material, vertex_color)?;
        graph.bind_uv_maps(bindings)?;
        Ok(scene.add_material(
            self.document,
            source,
            material.name.clone(),
            vertex_color,
            graph,
        ))
    }
}

/// Import a whole document into a fresh scene.
pub fn import_document(document: &Document, options: ImportOptions) -> (SceneBuilder, ImportReport) {
    let mut scene = SceneBuilder::new();
    let report = Importer::new(document, options).import_all(&mut scene);
    (scene, report)
}
