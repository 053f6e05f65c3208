use std::collections::BTreeMap;
use std::path::Path;

use glam::{Vec2, Vec3};
use gltf::mesh::Mode;
use kiln_core::Color;
use tracing::{debug, warn};

use crate::document::Document;
use crate::error::AssetError;
use crate::handle::Handle;
use crate::image::{ImageAsset, ImageSource};
use crate::material::{BaseColor, MaterialAsset, MetallicRoughness, TextureRef};
use crate::mesh::{Attribute, MeshAsset, MorphTarget, Primitive};

/// Load a glTF 2.0 file (.gltf or .glb) into a document snapshot.
///
/// Buffers are loaded, images are not decoded. An image whose file cannot be
/// found is left out of the document so textures referencing it resolve as
/// broken.
pub fn load_gltf(path: &Path) -> Result<Document, AssetError> {
    let gltf = gltf::Gltf::open(path)
        .map_err(|e| AssetError::GltfLoadFailed(path.to_path_buf(), e.to_string()))?;
    read_document(gltf, path.parent(), path)
}

/// Load a glTF document held in memory.
pub fn load_gltf_slice(bytes: &[u8], base: Option<&Path>) -> Result<Document, AssetError> {
    let origin = Path::new("<memory>");
    let gltf = gltf::Gltf::from_slice(bytes)
        .map_err(|e| AssetError::GltfLoadFailed(origin.to_path_buf(), e.to_string()))?;
    read_document(gltf, base, origin)
}

fn read_document(
    gltf: gltf::Gltf,
    base: Option<&Path>,
    origin: &Path,
) -> Result<Document, AssetError> {
    let gltf::Gltf { document, blob } = gltf;
    let buffers = gltf::import_buffers(&document, base, blob)
        .map_err(|e| AssetError::BufferLoadFailed(origin.to_path_buf(), e.to_string()))?;

    let mut doc = Document::new();

    for image in document.images() {
        match read_image(&image, base) {
            Some(asset) => doc.insert_image(Handle::new(image.index()), asset),
            None => warn!(
                "Image {} of '{}' is not reachable, textures using it will be broken",
                image.index(),
                origin.display()
            ),
        }
    }

    // Pushed in document order so material handles match glTF indices.
    for material in document.materials() {
        doc.add_material(read_material(&material));
    }

    for mesh in document.meshes() {
        let asset = read_mesh(&mesh, &buffers);
        debug!(
            "Loaded mesh '{}' with {} primitives",
            asset.name,
            asset.primitives.len()
        );
        doc.add_mesh(asset);
    }

    Ok(doc)
}

fn read_image(image: &gltf::Image<'_>, base: Option<&Path>) -> Option<ImageAsset> {
    let name = image
        .name()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Image_{}", image.index()));

    match image.source() {
        gltf::image::Source::View { view, mime_type } => Some(ImageAsset::new(
            name,
            ImageSource::BufferView {
                view: view.index(),
                mime_type: mime_type.to_owned(),
            },
        )),
        gltf::image::Source::Uri { uri, .. } => {
            let reachable =
                uri.starts_with("data:") || base.is_some_and(|dir| dir.join(uri).exists());
            reachable.then(|| ImageAsset::new(name, ImageSource::Uri(uri.to_owned())))
        }
    }
}

fn texture_ref(info: &gltf::texture::Info<'_>) -> TextureRef {
    TextureRef::new(Handle::new(info.texture().source().index())).with_tex_coord(info.tex_coord())
}

fn read_material(material: &gltf::Material<'_>) -> MaterialAsset {
    let name = material.name().map(str::to_owned).unwrap_or_else(|| {
        format!("Material_{}", material.index().unwrap_or_default())
    });
    let pbr = material.pbr_metallic_roughness();

    let base_color = BaseColor::classify(
        Color::from_array(pbr.base_color_factor()),
        pbr.base_color_texture().as_ref().map(texture_ref),
    );
    let metallic_roughness = MetallicRoughness::classify(
        pbr.metallic_factor(),
        pbr.roughness_factor(),
        pbr.metallic_roughness_texture().as_ref().map(texture_ref),
    );

    MaterialAsset::new(name, base_color, metallic_roughness)
}

fn read_mesh(mesh: &gltf::Mesh<'_>, buffers: &[gltf::buffer::Data]) -> MeshAsset {
    let name = mesh
        .name()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Mesh_{}", mesh.index()));

    let primitives = mesh
        .primitives()
        .map(|primitive| read_primitive(&name, &primitive, buffers))
        .collect();

    let weights = mesh.weights().map(<[f32]>::to_vec).unwrap_or_default();

    MeshAsset {
        name,
        primitives,
        weights,
    }
}

fn read_primitive(
    mesh_name: &str,
    primitive: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
) -> Primitive {
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    // Validation guarantees a POSITION accessor, but one without a buffer
    // view has no data to read.
    let positions: Vec<Vec3> = match reader.read_positions() {
        Some(iter) => iter.map(Vec3::from).collect(),
        None => {
            warn!(
                "Mesh '{}': primitive {} has no readable positions",
                mesh_name,
                primitive.index()
            );
            Vec::new()
        }
    };

    let normals: Option<Vec<Vec3>> = reader
        .read_normals()
        .map(|iter| iter.map(Vec3::from).collect());

    let mut tex_coords = BTreeMap::new();
    for (semantic, _) in primitive.attributes() {
        match Attribute::from_semantic(&semantic) {
            Some(Attribute::TexCoord(set)) => {
                if let Some(uvs) = reader.read_tex_coords(set) {
                    tex_coords.insert(set, uvs.into_f32().map(Vec2::from).collect());
                }
            }
            Some(_) => {}
            None => debug!("Mesh '{}': skipping attribute {:?}", mesh_name, semantic),
        }
    }

    let color0: Option<Vec<[f32; 4]>> = reader
        .read_colors(0)
        .map(|c| c.into_rgba_f32().collect());

    let indices: Vec<u32> = reader
        .read_indices()
        .map(|idx| idx.into_u32().collect())
        .unwrap_or_else(|| (0..positions.len() as u32).collect());

    let (faces, edges) = assemble_topology(primitive.mode(), &indices);

    let target_names = primitive
        .morph_targets()
        .map(|target| target.positions().and_then(|a| a.name().map(str::to_owned)));
    let targets = reader
        .read_morph_targets()
        .zip(target_names)
        .map(|((positions, _normals, _tangents), name)| MorphTarget {
            name,
            position_deltas: positions
                .map(|iter| iter.map(Vec3::from).collect())
                .unwrap_or_default(),
        })
        .collect();

    Primitive {
        positions,
        normals,
        tex_coords,
        color0,
        faces,
        edges,
        targets,
        material: primitive.material().index().map(Handle::new),
    }
}

/// Expand an index list into triangle faces and edges according to the
/// primitive's drawing mode. Strips keep the winding of their first triangle.
fn assemble_topology(mode: Mode, indices: &[u32]) -> (Vec<[u32; 3]>, Vec<[u32; 2]>) {
    let mut faces = Vec::new();
    let mut edges = Vec::new();

    match mode {
        Mode::Points => {}
        Mode::Lines => {
            edges.extend(indices.chunks_exact(2).map(|e| [e[0], e[1]]));
        }
        Mode::LineStrip => {
            edges.extend(indices.windows(2).map(|e| [e[0], e[1]]));
        }
        Mode::LineLoop => {
            edges.extend(indices.windows(2).map(|e| [e[0], e[1]]));
            if let (Some(&first), Some(&last)) = (indices.first(), indices.last()) {
                if indices.len() > 2 {
                    edges.push([last, first]);
                }
            }
        }
        Mode::Triangles => {
            faces.extend(indices.chunks_exact(3).map(|f| [f[0], f[1], f[2]]));
        }
        Mode::TriangleStrip => {
            for (i, w) in indices.windows(3).enumerate() {
                if i % 2 == 0 {
                    faces.push([w[0], w[1], w[2]]);
                } else {
                    faces.push([w[0], w[2], w[1]]);
                }
            }
        }
        Mode::TriangleFan => {
            if let Some((&hub, rest)) = indices.split_first() {
                faces.extend(rest.windows(2).map(|w| [hub, w[0], w[1]]));
            }
        }
    }

    (faces, edges)
}
