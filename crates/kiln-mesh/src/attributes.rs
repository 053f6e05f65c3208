//! Placement of per-vertex attributes onto the merged mesh.

use glam::{Vec2, Vec3};
use kiln_assets::{Attribute, Primitive};
use kiln_core::{loc_gltf_to_host, uv_gltf_to_host};
use tracing::{debug, warn};

use crate::error::{MeshError, Skipped};
use crate::object::{ColorLayer, MeshObject, PrimitiveRange, UvLayer, COLOR_LAYER_NAME};

/// Length check shared by the passes: an attribute must have one element per
/// vertex of its primitive.
fn check_len(
    primitive: usize,
    attribute: Attribute,
    range: &PrimitiveRange,
    found: usize,
) -> Result<(), MeshError> {
    if found != range.vertex_count {
        return Err(MeshError::AttributeLength {
            primitive,
            attribute,
            expected: range.vertex_count,
            found,
        });
    }
    Ok(())
}

impl MeshObject {
    /// Write per-vertex normals. Vertices of primitives without normals keep
    /// a zero vector for the host to recompute.
    pub fn apply_normals(&mut self, primitives: &[Primitive]) -> Result<Skipped, MeshError> {
        self.check_primitives(primitives)?;
        let mut skipped = Vec::new();

        if !primitives.iter().any(|p| p.has(Attribute::Normal)) {
            return Ok(skipped);
        }

        let mut normals = vec![Vec3::ZERO; self.geometry.vertex_count()];
        for (index, (primitive, range)) in primitives.iter().zip(self.offsets.iter()).enumerate() {
            let Some(source) = &primitive.normals else {
                continue;
            };
            if let Err(e) = check_len(index, Attribute::Normal, range, source.len()) {
                warn!("Mesh '{}': skipping normals: {}", self.name, e);
                skipped.push(e);
                continue;
            }
            for (dst, &n) in normals[range.vertices()].iter_mut().zip(source) {
                *dst = loc_gltf_to_host(n);
            }
        }

        self.normals = Some(normals);
        Ok(skipped)
    }

    /// Create one UV layer per texture coordinate set and fill each
    /// primitive's face corners from its own coordinates.
    pub fn apply_uvs(&mut self, primitives: &[Primitive]) -> Result<Skipped, MeshError> {
        self.check_primitives(primitives)?;
        let mut skipped = Vec::new();

        let set_count = primitives
            .iter()
            .filter_map(|p| p.tex_coords.keys().next_back())
            .map(|&set| set + 1)
            .max()
            .unwrap_or(0);
        let loop_count = self.geometry.loop_count();

        self.uv_layers = (0..set_count)
            .map(|set| UvLayer {
                name: UvLayer::name_for_set(set),
                data: vec![Vec2::ZERO; loop_count],
            })
            .collect();

        for (index, (primitive, range)) in primitives.iter().zip(self.offsets.iter()).enumerate() {
            for (&set, uvs) in &primitive.tex_coords {
                if let Err(e) = check_len(index, Attribute::TexCoord(set), range, uvs.len()) {
                    warn!("Mesh '{}': skipping UVs: {}", self.name, e);
                    skipped.push(e);
                    continue;
                }
                let layer = &mut self.uv_layers[set as usize];
                for loop_index in range.loops() {
                    let vertex = self.geometry.loop_vertex(loop_index) as usize;
                    layer.data[loop_index] = uv_gltf_to_host(uvs[vertex - range.vertex_offset]);
                }
            }
        }

        debug!("Mesh '{}': {} UV layers", self.name, self.uv_layers.len());
        Ok(skipped)
    }

    /// Fill the `COLOR_0` layer. The layer is created by the first primitive
    /// carrying the attribute; later primitives write into the same layer.
    /// Face corners of primitives without colours stay white.
    pub fn apply_vertex_colors(&mut self, primitives: &[Primitive]) -> Result<Skipped, MeshError> {
        self.check_primitives(primitives)?;
        let mut skipped = Vec::new();
        let loop_count = self.geometry.loop_count();

        for (index, (primitive, range)) in primitives.iter().zip(self.offsets.iter()).enumerate() {
            let Some(colors) = &primitive.color0 else {
                continue;
            };
            let layer = self.color_layer.get_or_insert_with(|| ColorLayer {
                name: COLOR_LAYER_NAME.to_owned(),
                data: vec![[1.0; 3]; loop_count],
            });
            if let Err(e) = check_len(index, Attribute::Color0, range, colors.len()) {
                warn!("Mesh '{}': skipping vertex colors: {}", self.name, e);
                skipped.push(e);
                continue;
            }
            for loop_index in range.loops() {
                let vertex = self.geometry.loop_vertex(loop_index) as usize;
                let [r, g, b, _alpha] = colors[vertex - range.vertex_offset];
                // TODO: write alpha once the host colour layer can store it.
                layer.data[loop_index] = [r, g, b];
            }
        }

        Ok(skipped)
    }
}
