use kiln_assets::Primitive;
use kiln_core::loc_gltf_to_host;
use tracing::{debug, warn};

use crate::error::{MeshError, Skipped};
use crate::object::{MeshObject, ShapeKey};

const BASIS_NAME: &str = "Basis";

impl MeshObject {
    /// Build shape channels from morph targets.
    ///
    /// Target index `i` of every primitive contributes to channel `i`; a
    /// primitive without that target leaves its vertices at the base shape.
    /// Weights come from `weights` by index, names from the first
    /// primitive's targets.
    pub fn apply_shape_keys(
        &mut self,
        primitives: &[Primitive],
        weights: &[f32],
    ) -> Result<Skipped, MeshError> {
        self.check_primitives(primitives)?;
        let mut skipped = Vec::new();
        self.shape_keys.clear();

        let target_count = primitives.iter().map(|p| p.targets.len()).max().unwrap_or(0);
        if target_count == 0 {
            return Ok(skipped);
        }

        let base = &self.geometry.positions;
        self.shape_keys.push(ShapeKey {
            name: BASIS_NAME.to_owned(),
            weight: 0.0,
            positions: base.clone(),
        });

        for target_index in 0..target_count {
            let mut positions = base.clone();

            for (index, (primitive, range)) in primitives.iter().zip(self.offsets.iter()).enumerate() {
                let Some(target) = primitive.targets.get(target_index) else {
                    continue;
                };
                if target.position_deltas.is_empty() {
                    continue;
                }
                if target.position_deltas.len() != range.vertex_count {
                    let e = MeshError::TargetLength {
                        primitive: index,
                        target: target_index,
                        expected: range.vertex_count,
                        found: target.position_deltas.len(),
                    };
                    warn!("Mesh '{}': skipping morph target: {}", self.name, e);
                    skipped.push(e);
                    continue;
                }
                for (vertex, &delta) in range.vertices().zip(&target.position_deltas) {
                    positions[vertex] = base[vertex] + loc_gltf_to_host(delta);
                }
            }

            self.shape_keys.push(ShapeKey {
                name: format!("target_{target_index}"),
                weight: 0.0,
                positions,
            });
        }

        // Metadata goes on once every channel exists.
        let first = primitives.first();
        for (target_index, key) in self.shape_keys.iter_mut().skip(1).enumerate() {
            if let Some(&weight) = weights.get(target_index) {
                key.weight = weight;
            }
            let name = first
                .and_then(|p| p.targets.get(target_index))
                .and_then(|t| t.name.as_ref());
            if let Some(name) = name {
                key.name = name.clone();
            }
        }

        debug!(
            "Mesh '{}': {} shape keys plus basis",
            self.name, target_count
        );
        Ok(skipped)
    }
}
