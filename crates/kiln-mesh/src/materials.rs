use kiln_assets::Primitive;

use crate::error::MeshError;
use crate::object::MeshObject;

impl MeshObject {
    /// Assign each primitive's material to its face range. Slots are
    /// deduplicated by material identity and keep first-use order.
    pub fn assign_materials(&mut self, primitives: &[Primitive]) -> Result<(), MeshError> {
        self.check_primitives(primitives)?;
        self.material_slots.clear();
        self.face_materials = vec![None; self.geometry.face_count()];

        for (primitive, range) in primitives.iter().zip(self.offsets.iter()) {
            let Some(material) = primitive.material else {
                continue;
            };
            let slot = match self.material_slots.iter().position(|&m| m == material) {
                Some(slot) => slot,
                None => {
                    self.material_slots.push(material);
                    self.material_slots.len() - 1
                }
            };
            self.face_materials[range.faces()].fill(Some(slot));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use kiln_assets::Handle;

    fn quad() -> Primitive {
        Primitive::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)],
            vec![[0, 1, 2], [2, 1, 3]],
        )
    }

    #[test]
    fn test_shared_material_uses_one_slot() {
        let primitives = vec![
            quad().with_material(Handle::new(7)),
            quad(),
            quad().with_material(Handle::new(2)),
            quad().with_material(Handle::new(7)),
        ];
        let mut mesh = MeshObject::from_primitives("m", &primitives).unwrap();
        mesh.assign_materials(&primitives).unwrap();

        assert_eq!(mesh.material_slots, vec![Handle::new(7), Handle::new(2)]);
        assert_eq!(
            mesh.face_materials,
            vec![
                Some(0),
                Some(0),
                None,
                None,
                Some(1),
                Some(1),
                Some(0),
                Some(0)
            ]
        );
    }

    #[test]
    fn test_reassigning_is_stable() {
        let primitives = vec![quad().with_material(Handle::new(1))];
        let mut mesh = MeshObject::from_primitives("m", &primitives).unwrap();
        mesh.assign_materials(&primitives).unwrap();
        mesh.assign_materials(&primitives).unwrap();
        assert_eq!(mesh.material_slots.len(), 1);
    }
}
