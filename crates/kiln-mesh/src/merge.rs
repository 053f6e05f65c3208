use kiln_assets::Primitive;
use kiln_core::loc_gltf_to_host;
use tracing::debug;

use crate::error::{MeshError, TopologyIssue};
use crate::object::{MergedGeometry, MeshObject, OffsetTable, PrimitiveRange};
use crate::validate::validate;

/// Concatenate primitives into one geometry, in input order.
///
/// Face and edge indices are shifted by the owning primitive's vertex
/// offset and positions are converted to host space. The result is
/// validated after assembly; any defect fails the whole merge.
pub fn merge_primitives(
    name: &str,
    primitives: &[Primitive],
) -> Result<(MergedGeometry, OffsetTable), MeshError> {
    let mut geometry = MergedGeometry::default();
    let mut offsets = OffsetTable::default();
    let mut issues = Vec::new();

    for (index, primitive) in primitives.iter().enumerate() {
        let range = PrimitiveRange {
            vertex_offset: geometry.positions.len(),
            vertex_count: primitive.vertex_count(),
            face_offset: geometry.faces.len(),
            face_count: primitive.face_count(),
            edge_offset: geometry.edges.len(),
            edge_count: primitive.edges.len(),
        };

        // Local indices are checked before shifting; after the shift an
        // overflowing index would land silently in the next primitive.
        let out_of_range = primitive
            .faces
            .iter()
            .flatten()
            .chain(primitive.edges.iter().flatten())
            .filter(|&&i| i as usize >= range.vertex_count);
        let before = issues.len();
        for &i in out_of_range {
            issues.push(TopologyIssue::IndexOutOfRange {
                primitive: index,
                index: i,
                vertex_count: range.vertex_count,
            });
        }

        geometry
            .positions
            .extend(primitive.positions.iter().map(|&p| loc_gltf_to_host(p)));

        // A primitive with bad indices fails the merge; its topology is not
        // shifted so indices near u32::MAX cannot overflow.
        if issues.len() == before {
            let base = range.vertex_offset as u32;
            geometry
                .faces
                .extend(primitive.faces.iter().map(|f| f.map(|i| i + base)));
            geometry
                .edges
                .extend(primitive.edges.iter().map(|e| e.map(|i| i + base)));
        }

        offsets.push(range);
    }

    issues.extend(validate(&geometry));
    if !issues.is_empty() {
        return Err(MeshError::InvalidTopology {
            mesh: name.to_owned(),
            issues,
        });
    }

    debug!(
        "Merged mesh '{}': {} primitives, {} vertices, {} faces, {} edges",
        name,
        primitives.len(),
        geometry.vertex_count(),
        geometry.face_count(),
        geometry.edges.len()
    );

    Ok((geometry, offsets))
}

impl MeshObject {
    /// Merge primitives into a new mesh object with no attribute layers yet.
    pub fn from_primitives(name: impl Into<String>, primitives: &[Primitive]) -> Result<Self, MeshError> {
        let name = name.into();
        let (geometry, offsets) = merge_primitives(&name, primitives)?;
        let face_count = geometry.face_count();

        Ok(Self {
            name,
            geometry,
            offsets,
            face_materials: vec![None; face_count],
            ..Default::default()
        })
    }

    /// Guard for placement passes: they must receive the primitives the
    /// mesh was merged from.
    pub(crate) fn check_primitives(&self, primitives: &[Primitive]) -> Result<(), MeshError> {
        if primitives.len() != self.offsets.len() {
            return Err(MeshError::PrimitiveCountMismatch {
                expected: self.offsets.len(),
                found: primitives.len(),
            });
        }
        Ok(())
    }
}
