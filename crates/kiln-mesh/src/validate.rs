use crate::error::TopologyIssue;
use crate::object::MergedGeometry;

/// Check merged geometry for defects. Nothing is repaired; an empty result
/// means the geometry is usable.
pub fn validate(geometry: &MergedGeometry) -> Vec<TopologyIssue> {
    let mut issues = Vec::new();

    for (vertex, position) in geometry.positions.iter().enumerate() {
        if !position.is_finite() {
            issues.push(TopologyIssue::NonFinitePosition { vertex });
        }
    }

    for (face, [a, b, c]) in geometry.faces.iter().enumerate() {
        if a == b || b == c || a == c {
            issues.push(TopologyIssue::DegenerateFace { face });
        }
    }

    for (edge, [a, b]) in geometry.edges.iter().enumerate() {
        if a == b {
            issues.push(TopologyIssue::DegenerateEdge { edge });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn quad() -> MergedGeometry {
        MergedGeometry {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE],
            edges: vec![[0, 3]],
            faces: vec![[0, 1, 2], [2, 1, 3]],
        }
    }

    #[test]
    fn test_clean_geometry_has_no_issues() {
        assert!(validate(&quad()).is_empty());
    }

    #[test]
    fn test_degenerate_elements_are_reported() {
        let mut geometry = quad();
        geometry.faces.push([3, 3, 1]);
        geometry.edges.push([2, 2]);
        let issues = validate(&geometry);
        assert_eq!(
            issues,
            vec![
                TopologyIssue::DegenerateFace { face: 2 },
                TopologyIssue::DegenerateEdge { edge: 1 },
            ]
        );
    }

    #[test]
    fn test_nan_position_is_reported() {
        let mut geometry = quad();
        geometry.positions[1] = Vec3::new(f32::NAN, 0.0, 0.0);
        assert_eq!(
            validate(&geometry),
            vec![TopologyIssue::NonFinitePosition { vertex: 1 }]
        );
    }
}
