//! Conversion between the glTF convention (Y up, UV origin top-left) and the
//! host convention (Z up, UV origin bottom-left).

use glam::{Vec2, Vec3};

/// Convert a glTF location, direction or displacement into host space.
pub fn loc_gltf_to_host(v: Vec3) -> Vec3 {
    Vec3::new(v.x, -v.z, v.y)
}

/// Convert a glTF texture coordinate into host UV space.
pub fn uv_gltf_to_host(uv: Vec2) -> Vec2 {
    Vec2::new(uv.x, 1.0 - uv.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_y_up_becomes_z_up() {
        assert_eq!(loc_gltf_to_host(Vec3::Y), Vec3::Z);
        assert_eq!(loc_gltf_to_host(Vec3::Z), -Vec3::Y);
        assert_eq!(loc_gltf_to_host(Vec3::X), Vec3::X);
    }

    #[test]
    fn test_uv_flip() {
        let uv = uv_gltf_to_host(Vec2::new(0.25, 0.25));
        assert!((uv.x - 0.25).abs() < 1e-6);
        assert!((uv.y - 0.75).abs() < 1e-6);
    }
}
