use kiln_shader::CompileOptions;
use serde::{Deserialize, Serialize};

/// Which parts of a document the importer writes into the scene. Maps to
/// the `[import]` table of the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Write per-vertex normals.
    pub import_normals: bool,
    /// Build shape keys from morph targets.
    pub import_shape_keys: bool,
    /// Write the `COLOR_0` layer. Also decides whether shader graphs read it.
    pub import_vertex_colors: bool,
    /// Compile shader graphs for material slots.
    pub import_shading: bool,
    /// Set the flat viewport colour of constant-colour materials.
    pub viewport_color: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            import_normals: true,
            import_shape_keys: true,
            import_vertex_colors: true,
            import_shading: true,
            viewport_color: true,
        }
    }
}

impl ImportOptions {
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            viewport_color: self.viewport_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_on_by_default() {
        let options = ImportOptions::default();
        assert!(options.import_normals);
        assert!(options.import_shape_keys);
        assert!(options.import_vertex_colors);
        assert!(options.import_shading);
        assert!(options.compile_options().viewport_color);
    }

    #[test]
    fn test_viewport_color_flows_to_compiler() {
        let options = ImportOptions {
            viewport_color: false,
            ..Default::default()
        };
        assert!(!options.compile_options().viewport_color);
    }
}
