use std::fmt;

use kiln_core::Color;

use crate::handle::Handle;
use crate::image::ImageAsset;
use crate::mesh::MeshAsset;

pub type MeshHandle = Handle<MeshAsset>;
pub type MaterialHandle = Handle<MaterialAsset>;
pub type ImageHandle = Handle<ImageAsset>;

/// A reference from a material to an image, sampled through one UV set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRef {
    pub image: ImageHandle,
    /// Texture coordinate set the image is sampled with.
    pub tex_coord: u32,
}

impl TextureRef {
    pub fn new(image: ImageHandle) -> Self {
        Self { image, tex_coord: 0 }
    }

    pub fn with_tex_coord(mut self, tex_coord: u32) -> Self {
        self.tex_coord = tex_coord;
        self
    }
}

/// How a material input is sourced: a constant, a texture scaled by a
/// constant, or a texture alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PbrMode {
    Factor,
    FactorTexture,
    Texture,
}

impl fmt::Display for PbrMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Factor => "factor",
            Self::FactorTexture => "factor*texture",
            Self::Texture => "texture",
        })
    }
}

/// Base colour input of a metallic-roughness material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaseColor {
    Factor(Color),
    FactorTexture { factor: Color, texture: TextureRef },
    Texture(TextureRef),
}

impl BaseColor {
    /// Classify the document's factor/texture pair. A texture paired with
    /// the default white factor samples the texture alone.
    pub fn classify(factor: Color, texture: Option<TextureRef>) -> Self {
        match texture {
            None => Self::Factor(factor),
            Some(texture) if factor == Color::WHITE => Self::Texture(texture),
            Some(texture) => Self::FactorTexture { factor, texture },
        }
    }

    pub fn mode(&self) -> PbrMode {
        match self {
            Self::Factor(_) => PbrMode::Factor,
            Self::FactorTexture { .. } => PbrMode::FactorTexture,
            Self::Texture(_) => PbrMode::Texture,
        }
    }

    pub fn texture(&self) -> Option<&TextureRef> {
        match self {
            Self::Factor(_) => None,
            Self::FactorTexture { texture, .. } | Self::Texture(texture) => Some(texture),
        }
    }
}

impl Default for BaseColor {
    fn default() -> Self {
        Self::Factor(Color::WHITE)
    }
}

/// Metallic and roughness inputs. The texture stores roughness in its green
/// channel and metalness in its blue channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetallicRoughness {
    Factor {
        metallic: f32,
        roughness: f32,
    },
    FactorTexture {
        metallic: f32,
        roughness: f32,
        texture: TextureRef,
    },
    Texture(TextureRef),
}

impl MetallicRoughness {
    /// Classify the document's factors and texture. A texture with both
    /// factors at 1.0 samples the texture alone.
    pub fn classify(metallic: f32, roughness: f32, texture: Option<TextureRef>) -> Self {
        match texture {
            None => Self::Factor {
                metallic,
                roughness,
            },
            Some(texture) if metallic == 1.0 && roughness == 1.0 => Self::Texture(texture),
            Some(texture) => Self::FactorTexture {
                metallic,
                roughness,
                texture,
            },
        }
    }

    pub fn mode(&self) -> PbrMode {
        match self {
            Self::Factor { .. } => PbrMode::Factor,
            Self::FactorTexture { .. } => PbrMode::FactorTexture,
            Self::Texture(_) => PbrMode::Texture,
        }
    }

    pub fn texture(&self) -> Option<&TextureRef> {
        match self {
            Self::Factor { .. } => None,
            Self::FactorTexture { texture, .. } | Self::Texture(texture) => Some(texture),
        }
    }
}

impl Default for MetallicRoughness {
    fn default() -> Self {
        Self::Factor {
            metallic: 1.0,
            roughness: 1.0,
        }
    }
}

/// A device-independent metallic-roughness material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialAsset {
    pub name: String,
    pub base_color: BaseColor,
    pub metallic_roughness: MetallicRoughness,
}

impl MaterialAsset {
    pub fn new(
        name: impl Into<String>,
        base_color: BaseColor,
        metallic_roughness: MetallicRoughness,
    ) -> Self {
        Self {
            name: name.into(),
            base_color,
            metallic_roughness,
        }
    }

    /// Images sampled by this material, base colour first.
    pub fn images(&self) -> impl Iterator<Item = ImageHandle> + '_ {
        self.base_color
            .texture()
            .into_iter()
            .chain(self.metallic_roughness.texture())
            .map(|t| t.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tex() -> TextureRef {
        TextureRef::new(Handle::new(0))
    }

    #[test]
    fn test_base_color_classification() {
        let red = Color::rgb(0.8, 0.2, 0.2);
        assert_eq!(BaseColor::classify(red, None).mode(), PbrMode::Factor);
        assert_eq!(
            BaseColor::classify(red, Some(tex())).mode(),
            PbrMode::FactorTexture
        );
        assert_eq!(
            BaseColor::classify(Color::WHITE, Some(tex())).mode(),
            PbrMode::Texture
        );
    }

    #[test]
    fn test_metallic_classification() {
        assert_eq!(
            MetallicRoughness::classify(0.0, 0.5, None).mode(),
            PbrMode::Factor
        );
        assert_eq!(
            MetallicRoughness::classify(1.0, 0.5, Some(tex())).mode(),
            PbrMode::FactorTexture
        );
        assert_eq!(
            MetallicRoughness::classify(1.0, 1.0, Some(tex())).mode(),
            PbrMode::Texture
        );
    }

    #[test]
    fn test_texture_only_keeps_tex_coord() {
        let base = BaseColor::Texture(tex().with_tex_coord(1));
        assert_eq!(base.texture().map(|t| t.tex_coord), Some(1));
    }

    #[test]
    fn test_material_image_listing() {
        let material = MaterialAsset::new(
            "both",
            BaseColor::Texture(TextureRef::new(Handle::new(2))),
            MetallicRoughness::Texture(TextureRef::new(Handle::new(5))),
        );
        let images: Vec<usize> = material.images().map(|h| h.index()).collect();
        assert_eq!(images, vec![2, 5]);
    }
}
