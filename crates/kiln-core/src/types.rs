//! Core types used throughout the Kiln importer

use serde::{Deserialize, Serialize};

/// RGBA color with floating point components (0.0 to 1.0), linear space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    /// Create a color from RGB values (alpha = 1.0)
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGBA values
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from a `[r, g, b, a]` array
    pub const fn from_array(c: [f32; 4]) -> Self {
        Self::rgba(c[0], c[1], c[2], c[3])
    }

    /// Convert to an array [r, g, b, a]
    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Drop the alpha component
    pub fn to_rgb(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Component by channel index (0 = red, 1 = green, 2 = blue, 3 = alpha)
    pub fn channel(&self, index: usize) -> f32 {
        match index {
            0 => self.r,
            1 => self.g,
            2 => self.b,
            _ => self.a,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Self::from_array(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_channels() {
        let color = Color::rgba(0.8, 0.2, 0.1, 0.5);
        assert_eq!(color.channel(0), 0.8);
        assert_eq!(color.channel(1), 0.2);
        assert_eq!(color.channel(2), 0.1);
        assert_eq!(color.channel(3), 0.5);
        assert_eq!(color.to_rgb(), [0.8, 0.2, 0.1]);
    }

    #[test]
    fn test_color_default_is_white() {
        assert_eq!(Color::default().to_array(), [1.0, 1.0, 1.0, 1.0]);
    }
}
