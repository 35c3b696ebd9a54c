use glam::Vec4;

/// RGBA color in linear space with values in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Convert sRGB color (0-255) to linear space
    #[inline]
    pub const fn srgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        const fn srgb_to_linear(c: u8) -> f32 {
            let x = c as f32 / 255.0;
            if x <= 0.04045 {
                x / 12.92
            } else {
                // Polynomial approximation of ((x + 0.055) / 1.055)^2.4
                let t = (x + 0.055) / 1.055;
                t * t * (0.5870 * t + 0.4130)
            }
        }

        Self::rgba(
            srgb_to_linear(r),
            srgb_to_linear(g),
            srgb_to_linear(b),
            a as f32 / 255.0,
        )
    }

    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Color> for Vec4 {
    fn from(color: Color) -> Self {
        Vec4::new(color.r, color.g, color.b, color.a)
    }
}

/// CSS color constants
pub mod css {
    use super::Color;

    pub const WHITE: Color = Color::srgba(255, 255, 255, 255);
    pub const AQUA: Color = Color::srgba(0, 255, 255, 255);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srgb_extremes_are_exact() {
        assert_eq!(Color::srgba(0, 0, 0, 0), Color::rgba(0.0, 0.0, 0.0, 0.0));
        let white = css::WHITE;
        assert!((white.r - 1.0).abs() < 1e-6);
        assert_eq!(white.a, 1.0);
        assert_eq!(css::AQUA.r, 0.0);
    }

    #[test]
    fn test_vec4_conversion() {
        let color = Color::rgba(0.1, 0.2, 0.3, 0.4);
        let v: Vec4 = color.into();
        assert_eq!(v, Vec4::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(color.to_array(), [0.1, 0.2, 0.3, 0.4]);
    }
}
