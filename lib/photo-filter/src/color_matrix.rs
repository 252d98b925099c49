//! 4x5 color matrix
//!
//! Rows are the output channels (R, G, B, A). The first four columns weight the
//! input channels, the fifth column is a constant offset in 0..=255 units.

use image::Rgba;

// Luminance weights used by the saturation shortcut
const LUMA_R: f32 = 0.213;
const LUMA_G: f32 = 0.715;
const LUMA_B: f32 = 0.072;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    m: [[f32; 5]; 4],
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl ColorMatrix {
    pub const fn from_rows(m: [[f32; 5]; 4]) -> Self {
        Self { m }
    }

    pub const fn identity() -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// Independent scale and offset for each color channel, alpha untouched
    pub const fn scale_offset(scale: [f32; 3], offset: [f32; 3]) -> Self {
        Self::from_rows([
            [scale[0], 0.0, 0.0, 0.0, offset[0]],
            [0.0, scale[1], 0.0, 0.0, offset[1]],
            [0.0, 0.0, scale[2], 0.0, offset[2]],
            [0.0, 0.0, 0.0, 1.0, 0.0],
        ])
    }

    pub const fn uniform(scale: f32, offset: f32) -> Self {
        Self::scale_offset([scale; 3], [offset; 3])
    }

    /// 0 maps every pixel to its gray value, 1 is identity, above 1 pushes
    /// channels away from gray.
    pub fn saturation(sat: f32) -> Self {
        let inv = 1.0 - sat;
        let r = LUMA_R * inv;
        let g = LUMA_G * inv;
        let b = LUMA_B * inv;

        Self::from_rows([
            [r + sat, g, b, 0.0, 0.0],
            [r, g + sat, b, 0.0, 0.0],
            [r, g, b + sat, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0, 0.0],
        ])
    }

    pub fn rows(&self) -> &[[f32; 5]; 4] {
        &self.m
    }

    /// Transform one pixel. Color channels are clamped to 0..=255 and rounded,
    /// alpha is copied from the input.
    #[inline]
    pub fn transform(&self, pixel: Rgba<u8>) -> Rgba<u8> {
        let input = [
            pixel[0] as f32,
            pixel[1] as f32,
            pixel[2] as f32,
            pixel[3] as f32,
        ];

        let mut out = pixel;
        for (i, row) in self.m.iter().take(3).enumerate() {
            let value = row[0] * input[0]
                + row[1] * input[1]
                + row[2] * input[2]
                + row[3] * input[3]
                + row[4];
            out[i] = value.clamp(0.0, 255.0).round() as u8;
        }

        out
    }
}
