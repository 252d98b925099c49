//! Decorative frames around a photo

use crate::{EditError, ImageBuffer, Result};
use derivative::Derivative;
use derive_setters::Setters;
use image::{Rgba, imageops};
use imageproc::{
    drawing::draw_hollow_rect_mut,
    rect::Rect,
};
use std::str::FromStr;

/// Thickest border `frame` accepts
pub const MAX_BORDER: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStyle {
    /// Same border on every side
    Solid,
    /// Bottom border three times thicker, like an instant photo
    Polaroid,
    /// Solid border with a thin contrasting line through its middle
    Double,
}

impl FrameStyle {
    pub fn all() -> &'static [FrameStyle] {
        &[FrameStyle::Solid, FrameStyle::Polaroid, FrameStyle::Double]
    }

    pub fn name(&self) -> &'static str {
        match self {
            FrameStyle::Solid => "solid",
            FrameStyle::Polaroid => "polaroid",
            FrameStyle::Double => "double",
        }
    }
}

impl FromStr for FrameStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        FrameStyle::all()
            .iter()
            .find(|style| style.name() == s)
            .copied()
            .ok_or_else(|| format!("unknown frame style: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct FrameConfig {
    #[derivative(Default(value = "FrameStyle::Solid"))]
    pub style: FrameStyle,

    /// Border thickness in pixels
    #[derivative(Default(value = "24"))]
    pub border: u32,

    #[derivative(Default(value = "Rgba([255, 255, 255, 255])"))]
    pub color: Rgba<u8>,
}

impl FrameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of the framed image for a `width` x `height` source, `None` when
    /// it does not fit in `u32`
    pub fn framed_size(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        let bottom = match self.style {
            FrameStyle::Solid | FrameStyle::Double => 2,
            FrameStyle::Polaroid => 4,
        };

        Some((
            width.checked_add(self.border.checked_mul(2)?)?,
            height.checked_add(self.border.checked_mul(bottom)?)?,
        ))
    }
}

/// Wrap `image` in a border. The photo keeps its pixels and sits `border`
/// pixels from the top-left corner.
pub fn frame(image: &ImageBuffer, config: &FrameConfig) -> Result<ImageBuffer> {
    if config.border == 0 {
        return Ok(image.clone());
    }

    if config.border > MAX_BORDER {
        return Err(EditError::InvalidParameter(format!(
            "frame border {} exceeds {MAX_BORDER}",
            config.border
        )));
    }

    let (width, height) = config
        .framed_size(image.width(), image.height())
        .ok_or_else(|| {
            EditError::InvalidParameter(format!(
                "framed size of {}x{} overflows",
                image.width(),
                image.height()
            ))
        })?;
    let mut out = ImageBuffer::from_pixel(width, height, config.color);

    if config.style == FrameStyle::Double {
        let thickness = (config.border / 4).max(1);
        let inset = (config.border - thickness) / 2;
        let line = Rgba([
            255 - config.color[0],
            255 - config.color[1],
            255 - config.color[2],
            255,
        ]);

        for i in 0..thickness {
            let offset = inset + i;
            let (w, h) = (width - 2 * offset, height - 2 * offset);
            if w == 0 || h == 0 {
                break;
            }
            let rect = Rect::at(offset as i32, offset as i32).of_size(w, h);
            draw_hollow_rect_mut(&mut out, rect, line);
        }
    }

    // Copied, not blended: transparent photo pixels stay transparent
    imageops::replace(&mut out, image, config.border as i64, config.border as i64);

    log::debug!(
        "framed {}x{} -> {}x{} ({})",
        image.width(),
        image.height(),
        width,
        height,
        config.style.name()
    );

    Ok(out)
}
