//! Rectangular crop
//!
//! Stands in for the interactive crop view: callers pick a [`CropRegion`] and
//! get back a new buffer holding only that region.

use crate::{EditError, ImageBuffer, Result};
use image::imageops;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Largest square centered in a `width` x `height` image
    pub fn centered_square(width: u32, height: u32) -> Self {
        let side = width.min(height);
        Self::new((width - side) / 2, (height - side) / 2, side, side)
    }

    /// Largest centered region with the `aspect_width:aspect_height` ratio
    pub fn for_aspect(width: u32, height: u32, aspect_width: u32, aspect_height: u32) -> Self {
        if aspect_width == 0 || aspect_height == 0 || width == 0 || height == 0 {
            return Self::new(0, 0, width, height);
        }

        let (src_w, src_h) = (width as u64, height as u64);
        let (aspect_w, aspect_h) = (aspect_width as u64, aspect_height as u64);

        let (w, h) = if src_w * aspect_h > src_h * aspect_w {
            // Source is wider - crop width
            (((src_h * aspect_w / aspect_h) as u32).max(1), height)
        } else {
            // Source is taller - crop height
            (width, ((src_w * aspect_h / aspect_w) as u32).max(1))
        };

        Self::new((width - w) / 2, (height - h) / 2, w, h)
    }

    pub fn is_within(&self, width: u32, height: u32) -> bool {
        self.x
            .checked_add(self.width)
            .is_some_and(|right| right <= width)
            && self
                .y
                .checked_add(self.height)
                .is_some_and(|bottom| bottom <= height)
    }
}

/// Copy `region` out of `image`. The input buffer is left untouched.
pub fn crop(image: &ImageBuffer, region: CropRegion) -> Result<ImageBuffer> {
    if region.width == 0 || region.height == 0 {
        return Err(EditError::InvalidRegion(format!(
            "empty region {}x{}",
            region.width, region.height
        )));
    }

    let (width, height) = image.dimensions();
    if !region.is_within(width, height) {
        return Err(EditError::InvalidRegion(format!(
            "region ({}, {}) + ({}, {}) exceeds image {}x{}",
            region.x, region.y, region.width, region.height, width, height
        )));
    }

    log::debug!(
        "crop {}x{} at ({}, {}) from {}x{}",
        region.width,
        region.height,
        region.x,
        region.y,
        width,
        height
    );

    Ok(imageops::crop_imm(image, region.x, region.y, region.width, region.height).to_image())
}
