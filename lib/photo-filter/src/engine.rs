//! Color filter engine
//!
//! `apply` never touches its input: it clones the buffer and runs the matrix of
//! the requested [`FilterKind`] over every pixel of the copy.

use crate::{FilterKind, ImageBuffer, PhotoFilterError, Result};
use fast_image_resize::{PixelType, ResizeOptions, Resizer, images::Image as FrImage};
use rayon::prelude::*;

/// Apply `kind` to a copy of `image`. Output has the same dimensions as the
/// input and its alpha channel is left as is.
pub fn apply(image: &ImageBuffer, kind: FilterKind) -> ImageBuffer {
    let mut out = image.clone();
    apply_into(&mut out, kind);
    out
}

/// In-place variant of [`apply`] for callers that already own a scratch buffer.
pub fn apply_into(image: &mut ImageBuffer, kind: FilterKind) {
    let Some(matrix) = kind.matrix() else {
        return;
    };

    for pixel in image.pixels_mut() {
        *pixel = matrix.transform(*pixel);
    }
}

/// Downscale so the longest edge is at most `max_edge`, keeping aspect ratio.
/// Images that already fit are returned unchanged.
pub fn thumbnail(image: &ImageBuffer, max_edge: u32) -> Result<ImageBuffer> {
    if max_edge == 0 {
        return Err(PhotoFilterError::InvalidParameter(
            "thumbnail edge must be greater than 0".to_string(),
        ));
    }

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || width.max(height) <= max_edge {
        return Ok(image.clone());
    }

    let scale = max_edge as f32 / width.max(height) as f32;
    let target_width = ((width as f32 * scale).round() as u32).max(1);
    let target_height = ((height as f32 * scale).round() as u32).max(1);

    let src_image = FrImage::from_vec_u8(width, height, image.as_raw().clone(), PixelType::U8x4)?;
    let mut dst_image = FrImage::new(target_width, target_height, PixelType::U8x4);
    Resizer::new().resize(&src_image, &mut dst_image, &ResizeOptions::new())?;

    ImageBuffer::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| PhotoFilterError::ImageProcessing("Failed to create thumbnail".to_string()))
}

/// One thumbnail per filter, in [`FilterKind::all`] order.
pub fn previews(image: &ImageBuffer, max_edge: u32) -> Result<Vec<(FilterKind, ImageBuffer)>> {
    let thumb = thumbnail(image, max_edge)?;
    log::debug!(
        "building {} filter previews at {}x{}",
        FilterKind::all().len(),
        thumb.width(),
        thumb.height()
    );

    Ok(FilterKind::all()
        .par_iter()
        .map(|kind| (*kind, apply(&thumb, *kind)))
        .collect())
}
