//! Background removal
//!
//! The actual segmentation lives behind [`BackgroundRemover`]; a network
//! service or a segmentation model can plug in there. [`KeyColorRemover`] is
//! the local fallback for photos shot on a flat backdrop.

use crate::{EditError, ImageBuffer, Result};
use derivative::Derivative;
use derive_setters::Setters;
use image::{GrayImage, Luma, Rgb};

pub trait BackgroundRemover {
    /// Return a copy of `image` with the background made transparent
    fn remove(&mut self, image: &ImageBuffer) -> Result<ImageBuffer>;
}

/// Write `mask` into the alpha channel of a copy of `image`.
/// mask is grayscale (0=background, 255=foreground)
pub fn apply_mask(image: &ImageBuffer, mask: &GrayImage) -> Result<ImageBuffer> {
    if image.dimensions() != mask.dimensions() {
        return Err(EditError::DimensionMismatch {
            image: image.dimensions(),
            mask: mask.dimensions(),
        });
    }

    let mut result = image.clone();
    for (pixel, mask_pixel) in result.pixels_mut().zip(mask.pixels()) {
        pixel[3] = mask_pixel[0];
    }

    Ok(result)
}

/// Create binary mask image (0 = background, 255 = foreground) from grayscale mask
pub fn binary_mask(mask: &GrayImage, threshold: u8) -> GrayImage {
    let mut binary = mask.clone();
    for pixel in binary.pixels_mut() {
        pixel[0] = if pixel[0] > threshold { 255 } else { 0 };
    }
    binary
}

#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct KeyColorRemover {
    /// Backdrop color. Sampled from the top-left pixel when unset.
    #[setters(strip_option)]
    #[derivative(Default(value = "None"))]
    pub key: Option<Rgb<u8>>,

    /// Euclidean RGB distance still treated as backdrop
    #[derivative(Default(value = "40.0"))]
    pub tolerance: f32,
}

impl KeyColorRemover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mask(&self, image: &ImageBuffer) -> Result<GrayImage> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(EditError::EmptyImage);
        }

        let key = self.key.unwrap_or_else(|| {
            let p = image.get_pixel(0, 0);
            Rgb([p[0], p[1], p[2]])
        });
        let tolerance = self.tolerance.max(0.0);

        let mut mask = GrayImage::new(width, height);
        for (src, dst) in image.pixels().zip(mask.pixels_mut()) {
            let distance = (0..3)
                .map(|i| {
                    let d = src[i] as f32 - key[i] as f32;
                    d * d
                })
                .sum::<f32>()
                .sqrt();

            *dst = if distance <= tolerance {
                Luma([0])
            } else {
                Luma([src[3]])
            };
        }

        Ok(mask)
    }
}

impl BackgroundRemover for KeyColorRemover {
    fn remove(&mut self, image: &ImageBuffer) -> Result<ImageBuffer> {
        let mask = self.mask(image)?;
        log::info!(
            "key color removal: {} of {} pixels cleared",
            mask.pixels().filter(|p| p[0] == 0).count(),
            mask.len()
        );
        apply_mask(image, &mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn subject_on_green() -> ImageBuffer {
        ImageBuffer::from_fn(6, 6, |x, y| {
            if (2..4).contains(&x) && (2..4).contains(&y) {
                Rgba([200, 30, 30, 255])
            } else {
                Rgba([0, 250, 5, 255])
            }
        })
    }

    #[test]
    fn test_apply_mask() {
        let img = ImageBuffer::from_pixel(2, 1, Rgba([9, 9, 9, 255]));
        let mask = GrayImage::from_raw(2, 1, vec![0, 200]).unwrap();
        let out = apply_mask(&img, &mask).unwrap();

        assert_eq!(*out.get_pixel(0, 0), Rgba([9, 9, 9, 0]));
        assert_eq!(*out.get_pixel(1, 0), Rgba([9, 9, 9, 200]));
    }

    #[test]
    fn test_apply_mask_size_mismatch() {
        let img = ImageBuffer::new(2, 2);
        let mask = GrayImage::new(3, 2);
        assert!(matches!(
            apply_mask(&img, &mask),
            Err(EditError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_binary_mask() {
        let mask = GrayImage::from_raw(3, 1, vec![10, 128, 129]).unwrap();
        let binary = binary_mask(&mask, 128);
        assert_eq!(binary.into_raw(), vec![0, 0, 255]);
    }

    #[test]
    fn test_key_sampled_from_corner() {
        let img = subject_on_green();
        let out = KeyColorRemover::new().remove(&img).unwrap();

        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(5, 5)[3], 0);
        assert_eq!(*out.get_pixel(2, 2), Rgba([200, 30, 30, 255]));
    }

    #[test]
    fn test_explicit_key_and_tolerance() {
        let img = subject_on_green();
        let mut remover = KeyColorRemover::new()
            .with_key(Rgb([200, 30, 30]))
            .with_tolerance(0.0);
        let out = remover.remove(&img).unwrap();

        assert_eq!(out.get_pixel(2, 2)[3], 0);
        assert_eq!(out.get_pixel(0, 0)[3], 255);
    }

    #[test]
    fn test_empty_image() {
        let img = ImageBuffer::new(0, 0);
        assert!(matches!(
            KeyColorRemover::new().remove(&img),
            Err(EditError::EmptyImage)
        ));
    }
}
