//! Edit session for one photo
//!
//! Keeps the photo as loaded plus the current result of every edit applied so
//! far. Filters, crops, frames and drawings chain on the processed image;
//! background removal always starts over from the original.

use crate::{
    BackgroundRemover, CropRegion, DrawingCanvas, FilterKind, FrameConfig, ImageBuffer, Result,
    crop, frame,
};

#[derive(Debug, Clone)]
pub struct EditSession {
    original: ImageBuffer,
    processed: ImageBuffer,
    canvas: DrawingCanvas,
}

impl EditSession {
    pub fn new(image: ImageBuffer) -> Self {
        Self {
            processed: image.clone(),
            original: image,
            canvas: DrawingCanvas::default(),
        }
    }

    pub fn original(&self) -> &ImageBuffer {
        &self.original
    }

    pub fn processed(&self) -> &ImageBuffer {
        &self.processed
    }

    pub fn into_processed(self) -> ImageBuffer {
        self.processed
    }

    pub fn aspect_ratio(&self) -> f32 {
        let (width, height) = self.processed.dimensions();
        if height == 0 {
            return 1.0;
        }
        width as f32 / height as f32
    }

    pub fn apply_filter(&mut self, kind: FilterKind) {
        log::debug!("apply filter {kind}");
        photo_filter::apply_into(&mut self.processed, kind);
    }

    pub fn filter_previews(&self, max_edge: u32) -> Result<Vec<(FilterKind, ImageBuffer)>> {
        Ok(photo_filter::previews(&self.processed, max_edge)?)
    }

    pub fn crop(&mut self, region: CropRegion) -> Result<()> {
        self.processed = crop::crop(&self.processed, region)?;
        Ok(())
    }

    /// Runs on the original photo; earlier edits are dropped on success and
    /// kept on failure.
    pub fn remove_background(&mut self, remover: &mut dyn BackgroundRemover) -> Result<()> {
        match remover.remove(&self.original) {
            Ok(image) => {
                self.processed = image;
                Ok(())
            }
            Err(e) => {
                log::warn!("background removal failed: {e}");
                Err(e)
            }
        }
    }

    pub fn frame(&mut self, config: &FrameConfig) -> Result<()> {
        self.processed = frame::frame(&self.processed, config)?;
        Ok(())
    }

    pub fn canvas(&self) -> &DrawingCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut DrawingCanvas {
        &mut self.canvas
    }

    /// Flatten pending strokes into the processed image
    pub fn commit_drawing(&mut self) {
        self.canvas.end();
        if self.canvas.strokes().is_empty() {
            return;
        }

        self.processed = self.canvas.render(&self.processed);
        self.canvas.clear();
    }

    pub fn reset(&mut self) {
        self.processed = self.original.clone();
        self.canvas.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EditError, Point};
    use image::Rgba;

    struct FailingRemover;

    impl BackgroundRemover for FailingRemover {
        fn remove(&mut self, _image: &ImageBuffer) -> Result<ImageBuffer> {
            Err(EditError::BackgroundRemoval("service unavailable".to_string()))
        }
    }

    struct ClearAll;

    impl BackgroundRemover for ClearAll {
        fn remove(&mut self, image: &ImageBuffer) -> Result<ImageBuffer> {
            let mut out = image.clone();
            out.pixels_mut().for_each(|p| p[3] = 0);
            Ok(out)
        }
    }

    fn session() -> EditSession {
        EditSession::new(ImageBuffer::from_pixel(8, 4, Rgba([100, 150, 200, 255])))
    }

    #[test]
    fn test_filters_stack() {
        let mut s = session();
        s.apply_filter(FilterKind::Invert);
        assert_eq!(*s.processed().get_pixel(0, 0), Rgba([155, 105, 55, 255]));

        s.apply_filter(FilterKind::Invert);
        assert_eq!(s.processed(), s.original());
    }

    #[test]
    fn test_crop_and_aspect() {
        let mut s = session();
        assert_eq!(s.aspect_ratio(), 2.0);

        s.crop(CropRegion::centered_square(8, 4)).unwrap();
        assert_eq!(s.processed().dimensions(), (4, 4));
        assert_eq!(s.aspect_ratio(), 1.0);

        assert!(s.crop(CropRegion::new(0, 0, 8, 8)).is_err());
        assert_eq!(s.processed().dimensions(), (4, 4));
    }

    #[test]
    fn test_background_removal_uses_original() {
        let mut s = session();
        s.apply_filter(FilterKind::Grayscale);
        s.remove_background(&mut ClearAll).unwrap();

        assert_eq!(*s.processed().get_pixel(0, 0), Rgba([100, 150, 200, 0]));
    }

    #[test]
    fn test_background_failure_keeps_processed() {
        let mut s = session();
        s.apply_filter(FilterKind::Sepia);
        let before = s.processed().clone();

        assert!(s.remove_background(&mut FailingRemover).is_err());
        assert_eq!(s.processed(), &before);
    }

    #[test]
    fn test_commit_drawing() {
        let mut s = session();
        s.canvas_mut().begin(Point::new(1.0, 1.0));
        s.canvas_mut().extend(Point::new(6.0, 1.0));
        s.commit_drawing();

        assert!(s.canvas().is_empty());
        assert_eq!(*s.processed().get_pixel(3, 1), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_frame_and_reset() {
        let mut s = session();
        s.frame(&FrameConfig::new().with_border(2)).unwrap();
        assert_eq!(s.processed().dimensions(), (12, 8));

        assert!(s.frame(&FrameConfig::new().with_border(u32::MAX)).is_err());
        assert_eq!(s.processed().dimensions(), (12, 8));

        s.canvas_mut().add_path([Point::new(0.0, 0.0)]);
        s.reset();
        assert_eq!(s.processed(), s.original());
        assert!(s.canvas().is_empty());
    }

    #[test]
    fn test_previews_of_processed() {
        let mut s = session();
        s.crop(CropRegion::new(0, 0, 2, 2)).unwrap();
        let previews = s.filter_previews(100).unwrap();
        assert_eq!(previews.len(), FilterKind::all().len());
        assert!(previews.iter().all(|(_, p)| p.dimensions() == (2, 2)));
    }
}
