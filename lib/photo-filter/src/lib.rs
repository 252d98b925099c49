pub mod color_matrix;
pub mod engine;
pub mod filter_kind;

pub use color_matrix::ColorMatrix;
pub use engine::{apply, apply_into, previews, thumbnail};
pub use filter_kind::FilterKind;

/// Pixel grid with four 8-bit channels per pixel (R, G, B, A).
pub type ImageBuffer = image::RgbaImage;

pub type Result<T> = std::result::Result<T, PhotoFilterError>;

#[derive(thiserror::Error, Debug)]
pub enum PhotoFilterError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Image resize error: {0}")]
    ImageResize(#[from] fast_image_resize::ResizeError),

    #[error("Image buffer error: {0}")]
    ImageBufferError(#[from] fast_image_resize::ImageBufferError),
}
