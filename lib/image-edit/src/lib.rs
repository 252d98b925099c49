pub mod background;
pub mod brush;
pub mod crop;
pub mod frame;
pub mod session;

pub use background::{BackgroundRemover, KeyColorRemover};
pub use brush::{BrushSettings, DrawingCanvas, Point, Stroke};
pub use crop::CropRegion;
pub use frame::{FrameConfig, FrameStyle};
pub use photo_filter::{FilterKind, ImageBuffer};
pub use session::EditSession;

pub type Result<T> = std::result::Result<T, EditError>;

#[derive(thiserror::Error, Debug)]
pub enum EditError {
    #[error("Invalid crop region: {0}")]
    InvalidRegion(String),

    #[error("Dimension mismatch: image {image:?}, mask {mask:?}")]
    DimensionMismatch { image: (u32, u32), mask: (u32, u32) },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Image is empty")]
    EmptyImage,

    #[error("Background removal failed: {0}")]
    BackgroundRemoval(String),

    #[error("Filter error: {0}")]
    Filter(#[from] photo_filter::PhotoFilterError),
}
