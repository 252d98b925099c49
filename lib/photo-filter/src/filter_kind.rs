use crate::{ColorMatrix, PhotoFilterError};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::{fmt, str::FromStr};

const CONTRAST: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum FilterKind {
    None = 0,
    Grayscale,
    Sepia,
    Invert,
    Brighten,
    Darken,
    Contrast,
    Saturate,
    Desaturate,
    Vintage,
}

impl Default for FilterKind {
    fn default() -> Self {
        FilterKind::None
    }
}

impl FilterKind {
    pub fn all() -> &'static [FilterKind] {
        &[
            FilterKind::None,
            FilterKind::Grayscale,
            FilterKind::Sepia,
            FilterKind::Invert,
            FilterKind::Brighten,
            FilterKind::Darken,
            FilterKind::Contrast,
            FilterKind::Saturate,
            FilterKind::Desaturate,
            FilterKind::Vintage,
        ]
    }

    /// Label shown under the preview thumbnail
    pub fn label(&self) -> &'static str {
        match self {
            FilterKind::None => "Original",
            FilterKind::Grayscale => "Grayscale",
            FilterKind::Sepia => "Sepia",
            FilterKind::Invert => "Invert",
            FilterKind::Brighten => "Brighten",
            FilterKind::Darken => "Darken",
            FilterKind::Contrast => "Contrast",
            FilterKind::Saturate => "Saturate",
            FilterKind::Desaturate => "Desaturate",
            FilterKind::Vintage => "Vintage",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Grayscale => "grayscale",
            FilterKind::Sepia => "sepia",
            FilterKind::Invert => "invert",
            FilterKind::Brighten => "brighten",
            FilterKind::Darken => "darken",
            FilterKind::Contrast => "contrast",
            FilterKind::Saturate => "saturate",
            FilterKind::Desaturate => "desaturate",
            FilterKind::Vintage => "vintage",
        }
    }

    /// `None` has no matrix: the engine copies the input as is.
    pub fn matrix(&self) -> Option<ColorMatrix> {
        let m = match self {
            FilterKind::None => return None,
            FilterKind::Grayscale => ColorMatrix::saturation(0.0),
            FilterKind::Sepia => ColorMatrix::from_rows([
                [0.393, 0.769, 0.189, 0.0, 0.0],
                [0.349, 0.686, 0.168, 0.0, 0.0],
                [0.272, 0.534, 0.131, 0.0, 0.0],
                [0.0, 0.0, 0.0, 1.0, 0.0],
            ]),
            FilterKind::Invert => ColorMatrix::uniform(-1.0, 255.0),
            FilterKind::Brighten => ColorMatrix::uniform(1.3, 30.0),
            FilterKind::Darken => ColorMatrix::uniform(0.8, -20.0),
            FilterKind::Contrast => {
                ColorMatrix::uniform(CONTRAST, (-0.5 * CONTRAST + 0.5) * 255.0)
            }
            FilterKind::Saturate => ColorMatrix::saturation(1.5),
            FilterKind::Desaturate => ColorMatrix::saturation(0.3),
            FilterKind::Vintage => {
                ColorMatrix::scale_offset([1.2, 1.0, 0.8], [10.0, 0.0, -10.0])
            }
        };

        Some(m)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = PhotoFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        FilterKind::all()
            .iter()
            .find(|kind| kind.name() == s || kind.label().to_lowercase() == s)
            .copied()
            .ok_or(PhotoFilterError::UnknownFilter(s))
    }
}
