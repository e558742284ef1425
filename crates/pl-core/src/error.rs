use core::fmt;

/// Failure of one pipeline stage.
///
/// Every variant past `SizeMismatch` is terminal for the glyph being
/// processed: stages never return partial output. Callers respond by
/// adjusting configuration (finer resolution, larger closing radius, lower
/// minimum stroke length) and resubmitting the whole glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    SizeMismatch { expected: usize, actual: usize },
    /// Outline or sheet has zero area or non-finite extent.
    DegenerateInput,
    /// Rasterization set no pixel.
    EmptyRaster,
    /// Skeleton extraction left no pixel.
    SkeletonCollapse,
    /// Every traced stroke fell below the minimum length.
    NoUsableStrokes,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            Self::DegenerateInput => write!(f, "degenerate input: outline has no area"),
            Self::EmptyRaster => write!(f, "rasterized mask is empty"),
            Self::SkeletonCollapse => write!(f, "skeleton is empty"),
            Self::NoUsableStrokes => write!(f, "no usable centerline strokes"),
        }
    }
}

impl std::error::Error for Error {}
