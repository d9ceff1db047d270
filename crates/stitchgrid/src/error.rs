//! Error types for the stitchgrid library.
//!
//! Only two failure modes cross the pipeline boundary: an undecodable
//! image and a chart image with no inferable grid structure. Per-cell
//! recognition problems degrade into low confidence scores instead, and
//! degenerate clustering input yields a shorter (possibly empty) palette.

use thiserror::Error;

/// Result type alias for stitchgrid operations.
pub type Result<T> = std::result::Result<T, ChartError>;

/// Fatal errors surfaced by the chart and palette pipelines.
#[derive(Error, Debug)]
pub enum ChartError {
    /// Image bytes could not be decoded (corrupt or unsupported format).
    #[error("failed to decode image: {source}")]
    ImageDecode {
        #[from]
        source: image::ImageError,
    },

    /// No grid structure could be inferred from the chart image.
    ///
    /// Callers are expected to branch on this variant and offer manual
    /// grid entry; retrying with the same image will not succeed.
    #[error("grid detection failed: {reason}")]
    GridDetection { reason: String },

    /// A color string could not be parsed as `#RRGGBB` hex.
    #[error("invalid color: {value:?}")]
    InvalidColor { value: String },
}

impl ChartError {
    pub(crate) fn grid(reason: impl Into<String>) -> Self {
        Self::GridDetection {
            reason: reason.into(),
        }
    }
}
