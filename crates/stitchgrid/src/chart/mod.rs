//! Chart extraction pipeline: preprocess → grid detection → cell
//! recognition → assembly.

pub mod assemble;
pub mod cell;
pub mod grid;
pub mod preprocess;

pub use assemble::{apply_corrections, ChartConfig, ChartScanner, Correction, DetectedChart};
pub use cell::{CellConfig, Recognition, PATCH_SIZE};
pub use grid::{detect_grid, GridConfig, GridDetectionResult};
pub use preprocess::{preprocess, sharpen, stretch_contrast, PreprocessConfig};
