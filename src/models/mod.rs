pub mod data;

pub use data::{BoundingBox, ManualMask, MaskRegion, OcrToken};
