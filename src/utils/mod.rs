pub mod error;

pub use error::{ErrorKind, MaskError, OcrError};
