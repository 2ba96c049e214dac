pub mod batch;
pub mod config;
pub mod models;
pub mod nric_masker;
pub mod processing;
pub mod utils;

pub use config::MaskConfig;
pub use nric_masker::{MaskFileOptions, MaskOutcome, NricMasker};
pub use utils::{ErrorKind, MaskError};
