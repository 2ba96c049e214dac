pub mod image;
pub mod masker;
pub mod matcher;
pub mod normalizer;
pub mod ocr;

pub use self::image::ImageProcessor;
pub use masker::{
    apply_manual_masks, detect_identifiers, draw_detection_preview, mask_identifiers,
    paint_region,
};
pub use matcher::{is_identifier, match_token, TokenMatch, NRIC_PATTERN};
pub use normalizer::normalize_ocr_text;
pub use ocr::{parse_tsv, OcrEngine, TesseractOcr};
