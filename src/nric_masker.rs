use crate::config::MaskConfig;
use crate::models::{ManualMask, OcrToken};
use crate::processing::{
    apply_manual_masks, draw_detection_preview, mask_identifiers, ImageProcessor, OcrEngine,
    TesseractOcr,
};
use crate::utils::MaskError;
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Extra steps for [`NricMasker::mask_file_with`].
#[derive(Debug, Clone, Default)]
pub struct MaskFileOptions {
    /// Log every OCR token at `info` instead of `debug`
    pub debug: bool,
    /// Hand-drawn rectangles painted after the automatic masks
    pub manual_masks: Vec<ManualMask>,
    /// Where to write an outlined copy of the unmasked image, if wanted
    pub preview_path: Option<PathBuf>,
}

/// What one file run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskOutcome {
    pub output_path: PathBuf,
    pub masked_count: usize,
    pub manual_count: usize,
}

pub struct NricMasker<E = TesseractOcr> {
    config: MaskConfig,
    engine: E,
}

impl NricMasker<TesseractOcr> {
    pub fn new(config: MaskConfig) -> Self {
        let engine = TesseractOcr::new(config.ocr.clone());
        NricMasker { config, engine }
    }
}

impl<E: OcrEngine> NricMasker<E> {
    pub fn with_engine(config: MaskConfig, engine: E) -> Self {
        NricMasker { config, engine }
    }

    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    /// Runs the OCR engine over `image`.
    pub fn recognize(&self, image: &RgbImage) -> Result<Vec<OcrToken>, MaskError> {
        Ok(self.engine.recognize_words(image)?)
    }

    /// Masks every NRIC/FIN among `tokens` directly in `image` and returns the count.
    pub fn mask(&self, image: &mut RgbImage, tokens: &[OcrToken]) -> usize {
        mask_identifiers(image, tokens, self.config.mask.fill_color(), false)
    }

    /// Reads `input`, masks it and writes the result. Without `output` the
    /// result goes next to the input as `masked_<name>.jpg` (per [`MaskConfig::output`]).
    pub fn mask_file(
        &self,
        input: &Path,
        output: Option<&Path>,
        debug: bool,
    ) -> Result<(PathBuf, usize), MaskError> {
        let options = MaskFileOptions {
            debug,
            ..Default::default()
        };
        let outcome = self.mask_file_with(input, output, &options)?;
        Ok((outcome.output_path, outcome.masked_count))
    }

    pub fn mask_file_with(
        &self,
        input: &Path,
        output: Option<&Path>,
        options: &MaskFileOptions,
    ) -> Result<MaskOutcome, MaskError> {
        // Step 1: Decode the input
        let mut image = ImageProcessor::load_image(input)?;

        // Step 2: Word-level OCR
        let tokens = self.recognize(&image)?;
        log::debug!("{} OCR token(s) from {}", tokens.len(), input.display());

        if let Some(preview_path) = &options.preview_path {
            let preview =
                draw_detection_preview(&image, &tokens, self.config.mask.outline_color());
            ImageProcessor::save_image(&preview, preview_path)?;
        }

        // Step 3: Mask identifiers, then any hand-drawn regions on top
        let fill = self.config.mask.fill_color();
        let masked_count = mask_identifiers(&mut image, &tokens, fill, options.debug);
        let manual_count = apply_manual_masks(&mut image, &options.manual_masks, fill);

        // Step 4: Persist
        let output_path = match output {
            Some(path) => path.to_path_buf(),
            None => ImageProcessor::derive_output_path(input, &self.config.output),
        };
        ImageProcessor::save_image(&image, &output_path)?;

        log::info!(
            "Masked {} region(s) in {} -> {}",
            masked_count + manual_count,
            input.display(),
            output_path.display()
        );

        Ok(MaskOutcome {
            output_path,
            masked_count,
            manual_count,
        })
    }
}
