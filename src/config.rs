//! Masking configuration
//!
//! Passed explicitly to [`crate::NricMasker`]; nothing here is process-global.

use image::Rgb;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::MaskError;

/// Top-level settings, loadable from a JSON file. Every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    pub ocr: OcrConfig,
    pub mask: MaskStyle,
    pub output: OutputConfig,
}

/// Tesseract settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// tessdata directory; `None` lets Tesseract use `TESSDATA_PREFIX` or its built-in path
    pub datapath: Option<PathBuf>,
    pub language: String,
    /// Value for `tessedit_pageseg_mode`, e.g. `"6"` for a single uniform block
    pub page_seg_mode: Option<String>,
    /// Recognizer to initialise with; `None` leaves Tesseract's own default
    pub engine_mode: Option<EngineMode>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            datapath: None,
            language: "eng".to_string(),
            page_seg_mode: Some("6".to_string()),
            engine_mode: Some(EngineMode::LstmOnly),
        }
    }
}

/// Tesseract OCR engine mode (`--oem`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    /// Legacy recognizer only (`--oem 0`)
    TesseractOnly,
    /// LSTM line recognizer only (`--oem 1`)
    LstmOnly,
    /// LSTM with legacy fallback (`--oem 2`)
    TesseractLstmCombined,
    /// Whatever the traineddata config selects (`--oem 3`)
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskStyle {
    pub fill: [u8; 3],
    pub preview_outline: [u8; 3],
}

impl Default for MaskStyle {
    fn default() -> Self {
        Self {
            fill: [0, 0, 0],
            preview_outline: [0, 255, 0],
        }
    }
}

impl MaskStyle {
    pub fn fill_color(&self) -> Rgb<u8> {
        Rgb(self.fill)
    }

    pub fn outline_color(&self) -> Rgb<u8> {
        Rgb(self.preview_outline)
    }
}

/// Naming of derived output files: `<dir>/<prefix><stem>.<extension>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub prefix: String,
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: "masked_".to_string(),
            extension: "jpg".to_string(),
        }
    }
}

impl MaskConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MaskError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| MaskError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| MaskError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
