use image::{ImageFormat, RgbImage};
use tempfile::Builder;
use tesseract::{OcrEngineMode, Tesseract};

use crate::config::{EngineMode, OcrConfig};
use crate::models::{BoundingBox, OcrToken};
use crate::utils::OcrError;

/// Word-level text recognition. Implementations return one token per detected
/// word with its box in image pixel coordinates; order carries no meaning.
pub trait OcrEngine {
    fn recognize_words(&self, image: &RgbImage) -> Result<Vec<OcrToken>, OcrError>;
}

/// Tesseract page-iterator level of individual words in TSV output.
const WORD_LEVEL: i32 = 5;
const TSV_COLUMNS: usize = 12;

/// OCR backed by the Tesseract C API.
#[derive(Debug, Clone, Default)]
pub struct TesseractOcr {
    config: OcrConfig,
}

impl TesseractOcr {
    pub fn new(config: OcrConfig) -> Self {
        TesseractOcr { config }
    }

    fn init(&self) -> Result<Tesseract, OcrError> {
        let datapath = self
            .config
            .datapath
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());
        let language = Some(self.config.language.as_str());

        let tess = match self.config.engine_mode {
            Some(mode) => Tesseract::new_with_oem(datapath.as_deref(), language, oem(mode)),
            None => Tesseract::new(datapath.as_deref(), language),
        }
        .map_err(|e| OcrError::Initialize(e.to_string()))?;

        match &self.config.page_seg_mode {
            Some(psm) => tess
                .set_variable("tessedit_pageseg_mode", psm)
                .map_err(|e| OcrError::SetVariable(e.to_string())),
            None => Ok(tess),
        }
    }
}

fn oem(mode: EngineMode) -> OcrEngineMode {
    match mode {
        EngineMode::TesseractOnly => OcrEngineMode::TesseractOnly,
        EngineMode::LstmOnly => OcrEngineMode::LstmOnly,
        EngineMode::TesseractLstmCombined => OcrEngineMode::TesseractLstmCombined,
        EngineMode::Default => OcrEngineMode::Default,
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize_words(&self, image: &RgbImage) -> Result<Vec<OcrToken>, OcrError> {
        // Tesseract reads from disk, so hand the image over through a temp PNG
        let temp_file = Builder::new()
            .prefix("nric_ocr_")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::ImageHandoff(format!("Failed to create temp file: {}", e)))?;
        image
            .save_with_format(temp_file.path(), ImageFormat::Png)
            .map_err(|e| OcrError::ImageHandoff(format!("Failed to write temp file: {}", e)))?;
        let image_path = temp_file.path().to_str().ok_or_else(|| {
            OcrError::ImageHandoff("Failed to convert path to string".to_string())
        })?;

        let mut tess = self
            .init()?
            .set_image(image_path)
            .map_err(|e| OcrError::ImageHandoff(e.to_string()))?;

        let tsv = tess
            .get_tsv_text(0)
            .map_err(|e| OcrError::Recognition(e.to_string()))?;

        let tokens = parse_tsv(&tsv)?;
        log::debug!(
            "Tesseract found {} word(s) in {}x{} image",
            tokens.len(),
            image.width(),
            image.height()
        );
        Ok(tokens)
    }
}

/// Extracts word tokens from Tesseract TSV output.
///
/// Columns: level, page, block, par, line, word, left, top, width, height,
/// conf, text. Only word-level rows are kept; a leading header row and
/// truncated rows are skipped. Negative sizes are clamped to zero.
pub fn parse_tsv(tsv: &str) -> Result<Vec<OcrToken>, OcrError> {
    let mut tokens = Vec::new();

    for (row, line) in tsv.lines().enumerate() {
        let cols: Vec<&str> = line.splitn(TSV_COLUMNS, '\t').collect();
        if cols.len() < TSV_COLUMNS || cols[0] == "level" {
            continue;
        }
        let level: i32 = parse_column(cols[0], row, "level")?;
        if level != WORD_LEVEL {
            continue;
        }

        let left: i32 = parse_column(cols[6], row, "left")?;
        let top: i32 = parse_column(cols[7], row, "top")?;
        let width: i64 = parse_column(cols[8], row, "width")?;
        let height: i64 = parse_column(cols[9], row, "height")?;
        tokens.push(OcrToken::new(
            cols[11],
            BoundingBox::new(left, top, clamp_size(width), clamp_size(height)),
        ));
    }

    Ok(tokens)
}

fn parse_column<T>(value: &str, row: usize, name: &str) -> Result<T, OcrError>
where
    T: std::str::FromStr,
{
    value.trim().parse().map_err(|_| OcrError::MalformedOutput {
        row,
        message: format!("{} is not a number: {:?}", name, value),
    })
}

fn clamp_size(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t800\t600\t-1\t
4\t1\t1\t1\t1\t0\t36\t92\t400\t24\t-1\t
5\t1\t1\t1\t1\t1\t36\t92\t60\t24\t96.5\tPatient
5\t1\t1\t1\t1\t2\t110\t92\t120\t24\t91.0\tSI234567A
5\t1\t1\t1\t1\t3\t240\t92\t0\t24\t12.0\t
";

    #[test]
    fn test_parse_keeps_word_rows() {
        let tokens = parse_tsv(SAMPLE).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "Patient");
        assert_eq!(
            tokens[1],
            OcrToken::new("SI234567A", BoundingBox::new(110, 92, 120, 24))
        );
        assert_eq!(tokens[2].text, "");
        assert!(tokens[2].bounding_box.is_degenerate());
    }

    #[test]
    fn test_parse_without_header() {
        let tsv = "5\t1\t1\t1\t1\t1\t3\t4\t5\t6\t90\tS1234567D\n";
        let tokens = parse_tsv(tsv).unwrap();
        assert_eq!(
            tokens,
            vec![OcrToken::new("S1234567D", BoundingBox::new(3, 4, 5, 6))]
        );
    }

    #[test]
    fn test_parse_skips_truncated_rows() {
        let tsv = "5\t1\t1\n\n5\t1\t1\t1\t1\t1\t0\t0\t5\t5\t90\tok\n";
        assert_eq!(parse_tsv(tsv).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_clamps_negative_sizes() {
        let tsv = "5\t1\t1\t1\t1\t1\t-3\t-4\t-5\t7\t90\tword";
        let tokens = parse_tsv(tsv).unwrap();
        assert_eq!(tokens[0].bounding_box, BoundingBox::new(-3, -4, 0, 7));
    }

    #[test]
    fn test_parse_rejects_non_numeric_box() {
        let tsv = "5\t1\t1\t1\t1\t1\tleft\t0\t5\t5\t90\tword";
        match parse_tsv(tsv) {
            Err(OcrError::MalformedOutput { row, .. }) => assert_eq!(row, 0),
            other => panic!("expected malformed output, got {:?}", other),
        }
    }

    #[test]
    fn test_engine_mode_mapping() {
        assert!(matches!(oem(EngineMode::LstmOnly), OcrEngineMode::LstmOnly));
        assert!(matches!(
            oem(EngineMode::TesseractOnly),
            OcrEngineMode::TesseractOnly
        ));
        assert!(matches!(
            oem(EngineMode::TesseractLstmCombined),
            OcrEngineMode::TesseractLstmCombined
        ));
        assert!(matches!(oem(EngineMode::Default), OcrEngineMode::Default));
    }

    #[test]
    fn test_text_keeps_inner_spaces() {
        let tsv = "5\t1\t1\t1\t1\t1\t0\t0\t5\t5\t90\t: S1234567D";
        assert_eq!(parse_tsv(tsv).unwrap()[0].text, ": S1234567D");
    }
}
