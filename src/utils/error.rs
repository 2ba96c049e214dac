use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised inside the OCR backend.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Tesseract init error: {0}")]
    Initialize(String),
    #[error("Failed to hand image to OCR engine: {0}")]
    ImageHandoff(String),
    #[error("Tesseract set variable error: {0}")]
    SetVariable(String),
    #[error("Tesseract recognition error: {0}")]
    Recognition(String),
    #[error("Malformed OCR output at row {row}: {message}")]
    MalformedOutput { row: usize, message: String },
}

/// Coarse category of a [`MaskError`], for callers that only need to branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnreadableInput,
    OcrProcessing,
    Persistence,
    Config,
    ManualMask,
}

#[derive(Debug, Error)]
pub enum MaskError {
    #[error("Cannot read image: {}", path.display())]
    UnreadableInput {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("OCR failed: {0}")]
    OcrProcessing(#[from] OcrError),
    #[error("Failed to write masked image to: {}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Invalid configuration {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
    #[error("Invalid manual mask document: {0}")]
    ManualMask(#[from] serde_json::Error),
}

impl MaskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MaskError::UnreadableInput { .. } => ErrorKind::UnreadableInput,
            MaskError::OcrProcessing(_) => ErrorKind::OcrProcessing,
            MaskError::Persistence { .. } => ErrorKind::Persistence,
            MaskError::Config { .. } => ErrorKind::Config,
            MaskError::ManualMask(_) => ErrorKind::ManualMask,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ocr_error_maps_to_processing_kind() {
        let err: MaskError = OcrError::Recognition("engine crashed".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::OcrProcessing);
        assert!(err.to_string().contains("engine crashed"));
    }

    #[test]
    fn test_unreadable_message_names_path() {
        let err = MaskError::UnreadableInput {
            path: PathBuf::from("/tmp/missing.png"),
            source: image::ImageError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "not found",
            )),
        };
        assert_eq!(err.kind(), ErrorKind::UnreadableInput);
        assert_eq!(err.to_string(), "Cannot read image: /tmp/missing.png");
    }
}
