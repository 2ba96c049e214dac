use crate::config::OutputConfig;
use crate::utils::MaskError;
use image::io::Reader;
use image::{ImageError, RgbImage};
use std::path::{Path, PathBuf};

pub struct ImageProcessor;

impl ImageProcessor {
    /// Decodes `path` into a three-channel image. The format is sniffed from
    /// the file contents, so a misnamed or extensionless file still loads.
    pub fn load_image(path: &Path) -> Result<RgbImage, MaskError> {
        let unreadable = |source: ImageError| MaskError::UnreadableInput {
            path: path.to_path_buf(),
            source,
        };
        let img = Reader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| unreadable(ImageError::IoError(e)))?
            .decode()
            .map_err(unreadable)?;
        Ok(img.into_rgb8())
    }

    /// Encodes `image` to `path`; the format follows the file extension.
    pub fn save_image(image: &RgbImage, path: &Path) -> Result<(), MaskError> {
        image.save(path).map_err(|source| MaskError::Persistence {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `<dir of input>/<prefix><stem>.<extension>`
    pub fn derive_output_path(input: &Path, output: &OutputConfig) -> PathBuf {
        let dir = input.parent().unwrap_or_else(|| Path::new(""));
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        dir.join(format!("{}{}.{}", output.prefix, stem, output.extension))
    }

    /// `<dir>/<prefix><file name>.<extension>`, keeping the input's own
    /// extension so `scan.png` and `scan.jpg` never share an output.
    pub fn batch_output_path(dir: &Path, input: &Path, output: &OutputConfig) -> PathBuf {
        let name = input
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        dir.join(format!("{}{}.{}", output.prefix, name, output.extension))
    }
}
