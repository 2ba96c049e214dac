// NRIC/FIN masking tool
// Finds Singapore identity numbers in screenshots and blacks them out

use clap::{Parser, Subcommand};
use nric_mask::{batch, models::ManualMask, MaskConfig, MaskError, MaskFileOptions, NricMasker};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "nric-mask", version, about = "Mask NRIC-like identifiers in images")]
struct Cli {
    /// JSON configuration file (OCR language, tessdata path, colours, naming)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mask a single image
    Mask {
        /// Path to input image file
        input: PathBuf,

        /// Output image path (default: masked_<name>.jpg next to the input)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print every OCR token and whether it matched
        #[arg(long)]
        debug: bool,

        /// Canvas JSON export with extra rectangles to mask
        #[arg(long)]
        manual_masks: Option<PathBuf>,

        /// Also write a copy with suspected identifiers outlined
        #[arg(long)]
        preview: Option<PathBuf>,
    },
    /// Mask every image in a directory
    Batch {
        /// Directory containing jpg/png/bmp/tiff images
        dir: PathBuf,

        /// Directory for the masked images
        #[arg(long)]
        out_dir: PathBuf,

        /// Write a JSON summary of the run here
        #[arg(long)]
        report: Option<PathBuf>,

        #[arg(long)]
        debug: bool,
    },
}

fn load_config(path: Option<&Path>) -> Result<MaskConfig, MaskError> {
    match path {
        Some(path) => MaskConfig::from_file(path),
        None => Ok(MaskConfig::default()),
    }
}

fn run_mask(
    masker: &NricMasker,
    input: &Path,
    out: Option<&Path>,
    debug: bool,
    manual_masks: Option<&Path>,
    preview: Option<PathBuf>,
) -> Result<(), MaskError> {
    let manual_masks = match manual_masks {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(serde_json::Error::io)?;
            ManualMask::parse_canvas_json(&json)?
        }
        None => Vec::new(),
    };

    let options = MaskFileOptions {
        debug,
        manual_masks,
        preview_path: preview,
    };
    let outcome = masker.mask_file_with(input, out, &options)?;

    println!(
        "Wrote {} (masked {} region(s)).",
        outcome.output_path.display(),
        outcome.masked_count
    );
    if outcome.manual_count > 0 {
        println!("  + {} manual mask(s)", outcome.manual_count);
    }
    Ok(())
}

fn run_batch(
    masker: &NricMasker,
    dir: &Path,
    out_dir: &Path,
    report_path: Option<&Path>,
    debug: bool,
) -> Result<bool, MaskError> {
    let inputs = batch::collect_images(dir)?;
    if inputs.is_empty() {
        println!("No images found in {}", dir.display());
        return Ok(true);
    }
    std::fs::create_dir_all(out_dir).map_err(|e| MaskError::Persistence {
        path: out_dir.to_path_buf(),
        source: image::ImageError::IoError(e),
    })?;

    let report = batch::mask_files(masker, &inputs, out_dir, debug);
    for entry in &report.entries {
        match &entry.error {
            None => println!(
                "{} - masked {} region(s)",
                entry.input.display(),
                entry.masked_count
            ),
            Some(err) => println!("{} - FAILED: {}", entry.input.display(), err),
        }
    }
    println!(
        "\n{} image(s), {} region(s) masked, {} failure(s)",
        report.entries.len(),
        report.total_masked,
        report.failures
    );

    if let Some(path) = report_path {
        report
            .write_json(path)
            .map_err(|e| MaskError::Persistence {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(e),
            })?;
    }
    Ok(report.failures == 0)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };
    let masker = NricMasker::new(config);

    let result = match cli.command {
        Command::Mask {
            input,
            out,
            debug,
            manual_masks,
            preview,
        } => run_mask(
            &masker,
            &input,
            out.as_deref(),
            debug,
            manual_masks.as_deref(),
            preview,
        )
        .map(|_| true),
        Command::Batch {
            dir,
            out_dir,
            report,
            debug,
        } => run_batch(&masker, &dir, &out_dir, report.as_deref(), debug),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
