//! Artwork frame removal CLI tool
//!
//! Command-line interface over the frame detector: single files or whole
//! directories, detection-only inspection with JSON output, or cropping
//! with format preservation.

use crate::{
    config::FrameDetectionConfig,
    detector::FrameDetector,
    services::{ImageIOService, SourceFormat},
    tracing_config::init_cli_tracing,
    types::FrameRemovalResult,
};
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Artwork frame detection and removal tool
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "artframe")]
pub(crate) struct Cli {
    /// Input image files or directories
    #[arg(value_name = "INPUT", required = true)]
    pub(crate) input: Vec<PathBuf>,

    /// Output directory (default: next to each input, with a `_cropped` suffix)
    #[arg(short, long, value_name = "DIR")]
    pub(crate) output: Option<PathBuf>,

    /// Only run detection and report results, do not write cropped images
    #[arg(long)]
    pub(crate) detect_only: bool,

    /// Print detection results as JSON (implies per-file reporting)
    #[arg(long)]
    pub(crate) json: bool,

    /// Minimum confidence required to accept a detection (0.0-1.0)
    #[arg(long)]
    pub(crate) min_confidence: Option<f64>,

    /// Sobel gradient-magnitude edge threshold
    #[arg(long)]
    pub(crate) edge_threshold: Option<f64>,

    /// Minimum accepted crop ratio (0.0-1.0)
    #[arg(long)]
    pub(crate) min_crop: Option<f64>,

    /// Maximum accepted crop ratio (0.0-1.0)
    #[arg(long)]
    pub(crate) max_crop: Option<f64>,

    /// Blur kernel size (sigma is kernel / 2)
    #[arg(long)]
    pub(crate) blur_kernel: Option<u32>,

    /// Process directories recursively
    #[arg(short, long)]
    pub(crate) recursive: bool,

    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub(crate) verbose: u8,
}

/// CLI entry point
///
/// # Errors
/// Returns an error for invalid arguments, unreadable inputs, or output
/// write failures. "No frame found" is a reported outcome, not an error.
pub fn main() -> Result<()> {
    let cli = Cli::parse();

    init_cli_tracing(cli.verbose).context("Failed to initialize tracing")?;

    let config = build_config(&cli).context("Invalid detection configuration")?;
    let detector = FrameDetector::new(config).context("Failed to create frame detector")?;

    let inputs = collect_inputs(&cli)?;
    if inputs.is_empty() {
        anyhow::bail!("No image files found in the given inputs");
    }

    info!("Processing {} image(s)", inputs.len());

    let progress = batch_progress(inputs.len() as u64);
    let start_time = Instant::now();
    let mut frames_found = 0usize;
    let mut failures = 0usize;

    for input in &inputs {
        if let Some(ref bar) = progress {
            bar.set_message(input.display().to_string());
        }

        match process_one(&cli, &detector, input) {
            Ok(found) => {
                if found {
                    frames_found += 1;
                }
            },
            Err(e) => {
                failures += 1;
                eprintln!("{}: {:#}", input.display(), e);
            },
        }

        if let Some(ref bar) = progress {
            bar.inc(1);
        }
    }

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    info!(
        "Processed {} image(s) in {:.2}s: {} with frames, {} failed",
        inputs.len(),
        start_time.elapsed().as_secs_f64(),
        frames_found,
        failures
    );

    if failures > 0 {
        anyhow::bail!("{} input(s) failed", failures);
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<FrameDetectionConfig> {
    let mut builder = FrameDetectionConfig::builder();

    if let Some(v) = cli.min_confidence {
        builder = builder.min_confidence(v);
    }
    if let Some(v) = cli.edge_threshold {
        builder = builder.edge_threshold(v);
    }
    if let Some(v) = cli.min_crop {
        builder = builder.min_crop_percentage(v);
    }
    if let Some(v) = cli.max_crop {
        builder = builder.max_crop_percentage(v);
    }
    if let Some(v) = cli.blur_kernel {
        builder = builder.blur_kernel_size(v);
    }

    Ok(builder.build()?)
}

/// Expand files and directories into the flat list of images to process
fn collect_inputs(cli: &Cli) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    for input in &cli.input {
        if input.is_file() {
            inputs.push(input.clone());
        } else if input.is_dir() {
            let max_depth = if cli.recursive { usize::MAX } else { 1 };
            for entry in WalkDir::new(input)
                .min_depth(1)
                .max_depth(max_depth)
                .sort_by_file_name()
                .into_iter()
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().is_file())
            {
                if ImageIOService::has_image_extension(entry.path()) {
                    inputs.push(entry.path().to_path_buf());
                }
            }
        } else {
            anyhow::bail!("Input does not exist: {}", input.display());
        }
    }

    Ok(inputs)
}

fn batch_progress(total: u64) -> Option<ProgressBar> {
    if total <= 1 {
        return None;
    }
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("[{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    Some(bar)
}

/// Process a single input; returns whether a frame was found
fn process_one(cli: &Cli, detector: &FrameDetector, input: &Path) -> Result<bool> {
    let bytes = ImageIOService::load_bytes(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    if cli.detect_only {
        let detection = detector.detect_frame(&bytes);
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&detection)?);
        } else {
            report_detection(input, detection.has_frame, detection.confidence);
        }
        return Ok(detection.has_frame);
    }

    let removal = detector.remove_frame(&bytes);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&removal.detection)?);
    }

    if !removal.success {
        anyhow::bail!(
            "frame removal failed: {}",
            removal.error.as_deref().unwrap_or("unknown error")
        );
    }

    if let Some(processed) = removal.processed_image.as_deref() {
        let output_path = output_path_for(cli, input, &bytes);
        ImageIOService::save_bytes(&output_path, processed)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        if !cli.json {
            report_removal(input, &output_path, &removal);
        }
        Ok(true)
    } else {
        if !cli.json {
            report_detection(input, false, removal.detection.confidence);
        }
        Ok(false)
    }
}

fn report_detection(input: &Path, has_frame: bool, confidence: f64) {
    if has_frame {
        println!(
            "{}: frame detected (confidence {:.2})",
            input.display(),
            confidence
        );
    } else {
        println!(
            "{}: no frame found (confidence {:.2})",
            input.display(),
            confidence
        );
    }
}

fn report_removal(input: &Path, output: &Path, removal: &FrameRemovalResult) {
    println!(
        "{} -> {} (confidence {:.2}, {}ms)",
        input.display(),
        output.display(),
        removal.detection.confidence,
        removal.processing_time_ms
    );
}

/// Derive the output path: `<output_dir>/<stem>_cropped.<ext>` or next to
/// the input when no output directory was given
fn output_path_for(cli: &Cli, input: &Path, original_bytes: &[u8]) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let extension = SourceFormat::detect(original_bytes).map_or("png", |f| f.extension());
    let file_name = format!("{}_cropped.{}", stem, extension);

    match &cli.output {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with_args(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("artframe").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_parses_basic_invocation() {
        let cli = cli_with_args(&["input.jpg"]);
        assert_eq!(cli.input, vec![PathBuf::from("input.jpg")]);
        assert!(!cli.detect_only);
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_parses_threshold_overrides() {
        let cli = cli_with_args(&[
            "in.png",
            "--min-confidence",
            "0.7",
            "--edge-threshold",
            "40",
            "--blur-kernel",
            "3",
            "-vv",
        ]);
        assert_eq!(cli.min_confidence, Some(0.7));
        assert_eq!(cli.edge_threshold, Some(40.0));
        assert_eq!(cli.blur_kernel, Some(3));
        assert_eq!(cli.verbose, 2);

        let config = build_config(&cli).unwrap();
        assert_eq!(config.min_confidence, 0.7);
        assert_eq!(config.edge_threshold, 40.0);
        assert_eq!(config.blur_kernel_size, 3);
    }

    #[test]
    fn test_cli_requires_input() {
        let result = Cli::try_parse_from(["artframe"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_overrides_rejected_at_config_build() {
        let cli = cli_with_args(&["in.png", "--min-crop", "0.9", "--max-crop", "0.5"]);
        assert!(build_config(&cli).is_err());
    }

    #[test]
    fn test_output_path_derivation() {
        let png_magic = b"\x89PNG\r\n\x1a\n";

        let cli = cli_with_args(&["in.png"]);
        let path = output_path_for(&cli, Path::new("gallery/in.png"), png_magic);
        assert_eq!(path, PathBuf::from("gallery/in_cropped.png"));

        let cli = cli_with_args(&["in.png", "-o", "out"]);
        let path = output_path_for(&cli, Path::new("gallery/in.png"), png_magic);
        assert_eq!(path, PathBuf::from("out/in_cropped.png"));
    }
}
