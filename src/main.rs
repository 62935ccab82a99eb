//! PII masking CLI application.
//!
//! This binary wraps the piimask library: it reads a document, image or
//! directory of video frames, masks the selected PII categories and writes
//! the result next to the input format.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use piimask::redaction::DETECTION_GAP_NOTICE;
use piimask::{
    BuiltinCategory, DocumentKind, MaskConfig, RedactionSelection, RedactionService,
};

/// PII Masking Tool
///
/// Mask emails, phone numbers, account numbers, routing codes and national
/// IDs in text, DOCX, PDF and image files, or in a directory of video frames.
#[derive(Parser)]
#[command(name = "piimask")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input file path (txt, docx, pdf, png, jpg, bmp, tiff)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(flatten)]
    masking: MaskingArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every masking command.
#[derive(clap::Args, Clone)]
struct MaskingArgs {
    /// Category to mask (can be specified multiple times; see `categories`)
    #[arg(short, long = "category", value_name = "NAME", global = true)]
    categories: Vec<String>,

    /// Mask every built-in category
    #[arg(long, conflicts_with = "categories", global = true)]
    all: bool,

    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Replace text with a run of mask characters instead of a label
    #[arg(long, global = true)]
    preserve_length: bool,

    /// Label written over masked text
    #[arg(long, value_name = "TEXT", global = true)]
    label: Option<String>,

    /// Fill boxes with solid black instead of blurring them
    #[arg(long, global = true)]
    fill: bool,

    /// Blur radius in pixels
    #[arg(long, value_name = "PIXELS", global = true)]
    blur_radius: Option<f32>,

    /// Path to the tesseract executable
    #[arg(long, value_name = "PATH", global = true)]
    tesseract: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text units from a file (for debugging and verification)
    Extract {
        /// Input file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output text file (optional, defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Mask a directory of video frames, keeping frame names and order
    Frames {
        /// Directory of input frames
        #[arg(long, value_name = "DIR")]
        input_dir: PathBuf,

        /// Directory for masked frames
        #[arg(long, value_name = "DIR")]
        output_dir: PathBuf,

        /// Obscure whole frames that cannot be read instead of keeping them
        #[arg(long)]
        blur_failed: bool,
    },

    /// List the built-in categories
    Categories,
}

impl MaskingArgs {
    /// Loads the configuration file (if any) and applies flag overrides.
    fn load_config(&self) -> Result<MaskConfig> {
        let mut config = match &self.config {
            Some(path) => MaskConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => MaskConfig::default(),
        };

        if self.preserve_length {
            config.mask_mode = piimask::config::MaskModeSetting::PreserveLength;
        }
        if let Some(label) = &self.label {
            config.label = label.clone();
        }
        if self.fill {
            config.obscure = piimask::config::ObscureSetting::Fill;
        }
        if let Some(radius) = self.blur_radius {
            config.blur_radius = radius;
        }
        if let Some(tesseract) = &self.tesseract {
            config.ocr.binary_path = tesseract.clone();
        }

        Ok(config)
    }

    fn selection(&self) -> RedactionSelection {
        if self.all {
            RedactionSelection::all_builtin()
        } else {
            RedactionSelection::new(self.categories.iter().cloned())
        }
    }
}

/// Command handler holding the configured service.
struct MaskHandler {
    service: RedactionService,
    verbose: bool,
}

impl MaskHandler {
    fn new(config: &MaskConfig, verbose: bool) -> Result<Self> {
        let service = RedactionService::new(config).context("Invalid configuration")?;
        Ok(Self { service, verbose })
    }

    /// Masks a single file.
    fn mask(&self, input: &Path, output: &Path, selection: &RedactionSelection) -> Result<()> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }
        let kind = DocumentKind::from_path(input)?;
        let output_kind = DocumentKind::from_path(output)?;
        if output_kind.is_image() != kind.is_image()
            || (!kind.is_image() && output_kind != kind)
        {
            let expected = kind
                .writer()
                .map(|w| format!("a .{} file", w.extension()))
                .unwrap_or_else(|| "an image file".to_string());
            anyhow::bail!(
                "Output {} must be {} to match input {}",
                output.display(),
                expected,
                input.display()
            );
        }

        if selection.is_empty() {
            eprintln!("⚠ No categories selected; output is an unchanged copy of the input");
        }

        if self.verbose {
            println!("Input:  {}", input.display());
            println!("Output: {}", output.display());
            println!(
                "Categories: {}",
                selection.iter().collect::<Vec<_>>().join(", ")
            );
        }

        let bytes = std::fs::read(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        // Images are re-encoded in the output's format
        let masked = self
            .service
            .mask_document(&bytes, output_kind, selection)
            .with_context(|| "Masking failed")?;

        if !masked.text_extracted {
            anyhow::bail!("No text extracted from {}", input.display());
        }

        std::fs::write(output, &masked.bytes)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        if self.verbose {
            println!("\nMasking Summary:");
            println!("  Units processed: {}", masked.result.units_processed);
            println!("  Units modified:  {}", masked.result.units_modified);
            println!("  Instances masked: {}", masked.result.instances_redacted);
        }

        if masked.result.has_redactions() {
            println!(
                "✓ Successfully masked {} instance(s) → {}",
                masked.result.instances_redacted,
                output.display()
            );
        } else {
            println!("⚠ No instances found to mask");
        }
        if kind.is_image() && !selection.is_empty() {
            println!("ℹ {}", DETECTION_GAP_NOTICE);
        }

        Ok(())
    }

    /// Masks every frame in a directory.
    fn frames(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        selection: &RedactionSelection,
    ) -> Result<()> {
        if !input_dir.is_dir() {
            anyhow::bail!("Input directory does not exist: {}", input_dir.display());
        }

        let (directory, frames) = piimask::extract::FrameDirectory::load(input_dir)
            .with_context(|| format!("Failed to load frames from {}", input_dir.display()))?;
        if directory.is_empty() {
            anyhow::bail!("No frame images found in {}", input_dir.display());
        }

        let output = self
            .service
            .mask_video(&frames, selection, None)
            .with_context(|| "Frame masking failed")?;
        directory
            .save(output_dir, &output.frames)
            .with_context(|| format!("Failed to write frames to {}", output_dir.display()))?;

        if self.verbose {
            println!("\nMasking Summary:");
            println!("  Frames processed: {}", output.result.units_processed);
            println!("  Frames modified:  {}", output.result.units_modified);
            println!("  Boxes masked: {}", output.boxes_found);
        }
        if !output.failed_frames.is_empty() {
            eprintln!(
                "⚠ {} frame(s) could not be read: {:?}",
                output.failed_frames.len(),
                output.failed_frames
            );
        }
        println!(
            "✓ Masked {} frame(s) → {}",
            output.frames.len(),
            output_dir.display()
        );
        println!("ℹ {}", DETECTION_GAP_NOTICE);

        Ok(())
    }

    /// Extracts text units from a file.
    fn extract(&self, input: &Path, output: Option<&Path>) -> Result<()> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }

        let kind = DocumentKind::from_path(input)?;
        let bytes = std::fs::read(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        let blocks = self
            .service
            .extract_blocks(&bytes, kind)
            .with_context(|| "Text extraction failed")?;
        let text = blocks.join("\n\n");

        if let Some(output_path) = output {
            std::fs::write(output_path, &text)
                .with_context(|| format!("Failed to write to {}", output_path.display()))?;
            println!(
                "✓ Extracted {} unit(s) → {}",
                blocks.len(),
                output_path.display()
            );
        } else {
            println!("{}", text);
        }

        Ok(())
    }
}

fn list_categories() {
    for category in BuiltinCategory::ALL {
        println!(
            "{:<14} {:<40} aliases: {}",
            category.name(),
            category.description(),
            category.aliases().join(", ")
        );
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "piimask=debug" } else { "piimask=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = cli.masking.load_config()?;
    if let Some(Commands::Frames { blur_failed: true, .. }) = &cli.command {
        config.frame_fallback = piimask::FrameFallback::BlurWhole;
    }
    let handler = MaskHandler::new(&config, cli.verbose)?;
    let selection = cli.masking.selection();

    match &cli.command {
        Some(Commands::Extract { input, output }) => {
            handler.extract(input, output.as_deref())?;
        }
        Some(Commands::Frames {
            input_dir,
            output_dir,
            ..
        }) => {
            handler.frames(input_dir, output_dir, &selection)?;
        }
        Some(Commands::Categories) => list_categories(),
        None => {
            // Default: masking mode
            let input = cli
                .input
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--input is required"))?;
            let output = cli
                .output
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--output is required"))?;

            handler.mask(input, output, &selection)?;
        }
    }

    Ok(())
}
