//! Extract command - read items from a single receipt.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use nota_core::receipt::SUPPORTED_EXTENSIONS;
use nota_core::{
    create_recognizer, format_item_report, import_receipt, ExtractedItem, ExtractionResult,
    NotaConfig, NotaError, ReceiptParser,
};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (receipt image, or .txt with OCR output)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (JSON prices are numbers, e.g. 24.9)
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// List name shown in the text report
    #[arg(long, default_value = "Nota fiscal")]
    title: String,

    /// Warn when quantity x unit price differs from the printed line total
    #[arg(long)]
    check_totals: bool,

    /// Show extraction statistics
    #[arg(long)]
    show_stats: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text report
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// How a file will be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Already-recognized text.
    Text,
    /// Receipt photo to run through OCR.
    Image,
}

pub fn input_kind(path: &Path) -> Option<InputKind> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "txt" | "text" => Some(InputKind::Text),
        ext if SUPPORTED_EXTENSIONS.contains(&ext) => Some(InputKind::Image),
        _ => None,
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.check_totals {
        config.extraction.check_line_totals = true;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = extract_file(&args.input, &config, &pb).await;
    pb.finish_and_clear();

    let result = result.map_err(|e| anyhow::anyhow!(e.user_message()))?;

    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    let output = format_items(&result.items, args.format, &args.title)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} items written to {}",
            style("✓").green(),
            result.items.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_stats {
        eprintln!();
        eprintln!(
            "{} Lines: {} total, {} noise, {} unmatched, {} rejected",
            style("ℹ").blue(),
            result.lines_total,
            result.lines_skipped_noise,
            result.lines_unmatched,
            result.lines_rejected
        );
        eprintln!(
            "{} Items: {} kept, {} duplicates, {} over limit",
            style("ℹ").blue(),
            result.items.len(),
            result.duplicates_removed,
            result.truncated
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Read one receipt file and extract its items.
pub async fn extract_file(
    path: &Path,
    config: &NotaConfig,
    pb: &ProgressBar,
) -> Result<ExtractionResult, NotaError> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    match input_kind(path) {
        Some(InputKind::Text) => {
            pb.set_message("Reading text...");
            let bytes = fs::read(path)?;
            let parser = ReceiptParser::with_config(config.extraction.clone());
            Ok(parser.parse_bytes(&bytes)?)
        }
        Some(InputKind::Image) => {
            pb.set_message("Running OCR...");
            let bytes = fs::read(path)?;
            let recognizer = create_recognizer(&config.ocr)?;
            let outcome = import_receipt(&bytes, filename, recognizer.as_ref(), config).await?;
            debug!(
                "{} read {} chars in {}ms",
                outcome.ocr.engine,
                outcome.ocr.text.len(),
                outcome.ocr.processing_time_ms
            );
            Ok(outcome.extraction)
        }
        None => Err(nota_core::OcrError::UnsupportedFormat(filename.to_string()).into()),
    }
}

pub fn format_items(items: &[ExtractedItem], format: OutputFormat, title: &str) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Csv => format_csv(items),
        OutputFormat::Text => Ok(format_item_report(
            title,
            items,
            chrono::Local::now().naive_local(),
        )),
    }
}

fn format_csv(items: &[ExtractedItem]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["description", "quantity", "unit_price", "subtotal"])?;

    for item in items {
        wtr.write_record([
            &item.description,
            &item.quantity.to_string(),
            &format!("{:.2}", item.unit_price),
            &format!("{:.2}", item.subtotal()),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
