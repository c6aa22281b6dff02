//! Batch processing command for multiple receipts.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use scantext_core::{FieldExtractor, Language, PureOcrEngine, ReceiptExtractor, ScanConfig};

use super::config::{default_history_path, load_config};
use super::scan::{
    format_scan, load_engine, read_text_file, recognize_image, source_label, InputKind,
    OutputFormat, Scan,
};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Label language (id, en)
    #[arg(short, long)]
    lang: Option<Language>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory for image inputs
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Append every successful scan to the history file
    #[arg(long)]
    record: bool,

    /// History file (default: platform data dir)
    #[arg(long)]
    history_file: Option<PathBuf>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    scan: Option<Scan>,
    error: Option<String>,
    processing_time_ms: u64,
}

/// Loads the OCR engine on the first image only.
struct LazyEngine<'a> {
    config: &'a ScanConfig,
    model_dir: Option<&'a Path>,
    engine: Option<PureOcrEngine>,
}

impl LazyEngine<'_> {
    fn get(&mut self) -> anyhow::Result<&PureOcrEngine> {
        if self.engine.is_none() {
            self.engine = Some(load_engine(self.config, self.model_dir)?);
        }
        self.engine
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("OCR engine unavailable"))
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let language = args.lang.unwrap_or(config.output.language);
    let extractor = ReceiptExtractor::with_config(config.extraction.clone())?;

    // Expand glob pattern
    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| InputKind::is_supported(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut engine = LazyEngine {
        config: &config,
        model_dir: args.model_dir.as_deref(),
        engine: None,
    };

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&path, &extractor, &mut engine);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(scan) => {
                results.push(ProcessResult {
                    path,
                    scan: Some(scan),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        scan: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    overall_pb.abandon();
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    // Write per-file outputs
    if let Some(output_dir) = &args.output_dir {
        let names = output_names(&results);
        for (result, output_name) in results.iter().zip(&names) {
            if let Some(scan) = &result.scan {
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                let content = format_scan(scan, &extractor, language, args.format, None)?;
                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results, &extractor)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let successful: Vec<&ProcessResult> = results.iter().filter(|r| r.scan.is_some()).collect();
    let failed: Vec<&ProcessResult> = results.iter().filter(|r| r.error.is_some()).collect();

    let grand_total = successful
        .iter()
        .filter_map(|r| r.scan.as_ref())
        .filter_map(|s| extractor.parse_total(&s.result.total))
        .try_fold(Decimal::ZERO, |sum, amount| sum.checked_add(amount));

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );
    match grand_total {
        Some(total) => eprintln!(
            "   {}: {} {}",
            language.label(scantext_core::FieldKind::Total),
            config.extraction.currency_symbol,
            total
        ),
        None => {
            warn!("Sum of totals overflowed");
            eprintln!(
                "   {}: {} (sum overflows)",
                language.label(scantext_core::FieldKind::Total),
                style("unavailable").yellow()
            );
        }
    }

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if args.record || config.output.record_history {
        let history_path = args.history_file.clone().unwrap_or_else(default_history_path);
        let mut recorded = 0;
        for result in results {
            if let Some(scan) = result.scan {
                scan.into_history_entry().append_to_file(&history_path)?;
                recorded += 1;
            }
        }
        eprintln!(
            "{} Recorded {} scans in {}",
            style("✓").green(),
            recorded,
            history_path.display()
        );
    }

    Ok(())
}

/// Output base name per result: the file stem, or `stem.ext` when two
/// inputs share a stem.
fn output_names(results: &[ProcessResult]) -> Vec<String> {
    let stem = |path: &Path| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("receipt")
            .to_string()
    };

    let mut counts: HashMap<String, usize> = HashMap::new();
    for result in results {
        *counts.entry(stem(&result.path)).or_default() += 1;
    }

    results
        .iter()
        .map(|result| {
            let name = stem(&result.path);
            match result.path.extension().and_then(|e| e.to_str()) {
                Some(ext) if counts[&name] > 1 => format!("{}.{}", name, ext),
                _ => name,
            }
        })
        .collect()
}

fn process_single_file(
    path: &Path,
    extractor: &ReceiptExtractor,
    engine: &mut LazyEngine<'_>,
) -> anyhow::Result<Scan> {
    let raw_text = match InputKind::detect(path)? {
        InputKind::Image => recognize_image(path, engine.get()?)?,
        _ => read_text_file(path)?,
    };

    Ok(Scan {
        source: source_label(path),
        scanned_at: Utc::now(),
        result: extractor.extract(&raw_text),
        raw_text,
    })
}

fn write_summary(
    path: &Path,
    results: &[ProcessResult],
    extractor: &ReceiptExtractor,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "store_name",
        "date",
        "date_iso",
        "phone",
        "total",
        "amount",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");

        if let Some(scan) = &result.scan {
            let fields = &scan.result;
            wtr.write_record([
                filename,
                "success",
                fields.store_name.value().unwrap_or(""),
                fields.date.value().unwrap_or(""),
                &extractor
                    .parse_date(&fields.date)
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                fields.phone.value().unwrap_or(""),
                fields.total.value().unwrap_or(""),
                &extractor
                    .parse_total(&fields.total)
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
