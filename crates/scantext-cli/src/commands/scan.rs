//! Scan command - extract fields from a single receipt.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use scantext_core::{
    ExtractionResult, FieldExplanation, FieldExtractor, FinalDocument, HistoryEntry, Language,
    PureOcrEngine, RawText, ReceiptExtractor, ScanConfig, Summary, TextRecognizer,
};

use super::config::{default_history_path, load_config};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input file: OCR text (.txt), an image, or "-" for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Label language (id, en)
    #[arg(short, long)]
    lang: Option<Language>,

    /// Model directory for image input
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Include every candidate each rule considered
    #[arg(long)]
    explain: bool,

    /// Append this scan to the history file
    #[arg(long)]
    record: bool,

    /// History file (default: platform data dir)
    #[arg(long)]
    history_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV field/value table
    Csv,
    /// Plain text document
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// How an input path is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Stdin,
    Text,
    Image,
}

impl InputKind {
    pub fn detect(path: &Path) -> anyhow::Result<Self> {
        if path == Path::new("-") {
            return Ok(InputKind::Stdin);
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "txt" | "text" => Ok(InputKind::Text),
            "png" | "jpg" | "jpeg" | "webp" | "tiff" | "tif" | "bmp" => Ok(InputKind::Image),
            _ => anyhow::bail!("Unsupported file format: {}", extension),
        }
    }

    pub fn is_supported(path: &Path) -> bool {
        matches!(Self::detect(path), Ok(InputKind::Text | InputKind::Image))
    }
}

/// Everything one scan produced.
pub struct Scan {
    pub source: String,
    pub scanned_at: DateTime<Utc>,
    pub raw_text: RawText,
    pub result: ExtractionResult,
}

impl Scan {
    pub fn into_history_entry(self) -> HistoryEntry {
        HistoryEntry::at(self.scanned_at, self.source, self.raw_text, self.result)
    }
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let language = args.lang.unwrap_or(config.output.language);
    let extractor = ReceiptExtractor::with_config(config.extraction.clone())?;

    let kind = InputKind::detect(&args.input)?;
    if kind != InputKind::Stdin && !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Scanning {}", args.input.display());

    let raw_text = match kind {
        InputKind::Stdin => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            RawText::from_text(&text)
        }
        InputKind::Text => read_text_file(&args.input)?,
        InputKind::Image => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
            pb.enable_steady_tick(Duration::from_millis(100));

            pb.set_message("Loading OCR models...");
            let engine = load_engine(&config, args.model_dir.as_deref())?;

            pb.set_message("Running OCR...");
            let raw = recognize_image(&args.input, &engine)?;
            pb.finish_and_clear();
            raw
        }
    };

    let scan = Scan {
        source: source_label(&args.input),
        scanned_at: Utc::now(),
        result: extractor.extract(&raw_text),
        raw_text,
    };

    let explanation = args.explain.then(|| extractor.explain(&scan.raw_text));
    let output = format_scan(&scan, &extractor, language, args.format, explanation.as_deref())?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    if args.record || config.output.record_history {
        let history_path = args.history_file.clone().unwrap_or_else(default_history_path);
        scan.into_history_entry().append_to_file(&history_path)?;
        eprintln!(
            "{} Recorded in {}",
            style("✓").green(),
            history_path.display()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// File name shown in documents and history.
pub fn source_label(path: &Path) -> String {
    if path == Path::new("-") {
        return "stdin".to_string();
    }
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

pub fn read_text_file(path: &Path) -> anyhow::Result<RawText> {
    let text = fs::read_to_string(path)?;
    let raw = RawText::from_text(&text);
    if raw.is_blank() {
        warn!("{} contains no text", path.display());
    }
    Ok(raw)
}

pub fn load_engine(config: &ScanConfig, model_dir: Option<&Path>) -> anyhow::Result<PureOcrEngine> {
    let model_dir = model_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.models.model_dir.clone());

    PureOcrEngine::from_dir(&model_dir, &config.models, config.ocr.clone()).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load OCR models: {}\n\n\
             Place {}, {} and {} in {} or pass --model-dir.",
            e,
            config.models.detection_model,
            config.models.recognition_model,
            config.models.dictionary,
            model_dir.display()
        )
    })
}

pub fn recognize_image(path: &Path, engine: &dyn TextRecognizer) -> anyhow::Result<RawText> {
    let image = image::open(path)?;
    let raw = engine.recognize(&image)?;

    if raw.is_blank() {
        anyhow::bail!("No text detected in image");
    }

    debug!("OCR produced {} lines", raw.len());
    Ok(raw)
}

/// Values parsed out of the extracted strings.
#[derive(Serialize)]
struct ParsedValues {
    date: Option<NaiveDate>,
    total: Option<Decimal>,
}

#[derive(Serialize)]
struct ScanReport<'a> {
    source: &'a str,
    scanned_at: DateTime<Utc>,
    result: &'a ExtractionResult,
    parsed: ParsedValues,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<&'a [FieldExplanation]>,
}

pub fn format_scan(
    scan: &Scan,
    extractor: &ReceiptExtractor,
    language: Language,
    format: OutputFormat,
    explanation: Option<&[FieldExplanation]>,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let report = ScanReport {
                source: &scan.source,
                scanned_at: scan.scanned_at,
                result: &scan.result,
                parsed: ParsedValues {
                    date: extractor.parse_date(&scan.result.date),
                    total: extractor.parse_total(&scan.result.total),
                },
                explanation,
            };
            let mut json = serde_json::to_string_pretty(&report)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Csv => format_csv(&scan.result, language),
        OutputFormat::Text => {
            let mut output = FinalDocument::new(&scan.result, &scan.raw_text, language)
                .with_source(scan.source.as_str())
                .with_timestamp(scan.scanned_at)
                .render();
            if let Some(explanation) = explanation {
                output.push('\n');
                output.push_str(&format_explanation(explanation, language));
            }
            Ok(output)
        }
    }
}

/// Field/value table, one row per field.
pub fn format_csv(result: &ExtractionResult, language: Language) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(language.table_header())?;
    for (label, value) in Summary::new(result, language).pairs() {
        wtr.write_record([label, value])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_explanation(explanation: &[FieldExplanation], language: Language) -> String {
    let mut output = String::from("--- Candidates ---\n");

    for field in explanation {
        output.push_str(&format!(
            "{} -> {}\n",
            language.label(field.kind),
            field.chosen.display_or(language.placeholder())
        ));
        for candidate in &field.candidates {
            let position = candidate
                .position
                .map(|(s, e)| format!("{}..{}", s, e))
                .unwrap_or_default();
            output.push_str(&format!(
                "    {:?} {} [{}]\n",
                candidate.tier, candidate.value, position
            ));
        }
    }

    output
}
