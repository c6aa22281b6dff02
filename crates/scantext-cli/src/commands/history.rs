//! History command - inspect recorded scans.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use scantext_core::{FinalDocument, Language, ScanHistory};

use super::config::{default_history_path, load_config};

/// Arguments for the history command.
#[derive(Args)]
pub struct HistoryArgs {
    /// History file (default: platform data dir)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: HistoryCommand,
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List recorded scans
    List,

    /// Show one recorded scan as a document
    Show {
        /// Scan number as shown by `list` (1 = oldest)
        number: usize,

        /// Label language (id, en; default: from config)
        #[arg(short, long)]
        lang: Option<Language>,
    },

    /// Delete the history file
    Clear,

    /// Show history file path
    Path,
}

pub async fn run(args: HistoryArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = args.file.unwrap_or_else(default_history_path);

    match args.command {
        HistoryCommand::List => {
            let history = ScanHistory::from_file(&path)?;
            if history.is_empty() {
                println!("{} No scans recorded.", style("ℹ").blue());
                return Ok(());
            }

            for (i, entry) in history.entries().iter().enumerate() {
                println!(
                    "{:>3}  {}  {:<24} {:<24} {}",
                    i + 1,
                    entry.scanned_at.format("%Y-%m-%d %H:%M"),
                    entry.source,
                    entry.result.store_name.display_or("-"),
                    entry.result.total.display_or("-"),
                );
            }
        }
        HistoryCommand::Show { number, lang } => {
            let history = ScanHistory::from_file(&path)?;
            let entry = history.get(number).ok_or_else(|| {
                anyhow::anyhow!("No scan #{} ({} recorded)", number, history.len())
            })?;

            let lang = match lang {
                Some(lang) => lang,
                None => load_config(config_path)?.output.language,
            };
            let document = FinalDocument::new(&entry.result, &entry.raw_text, lang)
                .with_source(entry.source.as_str())
                .with_timestamp(entry.scanned_at);
            print!("{}", document);
        }
        HistoryCommand::Clear => {
            if path.exists() {
                fs::remove_file(&path)?;
                println!("{} Removed {}", style("✓").green(), path.display());
            } else {
                println!("{} Nothing to clear.", style("ℹ").blue());
            }
        }
        HistoryCommand::Path => {
            println!("History file: {}", path.display());
        }
    }

    Ok(())
}
