//! techtrend CLI: technology trends from job postings.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use techtrend::collect::{CollectOptions, collect};
use techtrend::config::CollectorConfig;
use techtrend::extract::TermExtractor;
use techtrend::history::HistoryStore;
use techtrend::history::store::{load_counts, save_counts};
use techtrend::posting::HttpPostingSource;
use techtrend::report;
use techtrend::vocab::Vocabulary;

#[derive(Parser)]
#[command(name = "techtrend", version, about = "Technology trends from job postings")]
struct Cli {
    /// Collector configuration (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// History file; overrides `history_path` from the config.
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    /// Custom vocabulary (TOML); overrides `vocabulary_path` from the config.
    #[arg(long, global = true)]
    vocabulary: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch postings, extract technologies and record today's counts.
    Collect {
        /// Date to record under (default: today, local time).
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Print results without touching the history.
        #[arg(long)]
        dry_run: bool,

        /// Also write the day's counts to this JSON file.
        #[arg(long)]
        counts_out: Option<PathBuf>,

        /// Process every posting, not only IT ones.
        #[arg(long)]
        all_categories: bool,
    },

    /// Extract technology labels from ad-hoc text.
    Extract {
        /// Text to scan.
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// File to scan.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Treat the input as HTML: decode entities and drop tags.
        #[arg(long)]
        html: bool,
    },

    /// Fold a counts JSON file into the history.
    Record {
        /// Counts file: `{"Label": n, ...}`.
        #[arg(long)]
        counts: PathBuf,

        /// Date to record under (default: today, UTC).
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Drop series that are zero on every date.
        #[arg(long)]
        prune: bool,
    },

    /// Summarize the recorded history.
    Show {
        /// First date to include.
        #[arg(long, conflicts_with = "month")]
        from: Option<NaiveDate>,

        /// Last date to include.
        #[arg(long, conflicts_with = "month")]
        to: Option<NaiveDate>,

        /// Calendar month, e.g. "2025-08".
        #[arg(long, value_parser = parse_month)]
        month: Option<YearMonth>,

        /// Number of labels per table.
        #[arg(long, default_value = "10")]
        top: usize,

        /// Include per-category totals for the latest date.
        #[arg(long)]
        categories: bool,
    },

    /// List vocabulary matchers in evaluation order.
    Vocab,
}

#[derive(Debug, Clone, Copy)]
struct YearMonth {
    year: i32,
    month: u32,
}

fn parse_month(s: &str) -> std::result::Result<YearMonth, String> {
    let first = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM: {e}"))?;
    Ok(YearMonth {
        year: first.year(),
        month: first.month(),
    })
}

fn load_vocabulary(path: Option<&Path>) -> Result<Vocabulary> {
    Ok(match path {
        Some(p) => Vocabulary::load(p)?,
        None => Vocabulary::bundled()?,
    })
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = CollectorConfig::load_or_default(cli.config.as_deref())?;
    if let Some(history) = cli.history {
        config.history_path = history;
    }
    if let Some(vocabulary) = cli.vocabulary {
        config.vocabulary_path = Some(vocabulary);
    }
    let store = HistoryStore::new(&config.history_path);

    match cli.command {
        Commands::Collect {
            date,
            dry_run,
            counts_out,
            all_categories,
        } => {
            let vocab = load_vocabulary(config.vocabulary_path.as_deref())?;
            let extractor = TermExtractor::new(&vocab)?;
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());

            // A corrupt history aborts the run before any request is made.
            let history = if dry_run { None } else { Some(store.load()?) };

            let source = HttpPostingSource::new(&config);
            let options = CollectOptions {
                all_categories,
                ..CollectOptions::from_config(&config)
            };
            println!("Fetching postings…");
            let run = collect(&source, &extractor, &options)?;
            print!("{}", report::run_report(&run));

            if let Some(path) = counts_out {
                save_counts(&path, &run.counts)?;
                println!("\nSaved counts to: {}", path.display());
            }

            if let Some(mut history) = history {
                history.record_day(date, &run.counts)?;
                store.save(&history)?;
                println!("\nSaved updated history for {date} to: {}", store.path().display());
            }
        }

        Commands::Extract { text, file, html } => {
            let raw = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path).into_diagnostic()?,
                (None, None) => std::io::read_to_string(std::io::stdin()).into_diagnostic()?,
            };
            let vocab = load_vocabulary(config.vocabulary_path.as_deref())?;
            let extractor = TermExtractor::new(&vocab)?;
            let normalizer = config.normalizer();
            let text = if html {
                normalizer.normalize(&raw)
            } else {
                normalizer.normalize_plain(&raw)
            };

            let labels = extractor.extract(&text);
            if labels.is_empty() {
                println!("No technology terms found.");
            } else {
                for label in labels {
                    println!("{label}");
                }
            }
        }

        Commands::Record {
            counts,
            date,
            prune,
        } => {
            let mut history = store.load()?;
            let counts = load_counts(&counts)?;
            let date = date.unwrap_or_else(|| chrono::Utc::now().date_naive());
            history.record_day(date, &counts)?;
            if prune {
                let removed = history.prune_zero_series();
                tracing::info!(removed, "pruned all-zero series");
            }
            store.save(&history)?;
            println!("Updated {} for {date}", store.path().display());
        }

        Commands::Show {
            from,
            to,
            month,
            top,
            categories,
        } => {
            let history = store.load()?;
            let view = match month {
                Some(ym) => history.month(ym.year, ym.month)?,
                None => history.window(from, to),
            };
            let vocab = if categories {
                Some(load_vocabulary(config.vocabulary_path.as_deref())?)
            } else {
                None
            };
            print!("{}", report::history_view(&view, top, vocab.as_ref()));
        }

        Commands::Vocab => {
            let vocab = load_vocabulary(config.vocabulary_path.as_deref())?;
            let extractor = TermExtractor::new(&vocab)?;
            print!("{}", report::vocabulary_listing(extractor.index()));
        }
    }

    Ok(())
}
