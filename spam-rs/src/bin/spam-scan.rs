//! CLI tool for scoring messages offline
//!
//! # Usage
//!
//! ```bash
//! # Score a single message
//! spam-scan score "FREE FREE FREE!!!! click here now www.example.com"
//!
//! # Score the contents of a file as one message
//! spam-scan score --file message.txt
//!
//! # Analyze a CSV or text file, one message per row/line
//! spam-scan batch emails.csv --report
//!
//! # Use a custom lexicon
//! spam-scan --lexicon lexicon.toml score "cheap pills"
//! ```

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use spam_rs::batch::{parse_messages, BatchAnalyzer, UploadFormat};
use spam_rs::config::BatchConfig;
use spam_rs::history::report_to_csv;
use spam_rs::spam::{LexicalScorer, Lexicons};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "spam-scan")]
#[command(about = "Score messages with the lexical spam scorer", long_about = None)]
struct Cli {
    /// TOML lexicon file replacing the built-in word lists
    #[arg(short, long)]
    lexicon: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one message and print the result as JSON
    Score {
        /// Message text
        text: Option<String>,
        /// Read the message from a file instead
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Number of influential words to keep (all when omitted)
        #[arg(short, long)]
        top: Option<usize>,
    },
    /// Score every message of a .csv or .txt file
    Batch {
        /// Input file
        path: PathBuf,
        /// Print the full report as CSV instead of the JSON summary
        #[arg(long)]
        csv: bool,
        /// Print the full report as JSON instead of only the summary
        #[arg(long, conflicts_with = "csv")]
        report: bool,
        /// Parallel scoring tasks
        #[arg(short, long)]
        workers: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let scorer = match &cli.lexicon {
        Some(path) => {
            let lexicons = Lexicons::from_file(path)
                .with_context(|| format!("failed to load lexicon {}", path.display()))?;
            LexicalScorer::with_lexicons(lexicons)?
        }
        None => LexicalScorer::new(),
    };

    match cli.command {
        Commands::Score { text, file, top } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(file)) => std::fs::read_to_string(&file)
                    .with_context(|| format!("failed to read {}", file.display()))?,
                (None, None) => bail!("provide a message or --file"),
            };

            let mut result = scorer.score(&text);
            if let Some(top) = top {
                result.word_influence.truncate(top);
            }
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Batch {
            path,
            csv,
            report,
            workers,
        } => {
            let file_name = path.to_string_lossy().to_string();
            let format = UploadFormat::from_file_name(&file_name)?;
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let messages = parse_messages(&content, format)?;

            let mut config = BatchConfig::default();
            if let Some(workers) = workers {
                config.workers = workers;
            }

            let analyzer = BatchAnalyzer::new(Arc::new(scorer), &config);
            let batch = analyzer.analyze("cli", messages).await?;

            if csv {
                print!("{}", report_to_csv(&batch)?);
            } else if report {
                println!("{}", serde_json::to_string_pretty(&batch)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&batch.summary)?);
            }
        }
    }

    Ok(())
}
