//! Command-line entry point.
//!
//! Combine survey exports and chart them:
//! ```sh
//! excel-chart-generator combine responses-a.xlsx responses-b.csv -o report/
//! ```
//!
//! Chart a score column:
//! ```sh
//! excel-chart-generator score marks.xlsx --column Score --max-score 5 \
//!     --title "Module feedback" -o scores.svg
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use excel_chart_generator::analysis::ScoreRequest;
use excel_chart_generator::build_info::BuildInfo;
use excel_chart_generator::config::Config;
use excel_chart_generator::generator::{run_combine, run_score};
use excel_chart_generator::Result;
use once_cell::sync::Lazy;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

static LONG_VERSION: Lazy<String> = Lazy::new(|| BuildInfo::current().to_string());

/// Combine Excel and CSV survey exports and render distribution charts
#[derive(Parser, Debug)]
#[command(
    name = "excel-chart-generator",
    about = "Combine Excel and CSV survey exports and render distribution charts",
    version,
    long_version = LONG_VERSION.as_str()
)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Combine exports into combined_data.xlsx and chart every column
    Combine {
        /// Input files (.xlsx, .xlsm, .csv, .tsv)
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Most words drawn in each word cloud
        #[arg(long, value_name = "N")]
        max_words: Option<usize>,
    },
    /// Chart the distribution of scores in one column
    Score {
        /// Input workbook; the first worksheet is read
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Header of the score column (case-insensitive)
        #[arg(short = 'C', long)]
        column: String,

        /// Highest valid score
        #[arg(short, long)]
        max_score: u32,

        /// Chart title
        #[arg(short, long)]
        title: String,

        /// Output SVG file
        #[arg(short, long, value_name = "FILE", default_value = "score_chart.svg")]
        output: PathBuf,
    },
    /// Print build information
    Info,
}

fn init_logging(args: &Args) {
    let default = if args.verbose {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    let mut config = Config::load_or_default(args.config.as_deref())?;

    match args.command {
        Command::Combine {
            inputs,
            output,
            max_words,
        } => {
            if let Some(max_words) = max_words {
                config.charts.word_cloud.max_words = max_words;
            }
            let report = run_combine(&inputs, &output, &config)?;
            println!("Combined data written to {}", report.workbook.display());
            println!(
                "{} charts written to {}",
                report.charts.written.len(),
                output.join(excel_chart_generator::generator::CHART_DIR).display()
            );
            for (column, reason) in &report.charts.skipped {
                info!(column = %column, %reason, "column not charted");
            }
        },
        Command::Score {
            input,
            column,
            max_score,
            title,
            output,
        } => {
            let request = ScoreRequest::new(column, max_score, title);
            let distribution = run_score(&input, &request, &output, &config)?;
            for (label, _) in distribution.slices() {
                println!("{}", label);
            }
            println!("Chart written to {}", output.display());
        },
        Command::Info => println!("{}", BuildInfo::current()),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        },
    }
}
