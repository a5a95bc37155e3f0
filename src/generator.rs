//! End-to-end pipelines behind the `combine` and `score` commands.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::analysis::{
    Categorized, ScoreDistribution, ScoreRequest, Share, combine_files, value_distribution,
    write_combined, yes_no_distribution,
};
use crate::chart::naming::{clean_title, pie_chart_file, word_cloud_file};
use crate::chart::{PieChart, WordCloud, write_svg};
use crate::common::{Error, Result};
use crate::config::{ChartConfig, Config};
use crate::sheet::Workbook;

/// Name of the chart directory inside the output directory.
pub const CHART_DIR: &str = "charts";

/// Outcome of a chart run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartReport {
    /// Charts written, in file name order
    pub written: Vec<PathBuf>,
    /// `(column, reason)` for columns that got no chart
    pub skipped: Vec<(String, String)>,
}

/// Outcome of `combine`.
#[derive(Debug, Clone, PartialEq)]
pub struct CombineReport {
    pub workbook: PathBuf,
    pub charts: ChartReport,
}

enum ChartJob {
    Pie { column: String, title: String, shares: Vec<Share> },
    Cloud { column: String, title: String, text: String },
}

impl ChartJob {
    fn column(&self) -> &str {
        match self {
            ChartJob::Pie { column, .. } | ChartJob::Cloud { column, .. } => column,
        }
    }

    fn file_name(&self) -> String {
        match self {
            ChartJob::Pie { column, .. } => pie_chart_file(column),
            ChartJob::Cloud { column, .. } => word_cloud_file(column),
        }
    }

    fn render(&self, config: &ChartConfig) -> Result<String> {
        match self {
            ChartJob::Pie { title, shares, .. } => {
                let slices = shares.iter().map(|s| (s.label.clone(), s.percent)).collect();
                PieChart::new(title.as_str(), slices)
                    .with_size(f64::from(config.pie.width), f64::from(config.pie.height))
                    .with_background(config.pie.background.as_str())
                    .to_svg()
            },
            ChartJob::Cloud { title, text, .. } => {
                WordCloud::from_config(&config.word_cloud).to_svg(title, text)
            },
        }
    }
}

/// Collect chart jobs: numeric pies, then word clouds, then yes/no pies.
///
/// A later job with the same file name replaces an earlier one.
fn plan_jobs(categorized: &Categorized, config: &ChartConfig, report: &mut ChartReport) -> Vec<ChartJob> {
    let mut jobs: Vec<ChartJob> = Vec::new();

    for (index, column) in categorized.numeric.headers().iter().enumerate() {
        if config.skips(column) {
            debug!(column = %column, "skipping identifier column");
            report
                .skipped
                .push((column.clone(), "identifier or response column".to_string()));
            continue;
        }
        jobs.push(ChartJob::Pie {
            column: column.clone(),
            title: format!("Distribution of {}", clean_title(column)),
            shares: value_distribution(categorized.numeric.column(index)),
        });
    }

    for (index, column) in categorized.text.headers().iter().enumerate() {
        let text = categorized
            .text
            .column(index)
            .filter(|v| !v.is_missing())
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        if text.trim().is_empty() {
            report.skipped.push((column.clone(), "no text".to_string()));
            continue;
        }
        jobs.push(ChartJob::Cloud {
            column: column.clone(),
            title: format!("Word Cloud for {}", column),
            text,
        });
    }

    for (index, column) in categorized.yes_no.headers().iter().enumerate() {
        jobs.push(ChartJob::Pie {
            column: column.clone(),
            title: format!("Distribution of {}", clean_title(column)),
            shares: yes_no_distribution(categorized.yes_no.column(index)),
        });
    }

    let mut by_file: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<Option<ChartJob>> = Vec::with_capacity(jobs.len());
    for job in jobs {
        let name = job.file_name();
        if let Some(&previous) = by_file.get(&name) {
            warn!(file = %name, "chart file name produced twice, keeping the later chart");
            unique[previous] = None;
        }
        by_file.insert(name, unique.len());
        unique.push(Some(job));
    }
    unique.into_iter().flatten().collect()
}

/// Render every chart for a categorised data set into `<output_dir>/charts`.
///
/// Charts are rendered in parallel. Columns without anything to draw are
/// reported as skipped; any other failure aborts the run.
pub fn generate_charts(categorized: &Categorized, output_dir: &Path, config: &ChartConfig) -> Result<ChartReport> {
    let chart_dir = output_dir.join(CHART_DIR);
    std::fs::create_dir_all(&chart_dir)?;

    let mut report = ChartReport::default();
    let jobs = plan_jobs(categorized, config, &mut report);
    info!(charts = jobs.len(), dir = %chart_dir.display(), "rendering charts");

    let outcomes = jobs
        .par_iter()
        .map(|job| -> Result<std::result::Result<PathBuf, (String, String)>> {
            match job.render(config) {
                Ok(svg) => {
                    let path = chart_dir.join(job.file_name());
                    write_svg(&path, &svg)?;
                    debug!(column = %job.column(), path = %path.display(), "wrote chart");
                    Ok(Ok(path))
                },
                Err(Error::NoData(reason)) => Ok(Err((job.column().to_string(), reason))),
                Err(e) => Err(e),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    for outcome in outcomes {
        match outcome {
            Ok(path) => report.written.push(path),
            Err((column, reason)) => {
                warn!(column = %column, %reason, "no chart for column");
                report.skipped.push((column, reason));
            },
        }
    }
    report.written.sort();
    Ok(report)
}

/// Combine `inputs`, write `combined_data.xlsx` and all charts into
/// `output_dir`.
pub fn run_combine<P>(inputs: &[P], output_dir: &Path, config: &Config) -> Result<CombineReport>
where
    P: AsRef<Path> + Sync,
{
    info!(files = inputs.len(), "combining inputs");
    let categorized = combine_files(inputs, &config.classify)?;
    let workbook = write_combined(&categorized, output_dir)?;
    let charts = generate_charts(&categorized, output_dir, &config.charts)?;
    info!(
        written = charts.written.len(),
        skipped = charts.skipped.len(),
        "charts generated"
    );
    Ok(CombineReport { workbook, charts })
}

/// Render the score distribution of `input` as a pie chart at `output`.
pub fn run_score(input: &Path, request: &ScoreRequest, output: &Path, config: &Config) -> Result<ScoreDistribution> {
    request.validate()?;
    let table = Workbook::open(input)?.into_first_sheet();
    let distribution = ScoreDistribution::from_table(&table, request)?;
    info!(
        column = %request.column,
        participants = distribution.participants,
        "scores counted"
    );

    let pie = &config.charts.pie;
    let svg = PieChart::new(request.title.as_str(), distribution.slices())
        .with_size(f64::from(pie.width), f64::from(pie.height))
        .with_background(pie.background.as_str())
        .to_svg()?;
    write_svg(output, &svg)?;
    info!(path = %output.display(), "wrote score chart");
    Ok(distribution)
}
