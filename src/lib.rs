//! Excel Chart Generator - combine survey exports and chart their answers
//!
//! This library reads spreadsheet exports of survey responses, sorts their
//! columns into numeric, yes/no and free-text answers, and renders the
//! distributions as SVG charts.
//!
//! # Features
//!
//! - **Readers**: Office Open XML workbooks (.xlsx, .xlsm) and delimited text (.csv, .tsv)
//! - **Classification**: numeric, yes/no and text columns by majority of values
//! - **Combining**: several exports merged into one `combined_data.xlsx`
//! - **Charts**: pie charts of value shares and word clouds of free text
//! - **Scores**: whole-percentage score distributions that add up to 100
//!
//! # Example - Combining exports
//!
//! ```no_run
//! use std::path::Path;
//! use excel_chart_generator::config::Config;
//! use excel_chart_generator::generator::run_combine;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let inputs = ["week1.xlsx", "week2.csv"];
//! let report = run_combine(&inputs, Path::new("report"), &Config::default())?;
//! println!("Workbook: {}", report.workbook.display());
//! for chart in &report.charts.written {
//!     println!("Chart: {}", chart.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Score distribution
//!
//! ```no_run
//! use excel_chart_generator::analysis::{ScoreDistribution, ScoreRequest};
//! use excel_chart_generator::sheet::Workbook;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = Workbook::open("marks.xlsx")?.into_first_sheet();
//! let request = ScoreRequest::new("Score", 5, "Module feedback");
//! let distribution = ScoreDistribution::from_table(&table, &request)?;
//! for (label, percent) in distribution.slices() {
//!     println!("{label}: {percent}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod build_info;
pub mod chart;
pub mod common;
pub mod config;
pub mod generator;
pub mod ooxml;
pub mod sheet;

// Re-export commonly used types
pub use analysis::{Categorized, ColumnKind, ScoreDistribution, ScoreRequest};
pub use common::{Error, Result};
pub use config::Config;
pub use sheet::{CellValue, Table, Workbook};
