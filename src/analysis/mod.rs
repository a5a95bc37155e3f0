//! Survey analysis: column classification, combining exports, value
//! distributions and score percentages.

pub mod classify;
pub mod combine;
pub mod distribution;
pub mod score;

pub use classify::{Categorized, ColumnKind, categorize, predominant_kind};
pub use combine::{COMBINED_FILE_NAME, combine_files, combine_tables, write_combined};
pub use distribution::{Share, value_distribution, yes_no_distribution};
pub use score::{ScoreDistribution, ScoreRequest, percentages, round_percentages, score_counts};
