//! Runtime configuration.
//!
//! Configuration is read from an optional YAML file. Every field has a
//! default, so a file only needs the keys it changes:
//!
//! ```yaml
//! classify:
//!   ignore_columns: [Department, Username]
//! charts:
//!   word_cloud:
//!     max_words: 100
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Column classification settings
    pub classify: ClassifyConfig,
    /// Chart rendering settings
    pub charts: ChartConfig,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config = Self::from_yaml(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from YAML text. Blank text yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config =
            serde_saphyr::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        let cloud = &self.charts.word_cloud;
        if cloud.width == 0 || cloud.height == 0 {
            return Err(Error::Config("word cloud size must be positive".to_string()));
        }
        if cloud.min_font_size <= 0.0 || cloud.min_font_size > cloud.max_font_size {
            return Err(Error::Config(format!(
                "invalid word cloud font range {}..{}",
                cloud.min_font_size, cloud.max_font_size
            )));
        }
        if !(0.0..=1.0).contains(&cloud.relative_scaling) {
            return Err(Error::Config("relative_scaling must be within 0..=1".to_string()));
        }
        if self.charts.pie.width == 0 || self.charts.pie.height == 0 {
            return Err(Error::Config("pie chart size must be positive".to_string()));
        }
        Ok(())
    }
}

/// Settings for sorting columns into numeric, yes/no and text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Columns never analysed (exact header match)
    pub ignore_columns: Vec<String>,
    /// Answers counted as yes/no (compared lowercased)
    pub yes_no_tokens: Vec<String>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            ignore_columns: [
                "Department",
                "Institution",
                "Submitted on:",
                "Username",
                "Full name",
                "Group",
                "Course",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            yes_no_tokens: ["yes", "no", "not yet"].into_iter().map(String::from).collect(),
        }
    }
}

impl ClassifyConfig {
    /// Whether a column is excluded from analysis.
    pub fn is_ignored(&self, column: &str) -> bool {
        self.ignore_columns.iter().any(|c| c == column)
    }

    /// Whether `text` is a yes/no answer, ignoring case.
    pub fn is_yes_no(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.yes_no_tokens.iter().any(|t| t.to_lowercase() == lower)
    }
}

/// Chart rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Numeric columns whose lowercased name contains one of these get no chart
    pub skip_keywords: Vec<String>,
    pub pie: PieConfig,
    pub word_cloud: WordCloudConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            skip_keywords: vec!["response".to_string(), "id".to_string()],
            pie: PieConfig::default(),
            word_cloud: WordCloudConfig::default(),
        }
    }
}

impl ChartConfig {
    /// Whether a numeric column is excluded from charting.
    pub fn skips(&self, column: &str) -> bool {
        let lower = column.to_lowercase();
        self.skip_keywords
            .iter()
            .any(|k| lower.contains(&k.to_lowercase()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieConfig {
    pub width: u32,
    pub height: u32,
    pub background: String,
}

impl Default for PieConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            background: "white".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordCloudConfig {
    pub width: u32,
    pub height: u32,
    pub background: String,
    /// Most frequent words kept
    pub max_words: usize,
    pub min_font_size: f64,
    /// Largest font, capped by the canvas height
    pub max_font_size: f64,
    /// Weight of word frequency against rank when sizing (0..=1)
    pub relative_scaling: f64,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            background: "white".to_string(),
            max_words: 200,
            min_font_size: 4.0,
            max_font_size: 160.0,
            relative_scaling: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.classify.is_ignored("Username"));
        assert!(!config.classify.is_ignored("username"));
        assert!(config.classify.is_yes_no("Not Yet"));
        assert!(config.charts.skips("Response ID"));
        assert!(config.charts.skips("Valid"));
        assert!(!config.charts.skips("Rating"));
        assert_eq!(config.charts.word_cloud.max_words, 200);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "charts:\n  word_cloud:\n    max_words: 50\n  skip_keywords: [total]\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.charts.word_cloud.max_words, 50);
        assert_eq!(config.charts.word_cloud.width, 800);
        assert_eq!(config.charts.skip_keywords, vec!["total".to_string()]);
        assert_eq!(config.classify, ClassifyConfig::default());
    }

    #[test]
    fn test_blank_yaml() {
        assert_eq!(Config::from_yaml("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let yaml = "charts:\n  word_cloud:\n    min_font_size: 200\n";
        assert!(matches!(Config::from_yaml(yaml), Err(Error::Config(_))));
        assert!(matches!(Config::from_yaml("classify: [1, 2"), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "classify:\n  ignore_columns: [Email]\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert!(config.classify.is_ignored("Email"));
        assert!(!config.classify.is_ignored("Username"));

        let missing = Config::load(dir.path().join("nope.yaml"));
        assert!(matches!(missing, Err(Error::Config(_))));
        assert_eq!(Config::load_or_default(None).unwrap(), Config::default());
    }
}
