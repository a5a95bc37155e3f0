//! SVG chart rendering: pie charts and word clouds.

pub mod naming;
pub mod palette;
pub mod pie;
pub mod stopwords;
pub mod wordcloud;

use std::fs;
use std::path::Path;

pub use pie::PieChart;
pub use wordcloud::{PlacedWord, WordCloud};

use crate::common::Result;

/// Write a rendered SVG document, creating parent directories as needed.
pub fn write_svg<P: AsRef<Path>>(path: P, svg: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, svg)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_svg_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts").join("a_pie_chart.svg");
        write_svg(&path, "<svg/>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<svg/>");
    }
}
