//! Chart file names and titles derived from column headers.

/// Remove characters that are invalid in file names: `\ / * ? : " < > |`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|'))
        .collect()
}

/// Drop everything from the first `->` on.
///
/// Survey tools export grouped questions as `Question -> Option`; the chart
/// title keeps only the question.
pub fn clean_title(title: &str) -> &str {
    match title.find("->") {
        Some(idx) => &title[..idx],
        None => title,
    }
}

/// File name of the pie chart for a column.
pub fn pie_chart_file(column: &str) -> String {
    format!("{}_pie_chart.svg", sanitize_filename(column))
}

/// File name of the word cloud for a column.
pub fn word_cloud_file(column: &str) -> String {
    format!("{}_word_cloud.svg", sanitize_filename(column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename(r#"Rate: "speed" <1/5>? a|b\c*"#), "Rate speed 15 abc");
        assert_eq!(sanitize_filename("plain"), "plain");
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("Q1 -> Lectures -> Pace"), "Q1 ");
        assert_eq!(clean_title("No arrow"), "No arrow");
        assert_eq!(clean_title("->"), "");
    }

    #[test]
    fn test_chart_files() {
        assert_eq!(pie_chart_file("Q1: Rating"), "Q1 Rating_pie_chart.svg");
        assert_eq!(word_cloud_file("Comments?"), "Comments_word_cloud.svg");
    }
}
