//! Word cloud rendering.
//!
//! Text is split into words, common words are dropped and the remaining
//! words are sized by frequency. Words are placed largest first along an
//! Archimedean spiral from the centre of the canvas; a word that collides
//! with every position is retried at a smaller size until it fits or falls
//! below the minimum font size.

use std::collections::HashMap;
use std::f64::consts::TAU;

use tracing::debug;

use super::palette;
use super::stopwords::is_stopword;
use crate::common::svg::{Anchor, write_document_end, write_document_start, write_text};
use crate::common::{Error, Result};
use crate::config::WordCloudConfig;

/// Occupancy grid resolution in pixels.
const CELL: f64 = 4.0;
/// Distance between spiral turns in pixels.
const SPIRAL_SPACING: f64 = 4.0;
/// Arc length between spiral samples in pixels.
const SPIRAL_STEP: f64 = 3.0;
/// Average glyph advance relative to the font size.
const GLYPH_WIDTH: f64 = 0.6;
const TITLE_BAND: f64 = 50.0;
const TITLE_FONT: f64 = 20.0;

/// A word with its position on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    pub font_size: f64,
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Frequency relative to the most frequent word
    pub weight: f64,
}

/// Word cloud generator.
///
/// # Examples
///
/// ```
/// use excel_chart_generator::chart::WordCloud;
///
/// let cloud = WordCloud::default();
/// let words = cloud.process_text("great course, great labs. The labs were long.");
/// assert_eq!(words[0], ("great".to_string(), 2));
/// ```
#[derive(Debug, Clone)]
pub struct WordCloud {
    width: f64,
    height: f64,
    background: String,
    max_words: usize,
    min_font_size: f64,
    max_font_size: f64,
    relative_scaling: f64,
}

impl Default for WordCloud {
    fn default() -> Self {
        Self::from_config(&WordCloudConfig::default())
    }
}

impl WordCloud {
    pub fn from_config(config: &WordCloudConfig) -> Self {
        Self {
            width: f64::from(config.width),
            height: f64::from(config.height),
            background: config.background.clone(),
            max_words: config.max_words,
            min_font_size: config.min_font_size,
            max_font_size: config.max_font_size,
            relative_scaling: config.relative_scaling,
        }
    }

    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words;
        self
    }

    /// Word frequencies of `text`, most frequent first, at most `max_words`.
    ///
    /// Words are runs of at least two word characters (letters, digits,
    /// `_`) and apostrophes, starting with a word character. Stopwords and
    /// pure numbers are dropped and a trailing `'s` is removed. Spellings
    /// that differ only in case are merged under the most frequent one, and
    /// a plural is merged into its singular when both occur.
    pub fn process_text(&self, text: &str) -> Vec<(String, usize)> {
        let tokens = tokenize(text)
            .filter(|w| !is_stopword(w))
            .map(strip_possessive)
            .filter(|w| !w.is_empty() && !w.chars().all(|c| c.is_ascii_digit()));

        let mut words = fold_tokens(tokens);
        words.truncate(self.max_words);
        words
    }

    /// Place words on the canvas, largest first.
    ///
    /// A word that does not fit is retried at smaller sizes. Once it would
    /// have to go below the minimum font size, layout stops and that word
    /// and every later one are left out.
    pub fn layout(&self, frequencies: &[(String, usize)]) -> Vec<PlacedWord> {
        let Some(max_count) = frequencies.iter().map(|(_, c)| *c).max().filter(|c| *c > 0) else {
            return Vec::new();
        };

        let mut grid = Occupancy::new(self.width, self.height);
        let mut placed = Vec::with_capacity(frequencies.len());
        let mut font_size = self.max_font_size.min(self.height);
        let mut last_weight = 1.0;
        let aspect = if self.height > 0.0 { self.width / self.height } else { 1.0 };

        for (word, count) in frequencies {
            let weight = *count as f64 / max_count as f64;
            if weight <= 0.0 {
                break;
            }
            if self.relative_scaling > 0.0 {
                font_size = ((self.relative_scaling * (weight / last_weight)
                    + (1.0 - self.relative_scaling))
                    * font_size)
                    .round();
            }

            let letters = word.chars().count() as f64;
            let mut size = font_size;
            let spot = loop {
                if size < self.min_font_size {
                    break None;
                }
                let (w, h) = (letters * size * GLYPH_WIDTH, size);
                if let Some(spot) = self.find_spot(&grid, w, h, aspect) {
                    break Some((spot, size, w, h));
                }
                // Shrink by a tenth, at least one point
                size = (size * 0.9).floor().min(size - 1.0);
            };

            let Some(((x, y, span), size, w, h)) = spot else {
                debug!(word = %word, "no room left for word");
                break;
            };
            grid.fill(span);
            placed.push(PlacedWord {
                word: word.clone(),
                font_size: size,
                x,
                y,
                width: w,
                height: h,
                weight,
            });
            font_size = size;
            last_weight = weight;
        }

        placed
    }

    fn find_spot(&self, grid: &Occupancy, w: f64, h: f64, aspect: f64) -> Option<(f64, f64, Span)> {
        let max_radius = self.width.hypot(self.height);
        spiral(self.width / 2.0, self.height / 2.0, aspect, max_radius).find_map(|(cx, cy)| {
            let (x, y) = (cx - w / 2.0, cy - h / 2.0);
            let span = grid.span(x, y, w, h)?;
            grid.is_free(span).then_some((x, y, span))
        })
    }

    /// Render the word cloud of `text` under `title` as an SVG document.
    pub fn to_svg(&self, title: &str, text: &str) -> Result<String> {
        let frequencies = self.process_text(text);
        let placed = self.layout(&frequencies);
        if placed.is_empty() {
            return Err(Error::NoData(format!("no words to draw for '{}'", title)));
        }
        debug!(words = frequencies.len(), placed = placed.len(), "word cloud laid out");

        let mut svg = String::with_capacity(512 + placed.len() * 160);
        write_document_start(&mut svg, self.width, self.height + TITLE_BAND, &self.background);
        write_text(
            &mut svg,
            self.width / 2.0,
            TITLE_BAND / 2.0 + TITLE_FONT / 3.0,
            TITLE_FONT,
            Anchor::Middle,
            "#000000",
            title,
        );
        for word in &placed {
            // Baseline sits at roughly 80% of the line box
            write_text(
                &mut svg,
                word.x + word.width / 2.0,
                TITLE_BAND + word.y + word.height * 0.8,
                word.font_size,
                Anchor::Middle,
                palette::sequential(word.weight),
                &word.word,
            );
        }
        write_document_end(&mut svg);
        Ok(svg)
    }
}

/// Split text into candidate words.
fn tokenize(text: &str) -> impl Iterator<Item = &str> + '_ {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut rest = text;
    std::iter::from_fn(move || {
        loop {
            let start = rest.find(is_word)?;
            let tail = &rest[start..];
            let len = tail
                .find(|c: char| !(is_word(c) || c == '\''))
                .unwrap_or(tail.len());
            let token = &tail[..len];
            rest = &tail[len..];
            if token.chars().count() >= 2 {
                return Some(token);
            }
        }
    })
}

fn strip_possessive(word: &str) -> &str {
    let bytes = word.as_bytes();
    if bytes.len() >= 2 && bytes[bytes.len() - 2] == b'\'' && bytes[bytes.len() - 1].eq_ignore_ascii_case(&b's') {
        &word[..word.len() - 2]
    } else {
        word
    }
}

/// Merge case variants and plurals, sorted by count then first appearance.
fn fold_tokens<'a, I: Iterator<Item = &'a str>>(tokens: I) -> Vec<(String, usize)> {
    // lowercase key -> (first appearance, spelling counts in appearance order)
    let mut groups: HashMap<String, (usize, Vec<(&'a str, usize)>)> = HashMap::new();
    for (order, token) in tokens.enumerate() {
        let entry = groups
            .entry(token.to_lowercase())
            .or_insert_with(|| (order, Vec::new()));
        match entry.1.iter_mut().find(|(s, _)| *s == token) {
            Some((_, count)) => *count += 1,
            None => entry.1.push((token, 1)),
        }
    }

    let mut merged: HashMap<String, (usize, String, usize)> = groups
        .into_iter()
        .map(|(key, (first, spellings))| {
            let total: usize = spellings.iter().map(|(_, c)| c).sum();
            let mut best = spellings[0];
            for &candidate in &spellings[1..] {
                if candidate.1 > best.1 {
                    best = candidate;
                }
            }
            (key, (first, best.0.to_string(), total))
        })
        .collect();

    let plurals: Vec<String> = merged
        .keys()
        .filter(|k| k.ends_with('s') && !k.ends_with("ss") && k.len() > 1)
        .filter(|k| merged.contains_key(&k[..k.len() - 1]))
        .cloned()
        .collect();
    for plural in plurals {
        if let Some((first, _, count)) = merged.remove(&plural)
            && let Some(singular) = merged.get_mut(&plural[..plural.len() - 1])
        {
            singular.0 = singular.0.min(first);
            singular.2 += count;
        }
    }

    let mut words: Vec<(usize, String, usize)> = merged.into_values().collect();
    words.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
    words.into_iter().map(|(_, word, count)| (word, count)).collect()
}

/// Points along an Archimedean spiral around `(cx, cy)`, stretched
/// horizontally by `aspect`.
fn spiral(cx: f64, cy: f64, aspect: f64, max_radius: f64) -> impl Iterator<Item = (f64, f64)> {
    let mut theta = 0.0f64;
    std::iter::from_fn(move || {
        let r = SPIRAL_SPACING * theta / TAU;
        if r > max_radius {
            return None;
        }
        let point = (cx + r * aspect * theta.cos(), cy + r * theta.sin());
        theta += (SPIRAL_STEP / r.max(SPIRAL_STEP)).min(0.5);
        Some(point)
    })
}

/// Cell range `[c0, c1) x [r0, r1)` on the occupancy grid.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    c0: usize,
    r0: usize,
    c1: usize,
    r1: usize,
}

/// Coarse bitmap of the cells taken by placed words.
struct Occupancy {
    width: f64,
    height: f64,
    cols: usize,
    cells: Vec<bool>,
}

impl Occupancy {
    fn new(width: f64, height: f64) -> Self {
        let cols = (width / CELL).ceil().max(0.0) as usize;
        let rows = (height / CELL).ceil().max(0.0) as usize;
        Self {
            width,
            height,
            cols,
            cells: vec![false; cols * rows],
        }
    }

    /// Cells covered by a rectangle, `None` if it leaves the canvas.
    fn span(&self, x: f64, y: f64, w: f64, h: f64) -> Option<Span> {
        if x < 0.0 || y < 0.0 || x + w > self.width || y + h > self.height {
            return None;
        }
        Some(Span {
            c0: (x / CELL).floor() as usize,
            r0: (y / CELL).floor() as usize,
            c1: ((x + w) / CELL).ceil() as usize,
            r1: ((y + h) / CELL).ceil() as usize,
        })
    }

    fn is_free(&self, span: Span) -> bool {
        (span.r0..span.r1).all(|r| {
            let row = r * self.cols;
            self.cells
                .get(row + span.c0..row + span.c1)
                .is_some_and(|cells| cells.iter().all(|taken| !taken))
        })
    }

    fn fill(&mut self, span: Span) {
        for r in span.r0..span.r1 {
            let row = r * self.cols;
            if let Some(cells) = self.cells.get_mut(row + span.c0..row + span.c1) {
                cells.fill(true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlaps(a: &PlacedWord, b: &PlacedWord) -> bool {
        a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
    }

    #[test]
    fn test_tokenize() {
        let tokens: Vec<_> = tokenize("I can't wait -- it's a_b x 42!").collect();
        assert_eq!(tokens, vec!["can't", "wait", "it's", "a_b", "42"]);
    }

    #[test]
    fn test_process_text_folds_case_and_plurals() {
        let cloud = WordCloud::default();
        let words = cloud.process_text(
            "Python is fun. python labs, Python lab! The lecturer's notes. 2024 notes note",
        );
        assert_eq!(words[0], ("Python".to_string(), 3));
        assert!(words.contains(&("lab".to_string(), 2)));
        assert!(words.contains(&("note".to_string(), 3)));
        assert!(words.contains(&("lecturer".to_string(), 1)));
        assert!(!words.iter().any(|(w, _)| w == "is" || w == "The" || w == "2024"));
    }

    #[test]
    fn test_max_words() {
        let cloud = WordCloud::default().with_max_words(2);
        let words = cloud.process_text("alpha alpha beta beta gamma delta");
        assert_eq!(words, vec![("alpha".to_string(), 2), ("beta".to_string(), 2)]);
    }

    #[test]
    fn test_layout_sizes_and_no_overlap() {
        let cloud = WordCloud::default();
        let text = format!("{}labs labs long quiz", "great ".repeat(10));
        let freqs = cloud.process_text(&text);
        let placed = cloud.layout(&freqs);

        assert_eq!(placed.len(), 4);
        assert_eq!(placed[0].word, "great");
        assert!(placed[0].font_size >= placed[1].font_size);
        for (i, a) in placed.iter().enumerate() {
            assert!(a.x >= 0.0 && a.y >= 0.0);
            assert!(a.x + a.width <= 800.0 && a.y + a.height <= 400.0);
            for b in &placed[i + 1..] {
                assert!(!overlaps(a, b), "{} overlaps {}", a.word, b.word);
            }
        }
    }

    #[test]
    fn test_layout_stops_when_canvas_is_full() {
        let config = WordCloudConfig {
            width: 60,
            height: 20,
            min_font_size: 10.0,
            max_font_size: 16.0,
            ..WordCloudConfig::default()
        };
        let cloud = WordCloud::from_config(&config);
        let freqs: Vec<(String, usize)> = ["aa", "bb", "cc", "dd", "ee", "ff", "gg"]
            .iter()
            .map(|w| (w.to_string(), 1))
            .collect();
        let placed = cloud.layout(&freqs);
        assert!(!placed.is_empty());
        assert!(placed.len() < freqs.len());
        assert!(placed.iter().all(|p| p.font_size >= 10.0));
    }

    #[test]
    fn test_to_svg() {
        let cloud = WordCloud::default();
        let svg = cloud.to_svg("Word Cloud for Feedback", "More <practical> sessions please").unwrap();
        assert!(svg.contains(">Word Cloud for Feedback</text>"));
        assert!(svg.contains(">practical</text>"));
        assert!(svg.contains(">sessions</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_only_stopwords() {
        let cloud = WordCloud::default();
        assert!(matches!(cloud.to_svg("t", "the and of"), Err(Error::NoData(_))));
        assert!(cloud.layout(&[]).is_empty());
    }
}
