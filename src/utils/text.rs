// src/utils/text.rs

//! Text normalization helpers.

use unicode_segmentation::UnicodeSegmentation;

/// Collapse runs of whitespace into single spaces and trim the ends.
///
/// Scraped post text arrives as fragments separated by markup; this joins
/// them back into one line.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shorten `s` to at most `max` graphemes, appending an ellipsis when cut.
///
/// Grapheme-aware so multi-byte content is never split mid-character.
pub fn preview(s: &str, max: usize) -> String {
    let graphemes: Vec<&str> = s.graphemes(true).collect();
    if graphemes.len() <= max {
        s.to_string()
    } else {
        format!("{}…", graphemes[..max].concat())
    }
}
