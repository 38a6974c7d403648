use crate::bitmap::padded_rows;
use crate::models::{FontError, GlyphRecord, PAPER};

/// Column strips of the natural (unpadded) glyph, left to right.
/// Each strip reads its column from the top row down.
pub fn glyph_lines(glyph: &GlyphRecord) -> Vec<String> {
    transpose(&glyph.rows)
}

/// Column strips of the glyph with bearing columns included as paper.
pub fn glyph_lines_with_bearing(
    glyph: &GlyphRecord,
    codepoint: u32,
) -> Result<Vec<String>, FontError> {
    Ok(transpose(&padded_rows(glyph, codepoint)?))
}

/// Swaps rows and columns. Applying it twice to rectangular input yields
/// the input; ragged input is first padded with paper to its widest line.
pub fn transpose<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let grid: Vec<Vec<char>> = lines
        .iter()
        .map(|line| line.as_ref().chars().collect())
        .collect();
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    if grid.iter().any(|line| line.len() != width) {
        log::warn!("Ragged glyph rows, padding to width {width} with '{PAPER}'");
    }

    (0..width)
        .map(|column| {
            grid.iter()
                .map(|line| line.get(column).copied().unwrap_or(PAPER))
                .collect()
        })
        .collect()
}
