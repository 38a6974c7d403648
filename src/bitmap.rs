//! Fixed-cell packed bitmaps.
//!
//! Pixels are flattened row-major (row 0 first, left to right) and packed
//! LSB-first: pixel `i` is bit `i % 8` of byte `i / 8`. The last byte is
//! zero padded when the pixel count is not a multiple of eight.

use crate::metrics::glyph_bearing;
use crate::models::{EMPTY_SENTINEL, FontError, GlyphRecord, INK, PAPER};

/// Largest bearing, in columns, that padding will generate.
pub const MAX_BEARING: usize = 64;

/// Returns the glyph rows with bearing applied as paper columns.
///
/// The empty sentinel is returned unchanged. Rows are validated on the way:
/// only ink and paper are accepted and every row must have the same width.
pub fn padded_rows(glyph: &GlyphRecord, codepoint: u32) -> Result<Vec<String>, FontError> {
    validate_rows(glyph, codepoint)?;
    if glyph.is_empty_sentinel() {
        return Ok(glyph.rows.clone());
    }

    let bearing = glyph_bearing(glyph);
    if bearing.left < 0 || bearing.right < 0 {
        return Err(FontError::NegativeBearing {
            codepoint,
            left: bearing.left,
            right: bearing.right,
        });
    }
    let left = checked_bearing(bearing.left, codepoint)?;
    let right = checked_bearing(bearing.right, codepoint)?;

    let left_pad = PAPER.to_string().repeat(left);
    let right_pad = PAPER.to_string().repeat(right);
    Ok(glyph
        .rows
        .iter()
        .map(|row| format!("{left_pad}{row}{right_pad}"))
        .collect())
}

fn checked_bearing(value: i32, codepoint: u32) -> Result<usize, FontError> {
    match usize::try_from(value) {
        Ok(columns) if columns <= MAX_BEARING => Ok(columns),
        _ => Err(FontError::BearingTooLarge {
            codepoint,
            bearing: value,
            max: MAX_BEARING,
        }),
    }
}

fn validate_rows(glyph: &GlyphRecord, codepoint: u32) -> Result<(), FontError> {
    if glyph.is_empty_sentinel() {
        return Ok(());
    }
    if glyph.rows.iter().any(|row| row == EMPTY_SENTINEL) {
        return Err(FontError::MisplacedEmptySentinel { codepoint });
    }

    let width = glyph.natural_width();
    for (row_index, row) in glyph.rows.iter().enumerate() {
        if let Some(char_found) = row.chars().find(|&c| c != INK && c != PAPER) {
            return Err(FontError::InvalidGlyphCharacter {
                codepoint,
                row: row_index,
                char_found,
            });
        }
        if row.chars().count() != width {
            return Err(FontError::InconsistentRowWidth {
                codepoint,
                row: row_index,
            });
        }
    }
    Ok(())
}

/// Synthesizes the packed bitmap of `glyph` in a `cell_width × cell_height` cell.
///
/// The bearing-padded glyph must fill the cell exactly; anything else is a
/// [`FontError::CellMismatch`].
pub fn synthesize(
    glyph: &GlyphRecord,
    codepoint: u32,
    cell_width: usize,
    cell_height: usize,
) -> Result<Vec<u8>, FontError> {
    if cell_width == 0 || cell_height == 0 {
        return Err(FontError::InvalidCellSize {
            width: cell_width,
            height: cell_height,
        });
    }

    let pixel_count = cell_width
        .checked_mul(cell_height)
        .ok_or(FontError::InvalidCellSize {
            width: cell_width,
            height: cell_height,
        })?;
    if glyph.is_empty_sentinel() {
        return Ok(vec![0; pixel_count.div_ceil(8)]);
    }

    let rows = padded_rows(glyph, codepoint)?;
    let glyph_width = rows.first().map_or(0, |row| row.chars().count());
    if rows.len() != cell_height || glyph_width != cell_width {
        return Err(FontError::CellMismatch {
            codepoint,
            cell_width,
            cell_height,
            glyph_width,
            glyph_height: rows.len(),
        });
    }

    let pixels: Vec<bool> = rows
        .iter()
        .flat_map(|row| row.chars().map(|c| c == INK))
        .collect();
    Ok(pack_bits(&pixels))
}

/// Packs pixels LSB-first, eight per byte.
pub fn pack_bits(pixels: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; pixels.len().div_ceil(8)];
    for (i, _) in pixels.iter().enumerate().filter(|(_, set)| **set) {
        bytes[i / 8] |= 1 << (i % 8);
    }
    bytes
}

/// Inverse of [`pack_bits`]: reads `pixel_count` LSB-first pixels.
/// Missing trailing bytes read as unset.
pub fn unpack_bits(bytes: &[u8], pixel_count: usize) -> Vec<bool> {
    (0..pixel_count)
        .map(|i| {
            bytes
                .get(i / 8)
                .is_some_and(|byte| byte & (1 << (i % 8)) != 0)
        })
        .collect()
}
