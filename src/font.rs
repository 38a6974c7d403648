use crate::bitmap::synthesize;
use crate::columns::{glyph_lines, glyph_lines_with_bearing};
use crate::metrics::{glyph_advance, glyph_bearing, glyph_height, glyph_width};
use crate::models::{Bearing, FontError, FontType, GlyphRecord};
use crate::table::FontTable;

/// Whether a `width × height` cell can be served to a simple fixed-width
/// font consumer.
///
/// Widths 4 and 8 accept any height; widths 6 and 12 require a height of
/// 8, 12 or 16. Every other width is incompatible.
pub fn ifont_compatible(width: usize, height: usize) -> bool {
    match width {
        4 | 8 => true,
        6 | 12 => matches!(height, 8 | 12 | 16),
        _ => false,
    }
}

/// A bitmap font built once over a complete glyph list.
///
/// The fixed and proportional variants share this engine and only differ in
/// how the cell size is chosen and in [`Font::is_ifont_compatible`].
#[derive(Debug, Clone)]
pub struct Font {
    name: String,
    font_type: FontType,
    width: usize,
    height: usize,
    table: FontTable,
    fallback: usize,
}

impl Font {
    /// Builds a fixed font with a caller-declared cell size.
    pub fn fixed(
        name: impl Into<String>,
        width: usize,
        height: usize,
        glyphs: Vec<GlyphRecord>,
    ) -> Result<Self, FontError> {
        if width == 0 || height == 0 {
            return Err(FontError::InvalidCellSize { width, height });
        }
        Self::build(name.into(), FontType::Fixed, width, height, glyphs)
    }

    /// Builds a proportional font. A zero `width` or `height` is taken from
    /// the first glyph in `glyphs`.
    pub fn proportional(
        name: impl Into<String>,
        width: usize,
        height: usize,
        glyphs: Vec<GlyphRecord>,
    ) -> Result<Self, FontError> {
        let first = glyphs.first().ok_or(FontError::NoGlyphs)?;
        let width = if width == 0 {
            first.natural_width()
        } else {
            width
        };
        let height = if height == 0 {
            first.natural_height()
        } else {
            height
        };
        Self::build(name.into(), FontType::Proportional, width, height, glyphs)
    }

    fn build(
        name: String,
        font_type: FontType,
        width: usize,
        height: usize,
        glyphs: Vec<GlyphRecord>,
    ) -> Result<Self, FontError> {
        if glyphs.is_empty() {
            return Err(FontError::NoGlyphs);
        }
        let table = FontTable::build(glyphs);
        let fallback = table.fallback_index().ok_or(FontError::NoFallbackGlyph)?;
        log::debug!(
            "Built {font_type} font '{name}' {width}x{height} with {} glyphs",
            table.len()
        );
        Ok(Self {
            name,
            font_type,
            width,
            height,
            table,
            fallback,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn font_type(&self) -> FontType {
        self.font_type
    }

    /// Cell width; nominal for proportional fonts.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Cell height; nominal for proportional fonts.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn table(&self) -> &FontTable {
        &self.table
    }

    /// Advisory only: nothing else consults it.
    pub fn is_ifont_compatible(&self) -> bool {
        match self.font_type {
            FontType::Fixed => ifont_compatible(self.width, self.height),
            FontType::Proportional => false,
        }
    }

    /// Codepoints with their own glyph, ascending. Name-only glyphs are excluded.
    pub fn char_map(&self) -> Vec<u32> {
        self.table.codepoints().collect()
    }

    /// Always yields a glyph, using the fallback chain on a miss.
    pub fn lookup(&self, character: char) -> &GlyphRecord {
        self.lookup_codepoint(character as u32)
    }

    pub fn lookup_codepoint(&self, codepoint: u32) -> &GlyphRecord {
        let index = self
            .table
            .codepoint_index(codepoint)
            .unwrap_or(self.fallback);
        self.table.glyph_at(index)
    }

    pub fn glyph_width(&self, character: char) -> usize {
        glyph_width(self.lookup(character))
    }

    pub fn glyph_height(&self, character: char) -> usize {
        glyph_height(self.lookup(character))
    }

    pub fn bearing(&self, character: char) -> Bearing {
        glyph_bearing(self.lookup(character))
    }

    pub fn advance(&self, character: char) -> i32 {
        glyph_advance(self.lookup(character))
    }

    /// Sum of advances, for laying out proportional text.
    pub fn text_width(&self, text: &str) -> i32 {
        text.chars()
            .fold(0i32, |total, c| total.saturating_add(self.advance(c)))
    }

    /// Packed bitmap in the font's own cell.
    pub fn bitmap(&self, character: char) -> Result<Vec<u8>, FontError> {
        self.bitmap_for_cell(character, self.width, self.height)
    }

    pub fn bitmap_for_cell(
        &self,
        character: char,
        cell_width: usize,
        cell_height: usize,
    ) -> Result<Vec<u8>, FontError> {
        synthesize(
            self.lookup(character),
            character as u32,
            cell_width,
            cell_height,
        )
    }

    pub fn glyph_lines(&self, character: char) -> Vec<String> {
        glyph_lines(self.lookup(character))
    }

    pub fn glyph_lines_with_bearing(&self, character: char) -> Result<Vec<String>, FontError> {
        glyph_lines_with_bearing(self.lookup(character), character as u32)
    }
}
