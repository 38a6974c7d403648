//! # yaffglyph: Yaff glyphs for pixel displays
//!
//! Turns the glyph records of a Yaff bitmap font into what a display renderer
//! consumes: packed fixed-cell bitmaps for simple fixed-width font consumers,
//! and column strips for drawing proportional text one column at a time.
//!
//! ## Features
//!
//! - **Glyph tables**: codepoint and named-label indexes with a fallback chain
//!   (`"default"`, `"empty"`, space, highest codepoint) so lookups never miss
//! - **Metrics**: natural width/height and left/right bearing per glyph
//! - **Packed bitmaps**: row-major, one bit per pixel, LSB-first
//! - **Column strips**: transposed glyph rows for proportional rendering
//! - **Parsing** (`parsing` feature, on by default): a small Yaff tokenizer
//!
//! ## Quick Start
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # #[cfg(feature = "parsing")]
//! # {
//! use yaffglyph::{Font, YaffDocument};
//!
//! let source = "\
//! name: Bar
//! 0x7c:
//!     ..@.....
//!     ..@.....
//! ";
//! let document: YaffDocument = source.parse()?;
//! let font = Font::fixed_from_document(document, 8, 2)?;
//!
//! assert_eq!(font.name(), "Bar");
//! assert!(font.is_ifont_compatible());
//! assert_eq!(font.bitmap('|')?, vec![0x04, 0x04]);
//! # }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Tokenizing returns `Result<T, ParseError>` with line numbers. Bitmap
//! synthesis returns `Result<T, FontError>` when a glyph does not fit the
//! requested cell or its bearing cannot be padded.

pub mod bitmap;
pub mod columns;
mod font;
pub mod metrics;
mod models;
#[cfg(feature = "parsing")]
mod parser;
mod table;

pub use crate::bitmap::{MAX_BEARING, pack_bits, unpack_bits};
pub use crate::font::{Font, ifont_compatible};
pub use crate::models::*;
#[cfg(feature = "parsing")]
pub use crate::parser::{YaffDocument, classify_line, split_labels};
pub use crate::table::{DEFAULT_LABEL, EMPTY_LABEL, FontTable, LabelKey, classify_label};

#[cfg(feature = "parsing")]
impl Font {
    /// Fixed font over a parsed document, named after its `name` property.
    pub fn fixed_from_document(
        document: YaffDocument,
        width: usize,
        height: usize,
    ) -> Result<Self, FontError> {
        let name = document.name().unwrap_or_default().to_string();
        Self::fixed(name, width, height, document.glyphs)
    }

    /// Proportional font over a parsed document; zero sizes are inferred.
    pub fn proportional_from_document(
        document: YaffDocument,
        width: usize,
        height: usize,
    ) -> Result<Self, FontError> {
        let name = document.name().unwrap_or_default().to_string();
        Self::proportional(name, width, height, document.glyphs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_record_defaults() {
        let glyph = GlyphRecord::default();
        assert!(glyph.labels.is_empty());
        assert!(glyph.properties.is_empty());
        assert_eq!(glyph.natural_width(), 0);
        assert!(!glyph.is_empty_sentinel());
    }

    #[test]
    fn test_glyph_record_display() {
        let glyph = GlyphRecord::new(["0x41"], [".@.", "@.@"]);
        assert_eq!(glyph.to_string(), ".@.\n@.@\n");
        let blank = GlyphRecord::new(["empty"], [EMPTY_SENTINEL]);
        assert_eq!(blank.to_string(), "(empty glyph)\n");
    }

    #[test]
    fn test_font_type_display() {
        assert_eq!(FontType::Fixed.to_string(), "fixed");
        assert_eq!(FontType::Proportional.to_string(), "proportional");
    }

    #[test]
    fn test_font_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Font>();
    }

    #[cfg(feature = "parsing")]
    #[test]
    fn test_font_from_document_uses_name() {
        let document: YaffDocument = "name: Dots\n0x2e:\n    .\n    @\n".parse().unwrap();
        let font = Font::proportional_from_document(document, 0, 0).unwrap();
        assert_eq!(font.name(), "Dots");
        assert_eq!((font.width(), font.height()), (1, 2));
        assert_eq!(font.bitmap('.').unwrap(), vec![0b10]);
    }
}
