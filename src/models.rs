use std::collections::HashMap;

/// Pixel-on symbol in glyph rows.
pub const INK: char = '@';
/// Pixel-off symbol in glyph rows.
pub const PAPER: char = '.';
/// Sole-row marker for a glyph that renders fully blank.
pub const EMPTY_SENTINEL: &str = "-";

/// A single glyph as handed over by the tokenizer.
///
/// Labels are kept as raw strings; they are only interpreted when a
/// [`FontTable`](crate::FontTable) is built over the records. Rows are kept
/// textual so that consumers can pad and transpose them without re-encoding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphRecord {
    pub labels: Vec<String>,
    pub properties: HashMap<String, String>,
    pub rows: Vec<String>,
}

impl GlyphRecord {
    pub fn new<L, R>(labels: L, rows: R) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            properties: HashMap::new(),
            rows: rows.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// True if the glyph consists of the single empty-sentinel row.
    pub fn is_empty_sentinel(&self) -> bool {
        self.rows.len() == 1 && self.rows[0] == EMPTY_SENTINEL
    }

    /// Character count of the first row, without bearing.
    pub fn natural_width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.chars().count())
    }

    pub fn natural_height(&self) -> usize {
        self.rows.len()
    }
}

impl std::fmt::Display for GlyphRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.rows.is_empty() || self.is_empty_sentinel() {
            return writeln!(f, "(empty glyph)");
        }

        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Horizontal padding around a glyph, in pixel columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bearing {
    pub left: i32,
    pub right: i32,
}

/// How a font's cell size was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontType {
    Fixed,
    Proportional,
}

impl std::fmt::Display for FontType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontType::Fixed => write!(f, "fixed"),
            FontType::Proportional => write!(f, "proportional"),
        }
    }
}

/// Errors raised while building a font or synthesizing glyph output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontError {
    NoGlyphs,
    NoFallbackGlyph,
    InvalidCellSize {
        width: usize,
        height: usize,
    },
    NegativeBearing {
        codepoint: u32,
        left: i32,
        right: i32,
    },
    BearingTooLarge {
        codepoint: u32,
        bearing: i32,
        max: usize,
    },
    CellMismatch {
        codepoint: u32,
        cell_width: usize,
        cell_height: usize,
        glyph_width: usize,
        glyph_height: usize,
    },
    InconsistentRowWidth {
        codepoint: u32,
        row: usize,
    },
    InvalidGlyphCharacter {
        codepoint: u32,
        row: usize,
        char_found: char,
    },
    MisplacedEmptySentinel {
        codepoint: u32,
    },
}

impl std::fmt::Display for FontError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontError::NoGlyphs => write!(f, "Font has no glyphs"),
            FontError::NoFallbackGlyph => write!(
                f,
                "Font has no codepoint glyphs and no 'default' or 'empty' glyph to fall back on"
            ),
            FontError::InvalidCellSize { width, height } => {
                write!(f, "Invalid cell size {width}x{height}")
            }
            FontError::NegativeBearing {
                codepoint,
                left,
                right,
            } => write!(
                f,
                "Glyph U+{codepoint:04X} has negative bearing (left {left}, right {right})"
            ),
            FontError::BearingTooLarge {
                codepoint,
                bearing,
                max,
            } => write!(
                f,
                "Glyph U+{codepoint:04X} bearing {bearing} exceeds the maximum of {max} columns"
            ),
            FontError::CellMismatch {
                codepoint,
                cell_width,
                cell_height,
                glyph_width,
                glyph_height,
            } => write!(
                f,
                "Glyph U+{codepoint:04X} is {glyph_width}x{glyph_height} after bearing, cell is {cell_width}x{cell_height}"
            ),
            FontError::InconsistentRowWidth { codepoint, row } => {
                write!(f, "Glyph U+{codepoint:04X} row {row} has inconsistent width")
            }
            FontError::InvalidGlyphCharacter {
                codepoint,
                row,
                char_found,
            } => write!(
                f,
                "Invalid glyph character '{char_found}' in glyph U+{codepoint:04X} row {row}"
            ),
            FontError::MisplacedEmptySentinel { codepoint } => write!(
                f,
                "Glyph U+{codepoint:04X} uses '{EMPTY_SENTINEL}' alongside other rows"
            ),
        }
    }
}

impl std::error::Error for FontError {}

/// Errors raised by the Yaff tokenizer.
#[derive(Debug)]
pub enum ParseError {
    Io(std::io::Error),
    InvalidSyntax { line: usize, message: String },
    UnexpectedEndOfInput,
    SemanticError { line: usize, message: String },
    InconsistentGlyphLineLength { line: usize },
    InvalidGlyphCharacter { line: usize, char_found: char },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Io(err) => write!(f, "IO error: {err}"),
            ParseError::InvalidSyntax { line, message } => {
                write!(f, "Invalid syntax at line {line}: {message}")
            }
            ParseError::UnexpectedEndOfInput => write!(f, "Unexpected end of input"),
            ParseError::SemanticError { line, message } => {
                write!(f, "Semantic error at line {line}: {message}")
            }
            ParseError::InconsistentGlyphLineLength { line } => {
                write!(f, "Inconsistent glyph line length at line {line}")
            }
            ParseError::InvalidGlyphCharacter { line, char_found } => {
                write!(f, "Invalid glyph character '{char_found}' at line {line}")
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::Io(err)
    }
}

impl From<std::string::FromUtf8Error> for ParseError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ParseError::InvalidSyntax {
            line: 0,
            message: format!("Invalid UTF-8 input: {err}"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub enum LineType {
    KeyValue {
        key: String,
        value_on_line: Option<String>,
    },
    BitmapLine {
        content: String, // ".@." or "-"
    },
    Continuation {
        content: String,
    },
    Unknown {
        original_text: String,
    },
    #[default]
    Empty,
}
