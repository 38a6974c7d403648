use crate::models::*;
use crate::table::{LabelKey, classify_label};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

/// Global properties and glyph records read from Yaff source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct YaffDocument {
    pub properties: HashMap<String, String>,
    pub glyphs: Vec<GlyphRecord>,
}

impl YaffDocument {
    /// Value of the global `name` property.
    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").map(String::as_str)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        let utf8 = String::from_utf8(bytes.to_vec())?;
        from_str(&utf8)
    }

    pub fn from_reader<R: std::io::Read>(mut reader: R) -> Result<Self, ParseError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Self::from_bytes(&buf)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let file = File::open(path).map_err(ParseError::Io)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl FromStr for YaffDocument {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_str(s)
    }
}

pub fn from_str(s: &str) -> Result<YaffDocument, ParseError> {
    Decoder::new(s).parse_internal()
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_pixel_row(content: &str) -> bool {
    content == EMPTY_SENTINEL
        || (!content.is_empty() && content.chars().all(|c| c == INK || c == PAPER))
}

/// Classifies a single line of Yaff source.
/// Returns the line type and its indentation (spaces and tabs).
pub fn classify_line(line_str: &str) -> (LineType, usize) {
    let indent = line_str.chars().take_while(|&c| is_blank(c)).count();
    let content = line_str[indent..].trim_end_matches(is_blank);

    if content.is_empty() || content.starts_with('#') {
        return (LineType::Empty, indent);
    }

    if indent > 0 && is_pixel_row(content) {
        return (
            LineType::BitmapLine {
                content: content.to_string(),
            },
            indent,
        );
    }

    // "key:" (a label line at the top level)
    if let Some(key) = content.strip_suffix(':') {
        return (
            LineType::KeyValue {
                key: key.trim_end_matches(is_blank).to_string(),
                value_on_line: None,
            },
            indent,
        );
    }

    if let Some((key, value)) = content.split_once(':') {
        let value = value.trim_matches(is_blank);
        return (
            LineType::KeyValue {
                key: key.trim_end_matches(is_blank).to_string(),
                value_on_line: (!value.is_empty()).then(|| value.to_string()),
            },
            indent,
        );
    }

    if indent == 0 {
        (
            LineType::Unknown {
                original_text: line_str.to_string(),
            },
            indent,
        )
    } else {
        (
            LineType::Continuation {
                content: content.to_string(),
            },
            indent,
        )
    }
}

/// Splits a label line into labels at commas that are not inside quotes.
pub fn split_labels(key_str: &str) -> Vec<String> {
    let mut labels = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in key_str.chars() {
        match (quote, c) {
            (None, '"' | '\'') => {
                quote = Some(c);
                current.push(c);
            }
            (Some(open), _) if c == open => {
                quote = None;
                current.push(c);
            }
            (None, ',') => labels.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    labels.push(current);

    labels
        .into_iter()
        .map(|label| label.trim_matches(is_blank).to_string())
        .filter(|label| !label.is_empty())
        .collect()
}

/// Codepoints, quoted labels and label lists are never property keys.
fn is_explicit_label(key_str: &str) -> bool {
    key_str.starts_with(['"', '\''])
        || key_str.contains(',')
        || matches!(classify_label(key_str), LabelKey::Codepoint(_))
}

fn strip_value_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(value)
}

// --- Line Iterator with Tracking ---
struct LineIterator<'a> {
    inner: std::iter::Peekable<std::str::Lines<'a>>,
    current_line_number: usize,
}

impl<'a> LineIterator<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            inner: s.lines().peekable(),
            current_line_number: 0,
        }
    }

    fn next(&mut self) -> Option<(usize, &'a str)> {
        self.inner.next().map(|line| {
            self.current_line_number += 1;
            (self.current_line_number, line)
        })
    }

    fn peek(&mut self) -> Option<(usize, &'a str)> {
        self.inner
            .peek()
            .map(|&line| (self.current_line_number + 1, line))
    }

    fn current_line_number(&self) -> usize {
        self.current_line_number
    }
}

// GlobalProps → AccumulatingLabels on the first unindented "label:" line.
// AccumulatingLabels → ParsingGlyph on the first indented line.
// ParsingGlyph → AccumulatingLabels on the next label line (commits the glyph),
// or → GlobalProps on an unindented "key: value" line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    GlobalProps,
    AccumulatingLabels,
    ParsingGlyph,
}

struct Decoder<'a> {
    lines_iter: LineIterator<'a>,
    document: YaffDocument,
    state: ParserState,

    pending_labels: Vec<String>,
    current_glyph: Option<GlyphRecord>,
    current_glyph_line: usize,
}

impl<'a> Decoder<'a> {
    fn new(s: &'a str) -> Self {
        let content = s.strip_prefix('\u{FEFF}').unwrap_or(s);
        Decoder {
            lines_iter: LineIterator::new(content),
            document: YaffDocument::default(),
            state: ParserState::GlobalProps,
            pending_labels: Vec::new(),
            current_glyph: None,
            current_glyph_line: 0,
        }
    }

    fn next_significant_line(&mut self) -> Option<(usize, LineType, usize)> {
        while let Some((line_num, line_str)) = self.lines_iter.peek() {
            let (line_type, indent) = classify_line(line_str);
            if line_type == LineType::Empty {
                self.lines_iter.next();
            } else {
                return Some((line_num, line_type, indent));
            }
        }
        None
    }

    fn consume_line(&mut self) {
        self.lines_iter.next();
    }

    /// Collects the indented free-text lines following a `key:` line.
    fn read_continuation_lines(&mut self) -> String {
        let mut value_lines = Vec::new();
        while let Some((_, LineType::Continuation { content }, _)) = self.next_significant_line() {
            self.consume_line();
            value_lines.push(strip_value_quotes(&content).to_string());
        }
        value_lines.join("\n")
    }

    fn commit_current_glyph(&mut self) -> Result<(), ParseError> {
        if let Some(glyph) = self.current_glyph.take() {
            if glyph.rows.is_empty() {
                return Err(ParseError::InvalidSyntax {
                    line: self.current_glyph_line,
                    message: "Missing bitmap data after labels.".to_string(),
                });
            }
            self.document.glyphs.push(glyph);
        }
        Ok(())
    }

    fn parse_internal(mut self) -> Result<YaffDocument, ParseError> {
        while let Some((line_num, line_type, indent)) = self.next_significant_line() {
            if indent == 0 {
                self.handle_top_level(line_num, line_type)?;
                continue;
            }

            match self.state {
                ParserState::GlobalProps => {
                    return Err(ParseError::SemanticError {
                        line: line_num,
                        message: "Glyph data found without preceding labels.".to_string(),
                    });
                }
                ParserState::AccumulatingLabels => {
                    self.current_glyph = Some(GlyphRecord {
                        labels: std::mem::take(&mut self.pending_labels),
                        ..Default::default()
                    });
                    self.current_glyph_line = line_num;
                    self.state = ParserState::ParsingGlyph;
                    // The line is handled as glyph content on the next pass.
                }
                ParserState::ParsingGlyph => {
                    self.consume_line();
                    self.handle_glyph_line(line_num, line_type)?;
                }
            }
        }

        match self.state {
            ParserState::GlobalProps => {}
            ParserState::AccumulatingLabels => {
                if !self.pending_labels.is_empty() {
                    return Err(ParseError::UnexpectedEndOfInput);
                }
            }
            ParserState::ParsingGlyph => {
                if self.current_glyph.as_ref().is_some_and(|g| g.rows.is_empty()) {
                    return Err(ParseError::UnexpectedEndOfInput);
                }
                self.commit_current_glyph()?;
            }
        }
        Ok(self.document)
    }

    fn handle_top_level(&mut self, line_num: usize, line_type: LineType) -> Result<(), ParseError> {
        match line_type {
            LineType::KeyValue {
                key,
                value_on_line: Some(value),
            } => {
                if self.state == ParserState::AccumulatingLabels {
                    return Err(ParseError::SemanticError {
                        line: line_num,
                        message: format!("Expected glyph data after labels, found property '{key}'."),
                    });
                }
                self.consume_line();
                self.commit_current_glyph()?;
                self.set_global_property(key, strip_value_quotes(&value).to_string());
                self.state = ParserState::GlobalProps;
            }
            LineType::KeyValue {
                key,
                value_on_line: None,
            } => {
                self.consume_line();
                self.commit_current_glyph()?;

                let next_is_text = matches!(
                    self.next_significant_line(),
                    Some((_, LineType::Continuation { .. }, _))
                );
                if next_is_text
                    && self.state != ParserState::AccumulatingLabels
                    && !is_explicit_label(&key)
                {
                    let value = self.read_continuation_lines();
                    self.set_global_property(key, value);
                    self.state = ParserState::GlobalProps;
                    return Ok(());
                }

                let labels = split_labels(&key);
                if labels.is_empty() {
                    return Err(ParseError::InvalidSyntax {
                        line: line_num,
                        message: "Empty glyph label.".to_string(),
                    });
                }
                for label in labels {
                    if !self.pending_labels.contains(&label) {
                        self.pending_labels.push(label);
                    }
                }
                self.state = ParserState::AccumulatingLabels;
            }
            _ => {
                return Err(ParseError::InvalidSyntax {
                    line: line_num,
                    message: "Expected unindented property or glyph label.".to_string(),
                });
            }
        }
        Ok(())
    }

    fn handle_glyph_line(&mut self, line_num: usize, line_type: LineType) -> Result<(), ParseError> {
        let value = match &line_type {
            LineType::KeyValue {
                value_on_line: None,
                ..
            } => Some(self.read_continuation_lines()),
            _ => None,
        };

        let glyph = self
            .current_glyph
            .as_mut()
            .ok_or_else(|| ParseError::SemanticError {
                line: line_num,
                message: "Internal error: no glyph being built".to_string(),
            })?;

        match line_type {
            LineType::KeyValue { key, value_on_line } => {
                let value = value_on_line.or(value).unwrap_or_default();
                if let Some(previous) = glyph.properties.insert(key.clone(), value) {
                    log::warn!(
                        "Line {line_num}: Glyph property '{key}' redefined, discarding '{previous}'."
                    );
                }
            }
            LineType::BitmapLine { content } => push_row(glyph, content, line_num)?,
            LineType::Continuation { content } => {
                let char_found = content
                    .chars()
                    .find(|&c| c != INK && c != PAPER)
                    .unwrap_or(' ');
                return Err(ParseError::InvalidGlyphCharacter {
                    line: line_num,
                    char_found,
                });
            }
            LineType::Unknown { .. } | LineType::Empty => {
                return Err(ParseError::InvalidSyntax {
                    line: line_num,
                    message: "Unexpected line inside glyph.".to_string(),
                });
            }
        }
        Ok(())
    }

    fn set_global_property(&mut self, key: String, value: String) {
        if self.document.properties.contains_key(&key) {
            log::warn!(
                "Line {}: Global property '{key}' redefined.",
                self.lines_iter.current_line_number()
            );
        }
        self.document.properties.insert(key, value);
    }
}

fn push_row(glyph: &mut GlyphRecord, content: String, line_num: usize) -> Result<(), ParseError> {
    let has_sentinel = glyph.rows.iter().any(|row| row == EMPTY_SENTINEL);
    if has_sentinel || (content == EMPTY_SENTINEL && !glyph.rows.is_empty()) {
        return Err(ParseError::SemanticError {
            line: line_num,
            message: format!("'{EMPTY_SENTINEL}' must be the only row of a glyph."),
        });
    }

    let Some(expected_width) = glyph.rows.first().map(|row| row.chars().count()) else {
        glyph.rows.push(content);
        return Ok(());
    };

    let width = content.chars().count();
    if width > expected_width {
        return Err(ParseError::InconsistentGlyphLineLength { line: line_num });
    }
    let mut row = content;
    if width < expected_width {
        // Shorter lines are accepted and padded with paper.
        log::warn!("Line {line_num}: Bitmap line is shorter than expected width.");
        row.extend(std::iter::repeat_n(PAPER, expected_width - width));
    }
    glyph.rows.push(row);
    Ok(())
}
