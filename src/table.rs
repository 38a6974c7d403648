use crate::models::GlyphRecord;
use regex::Regex;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::OnceLock;

/// Name of the glyph preferred when a codepoint is missing.
pub const DEFAULT_LABEL: &str = "default";
/// Name of the second-choice fallback glyph.
pub const EMPTY_LABEL: &str = "empty";

const SPACE: u32 = ' ' as u32;

/// Index key a glyph label resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabelKey {
    Codepoint(u32),
    Name(String),
}

// 0x41 / u+0041, after lowercasing
static RE_HEX_LABEL_LOCK: OnceLock<Regex> = OnceLock::new();
fn get_re_hex_label() -> &'static Regex {
    RE_HEX_LABEL_LOCK
        .get_or_init(|| Regex::new(r"^(?:0x|u\+)([0-9a-f]+)$").expect("static hex label pattern"))
}

static RE_DEC_LABEL_LOCK: OnceLock<Regex> = OnceLock::new();
fn get_re_dec_label() -> &'static Regex {
    RE_DEC_LABEL_LOCK
        .get_or_init(|| Regex::new(r"^[0-9]+$").expect("static decimal label pattern"))
}

fn strip_quotes(label: &str) -> &str {
    let trimmed = label.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    trimmed
}

/// Classifies a raw label as a codepoint or a name.
///
/// Quotes are stripped and the label lowercased first. A label that looks
/// numeric but does not parse into a `u32` is treated as a name.
pub fn classify_label(label: &str) -> LabelKey {
    let normalized = strip_quotes(label).to_lowercase();

    if let Some(caps) = get_re_hex_label().captures(&normalized) {
        if let Some(digits) = caps.get(1) {
            if let Ok(cp) = u32::from_str_radix(digits.as_str(), 16) {
                return LabelKey::Codepoint(cp);
            }
        }
    } else if get_re_dec_label().is_match(&normalized) {
        if let Ok(cp) = normalized.parse::<u32>() {
            return LabelKey::Codepoint(cp);
        }
    }

    LabelKey::Name(normalized)
}

/// Immutable codepoint and name indexes over a list of glyph records.
///
/// Labels are inserted first-wins: once a key is taken, later records
/// claiming the same key are dropped for that key. Callers rely on this to
/// let an earlier glyph shadow a later duplicate, so it must stay explicit.
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    glyphs: Vec<GlyphRecord>,
    by_codepoint: BTreeMap<u32, usize>,
    by_name: BTreeMap<String, usize>,
    fallback: Option<usize>,
}

impl FontTable {
    pub fn build(glyphs: Vec<GlyphRecord>) -> Self {
        let mut by_codepoint = BTreeMap::new();
        let mut by_name = BTreeMap::new();

        for (index, glyph) in glyphs.iter().enumerate() {
            for label in &glyph.labels {
                let inserted = match classify_label(label) {
                    LabelKey::Codepoint(cp) => insert_first(&mut by_codepoint, cp, index),
                    LabelKey::Name(name) => insert_first(&mut by_name, name, index),
                };
                if !inserted {
                    log::debug!("Duplicate glyph label '{label}' in record {index}, keeping first");
                }
            }
        }

        let fallback = resolve_fallback(&by_codepoint, &by_name);
        if let Some(index) = fallback {
            log::debug!("Fallback glyph is record {index}");
        }

        Self {
            glyphs,
            by_codepoint,
            by_name,
            fallback,
        }
    }

    pub fn lookup(&self, character: char) -> Option<&GlyphRecord> {
        self.lookup_codepoint(character as u32)
    }

    /// Resolves a codepoint, degrading to the fallback chain:
    /// `"default"`, `"empty"`, space, then the highest codepoint.
    pub fn lookup_codepoint(&self, codepoint: u32) -> Option<&GlyphRecord> {
        self.by_codepoint
            .get(&codepoint)
            .copied()
            .or(self.fallback)
            .map(|index| &self.glyphs[index])
    }

    pub fn get_codepoint(&self, codepoint: u32) -> Option<&GlyphRecord> {
        self.by_codepoint
            .get(&codepoint)
            .map(|&index| &self.glyphs[index])
    }

    pub fn get_name(&self, name: &str) -> Option<&GlyphRecord> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&index| &self.glyphs[index])
    }

    pub fn fallback(&self) -> Option<&GlyphRecord> {
        self.fallback.map(|index| &self.glyphs[index])
    }

    /// Codepoints with a direct entry, ascending.
    pub fn codepoints(&self) -> impl Iterator<Item = u32> + '_ {
        self.by_codepoint.keys().copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_name.keys().map(String::as_str)
    }

    /// Records in construction order.
    pub fn glyphs(&self) -> &[GlyphRecord] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub(crate) fn fallback_index(&self) -> Option<usize> {
        self.fallback
    }

    pub(crate) fn codepoint_index(&self, codepoint: u32) -> Option<usize> {
        self.by_codepoint.get(&codepoint).copied()
    }

    pub(crate) fn glyph_at(&self, index: usize) -> &GlyphRecord {
        &self.glyphs[index]
    }
}

fn insert_first<K: Ord>(map: &mut BTreeMap<K, usize>, key: K, index: usize) -> bool {
    match map.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(index);
            true
        }
        Entry::Occupied(_) => false,
    }
}

fn resolve_fallback(
    by_codepoint: &BTreeMap<u32, usize>,
    by_name: &BTreeMap<String, usize>,
) -> Option<usize> {
    by_name
        .get(DEFAULT_LABEL)
        .or_else(|| by_name.get(EMPTY_LABEL))
        .or_else(|| by_codepoint.get(&SPACE))
        .or_else(|| by_codepoint.last_key_value().map(|(_, index)| index))
        .copied()
}
