use yaffglyph::columns::transpose;
use yaffglyph::{Font, FontError, FontType, GlyphRecord, INK, YaffDocument, unpack_bits};

const FRAME_6X8: &str = include_str!("frame6x8.yaff");

const NARROW: &str = "\
name: Narrow
0x69:
    @
    .
    @
    @
    @
    right-bearing: 1
0x6d:
    @@.@.
    @.@.@
    @.@.@
    @.@.@
    @...@
    left-bearing: 1
    right-bearing: 1
empty:
    -
";

fn frame_font() -> Font {
    let document: YaffDocument = FRAME_6X8.parse().unwrap();
    Font::fixed_from_document(document, 6, 8).unwrap()
}

fn ink_matrix(rows: &[String]) -> Vec<bool> {
    rows.iter()
        .flat_map(|row| row.chars().map(|c| c == INK))
        .collect()
}

#[test]
fn frame_font_metadata() {
    let document: YaffDocument = FRAME_6X8.parse().unwrap();
    assert_eq!(document.properties.get("cell-size").unwrap(), "6x8");
    assert_eq!(document.glyphs.len(), 5);

    let font = Font::fixed_from_document(document, 6, 8).unwrap();
    assert_eq!(font.name(), "Frame 6x8");
    assert_eq!(font.font_type(), FontType::Fixed);
    assert!(font.is_ifont_compatible());
    assert_eq!(font.char_map(), vec![0x20, 0x2d, 0x41, 0x49]);
}

#[test]
fn frame_font_bitmaps_match_rows() {
    let font = frame_font();
    for codepoint in font.char_map() {
        let c = char::from_u32(codepoint).unwrap();
        let bytes = font.bitmap(c).unwrap();
        assert_eq!(bytes.len(), 6, "glyph U+{codepoint:04X}");

        let padded = yaffglyph::bitmap::padded_rows(font.lookup(c), codepoint).unwrap();
        assert_eq!(unpack_bits(&bytes, 48), ink_matrix(&padded));
    }
}

#[test]
fn frame_font_packs_lsb_first() {
    let font = frame_font();
    let bytes = font.bitmap('I').unwrap();
    // "@@@@@." sets bits 0-4, the next row's ink lands on bit 8.
    assert_eq!(bytes[0], 0x1F);
    assert_eq!(bytes[1] & 0x01, 0x01);
}

#[test]
fn frame_font_bearing_pads_narrow_glyph() {
    let font = frame_font();
    assert_eq!(font.glyph_width('-'), 4);
    let bearing = font.bearing('-');
    assert_eq!((bearing.left, bearing.right), (1, 1));

    let bytes = font.bitmap('-').unwrap();
    let pixels = unpack_bits(&bytes, 48);
    let row3: Vec<bool> = pixels[18..24].to_vec();
    assert_eq!(row3, vec![false, true, true, true, true, false]);
}

#[test]
fn frame_font_missing_glyph_uses_default() {
    let font = frame_font();
    assert_eq!(font.lookup('Z'), font.table().get_name("default").unwrap());
    assert_eq!(font.bitmap('Z').unwrap(), font.bitmap_for_cell('Z', 6, 8).unwrap());
}

#[test]
fn frame_font_rejects_wrong_cell() {
    let font = frame_font();
    assert!(matches!(
        font.bitmap_for_cell('A', 8, 8),
        Err(FontError::CellMismatch {
            glyph_width: 6,
            glyph_height: 8,
            ..
        })
    ));
}

#[test]
fn frame_font_rejects_overflowing_cell() {
    let font = frame_font();
    assert_eq!(
        font.bitmap_for_cell('A', usize::MAX, 2),
        Err(FontError::InvalidCellSize {
            width: usize::MAX,
            height: 2
        })
    );
}

#[test]
fn narrow_font_infers_nominal_cell() {
    let document: YaffDocument = NARROW.parse().unwrap();
    let font = Font::proportional_from_document(document, 0, 0).unwrap();
    assert_eq!(font.font_type(), FontType::Proportional);
    assert_eq!((font.width(), font.height()), (1, 5));
    assert!(!font.is_ifont_compatible());
    assert_eq!(font.glyph_width('m'), 5);
}

#[test]
fn narrow_font_layout() {
    let document: YaffDocument = NARROW.parse().unwrap();
    let font = Font::proportional_from_document(document, 0, 0).unwrap();
    assert_eq!(font.advance('i'), 2);
    assert_eq!(font.advance('m'), 7);
    assert_eq!(font.text_width("mi"), 9);

    assert_eq!(font.glyph_lines('i'), vec!["@.@@@"]);
    let strips = font.glyph_lines_with_bearing('m').unwrap();
    assert_eq!(strips.len(), 7);
    assert_eq!(strips[0], ".....");
    assert_eq!(strips[1], "@@@@@");
    assert_eq!(strips[6], ".....");
}

#[test]
fn narrow_font_columns_round_trip() {
    let document: YaffDocument = NARROW.parse().unwrap();
    let font = Font::proportional_from_document(document, 0, 0).unwrap();
    for codepoint in font.char_map() {
        let c = char::from_u32(codepoint).unwrap();
        let glyph = font.lookup(c);
        assert_eq!(transpose(&font.glyph_lines(c)), glyph.rows);

        let padded = yaffglyph::bitmap::padded_rows(glyph, codepoint).unwrap();
        assert_eq!(transpose(&font.glyph_lines_with_bearing(c).unwrap()), padded);
        assert!(padded.iter().all(|row| row.len() == padded[0].len()));
        assert_eq!(font.glyph_height(c), glyph.rows.len());
    }
}

#[test]
fn narrow_font_missing_glyph_is_blank() {
    let document: YaffDocument = NARROW.parse().unwrap();
    let font = Font::proportional_from_document(document, 0, 0).unwrap();
    assert!(font.lookup('x').is_empty_sentinel());
    assert_eq!(font.bitmap_for_cell('x', 5, 5).unwrap(), vec![0; 4]);
}

#[test]
fn empty_glyph_wins_over_space() {
    let font = Font::fixed(
        "fallback",
        2,
        2,
        vec![
            GlyphRecord::new(["0x20"], ["..", ".."]),
            GlyphRecord::new(["\"empty\""], ["-"]),
        ],
    )
    .unwrap();
    assert!(font.lookup('q').is_empty_sentinel());
}

#[test]
fn duplicate_codepoint_keeps_first_record() {
    let font = Font::fixed(
        "dupes",
        1,
        1,
        vec![
            GlyphRecord::new(["65"], ["@"]),
            GlyphRecord::new(["65"], ["."]),
        ],
    )
    .unwrap();
    assert_eq!(font.lookup('A').rows, vec!["@"]);
    assert_eq!(font.bitmap('A').unwrap(), vec![1]);
}
