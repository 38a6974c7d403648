use crate::models::{Bearing, GlyphRecord};

pub const LEFT_BEARING: &str = "left-bearing";
pub const RIGHT_BEARING: &str = "right-bearing";

/// Natural width of a glyph: the length of its first row, no bearing.
pub fn glyph_width(glyph: &GlyphRecord) -> usize {
    glyph.natural_width()
}

pub fn glyph_height(glyph: &GlyphRecord) -> usize {
    glyph.natural_height()
}

/// Reads the bearing properties; absent or unparsable values count as 0.
pub fn glyph_bearing(glyph: &GlyphRecord) -> Bearing {
    Bearing {
        left: bearing_property(glyph, LEFT_BEARING),
        right: bearing_property(glyph, RIGHT_BEARING),
    }
}

/// Horizontal advance: bearing plus natural width.
pub fn glyph_advance(glyph: &GlyphRecord) -> i32 {
    let bearing = glyph_bearing(glyph);
    let width = i32::try_from(glyph_width(glyph)).unwrap_or(i32::MAX);
    bearing.left.saturating_add(width).saturating_add(bearing.right)
}

fn bearing_property(glyph: &GlyphRecord, key: &str) -> i32 {
    match glyph.property(key) {
        Some(value) => value.trim().parse::<i32>().unwrap_or_else(|_| {
            log::debug!("Unparsable {key} '{value}', using 0");
            0
        }),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_and_height() {
        let glyph = GlyphRecord::new(["A"], [".@@.", "@..@", "@@@@", "@..@", "@..@"]);
        assert_eq!(glyph_width(&glyph), 4);
        assert_eq!(glyph_height(&glyph), 5);
    }

    #[test]
    fn test_width_of_glyph_without_rows() {
        let glyph = GlyphRecord::new(["A"], Vec::<String>::new());
        assert_eq!(glyph_width(&glyph), 0);
        assert_eq!(glyph_height(&glyph), 0);
    }

    #[test]
    fn test_bearing_parsing() {
        let glyph = GlyphRecord::new(["A"], ["@"])
            .with_property(LEFT_BEARING, "2")
            .with_property(RIGHT_BEARING, " -1 ");
        assert_eq!(glyph_bearing(&glyph), Bearing { left: 2, right: -1 });
        assert_eq!(glyph_advance(&glyph), 2);
    }

    #[test]
    fn test_bearing_defaults_to_zero() {
        let glyph = GlyphRecord::new(["A"], ["@"]).with_property(LEFT_BEARING, "wide");
        assert_eq!(glyph_bearing(&glyph), Bearing::default());
        assert_eq!(glyph_advance(&glyph), 1);
    }
}
