//! Text measurement for the standard PDF base fonts
//!
//! Advance widths (1/1000 em) from the Adobe core-font metrics for
//! Helvetica and Helvetica-Bold, covering printable ASCII. The oblique face
//! shares the regular widths.

/// Font faces used by the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
    Oblique,
}

const FIRST_CHAR: u32 = 32;
const BULLET_WIDTH: u16 = 350;
const DEFAULT_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

fn char_units(c: char, face: FontFace) -> u16 {
    if c == '•' {
        return BULLET_WIDTH;
    }
    let table = match face {
        FontFace::Bold => &HELVETICA_BOLD,
        FontFace::Regular | FontFace::Oblique => &HELVETICA,
    };
    (c as u32)
        .checked_sub(FIRST_CHAR)
        .and_then(|i| table.get(i as usize))
        .copied()
        .unwrap_or(DEFAULT_WIDTH)
}

/// Rendered width of `text` in points
pub fn text_width(text: &str, face: FontFace, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| char_units(c, face) as u32).sum();
    units as f32 * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        // "Hello" in Helvetica: 722 + 556 + 222 + 222 + 556 = 2278
        assert!((text_width("Hello", FontFace::Regular, 10.0) - 22.78).abs() < 1e-4);
        assert!((text_width(" ", FontFace::Regular, 10.0) - 2.78).abs() < 1e-4);
        assert_eq!(text_width("", FontFace::Bold, 18.0), 0.0);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = text_width("MEDICAL HEALTH REPORT", FontFace::Regular, 12.0);
        let bold = text_width("MEDICAL HEALTH REPORT", FontFace::Bold, 12.0);
        assert!(bold > regular);
        assert_eq!(
            text_width("abc", FontFace::Oblique, 8.0),
            text_width("abc", FontFace::Regular, 8.0)
        );
    }

    #[test]
    fn test_non_ascii_falls_back() {
        assert_eq!(text_width("•", FontFace::Regular, 10.0), 3.5);
        assert_eq!(text_width("é", FontFace::Regular, 10.0), 5.56);
    }
}
