//! 5x7 bitmap font for the key label and layer indicators.
//!
//! One glyph per printable ASCII character (32..=127), stored as five column
//! bytes with bit 0 on the top row. Glyphs are scaled by integer factors
//! 1..=4, every font pixel becoming a `scale x scale` block.
//!
//! Each character occupies a cell of `GLYPH_ADVANCE * scale` by
//! `CELL_HEIGHT * scale` pixels: one blank column after the glyph and one blank
//! row under it.

use crate::framebuffer::Canvas;
use crate::primitives::draw_filled_rect;

// =============================================================================
// Font Metrics
// =============================================================================

/// Glyph width in font pixels.
pub const GLYPH_WIDTH: i32 = 5;

/// Glyph height in font pixels.
pub const GLYPH_HEIGHT: i32 = 7;

/// Horizontal cursor advance per character at scale 1.
pub const GLYPH_ADVANCE: i32 = GLYPH_WIDTH + 1;

/// Cell height per character at scale 1.
pub const CELL_HEIGHT: i32 = 8;

/// Smallest supported scale.
pub const MIN_SCALE: u8 = 1;

/// Largest supported scale.
pub const MAX_SCALE: u8 = 4;

const FIRST_CHAR: u32 = 32;
const LAST_CHAR: u32 = 127;

// =============================================================================
// Glyph Table
// =============================================================================

#[rustfmt::skip]
static FONT_5X7: [[u8; 5]; 96] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x7F, 0x20, 0x18, 0x20, 0x7F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x03, 0x04, 0x78, 0x04, 0x03], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x08, 0x14, 0x54, 0x54, 0x3C], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x10, 0x08, 0x08, 0x10, 0x08], // ~
    [0x08, 0x1C, 0x2A, 0x08, 0x08], // DEL (left arrow)
];

// =============================================================================
// Glyph Lookup
// =============================================================================

/// A 5x7 glyph: five column bytes, bit 0 is the top row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    columns: [u8; 5],
}

impl Glyph {
    /// Raw column bytes.
    #[inline]
    pub const fn columns(&self) -> [u8; 5] { self.columns }

    /// Whether the font pixel at `(col, row)` is set.
    #[inline]
    pub const fn is_set(
        &self,
        col: usize,
        row: usize,
    ) -> bool {
        col < GLYPH_WIDTH as usize && row < GLYPH_HEIGHT as usize && self.columns[col] & (1 << row) != 0
    }
}

/// Look up the glyph for `c`, `None` outside 32..=127.
pub fn glyph(c: char) -> Option<Glyph> {
    let code = u32::from(c);
    if !(FIRST_CHAR..=LAST_CHAR).contains(&code) {
        return None;
    }
    FONT_5X7
        .get((code - FIRST_CHAR) as usize)
        .map(|&columns| Glyph { columns })
}

/// Clamp a requested scale to `MIN_SCALE..=MAX_SCALE`.
#[inline]
pub const fn clamp_scale(scale: u8) -> u8 {
    if scale < MIN_SCALE {
        MIN_SCALE
    } else if scale > MAX_SCALE {
        MAX_SCALE
    } else {
        scale
    }
}

// =============================================================================
// Metrics
// =============================================================================

/// Cursor advance of one character at `scale`.
#[inline]
pub const fn char_advance(scale: u8) -> i32 { GLYPH_ADVANCE * clamp_scale(scale) as i32 }

/// Cell height of one text line at `scale`.
#[inline]
pub const fn line_height(scale: u8) -> i32 { CELL_HEIGHT * clamp_scale(scale) as i32 }

/// Rendered width of `text` at `scale`, including the trailing spacing column.
pub fn text_width(
    text: &str,
    scale: u8,
) -> i32 {
    text.chars().count() as i32 * char_advance(scale)
}

// =============================================================================
// Drawing
// =============================================================================

/// Draw one character with its top-left corner at `(x, y)`.
///
/// Characters outside 32..=127 draw nothing.
pub fn draw_char<C: Canvas>(
    canvas: &mut C,
    c: char,
    x: i32,
    y: i32,
    scale: u8,
    color: C::Color,
) {
    let Some(glyph) = glyph(c) else {
        return;
    };
    let size = i32::from(clamp_scale(scale));

    for (col, &bits) in glyph.columns.iter().enumerate() {
        let mut line = bits;
        for row in 0..GLYPH_HEIGHT {
            if line & 0x01 != 0 {
                let px = x.saturating_add(col as i32 * size);
                let py = y.saturating_add(row * size);
                if size == 1 {
                    canvas.set(px, py, color);
                } else {
                    draw_filled_rect(canvas, px, py, size, size, color);
                }
            }
            line >>= 1;
        }
    }
}

/// Draw `text` on one line starting at `(x, y)`.
///
/// No wrapping or kerning. Returns the cursor X after the last character.
pub fn draw_text<C: Canvas>(
    canvas: &mut C,
    text: &str,
    x: i32,
    y: i32,
    scale: u8,
    color: C::Color,
) -> i32 {
    let advance = char_advance(scale);
    let mut cursor = x;
    for c in text.chars() {
        draw_char(canvas, c, cursor, y, scale, color);
        cursor = cursor.saturating_add(advance);
    }
    cursor
}

#[cfg(test)]
mod tests {
    use embedded_graphics::pixelcolor::BinaryColor;

    use super::*;
    use crate::framebuffer::StatusFramebuffer;

    #[test]
    fn test_glyph_range() {
        assert!(glyph(' ').is_some());
        assert!(glyph('~').is_some());
        assert!(glyph('\u{7F}').is_some());
        assert!(glyph('\u{1F}').is_none());
        assert!(glyph('\u{80}').is_none());
        assert!(glyph('é').is_none());
    }

    #[test]
    fn test_glyph_bits() {
        let a = glyph('A').unwrap();
        assert_eq!(a.columns(), [0x7E, 0x11, 0x11, 0x11, 0x7E]);
        // Column 0 = 0x7E: rows 1..=6 set, row 0 clear
        assert!(!a.is_set(0, 0));
        assert!(a.is_set(0, 1));
        assert!(a.is_set(0, 6));
        assert!(!a.is_set(5, 0));
    }

    #[test]
    fn test_scale_clamped() {
        assert_eq!(clamp_scale(0), 1);
        assert_eq!(clamp_scale(3), 3);
        assert_eq!(clamp_scale(9), 4);
        assert_eq!(char_advance(2), 12);
        assert_eq!(line_height(4), 32);
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("", 1), 0);
        assert_eq!(text_width("ESC", 1), 18);
        assert_eq!(text_width("ESC", 2), 36);
        assert_eq!(text_width("CTRL+C", 3), 6 * 18);
    }

    #[test]
    fn test_draw_char_pixel_count_scales() {
        let mut fb = StatusFramebuffer::new();
        draw_char(&mut fb, 'I', 0, 0, 1, BinaryColor::On);
        let lit = fb.count_lit();
        // 0x41, 0x7F, 0x41 -> 2 + 7 + 2
        assert_eq!(lit, 11);

        let mut fb = StatusFramebuffer::new();
        draw_char(&mut fb, 'I', 0, 0, 3, BinaryColor::On);
        assert_eq!(fb.count_lit(), lit * 9);
    }

    #[test]
    fn test_draw_char_out_of_range_noop() {
        let mut fb = StatusFramebuffer::new();
        draw_char(&mut fb, '\n', 0, 0, 1, BinaryColor::On);
        draw_char(&mut fb, 'ü', 0, 0, 1, BinaryColor::On);
        assert_eq!(fb.count_lit(), 0);
    }

    #[test]
    fn test_draw_text_advances_cursor() {
        let mut fb = StatusFramebuffer::new();
        let end = draw_text(&mut fb, "AB", 10, 0, 2, BinaryColor::On);
        assert_eq!(end, 10 + 2 * 12);
        // Spacing column after 'A' stays dark
        for y in 0..16 {
            assert!(!fb.get_pixel(10 + 10, y));
            assert!(!fb.get_pixel(10 + 11, y));
        }
    }

    #[test]
    fn test_draw_text_clips() {
        let mut fb = StatusFramebuffer::new();
        draw_text(&mut fb, "WWWWWWWWWWWWWWWWWWWWWWWWW", 100, 60, 4, BinaryColor::On);
        assert!(fb.count_lit() > 0);
    }

    #[test]
    fn test_draw_text_extreme_origin() {
        let mut fb = StatusFramebuffer::new();
        let end = draw_text(&mut fb, "W", i32::MAX - 3, 0, 4, BinaryColor::On);
        assert_eq!(end, i32::MAX);
        draw_text(&mut fb, "WW", 0, i32::MAX - 3, 4, BinaryColor::On);
        draw_text(&mut fb, "W", i32::MIN, i32::MIN, 4, BinaryColor::On);
        assert_eq!(fb.count_lit(), 0);
    }
}
