//! Auto-fit text layout for the key label.
//!
//! A label is either a plain key name (`"ESC"`) or a combo whose parts are
//! joined by `+` (`"CTRL+SHFT+T"`). The layout engine picks the largest font
//! scale at which the label fits the card, centers the resulting block and
//! draws each part and each separator on its own so a highlight can be applied
//! per segment.
//!
//! # Scale Selection
//!
//! Candidates are tried from largest to smallest:
//!
//! ```text
//! for scale in [4, 3, 2, 1]:
//!     height = scale * 8            reject if > max_height
//!     width  = sum(segment widths) + one cell per separator
//!     accept if width <= max_width
//! fallback: 1
//! ```

use crate::config::MAX_TEXT_HEIGHT;
use crate::font::{self, char_advance, line_height};
use crate::framebuffer::Canvas;
use crate::primitives::{draw_filled_rect, draw_filled_rounded_rect};

/// Scales tried by [`find_best_scale`], largest first.
pub const SCALE_CANDIDATES: [u8; 4] = [4, 3, 2, 1];

/// Combo separator character.
pub const SEPARATOR: char = '+';

/// Horizontal space kept clear on each side of the label inside its bounds.
pub const LABEL_INSET: i32 = 4;

// =============================================================================
// Segments
// =============================================================================

/// One drawable piece of a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A key or modifier name.
    Text(&'a str),
    /// The `+` between two names.
    Separator,
}

impl Segment<'_> {
    /// Number of character cells the segment occupies.
    pub fn cells(&self) -> i32 {
        match self {
            Self::Text(text) => text.chars().count() as i32,
            Self::Separator => 1,
        }
    }

    /// Rendered width at `scale`.
    #[inline]
    pub fn width(
        &self,
        scale: u8,
    ) -> i32 {
        self.cells() * char_advance(scale)
    }
}

/// Iterator splitting a label into [`Segment`]s.
///
/// `"CTRL+C"` yields `Text("CTRL")`, `Separator`, `Text("C")`. A label without
/// `+` yields a single text segment.
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    rest: Option<&'a str>,
    separator_pending: bool,
}

impl<'a> Segments<'a> {
    pub const fn new(text: &'a str) -> Self {
        Self {
            rest: Some(text),
            separator_pending: false,
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.separator_pending {
            self.separator_pending = false;
            return Some(Segment::Separator);
        }
        let rest = self.rest?;
        match rest.split_once(SEPARATOR) {
            Some((head, tail)) => {
                self.rest = Some(tail);
                self.separator_pending = true;
                Some(Segment::Text(head))
            }
            None => {
                self.rest = None;
                Some(Segment::Text(rest))
            }
        }
    }
}

/// Whether the label is a `+` combo.
#[inline]
pub fn is_combo(text: &str) -> bool { text.contains(SEPARATOR) }

/// Width of `text` at `scale`, summed segment by segment for combos.
pub fn label_width(
    text: &str,
    scale: u8,
) -> i32 {
    if is_combo(text) {
        Segments::new(text).map(|segment| segment.width(scale)).sum()
    } else {
        font::text_width(text, scale)
    }
}

// =============================================================================
// Scale Selection
// =============================================================================

/// Largest candidate scale at which `text` fits `max_width` x `max_height`.
///
/// Never returns 0: when nothing fits the result is 1 and the label is clipped.
pub fn find_best_scale(
    text: &str,
    max_width: i32,
    max_height: i32,
) -> u8 {
    SCALE_CANDIDATES
        .iter()
        .copied()
        .filter(|&scale| line_height(scale) <= max_height)
        .find(|&scale| label_width(text, scale) <= max_width)
        .unwrap_or(1)
}

// =============================================================================
// Layout
// =============================================================================

/// Axis-aligned box in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Self {
        Self { x, y, width, height }
    }
}

/// Where and how large a label is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelLayout {
    /// Chosen font scale (1..=4).
    pub scale: u8,
    /// Top-left corner of the text block.
    pub x: i32,
    pub y: i32,
    /// Rendered size of the text block.
    pub width: i32,
    pub height: i32,
}

impl LabelLayout {
    /// Fit `text` into `bounds`.
    ///
    /// The label may use the bounds' width minus [`LABEL_INSET`] on each side
    /// and at most [`MAX_TEXT_HEIGHT`] of height. The block is centered
    /// horizontally on its rendered width and vertically inside a
    /// `MAX_TEXT_HEIGHT` band centered in the bounds.
    pub fn compute(
        text: &str,
        bounds: Bounds,
    ) -> Self {
        let max_width = bounds.width - 2 * LABEL_INSET;
        let scale = find_best_scale(text, max_width, MAX_TEXT_HEIGHT);
        let width = label_width(text, scale);
        let height = line_height(scale);

        let x = bounds.x + (bounds.width - width) / 2;
        let band_y = bounds.y + (bounds.height - MAX_TEXT_HEIGHT) / 2;
        let y = band_y + (MAX_TEXT_HEIGHT - height) / 2;

        Self {
            scale,
            x,
            y,
            width,
            height,
        }
    }

    /// Rounded box drawn behind a highlighted label: padded by one font pixel
    /// horizontally and one screen pixel vertically.
    pub fn highlight_bounds(&self) -> Bounds {
        let padding = i32::from(self.scale);
        Bounds::new(self.x - padding, self.y - 1, self.width + 2 * padding, self.height + 2)
    }
}

// =============================================================================
// Drawing
// =============================================================================

/// Colors used to draw a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelStyle<C> {
    /// Glyph color.
    pub text: C,
    /// Highlight color: when set, a rounded box is drawn behind the whole
    /// label and under every segment before its glyphs.
    pub highlight: Option<C>,
    /// Corner radius of the highlight box.
    pub highlight_radius: i32,
}

impl<C: Copy> LabelStyle<C> {
    /// Plain text, no highlight.
    pub const fn plain(text: C) -> Self {
        Self {
            text,
            highlight: None,
            highlight_radius: 0,
        }
    }

    /// Text drawn on top of a highlight box.
    pub const fn highlighted(
        text: C,
        highlight: C,
        radius: i32,
    ) -> Self {
        Self {
            text,
            highlight: Some(highlight),
            highlight_radius: radius,
        }
    }
}

/// Draw `text` at `layout`, one segment at a time. Returns the cursor X after
/// the last segment.
pub fn draw_label<C: Canvas>(
    canvas: &mut C,
    layout: &LabelLayout,
    text: &str,
    style: &LabelStyle<C::Color>,
) -> i32 {
    if let Some(highlight) = style.highlight {
        let b = layout.highlight_bounds();
        draw_filled_rounded_rect(canvas, b.x, b.y, b.width, b.height, style.highlight_radius, highlight);
    }

    let mut cursor = layout.x;
    for segment in Segments::new(text) {
        let width = segment.width(layout.scale);
        if let Some(highlight) = style.highlight {
            draw_filled_rect(canvas, cursor, layout.y, width, layout.height, highlight);
        }
        match segment {
            Segment::Text(part) => {
                font::draw_text(canvas, part, cursor, layout.y, layout.scale, style.text);
            }
            Segment::Separator => {
                font::draw_char(canvas, SEPARATOR, cursor, layout.y, layout.scale, style.text);
            }
        }
        cursor += width;
    }
    cursor
}

// =============================================================================
// Unit Tests
// =============================================================================
