//! Status screen composition and redraw tracking.
//!
//! This module provides:
//! - [`render_status`] - draws the whole 128x64 status screen from a [`DisplayState`]
//! - [`RenderState`] - decides whether a tick needs a redraw at all
//!
//! # Screen Layout
//!
//! ```text
//! +--------------------------------+  y = 2
//! |          key card              |
//! |        CTRL+SHFT+T             |  label band (16 px)
//! |                                |
//! +--------------------------------+  y = 38
//! .                                .  corner dots (y = 40)
//! [L0] [L1] [L2] [L3] [L4]            layer indicators (y = 46)
//! .========                      .    press-count bar + dots (y = 61)
//! ```
//!
//! # Intensities
//!
//! Everything is drawn through [`Canvas::shade`], so grayscale targets get the
//! dimmed previous/inactive layer outlines, the progress track and the fading
//! highlight, while monochrome targets collapse every non-zero level to On.
//! Track-level decorations are skipped on monochrome so they do not read as
//! fully lit.

use crate::animations::apply_opacity;
use crate::config::{
    CARD_HEIGHT, CARD_RADIUS, CARD_WIDTH, CARD_X, CARD_Y, CORNER_DOT_SIZE, CORNER_DOTS, HIGHLIGHT_RADIUS,
    INDICATOR_HEIGHT, INDICATOR_RADIUS, INDICATOR_SPACING, INDICATOR_START_X, INDICATOR_WIDTH, INDICATOR_Y,
    IndicatorStyle, LEVEL_FULL, LEVEL_INACTIVE_LAYER, LEVEL_PREVIOUS_LAYER, LEVEL_TRACK, PATTERN_BORDER,
    PATTERN_DOT_WIDTH, PATTERN_PITCH, PATTERN_X, PROGRESS_HEIGHT, PROGRESS_WIDTH, PROGRESS_WRAP, PROGRESS_X,
    PROGRESS_Y,
};
use crate::font::{self, text_width};
use crate::framebuffer::Canvas;
use crate::layout::{Bounds, LabelLayout, LabelStyle, draw_label};
use crate::pages::Page;
use crate::primitives::{draw_filled_rect, draw_filled_rounded_rect, draw_rounded_rect};
use crate::state::{DisplayState, PressPhase};

/// Opacity above which the fading label is still drawn inverted.
const FADE_INVERT_THRESHOLD: u8 = 128;

/// Glow ring insets drawn inside the key card while a press is highlighted.
const GLOW_INSETS: [i32; 2] = [2, 3];

/// 5x5 layer icons, one row per byte, MSB of the low 5 bits on the left:
/// square, diamond, plus, star, solid.
pub const LAYER_PATTERNS: [[u8; 5]; 5] = [
    [0b11111, 0b10001, 0b10001, 0b10001, 0b11111],
    [0b00100, 0b01110, 0b11111, 0b01110, 0b00100],
    [0b11111, 0b11011, 0b10101, 0b11011, 0b11111],
    [0b10101, 0b01110, 0b11111, 0b01110, 0b10101],
    [0b11111, 0b11111, 0b11111, 0b11111, 0b11111],
];

/// Key card bounds.
pub const CARD_BOUNDS: Bounds = Bounds::new(CARD_X, CARD_Y, CARD_WIDTH, CARD_HEIGHT);

// =============================================================================
// Status Screen
// =============================================================================

/// Draw the full status screen for `state` at time `now`.
///
/// The canvas is cleared first; the result depends only on `state` and `now`.
pub fn render_status<C: Canvas>(
    canvas: &mut C,
    state: &DisplayState,
    now: u64,
) {
    let phase = state.phase(now, C::GRAYSCALE);

    canvas.clear();
    draw_key_card(canvas, phase);
    draw_key_label(canvas, state.last_key_label(), phase);
    draw_layer_indicators(canvas, state);
    draw_progress_bar(canvas, state.key_press_count());
    draw_corner_dots(canvas, state.current_layer());
}

/// Card outline with a 1px shadow, plus glow rings while highlighted.
fn draw_key_card<C: Canvas>(
    canvas: &mut C,
    phase: PressPhase,
) {
    let on = C::on();
    draw_rounded_rect(canvas, CARD_X + 1, CARD_Y + 1, CARD_WIDTH, CARD_HEIGHT, CARD_RADIUS, on);
    draw_rounded_rect(canvas, CARD_X, CARD_Y, CARD_WIDTH, CARD_HEIGHT, CARD_RADIUS, on);

    let glow = match phase {
        PressPhase::Fresh => on,
        PressPhase::Fading { opacity } => C::shade(apply_opacity(LEVEL_FULL, opacity)),
        PressPhase::Idle => return,
    };
    for inset in GLOW_INSETS {
        draw_rounded_rect(
            canvas,
            CARD_X + inset,
            CARD_Y + inset,
            CARD_WIDTH - 2 * inset,
            CARD_HEIGHT - 2 * inset,
            CARD_RADIUS,
            glow,
        );
    }
}

/// Label style for a press phase.
pub fn label_style<C: Canvas>(phase: PressPhase) -> LabelStyle<C::Color> {
    match phase {
        PressPhase::Fresh => LabelStyle::highlighted(C::off(), C::on(), HIGHLIGHT_RADIUS),
        PressPhase::Fading { opacity } => {
            let text = if opacity >= FADE_INVERT_THRESHOLD { C::off() } else { C::on() };
            LabelStyle::highlighted(text, C::shade(apply_opacity(LEVEL_FULL, opacity)), HIGHLIGHT_RADIUS)
        }
        PressPhase::Idle => LabelStyle::plain(C::on()),
    }
}

fn draw_key_label<C: Canvas>(
    canvas: &mut C,
    label: &str,
    phase: PressPhase,
) {
    let layout = LabelLayout::compute(label, CARD_BOUNDS);
    draw_label(canvas, &layout, label, &label_style::<C>(phase));
}

/// Level of an indicator outline that is not the active layer.
fn inactive_level(
    index: u8,
    previous: Option<u8>,
) -> u8 {
    if previous == Some(index) {
        LEVEL_PREVIOUS_LAYER
    } else {
        LEVEL_INACTIVE_LAYER
    }
}

/// Left edge of layer indicator `index`.
#[inline]
pub fn indicator_x(index: u8) -> i32 { INDICATOR_START_X + i32::from(index) * INDICATOR_SPACING }

fn draw_layer_indicators<C: Canvas>(
    canvas: &mut C,
    state: &DisplayState,
) {
    let current = state.current_layer();
    let previous = state.previous_layer();
    let style = state.config().indicator_style;

    for index in 0..state.config().layer_count {
        let x = indicator_x(index);
        let digits = [b'L', b'0' + index];
        let label = core::str::from_utf8(&digits).unwrap_or("L");
        let text_x = x + (INDICATOR_WIDTH - text_width(label, 1) + 1) / 2;
        let text_y = INDICATOR_Y + (INDICATOR_HEIGHT - font::GLYPH_HEIGHT) / 2;

        match (style, index == current) {
            (IndicatorStyle::Label, true) => {
                draw_filled_rounded_rect(
                    canvas,
                    x,
                    INDICATOR_Y,
                    INDICATOR_WIDTH,
                    INDICATOR_HEIGHT,
                    INDICATOR_RADIUS,
                    C::on(),
                );
                font::draw_text(canvas, label, text_x, text_y, 1, C::off());
            }
            (IndicatorStyle::Pattern, true) => {
                for inset in 0..PATTERN_BORDER {
                    draw_rounded_rect(
                        canvas,
                        x + inset,
                        INDICATOR_Y + inset,
                        INDICATOR_WIDTH - 2 * inset,
                        INDICATOR_HEIGHT - 2 * inset,
                        INDICATOR_RADIUS - inset,
                        C::on(),
                    );
                }
                draw_layer_pattern(canvas, index, x, INDICATOR_Y);
            }
            (_, false) => {
                let outline = C::shade(inactive_level(index, previous));
                draw_rounded_rect(
                    canvas,
                    x,
                    INDICATOR_Y,
                    INDICATOR_WIDTH,
                    INDICATOR_HEIGHT,
                    INDICATOR_RADIUS,
                    outline,
                );
                if style == IndicatorStyle::Label {
                    font::draw_text(canvas, label, text_x, text_y, 1, C::shade(LEVEL_FULL));
                }
            }
        }
    }
}

/// Draw the dot pattern of `layer` inside the indicator box at `(x, y)`.
///
/// Dots are `PATTERN_DOT_WIDTH` x 1 on a `PATTERN_PITCH` column grid,
/// vertically centered. Layers without a pattern draw nothing.
pub fn draw_layer_pattern<C: Canvas>(
    canvas: &mut C,
    layer: u8,
    x: i32,
    y: i32,
) {
    let Some(rows) = LAYER_PATTERNS.get(usize::from(layer)) else {
        return;
    };
    let top = y + (INDICATOR_HEIGHT - rows.len() as i32) / 2;

    for (row, &bits) in rows.iter().enumerate() {
        for col in 0..5 {
            if bits & (0b10000 >> col) != 0 {
                let dot_x = x + PATTERN_X + col * PATTERN_PITCH;
                draw_filled_rect(canvas, dot_x, top + row as i32, PATTERN_DOT_WIDTH, 1, C::on());
            }
        }
    }
}

/// Filled width of the press-count bar.
#[inline]
pub const fn progress_width(key_press_count: u32) -> i32 {
    ((key_press_count % PROGRESS_WRAP) as i32 * PROGRESS_WIDTH) / PROGRESS_WRAP as i32
}

fn draw_progress_bar<C: Canvas>(
    canvas: &mut C,
    key_press_count: u32,
) {
    if C::GRAYSCALE {
        draw_filled_rect(canvas, PROGRESS_X, PROGRESS_Y, PROGRESS_WIDTH, PROGRESS_HEIGHT, C::shade(LEVEL_TRACK));
    }
    draw_filled_rect(
        canvas,
        PROGRESS_X,
        PROGRESS_Y,
        progress_width(key_press_count),
        PROGRESS_HEIGHT,
        C::on(),
    );
}

fn draw_corner_dots<C: Canvas>(
    canvas: &mut C,
    current_layer: u8,
) {
    for (i, &(x, y)) in CORNER_DOTS.iter().enumerate() {
        let color = if i < usize::from(current_layer) {
            C::on()
        } else if C::GRAYSCALE {
            C::shade(LEVEL_TRACK)
        } else {
            continue;
        };
        draw_filled_rect(canvas, x, y, CORNER_DOT_SIZE, CORNER_DOT_SIZE, color);
    }
}

// =============================================================================
// Redraw Tracking
// =============================================================================

/// Tracks what the last drawn frame showed, so ticks only redraw on change.
///
/// A frame is dirty when any of these differ from the last drawn frame:
/// - the state revision (events and setters)
/// - the press phase, including the fading opacity
/// - the visible page
///
/// The first frame and any frame after [`RenderState::mark_display_cleared`]
/// are always dirty.
#[derive(Clone, Debug)]
pub struct RenderState {
    /// Revision of the state drawn last.
    prev_revision: u32,

    /// Press phase drawn last.
    prev_phase: PressPhase,

    /// Page drawn last.
    prev_page: Page,

    /// Whether this is the first frame (need full redraw).
    first_frame: bool,

    /// Whether the display was overwritten externally (splash, page switch).
    display_cleared: bool,
}

impl RenderState {
    /// Create a new render state for first frame.
    pub const fn new() -> Self {
        Self {
            prev_revision: 0,
            prev_phase: PressPhase::Idle,
            prev_page: Page::Status,
            first_frame: true,
            display_cleared: false,
        }
    }

    /// Check whether a frame for `revision`, `phase` and `page` differs from
    /// the last drawn one.
    ///
    /// Does not record anything; call [`RenderState::end_frame`] after drawing.
    pub fn is_dirty(
        &self,
        revision: u32,
        phase: PressPhase,
        page: Page,
    ) -> bool {
        self.first_frame
            || self.display_cleared
            || revision != self.prev_revision
            || phase != self.prev_phase
            || page != self.prev_page
    }

    /// Check if this is the first frame.
    #[inline]
    pub const fn is_first_frame(&self) -> bool { self.first_frame }

    /// Mark that the display was overwritten outside the status renderer.
    ///
    /// The next frame is redrawn even if nothing in the state changed.
    #[inline]
    pub fn mark_display_cleared(&mut self) { self.display_cleared = true; }

    /// Record the frame that was just drawn.
    pub fn end_frame(
        &mut self,
        revision: u32,
        phase: PressPhase,
        page: Page,
    ) {
        self.prev_revision = revision;
        self.prev_phase = phase;
        self.prev_page = page;
        self.first_frame = false;
        self.display_cleared = false;
    }
}

impl Default for RenderState {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embedded_graphics::pixelcolor::Gray8;
    use embedded_graphics::prelude::GrayColor;

    use super::*;
    use crate::config::{IndicatorStyle, StatusConfig};
    use crate::framebuffer::{StatusFramebuffer, StatusGrayFramebuffer};
    use crate::keycodes::{Modifiers, usage};

    fn pressed_state(now: u64) -> DisplayState {
        let mut state = DisplayState::default();
        state.on_key_changed(usage::A, true, Modifiers::empty(), now);
        state
    }

    #[test]
    fn test_render_is_deterministic() {
        let state = pressed_state(0);
        let mut a = StatusFramebuffer::new();
        let mut b = StatusFramebuffer::new();
        Canvas::fill(&mut b, embedded_graphics::pixelcolor::BinaryColor::On);
        render_status(&mut a, &state, 50);
        render_status(&mut b, &state, 50);
        assert!(a == b);
    }

    #[test]
    fn test_card_outline_drawn() {
        let state = DisplayState::default();
        let mut fb = StatusFramebuffer::new();
        render_status(&mut fb, &state, 0);
        // Top edge midpoint and its shadow
        assert!(fb.get_pixel(64, CARD_Y));
        assert!(fb.get_pixel(64, CARD_Y + 1));
        // Rounded corner leaves the bounding box corner dark
        assert!(!fb.get_pixel(CARD_X, CARD_Y));
    }

    #[test]
    fn test_fresh_press_highlights_label() {
        let state = pressed_state(0);
        let layout = LabelLayout::compute("A", CARD_BOUNDS);

        let mut fresh = StatusFramebuffer::new();
        render_status(&mut fresh, &state, 100);
        let mut idle = StatusFramebuffer::new();
        render_status(&mut idle, &state, 1_000);

        // Spacing column right of the glyph: lit on the highlight box only
        let x = layout.x + 5 * i32::from(layout.scale);
        let y = layout.y + 2;
        assert!(fresh.get_pixel(x, y));
        assert!(!idle.get_pixel(x, y));
        assert!(fresh.count_lit() > idle.count_lit());
    }

    #[test]
    fn test_glow_only_while_highlighted() {
        let state = pressed_state(0);
        let mut fresh = StatusFramebuffer::new();
        render_status(&mut fresh, &state, 10);
        let mut idle = StatusFramebuffer::new();
        render_status(&mut idle, &state, 400);

        let glow_y = CARD_Y + 2;
        assert!(fresh.get_pixel(64, glow_y));
        assert!(!idle.get_pixel(64, glow_y));
    }

    #[test]
    fn test_monochrome_fading_renders_idle() {
        let state = pressed_state(0);
        let mut fading = StatusFramebuffer::new();
        render_status(&mut fading, &state, 250);
        let mut idle = StatusFramebuffer::new();
        render_status(&mut idle, &state, 10_000);
        assert!(fading == idle);
    }

    #[test]
    fn test_grayscale_fading_box_dimmed() {
        let state = pressed_state(0);
        let layout = LabelLayout::compute("A", CARD_BOUNDS);
        let mut fb = StatusGrayFramebuffer::new();
        render_status(&mut fb, &state, 250);

        let x = layout.x + 5 * i32::from(layout.scale);
        let level = fb.get_level(x, layout.y + 2);
        assert!(level > 0 && level < 255, "fading box level {level}");
    }

    #[test]
    fn test_active_layer_filled() {
        let mut state = DisplayState::default();
        state.on_layer_changed(2);
        let mut fb = StatusFramebuffer::new();
        render_status(&mut fb, &state, 0);

        // Interior pixel just inside the left edge: filled for the active layer only
        let mid_y = INDICATOR_Y + INDICATOR_HEIGHT / 2;
        let filled: heapless::Vec<u8, 5> = (0..5).filter(|&i| fb.get_pixel(indicator_x(i) + 1, mid_y)).collect();
        assert_eq!(filled.as_slice(), &[2]);
    }

    fn pattern_state(layer: u8) -> DisplayState {
        let mut state = DisplayState::new(StatusConfig {
            indicator_style: IndicatorStyle::Pattern,
            ..StatusConfig::default()
        });
        state.on_layer_changed(layer);
        state
    }

    /// Lit pattern cells of indicator `index`, row-major.
    fn pattern_cells(
        fb: &StatusFramebuffer,
        index: u8,
    ) -> [[bool; 5]; 5] {
        let top = INDICATOR_Y + (INDICATOR_HEIGHT - 5) / 2;
        let mut cells = [[false; 5]; 5];
        for (row, line) in cells.iter_mut().enumerate() {
            for (col, cell) in line.iter_mut().enumerate() {
                let x = indicator_x(index) + PATTERN_X + col as i32 * PATTERN_PITCH;
                *cell = fb.get_pixel(x, top + row as i32) && fb.get_pixel(x + 1, top + row as i32);
            }
        }
        cells
    }

    #[test]
    fn test_pattern_style_draws_active_icon() {
        for layer in 0..5 {
            let mut fb = StatusFramebuffer::new();
            render_status(&mut fb, &pattern_state(layer), 0);

            let cells = pattern_cells(&fb, layer);
            for (row, &bits) in LAYER_PATTERNS[usize::from(layer)].iter().enumerate() {
                for col in 0..5 {
                    assert_eq!(cells[row][col], bits & (0b10000 >> col) != 0, "layer {layer} cell {row},{col}");
                }
            }
        }
    }

    #[test]
    fn test_pattern_style_inactive_boxes_empty() {
        let mut fb = StatusFramebuffer::new();
        render_status(&mut fb, &pattern_state(1), 0);

        // Only the outline of an inactive box is drawn, no label and no dots
        for index in [0, 2, 3, 4] {
            assert_eq!(pattern_cells(&fb, index), [[false; 5]; 5]);
            let inner = indicator_x(index) + INDICATOR_WIDTH / 2;
            assert!(!fb.get_pixel(inner, INDICATOR_Y + INDICATOR_HEIGHT / 2));
        }
        // Double border on the active box only
        let mid_y = INDICATOR_Y + INDICATOR_HEIGHT / 2;
        assert!(fb.get_pixel(indicator_x(1), mid_y) && fb.get_pixel(indicator_x(1) + 1, mid_y));
        assert!(fb.get_pixel(indicator_x(2), mid_y) && !fb.get_pixel(indicator_x(2) + 1, mid_y));
    }

    #[test]
    fn test_layer_pattern_out_of_range_noop() {
        let mut fb = StatusFramebuffer::new();
        draw_layer_pattern(&mut fb, 5, 0, 0);
        assert_eq!(fb.count_lit(), 0);
    }

    #[test]
    fn test_grayscale_layer_levels() {
        let mut state = DisplayState::default();
        state.on_layer_changed(1);
        state.on_layer_changed(3);
        let mut fb = StatusGrayFramebuffer::new();
        render_status(&mut fb, &state, 0);

        let mid_y = INDICATOR_Y + INDICATOR_HEIGHT / 2;
        assert_eq!(fb.get_level(indicator_x(1), mid_y), LEVEL_PREVIOUS_LAYER);
        assert_eq!(fb.get_level(indicator_x(0), mid_y), LEVEL_INACTIVE_LAYER);
        assert_eq!(fb.get_level(indicator_x(3) + 1, mid_y), 255);
    }

    #[test]
    fn test_indicator_count_follows_config() {
        let state = DisplayState::new(StatusConfig {
            layer_count: 2,
            ..StatusConfig::default()
        });
        let mut fb = StatusFramebuffer::new();
        render_status(&mut fb, &state, 0);
        let mid_y = INDICATOR_Y + INDICATOR_HEIGHT / 2;
        assert!(fb.get_pixel(indicator_x(1), mid_y));
        assert!(!fb.get_pixel(indicator_x(2), mid_y));
    }

    #[test]
    fn test_progress_width() {
        assert_eq!(progress_width(0), 0);
        assert_eq!(progress_width(50), 60);
        assert_eq!(progress_width(99), 118);
        assert_eq!(progress_width(100), 0);
        assert_eq!(progress_width(u32::MAX), (u32::MAX % 100) as i32 * 120 / 100);
    }

    #[test]
    fn test_progress_bar_and_track() {
        let mut state = DisplayState::default();
        for i in 0..10 {
            state.on_key_changed(usage::A, true, Modifiers::empty(), i);
        }
        let mut gray = StatusGrayFramebuffer::new();
        render_status(&mut gray, &state, 10_000);
        assert_eq!(gray.get_level(PROGRESS_X, PROGRESS_Y), 255);
        assert_eq!(gray.get_level(PROGRESS_X + 100, PROGRESS_Y), LEVEL_TRACK);

        let mut mono = StatusFramebuffer::new();
        render_status(&mut mono, &state, 10_000);
        assert!(mono.get_pixel(PROGRESS_X, PROGRESS_Y));
        assert!(!mono.get_pixel(PROGRESS_X + 100, PROGRESS_Y));
    }

    #[test]
    fn test_corner_dots_follow_layer() {
        let mut state = DisplayState::default();
        state.on_layer_changed(2);
        let mut fb = StatusFramebuffer::new();
        render_status(&mut fb, &state, 0);
        assert!(fb.get_pixel(CORNER_DOTS[0].0, CORNER_DOTS[0].1));
        assert!(fb.get_pixel(CORNER_DOTS[1].0, CORNER_DOTS[1].1));
        assert!(!fb.get_pixel(CORNER_DOTS[2].0, CORNER_DOTS[2].1));
    }

    #[test]
    fn test_label_style_per_phase() {
        let fresh = label_style::<StatusGrayFramebuffer>(PressPhase::Fresh);
        assert_eq!(fresh.text, Gray8::BLACK);
        assert_eq!(fresh.highlight, Some(Gray8::WHITE));

        let late = label_style::<StatusGrayFramebuffer>(PressPhase::Fading { opacity: 40 });
        assert_eq!(late.text, Gray8::WHITE);
        assert_eq!(late.highlight, Some(Gray8::new(40)));

        let idle = label_style::<StatusGrayFramebuffer>(PressPhase::Idle);
        assert_eq!(idle.highlight, None);
    }

    #[test]
    fn test_render_state_first_frame_dirty() {
        let state = RenderState::new();
        assert!(state.is_first_frame());
        assert!(state.is_dirty(0, PressPhase::Idle, Page::Status));
    }

    #[test]
    fn test_render_state_clean_after_end_frame() {
        let mut state = RenderState::new();
        state.end_frame(3, PressPhase::Idle, Page::Status);
        assert!(!state.is_dirty(3, PressPhase::Idle, Page::Status));
        assert!(state.is_dirty(4, PressPhase::Idle, Page::Status));
        assert!(state.is_dirty(3, PressPhase::Fresh, Page::Status));
        assert!(state.is_dirty(3, PressPhase::Idle, Page::Debug));
    }

    #[test]
    fn test_render_state_fading_opacity_change_dirty() {
        let mut state = RenderState::new();
        state.end_frame(1, PressPhase::Fading { opacity: 200 }, Page::Status);
        assert!(state.is_dirty(1, PressPhase::Fading { opacity: 150 }, Page::Status));
    }

    #[test]
    fn test_mark_display_cleared() {
        let mut state = RenderState::new();
        state.end_frame(0, PressPhase::Idle, Page::Status);
        state.mark_display_cleared();
        assert!(state.is_dirty(0, PressPhase::Idle, Page::Status));
        state.end_frame(0, PressPhase::Idle, Page::Status);
        assert!(!state.is_dirty(0, PressPhase::Idle, Page::Status));
    }
}
