//! Display geometry, timing thresholds and runtime configuration.
//!
//! Layout values are compile-time constants sized for the 128x64 SSD1306 panel
//! on the Stryke shield. Anything a board might want to tune at runtime lives
//! in [`StatusConfig`].

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (SSD1306 128x64).
pub const SCREEN_WIDTH: usize = 128;

/// Display height in pixels.
pub const SCREEN_HEIGHT: usize = 64;

/// Number of 8-pixel pages on the 1bpp panel.
pub const SCREEN_PAGES: usize = SCREEN_HEIGHT / 8;

// =============================================================================
// Key Card Layout
// =============================================================================

/// Key card top-left corner.
pub const CARD_X: i32 = 2;
pub const CARD_Y: i32 = 2;

/// Key card dimensions.
pub const CARD_WIDTH: i32 = 124;
pub const CARD_HEIGHT: i32 = 36;

/// Corner radius of the key card outline.
pub const CARD_RADIUS: i32 = 8;

/// Horizontal space available to the key label inside the card.
pub const LABEL_MAX_WIDTH: i32 = CARD_WIDTH - 8;

/// Vertical band reserved for the key label (two 8px text rows).
pub const MAX_TEXT_HEIGHT: i32 = 16;

/// Corner radius of the fresh-press highlight box.
pub const HIGHLIGHT_RADIUS: i32 = 2;

// =============================================================================
// Layer Indicator Layout
// =============================================================================

/// Maximum number of layers the indicator row can show.
pub const MAX_LAYERS: u8 = 5;

/// First indicator X position.
pub const INDICATOR_START_X: i32 = 4;

/// Indicator top edge.
pub const INDICATOR_Y: i32 = 46;

/// Distance between the left edges of two neighbouring indicators.
pub const INDICATOR_SPACING: i32 = 25;

/// Indicator box size.
pub const INDICATOR_WIDTH: i32 = 22;
pub const INDICATOR_HEIGHT: i32 = 12;

/// Indicator corner radius.
pub const INDICATOR_RADIUS: i32 = 2;

/// Outline width of the active indicator in [`IndicatorStyle::Pattern`].
pub const PATTERN_BORDER: i32 = 2;

/// Left offset of the first pattern dot inside an indicator.
pub const PATTERN_X: i32 = 4;

/// Horizontal dot pitch and dot width of layer patterns.
pub const PATTERN_PITCH: i32 = 3;
pub const PATTERN_DOT_WIDTH: i32 = 2;

// =============================================================================
// Progress Bar / Corner Dots
// =============================================================================

/// Progress bar track position and size.
pub const PROGRESS_X: i32 = 4;
pub const PROGRESS_Y: i32 = 61;
pub const PROGRESS_WIDTH: i32 = 120;
pub const PROGRESS_HEIGHT: i32 = 2;

/// Key presses per full progress bar.
pub const PROGRESS_WRAP: u32 = 100;

/// Corner dot top-left positions, lit from index 0 up to the current layer.
pub const CORNER_DOTS: [(i32, i32); 4] = [(1, 40), (125, 40), (1, 61), (125, 61)];

/// Corner dot edge length.
pub const CORNER_DOT_SIZE: i32 = 2;

// =============================================================================
// Timing Configuration
// =============================================================================

/// Time after a key press during which the label is drawn inverted.
pub const PRESS_HIGHLIGHT_MS: u64 = 200;

/// Time after a key press at which every highlight effect has ended.
pub const FADE_OUT_MS: u64 = 300;

/// Refresh tick period used by drivers that poll the state machine.
pub const TICK_MS: u64 = 50;

// =============================================================================
// Intensity Levels (grayscale targets)
// =============================================================================

/// Full brightness.
pub const LEVEL_FULL: u8 = 255;

/// Outline of the layer that was active before the current one.
pub const LEVEL_PREVIOUS_LAYER: u8 = 178;

/// Outline of inactive layers.
pub const LEVEL_INACTIVE_LAYER: u8 = 77;

/// Progress bar track and unlit corner dots.
pub const LEVEL_TRACK: u8 = 51;

// =============================================================================
// Runtime Configuration
// =============================================================================

/// How the layer indicator row marks each layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorStyle {
    /// `L0`..`L4` text in every box, active box filled.
    #[default]
    Label,
    /// Empty outlines, active box drawn with a double border and its 5x5
    /// dot pattern.
    Pattern,
}

/// Tunables for the display state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusConfig {
    /// End of the FRESH window in milliseconds after a press.
    pub press_ms: u64,
    /// End of the FADING window in milliseconds after a press.
    pub fade_ms: u64,
    /// Number of layers shown in the indicator row (1..=`MAX_LAYERS`).
    pub layer_count: u8,
    /// Layer indicator rendering.
    pub indicator_style: IndicatorStyle,
}

impl StatusConfig {
    /// Default configuration for the Stryke shield.
    pub const fn new() -> Self {
        Self {
            press_ms: PRESS_HIGHLIGHT_MS,
            fade_ms: FADE_OUT_MS,
            layer_count: MAX_LAYERS,
            indicator_style: IndicatorStyle::Label,
        }
    }

    /// Return a copy with the layer count clamped to `1..=MAX_LAYERS` and
    /// `fade_ms` no shorter than `press_ms`.
    #[must_use]
    pub const fn sanitized(self) -> Self {
        let layer_count = if self.layer_count == 0 {
            1
        } else if self.layer_count > MAX_LAYERS {
            MAX_LAYERS
        } else {
            self.layer_count
        };
        let fade_ms = if self.fade_ms < self.press_ms { self.press_ms } else { self.fade_ms };
        Self {
            press_ms: self.press_ms,
            fade_ms,
            layer_count,
            indicator_style: self.indicator_style,
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self { Self::new() }
}
