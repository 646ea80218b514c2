//! Display state machine.
//!
//! [`DisplayState`] is the single source of truth the status screen is drawn
//! from. It is updated by keyboard events (layer changes, key presses) and by
//! the direct setters, and it never reads a clock: every timestamp is passed
//! in by the caller as milliseconds since boot.
//!
//! # Press Phase
//!
//! The highlight shown on the key card is derived from the time since the last
//! press, never stored:
//!
//! | Elapsed | Phase | Shown on |
//! |---------|-------|----------|
//! | `< press_ms` | [`PressPhase::Fresh`] | all targets |
//! | `< fade_ms` | [`PressPhase::Fading`] | grayscale targets only |
//! | otherwise | [`PressPhase::Idle`] | all targets |
//!
//! # Modifier Handling
//!
//! - Modifier press: the modifier is held and the label shows all held
//!   modifiers (`CTRL+SHFT`)
//! - Modifier release: the modifier is no longer held, the label stays
//! - Regular key press: the label becomes `MODS+KEY` using the held modifiers
//!   plus the ones reported with the event
//! - Regular key release: ignored

use crate::animations::fade_opacity;
use crate::config::StatusConfig;
use crate::keycodes::{
    DEFAULT_KEY_LABEL, KeyLabel, Modifier, Modifiers, combo_label, key_label, label_from, modifier_label,
};

// =============================================================================
// Events
// =============================================================================

/// A key changed state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    /// HID keyboard usage ID.
    pub keycode: u16,
    /// `true` on key down.
    pub pressed: bool,
    /// Modifiers reported together with the key (implicit modifiers).
    pub modifiers: Modifiers,
    /// Milliseconds since boot.
    pub timestamp_ms: u64,
}

/// The highest active keymap layer changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerEvent {
    pub layer: u8,
}

/// Events consumed by the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    Layer(LayerEvent),
    Key(KeyEvent),
}

/// Result of feeding an event to the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventOutcome {
    /// State changed; the screen needs a redraw.
    Changed,
    /// Nothing to do.
    Ignored,
}

impl EventOutcome {
    #[inline]
    pub const fn is_changed(self) -> bool { matches!(self, Self::Changed) }
}

// =============================================================================
// Press Phase
// =============================================================================

/// Visual phase of the key highlight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressPhase {
    /// Just pressed: label drawn inverted on a highlight box.
    Fresh,
    /// Highlight fading out, `opacity` 255 -> 0.
    Fading { opacity: u8 },
    /// No highlight.
    Idle,
}

impl PressPhase {
    #[inline]
    pub const fn is_idle(self) -> bool { matches!(self, Self::Idle) }
}

/// Phase `now` for a press at `last_key_time`.
///
/// `grayscale` selects whether the fading window exists; monochrome targets go
/// straight from fresh to idle.
pub fn press_phase(
    last_key_time: Option<u64>,
    now: u64,
    config: &StatusConfig,
    grayscale: bool,
) -> PressPhase {
    let Some(pressed_at) = last_key_time else {
        return PressPhase::Idle;
    };
    let elapsed = now.saturating_sub(pressed_at);
    if elapsed < config.press_ms {
        PressPhase::Fresh
    } else if grayscale && elapsed < config.fade_ms {
        PressPhase::Fading {
            opacity: fade_opacity(elapsed, config.press_ms, config.fade_ms),
        }
    } else {
        PressPhase::Idle
    }
}

// =============================================================================
// Display State
// =============================================================================

/// Everything the status screen shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayState {
    config: StatusConfig,
    current_layer: u8,
    previous_layer: Option<u8>,
    last_key_label: KeyLabel,
    last_key_time: Option<u64>,
    active_modifiers: Modifiers,
    key_press_count: u32,
    revision: u32,
}

impl DisplayState {
    /// Fresh state on layer 0 showing the placeholder label.
    pub fn new(config: StatusConfig) -> Self {
        Self {
            config: config.sanitized(),
            current_layer: 0,
            previous_layer: None,
            last_key_label: label_from(DEFAULT_KEY_LABEL),
            last_key_time: None,
            active_modifiers: Modifiers::empty(),
            key_press_count: 0,
            revision: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub const fn config(&self) -> &StatusConfig { &self.config }

    #[inline]
    pub const fn current_layer(&self) -> u8 { self.current_layer }

    /// Layer that was active before the current one, if the layer ever changed.
    #[inline]
    pub const fn previous_layer(&self) -> Option<u8> { self.previous_layer }

    #[inline]
    pub fn last_key_label(&self) -> &str { self.last_key_label.as_str() }

    #[inline]
    pub const fn last_key_time(&self) -> Option<u64> { self.last_key_time }

    #[inline]
    pub const fn active_modifiers(&self) -> Modifiers { self.active_modifiers }

    /// Regular key presses seen since boot (wraps).
    #[inline]
    pub const fn key_press_count(&self) -> u32 { self.key_press_count }

    /// Incremented on every state change.
    #[inline]
    pub const fn revision(&self) -> u32 { self.revision }

    /// Current press phase.
    pub fn phase(
        &self,
        now: u64,
        grayscale: bool,
    ) -> PressPhase {
        press_phase(self.last_key_time, now, &self.config, grayscale)
    }

    // -------------------------------------------------------------------------
    // Event Handling
    // -------------------------------------------------------------------------

    /// Apply one event. Last write wins; events are not queued.
    pub fn handle_event(
        &mut self,
        event: Event,
    ) -> EventOutcome {
        match event {
            Event::Layer(layer) => self.apply_layer(layer.layer),
            Event::Key(key) => self.apply_key(&key),
        }
    }

    /// Layer change notification from the keymap.
    pub fn on_layer_changed(
        &mut self,
        layer: u8,
    ) -> EventOutcome {
        self.handle_event(Event::Layer(LayerEvent { layer }))
    }

    /// Key state change notification from the keymap.
    pub fn on_key_changed(
        &mut self,
        keycode: u16,
        pressed: bool,
        modifiers: Modifiers,
        now: u64,
    ) -> EventOutcome {
        self.handle_event(Event::Key(KeyEvent {
            keycode,
            pressed,
            modifiers,
            timestamp_ms: now,
        }))
    }

    /// Show `text` as if a key had just been pressed.
    ///
    /// The label is truncated to 31 bytes at a character boundary. Does not
    /// count towards the key press counter.
    pub fn set_key_label(
        &mut self,
        text: &str,
        now: u64,
    ) -> EventOutcome {
        self.last_key_label = label_from(text);
        self.last_key_time = Some(now);
        self.bump();
        EventOutcome::Changed
    }

    /// Switch the highlighted layer indicator.
    pub fn set_layer(
        &mut self,
        index: u8,
    ) -> EventOutcome {
        self.apply_layer(index)
    }

    fn apply_layer(
        &mut self,
        layer: u8,
    ) -> EventOutcome {
        let layer = layer.min(self.config.layer_count - 1);
        if layer == self.current_layer {
            return EventOutcome::Ignored;
        }
        self.previous_layer = Some(self.current_layer);
        self.current_layer = layer;
        self.bump();
        EventOutcome::Changed
    }

    fn apply_key(
        &mut self,
        event: &KeyEvent,
    ) -> EventOutcome {
        if let Some(bit) = Modifiers::from_usage(event.keycode) {
            return if event.pressed {
                self.active_modifiers |= bit;
                self.last_key_label = modifier_label(self.active_modifiers);
                self.last_key_time = Some(event.timestamp_ms);
                self.bump();
                EventOutcome::Changed
            } else if self.active_modifiers.contains(bit) {
                self.active_modifiers.remove(bit);
                self.bump();
                EventOutcome::Changed
            } else {
                EventOutcome::Ignored
            };
        }

        if !event.pressed {
            return EventOutcome::Ignored;
        }

        let held = self.active_modifiers | event.modifiers;
        self.last_key_label = combo_label(held, key_label(event.keycode));
        self.last_key_time = Some(event.timestamp_ms);
        self.key_press_count = self.key_press_count.wrapping_add(1);
        self.bump();
        EventOutcome::Changed
    }

    /// Whether any modifier of `kind` is currently held.
    pub fn is_held(
        &self,
        kind: Modifier,
    ) -> bool {
        self.active_modifiers.intersects(kind.flags())
    }

    #[inline]
    fn bump(&mut self) { self.revision = self.revision.wrapping_add(1); }
}

impl Default for DisplayState {
    fn default() -> Self { Self::new(StatusConfig::default()) }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycodes::usage;

    fn press(
        state: &mut DisplayState,
        keycode: u16,
        now: u64,
    ) -> EventOutcome {
        state.on_key_changed(keycode, true, Modifiers::empty(), now)
    }

    fn release(
        state: &mut DisplayState,
        keycode: u16,
        now: u64,
    ) -> EventOutcome {
        state.on_key_changed(keycode, false, Modifiers::empty(), now)
    }

    #[test]
    fn test_initial_state() {
        let state = DisplayState::default();
        assert_eq!(state.current_layer(), 0);
        assert_eq!(state.previous_layer(), None);
        assert_eq!(state.last_key_label(), "-");
        assert_eq!(state.phase(0, true), PressPhase::Idle);
    }

    #[test]
    fn test_plain_key_press() {
        let mut state = DisplayState::default();
        assert_eq!(press(&mut state, usage::A, 0), EventOutcome::Changed);
        assert_eq!(state.last_key_label(), "A");
        assert_eq!(state.last_key_time(), Some(0));
        assert_eq!(state.key_press_count(), 1);
        assert_eq!(state.phase(100, false), PressPhase::Fresh);
        assert_eq!(state.phase(199, false), PressPhase::Fresh);
        assert_eq!(state.phase(200, false), PressPhase::Idle);
    }

    #[test]
    fn test_phase_thresholds() {
        let mut state = DisplayState::default();
        press(&mut state, usage::A, 1_000);

        assert_eq!(state.phase(1_100, true), PressPhase::Fresh);
        assert_eq!(state.phase(1_100, false), PressPhase::Fresh);

        assert!(matches!(state.phase(1_250, true), PressPhase::Fading { .. }));
        assert_eq!(state.phase(1_250, false), PressPhase::Idle);

        assert_eq!(state.phase(1_500, true), PressPhase::Idle);
        assert_eq!(state.phase(1_500, false), PressPhase::Idle);
    }

    #[test]
    fn test_fading_opacity_decreases() {
        let mut state = DisplayState::default();
        press(&mut state, usage::A, 0);
        let opacity = |now| match state.phase(now, true) {
            PressPhase::Fading { opacity } => opacity,
            other => panic!("expected fading at {now}, got {other:?}"),
        };
        assert!(opacity(210) > opacity(250));
        assert!(opacity(250) > opacity(290));
    }

    #[test]
    fn test_clock_going_backwards_is_fresh() {
        let mut state = DisplayState::default();
        press(&mut state, usage::A, 500);
        assert_eq!(state.phase(400, false), PressPhase::Fresh);
    }

    #[test]
    fn test_release_of_regular_key_ignored() {
        let mut state = DisplayState::default();
        press(&mut state, usage::A, 0);
        let revision = state.revision();
        assert_eq!(release(&mut state, usage::A, 10), EventOutcome::Ignored);
        assert_eq!(state.revision(), revision);
        assert_eq!(state.last_key_time(), Some(0));
    }

    #[test]
    fn test_modifier_press_shows_name() {
        let mut state = DisplayState::default();
        press(&mut state, usage::LEFT_CTRL, 0);
        assert_eq!(state.last_key_label(), "CTRL");
        press(&mut state, usage::RIGHT_SHIFT, 10);
        assert_eq!(state.last_key_label(), "CTRL+SHFT");
        assert_eq!(state.last_key_time(), Some(10));
        assert!(state.is_held(Modifier::Shift));
        // Modifiers alone do not count as key presses
        assert_eq!(state.key_press_count(), 0);
    }

    #[test]
    fn test_modifier_release_keeps_label() {
        let mut state = DisplayState::default();
        press(&mut state, usage::LEFT_ALT, 0);
        assert_eq!(release(&mut state, usage::LEFT_ALT, 50), EventOutcome::Changed);
        assert_eq!(state.last_key_label(), "ALT");
        assert!(!state.is_held(Modifier::Alt));
        // Releasing a modifier that is not held changes nothing
        assert_eq!(release(&mut state, usage::LEFT_ALT, 60), EventOutcome::Ignored);
    }

    #[test]
    fn test_combo_label() {
        let mut state = DisplayState::default();
        press(&mut state, usage::LEFT_CTRL, 0);
        press(&mut state, usage::C, 5);
        assert_eq!(state.last_key_label(), "CTRL+C");
        assert_eq!(state.key_press_count(), 1);

        release(&mut state, usage::LEFT_CTRL, 10);
        press(&mut state, usage::C, 20);
        assert_eq!(state.last_key_label(), "C");
    }

    #[test]
    fn test_event_modifiers_merged() {
        let mut state = DisplayState::default();
        state.on_key_changed(usage::T, true, Modifiers::LEFT_SHIFT, 0);
        assert_eq!(state.last_key_label(), "SHFT+T");

        press(&mut state, usage::LEFT_GUI, 10);
        state.on_key_changed(usage::T, true, Modifiers::LEFT_CTRL, 20);
        assert_eq!(state.last_key_label(), "CTRL+CMD+T");
    }

    #[test]
    fn test_unknown_key_label() {
        let mut state = DisplayState::default();
        press(&mut state, 0x00A5, 0);
        assert_eq!(state.last_key_label(), "KEY");
    }

    #[test]
    fn test_layer_change_tracks_previous() {
        let mut state = DisplayState::default();
        assert_eq!(state.on_layer_changed(2), EventOutcome::Changed);
        assert_eq!(state.current_layer(), 2);
        assert_eq!(state.previous_layer(), Some(0));

        assert_eq!(state.on_layer_changed(2), EventOutcome::Ignored);
        assert_eq!(state.previous_layer(), Some(0));

        state.on_layer_changed(1);
        assert_eq!(state.previous_layer(), Some(2));
    }

    #[test]
    fn test_layer_clamped() {
        let mut state = DisplayState::default();
        state.set_layer(200);
        assert_eq!(state.current_layer(), 4);

        let mut state = DisplayState::new(StatusConfig {
            layer_count: 3,
            ..StatusConfig::default()
        });
        state.on_layer_changed(7);
        assert_eq!(state.current_layer(), 2);
    }

    #[test]
    fn test_set_key_label_truncates() {
        let mut state = DisplayState::default();
        state.set_key_label("THIS LABEL IS MUCH LONGER THAN THIRTY ONE BYTES", 42);
        assert_eq!(state.last_key_label().len(), 31);
        assert_eq!(state.last_key_time(), Some(42));
        assert_eq!(state.phase(50, false), PressPhase::Fresh);
        assert_eq!(state.key_press_count(), 0);
    }

    #[test]
    fn test_last_write_wins() {
        let mut state = DisplayState::default();
        press(&mut state, usage::A, 0);
        press(&mut state, usage::B, 1);
        state.set_key_label("HELLO", 2);
        press(&mut state, usage::ESCAPE, 3);
        assert_eq!(state.last_key_label(), "ESC");
        assert_eq!(state.last_key_time(), Some(3));
    }

    #[test]
    fn test_revision_increments_on_change() {
        let mut state = DisplayState::default();
        let start = state.revision();
        press(&mut state, usage::A, 0);
        state.on_layer_changed(1);
        assert_eq!(state.revision(), start.wrapping_add(2));
    }
}
