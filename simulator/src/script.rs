//! Scripted key and layer activity for the headless demo.

use stryke_common::keycodes::{Modifiers, usage};
use stryke_common::{Canvas, Event, EventOutcome, FrameSink, KeyEvent, LayerEvent, StatusDisplay};

/// One simulated input.
#[derive(Clone, Copy, Debug)]
pub enum Action {
    Key { usage: u16, pressed: bool },
    Layer(u8),
    Label(&'static str),
}

impl Action {
    const fn press(usage: u16) -> Self { Self::Key { usage, pressed: true } }

    const fn release(usage: u16) -> Self { Self::Key { usage, pressed: false } }

    /// Feed this action to `display` at time `now`.
    pub fn apply<C: Canvas, S: FrameSink<C>>(
        self,
        display: &mut StatusDisplay<C, S>,
        now: u64,
    ) -> EventOutcome {
        match self {
            Self::Key { usage, pressed } => display.handle_event(
                Event::Key(KeyEvent {
                    keycode: usage,
                    pressed,
                    modifiers: Modifiers::empty(),
                    timestamp_ms: now,
                }),
                now,
            ),
            Self::Layer(layer) => display.handle_event(Event::Layer(LayerEvent { layer }), now),
            Self::Label(text) => display.set_key_label(text, now),
        }
    }
}

/// An action and the time it fires.
#[derive(Clone, Copy, Debug)]
pub struct Step {
    pub at_ms: u64,
    pub action: Action,
}

const fn step(
    at_ms: u64,
    action: Action,
) -> Step {
    Step { at_ms, action }
}

/// Extra time simulated after the last step so highlights can expire.
pub const SETTLE_MS: u64 = 500;

/// Demo session: plain keys, a shifted digit, a three-key combo, layer
/// switching and a direct label.
pub const DEMO: &[Step] = &[
    step(100, Action::press(usage::A)),
    step(150, Action::release(usage::A)),
    step(400, Action::press(usage::LEFT_SHIFT)),
    step(450, Action::press(usage::N1)),
    step(500, Action::release(usage::N1)),
    step(550, Action::release(usage::LEFT_SHIFT)),
    step(800, Action::press(usage::LEFT_CTRL)),
    step(850, Action::press(usage::LEFT_ALT)),
    step(900, Action::press(usage::DELETE)),
    step(950, Action::release(usage::DELETE)),
    step(1000, Action::release(usage::LEFT_ALT)),
    step(1000, Action::release(usage::LEFT_CTRL)),
    step(1300, Action::Layer(1)),
    step(1600, Action::Layer(3)),
    step(1900, Action::Layer(3)),
    step(2200, Action::Label("HELLO")),
    step(2500, Action::press(usage::F5)),
    step(2550, Action::release(usage::F5)),
    step(2800, Action::Layer(0)),
];

/// Time of the last scripted step.
pub fn duration(script: &[Step]) -> u64 { script.iter().map(|s| s.at_ms).max().unwrap_or(0) }

#[cfg(test)]
mod tests {
    use stryke_common::StatusConfig;
    use stryke_common::config::TICK_MS;
    use stryke_common::framebuffer::StatusFramebuffer;

    use super::*;
    use crate::sink::AsciiSink;

    #[test]
    fn test_demo_sorted() {
        assert!(DEMO.windows(2).all(|w| w[0].at_ms <= w[1].at_ms));
        assert_eq!(duration(DEMO), 2800);
    }

    #[test]
    fn test_demo_end_state() {
        let mut display = StatusDisplay::new(StatusFramebuffer::new(), AsciiSink::new(Vec::new()), StatusConfig::default());
        display.init().unwrap();

        let mut now = 0;
        let mut steps = DEMO.iter().peekable();
        while now <= duration(DEMO) + SETTLE_MS {
            while let Some(step) = steps.next_if(|s| s.at_ms <= now) {
                step.action.apply(&mut display, now);
            }
            display.tick(now);
            now += TICK_MS;
        }

        let state = display.state();
        assert_eq!(state.current_layer(), 0);
        assert_eq!(state.previous_layer(), Some(3));
        assert_eq!(state.key_press_count(), 4);
        assert!(state.active_modifiers().is_empty());
        assert_eq!(display.stats().blit_failures, 0);
        assert_eq!(display.stats().blits, display.sink().frames());
    }
}
